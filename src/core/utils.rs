use dirs::home_dir;
use std::{env, fs, path::Path, path::PathBuf};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".moneyflow_core";
const BOOK_DIR: &str = "books";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_BACKUP_DIR: &str = "config_backups";
const STATE_FILE: &str = "state.json";

/// Application data directory, defaulting to `~/.moneyflow_core` and
/// overridable through `MONEYFLOW_CORE_HOME` (tests point this at a temp
/// dir).
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("MONEYFLOW_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn books_dir_in(base: &Path) -> PathBuf {
    base.join(BOOK_DIR)
}

pub fn backups_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join("config.json")
}

pub fn config_backups_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_BACKUP_DIR)
}

pub fn state_file_in(base: &Path) -> PathBuf {
    base.join(STATE_FILE)
}

/// Creates the directory (and parents) when missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
