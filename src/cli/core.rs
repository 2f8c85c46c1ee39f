use dialoguer::theme::ColorfulTheme;
use once_cell::sync::Lazy;
use strsim::levenshtein;
use thiserror::Error;

use crate::cli::{commands, output};
use crate::config::{Config, ConfigManager};
use crate::core::BookManager;
use crate::currency::{CurrencyCode, LocaleConfig};
use crate::errors::FlowError;
use crate::storage::JsonStorage;

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FlowError),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Prompt error: {0}")]
    Dialog(#[from] dialoguer::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub enum LoopControl {
    Continue,
    Exit,
}

/// Static description of one shell command, used by help, completion, and
/// the unknown-command suggestions.
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub static COMMANDS: Lazy<Vec<CommandSpec>> = Lazy::new(|| {
    vec![
        CommandSpec { name: "help", usage: "help", summary: "List available commands" },
        CommandSpec { name: "version", usage: "version", summary: "Show build information" },
        CommandSpec { name: "new", usage: "new <name>", summary: "Create and open a new book" },
        CommandSpec { name: "open", usage: "open <name>", summary: "Open a stored book" },
        CommandSpec { name: "books", usage: "books", summary: "List stored books" },
        CommandSpec { name: "save", usage: "save", summary: "Persist the current book" },
        CommandSpec { name: "backup", usage: "backup [note]", summary: "Snapshot the current book" },
        CommandSpec { name: "backups", usage: "backups", summary: "List snapshots of the current book" },
        CommandSpec { name: "accounts", usage: "accounts", summary: "List accounts with balances" },
        CommandSpec { name: "people", usage: "people", summary: "List tracked people" },
        CommandSpec {
            name: "transactions",
            usage: "transactions [limit]",
            summary: "Show the most recent transactions",
        },
        CommandSpec { name: "debt", usage: "debt", summary: "Show the consolidated debt ledger" },
        CommandSpec {
            name: "cashback",
            usage: "cashback <account> <amount> [date]",
            summary: "Preview the cashback budget for a proposed amount",
        },
        CommandSpec { name: "add", usage: "add", summary: "Enter a transaction interactively" },
        CommandSpec {
            name: "import",
            usage: "import <file.csv> [collection]",
            summary: "Import a CSV export into the book",
        },
        CommandSpec {
            name: "recompute",
            usage: "recompute",
            summary: "Refresh account balances from the transaction log",
        },
        CommandSpec {
            name: "rebuild-debts",
            usage: "rebuild-debts",
            summary: "Rebuild the debt ledger from transactions",
        },
        CommandSpec {
            name: "rebuild-cashback",
            usage: "rebuild-cashback",
            summary: "Rebuild the cashback cycle ledger from transactions",
        },
        CommandSpec { name: "exit", usage: "exit", summary: "Leave the shell" },
    ]
});

pub fn command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|spec| spec.name).collect()
}

/// Mutable state threaded through every command handler.
pub struct ShellContext {
    pub manager: BookManager,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub locale: LocaleConfig,
    pub currency: CurrencyCode,
    pub mode: CliMode,
    pub running: bool,
    pub theme: ColorfulTheme,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new_default()?;
        let mut manager = BookManager::new(Box::new(storage));

        if let Some(last) = manager.last_opened()? {
            match manager.load(&last) {
                Ok(metadata) => {
                    output::info(format!("Opened book `{}`.", metadata.name));
                    for warning in &metadata.warnings {
                        output::warning(warning);
                    }
                }
                Err(err) => output::warning(format!("Could not reopen `{}`: {}", last, err)),
            }
        }

        let currency = CurrencyCode::new(config.currency.clone());
        Ok(Self {
            manager,
            config,
            config_manager,
            locale: LocaleConfig::default(),
            currency,
            mode,
            running: true,
            theme: ColorfulTheme::default(),
        })
    }

    pub fn prompt(&self) -> String {
        match self.manager.current_name() {
            Some(name) => format!("moneyflow:{}> ", name),
            None => "moneyflow> ".to_string(),
        }
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
        if !COMMANDS.iter().any(|spec| spec.name == command) {
            output::error(format!("Unknown command `{}`.", command));
            self.suggest(command);
            return Ok(LoopControl::Continue);
        }
        commands::handle(self, command, args)
    }

    /// Offers the closest registered command when the input looks like a typo.
    fn suggest(&self, input: &str) {
        let mut suggestions: Vec<(usize, &'static str)> = COMMANDS
            .iter()
            .map(|spec| (levenshtein(spec.name, input), spec.name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);
        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Did you mean `{}`?", best));
            }
        }
    }

    pub fn report_error(&mut self, err: CliError) -> Result<(), CliError> {
        output::error(err.to_string());
        Ok(())
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        dialoguer::Confirm::with_theme(&self.theme)
            .with_prompt("Exit the shell?")
            .default(false)
            .interact()
            .map_err(CliError::from)
    }

    pub fn record_last_opened_config(&mut self) -> Result<(), CliError> {
        self.config.last_opened_book = self.manager.current_name().map(str::to_string);
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}
