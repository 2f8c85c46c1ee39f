pub mod json_backend;

use std::path::Path;

use crate::{domain::Book, errors::Result};

/// Abstraction over persistence backends capable of storing books and
/// timestamped snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &Book, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Book>;
    fn list_books(&self) -> Result<Vec<String>>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, book: &Book, name: &str, note: Option<&str>) -> Result<()>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Book>;
    fn last_book(&self) -> Result<Option<String>>;
    fn record_last_book(&self, name: Option<&str>) -> Result<()>;

    /// Ad-hoc file operations; defaults forward to the JSON helpers.
    fn save_to_path(&self, book: &Book, path: &Path) -> Result<()> {
        json_backend::save_book_to_path(book, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Book> {
        json_backend::load_book_from_path(path)
    }
}

pub use json_backend::JsonStorage;
