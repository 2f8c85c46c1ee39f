use std::path::Path;

use crate::domain::book::{Book, CURRENT_SCHEMA_VERSION};
use crate::errors::{FlowError, Result};
use crate::storage::StorageBackend;

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub name: String,
    pub warnings: Vec<String>,
    pub schema_version: u8,
}

/// Facade that coordinates the current book, persistence, and backups.
pub struct BookManager {
    pub current: Option<Book>,
    current_name: Option<String>,
    storage: Box<dyn StorageBackend>,
}

impl BookManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    /// Immutable handle to the loaded book, failing when none is open.
    pub fn book(&self) -> Result<&Book> {
        self.current.as_ref().ok_or(FlowError::BookNotLoaded)
    }

    pub fn book_mut(&mut self) -> Result<&mut Book> {
        self.current.as_mut().ok_or(FlowError::BookNotLoaded)
    }

    pub fn create(&mut self, name: &str) -> Result<()> {
        let book = Book::new(name);
        self.current = Some(book);
        self.current_name = Some(name.to_string());
        self.save()?;
        self.storage.record_last_book(Some(name))?;
        Ok(())
    }

    pub fn load(&mut self, name: &str) -> Result<LoadMetadata> {
        let book = self.storage.load(name)?;
        Self::ensure_schema_support(book.schema_version)?;
        let warnings = book.referential_warnings();
        let schema_version = book.schema_version;
        self.current = Some(book);
        self.current_name = Some(name.to_string());
        self.storage.record_last_book(Some(name))?;
        Ok(LoadMetadata {
            name: name.to_string(),
            warnings,
            schema_version,
        })
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<LoadMetadata> {
        let book = self.storage.load_from_path(path)?;
        Self::ensure_schema_support(book.schema_version)?;
        let warnings = book.referential_warnings();
        let schema_version = book.schema_version;
        let name = book.name.clone();
        self.current = Some(book);
        self.current_name = None;
        Ok(LoadMetadata {
            name,
            warnings,
            schema_version,
        })
    }

    pub fn save(&mut self) -> Result<()> {
        let name = self
            .current_name
            .clone()
            .ok_or_else(|| FlowError::Storage("current book is unnamed".into()))?;
        let book = self.current.as_ref().ok_or(FlowError::BookNotLoaded)?;
        self.storage.save(book, &name)
    }

    pub fn save_as(&mut self, name: &str) -> Result<()> {
        let book = self.current.as_ref().ok_or(FlowError::BookNotLoaded)?;
        self.storage.save(book, name)?;
        self.current_name = Some(name.to_string());
        self.storage.record_last_book(Some(name))
    }

    pub fn backup(&self, note: Option<&str>) -> Result<()> {
        let name = self
            .current_name
            .as_deref()
            .ok_or_else(|| FlowError::Storage("current book is unnamed".into()))?;
        let book = self.current.as_ref().ok_or(FlowError::BookNotLoaded)?;
        self.storage.backup(book, name, note)
    }

    pub fn restore(&mut self, name: &str, backup_name: &str) -> Result<()> {
        let book = self.storage.restore(name, backup_name)?;
        Self::ensure_schema_support(book.schema_version)?;
        self.current = Some(book);
        self.current_name = Some(name.to_string());
        Ok(())
    }

    pub fn list_books(&self) -> Result<Vec<String>> {
        self.storage.list_books()
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        self.storage.list_backups(name)
    }

    pub fn last_opened(&self) -> Result<Option<String>> {
        self.storage.last_book()
    }

    pub fn set_current(&mut self, book: Book, name: Option<String>) {
        self.current = Some(book);
        self.current_name = name;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.current_name = None;
    }

    fn ensure_schema_support(schema_version: u8) -> Result<()> {
        if schema_version > CURRENT_SCHEMA_VERSION {
            return Err(FlowError::Storage(format!(
                "book schema v{} is newer than supported v{}",
                schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}
