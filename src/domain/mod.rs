//! Domain models mirroring the Money Flow collections.

pub mod account;
pub mod book;
pub mod category;
pub mod common;
pub mod ledgers;
pub mod person;
pub mod transaction;

pub use account::{Account, AccountKind, CashbackPolicy};
pub use book::Book;
pub use category::{Category, SubCategory, TransactionNature};
pub use common::{Identifiable, NamedEntity};
pub use ledgers::{CashbackLedgerEntry, DebtLedgerEntry, DebtStatus};
pub use person::Person;
pub use transaction::Transaction;
