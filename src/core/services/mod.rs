//! Business-rule services over the in-memory [`Book`](crate::domain::Book).
//!
//! The original application ran these rules inline in its entry screens;
//! here each one is an explicit, stateless service invoked by the caller.

pub mod account_service;
pub mod cashback_service;
pub mod category_service;
pub mod debt_service;
pub mod person_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use cashback_service::{CashbackPreview, CashbackService};
pub use category_service::CategoryService;
pub use debt_service::{DebtRow, DebtService};
pub use person_service::PersonService;
pub use transaction_service::{NewTransaction, TransactionService};
