use serde::{Deserialize, Serialize};

use crate::domain::common::{Identifiable, NamedEntity};

/// A financial account tracked within the book. Identifiers are external
/// codes (e.g. `SAC-CA12A-CRE`) carried over from the source data set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub kind: AccountKind,
    #[serde(default)]
    pub opening_balance: i64,
    #[serde(default)]
    pub current_balance: i64,
    #[serde(default)]
    pub sum_inflow: i64,
    #[serde(default)]
    pub sum_outflow: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cashback: Option<CashbackPolicy>,
}

fn default_active() -> bool {
    true
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            opening_balance: 0,
            current_balance: 0,
            sum_inflow: 0,
            sum_outflow: 0,
            credit_limit: None,
            is_active: true,
            cashback: None,
        }
    }

    pub fn with_credit_limit(mut self, limit: i64) -> Self {
        self.credit_limit = Some(limit);
        self
    }

    pub fn with_cashback(mut self, policy: CashbackPolicy) -> Self {
        self.cashback = Some(policy);
        self
    }

    pub fn with_opening_balance(mut self, balance: i64) -> Self {
        self.opening_balance = balance;
        self.current_balance = balance;
        self
    }
}

impl Identifiable for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Supported account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountKind {
    Bank,
    Cash,
    Credit,
    Savings,
    EWallet,
}

impl AccountKind {
    /// Maps an imported account-type code (e.g. `CRE-YNMAY19`) onto a kind.
    pub fn from_type_code(code: &str) -> Self {
        let upper = code.to_ascii_uppercase();
        if upper.starts_with("CRE") {
            AccountKind::Credit
        } else if upper.starts_with("SAV") {
            AccountKind::Savings
        } else if upper.starts_with("CASH") {
            AccountKind::Cash
        } else if upper.starts_with("EWA") || upper.starts_with("WAL") {
            AccountKind::EWallet
        } else {
            AccountKind::Bank
        }
    }
}

/// Per-account cashback policy for credit cards: a flat per-transaction
/// rate, a per-statement-cycle budget, and the statement anchor day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CashbackPolicy {
    pub rate_percent: f64,
    pub max_per_cycle: i64,
    pub statement_day: u32,
}

impl CashbackPolicy {
    pub fn new(rate_percent: f64, max_per_cycle: i64, statement_day: u32) -> Self {
        Self {
            rate_percent,
            max_per_cycle,
            statement_day,
        }
    }
}
