use serde::{Deserialize, Serialize};
use std::fmt;

/// Running cashback total for one account + statement cycle. This is the
/// `used_budget` source the allocator reads before proposing a discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CashbackLedgerEntry {
    pub account_id: String,
    pub cycle_tag: String,
    pub sum_back_earned: i64,
}

impl CashbackLedgerEntry {
    pub fn new(account_id: impl Into<String>, cycle_tag: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            cycle_tag: cycle_tag.into(),
            sum_back_earned: 0,
        }
    }
}

/// Aggregated debt position for one person over one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebtLedgerEntry {
    pub person_id: String,
    pub period_tag: String,
    pub sum_debt: i64,
    pub sum_repaid: i64,
}

impl DebtLedgerEntry {
    pub fn new(person_id: impl Into<String>, period_tag: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            period_tag: period_tag.into(),
            sum_debt: 0,
            sum_repaid: 0,
        }
    }

    pub fn remaining_debt(&self) -> i64 {
        self.sum_debt - self.sum_repaid
    }

    pub fn status(&self) -> DebtStatus {
        match self.remaining_debt() {
            r if r > 0 => DebtStatus::Open,
            0 => DebtStatus::FullyRepaid,
            _ => DebtStatus::Overpaid,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DebtStatus {
    Open,
    FullyRepaid,
    Overpaid,
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DebtStatus::Open => "Open",
            DebtStatus::FullyRepaid => "Fully Repaid",
            DebtStatus::Overpaid => "Overpaid",
        };
        write!(f, "{}", label)
    }
}
