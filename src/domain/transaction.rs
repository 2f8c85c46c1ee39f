use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single money movement. `amount` is the gross price; `final_price` is
/// what actually left (or entered) the account after discounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub amount: i64,
    #[serde(default)]
    pub percent_discount: f64,
    #[serde(default)]
    pub fixed_discount: i64,
    pub final_price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Debt period this transaction belongs to, set when a person is attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_tag: Option<String>,
    /// Cashback posted to the cycle ledger for this transaction, kept so the
    /// posting can be reversed on removal or edit.
    #[serde(default)]
    pub cashback_earned: i64,
}

impl Transaction {
    pub fn new(date: NaiveDate, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            timestamp: Utc::now(),
            amount,
            percent_discount: 0.0,
            fixed_discount: 0,
            final_price: amount,
            from_account: None,
            to_account: None,
            person_id: None,
            subcategory_id: None,
            notes: None,
            debt_tag: None,
            cashback_earned: 0,
        }
    }

    pub fn with_accounts(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from_account = from;
        self.to_account = to;
        self
    }

    pub fn with_person(mut self, person_id: impl Into<String>) -> Self {
        self.person_id = Some(person_id.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory_id: impl Into<String>) -> Self {
        self.subcategory_id = Some(subcategory_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Monetary value of the current discount pair against `amount`.
    pub fn discount_value(&self) -> i64 {
        discount_value(self.percent_discount, self.fixed_discount, self.amount)
    }

    /// Records the discount pair and re-derives the final price.
    pub fn apply_discounts(&mut self, percent: f64, fixed: i64) {
        self.percent_discount = percent;
        self.fixed_discount = fixed;
        self.final_price = (self.amount - self.discount_value()).max(0);
    }

    pub fn involves(&self, account_id: &str) -> bool {
        self.from_account.as_deref() == Some(account_id)
            || self.to_account.as_deref() == Some(account_id)
    }
}

/// Combined monetary effect of a percentage plus fixed discount, floored to
/// whole minor units so a derived discount never exceeds the exact value.
pub fn discount_value(percent: f64, fixed: i64, amount: i64) -> i64 {
    let from_percent = (percent * amount as f64 / 100.0).floor() as i64;
    from_percent + fixed
}
