use serde::{Deserialize, Serialize};

use crate::domain::common::{Identifiable, NamedEntity};

/// Top-level category carrying the transaction nature used for reporting
/// and debt direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub nature: TransactionNature,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, nature: TransactionNature) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nature,
        }
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Second-level category; transactions reference these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubCategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
}

impl SubCategory {
    pub fn new(
        id: impl Into<String>,
        category_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
            name: name.into(),
        }
    }
}

impl Identifiable for SubCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for SubCategory {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Direction of money movement a category describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionNature {
    Income,
    Expense,
    Transfer,
}

impl TransactionNature {
    /// Parses the two-letter nature codes used by the imported data set.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "IN" => Some(TransactionNature::Income),
            "EX" => Some(TransactionNature::Expense),
            "TF" => Some(TransactionNature::Transfer),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransactionNature::Income => "IN",
            TransactionNature::Expense => "EX",
            TransactionNature::Transfer => "TF",
        }
    }
}
