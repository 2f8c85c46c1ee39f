use serde::{Deserialize, Serialize};

use crate::domain::common::{Identifiable, NamedEntity};

/// A counterparty that can owe or repay money (the debt-ledger subject).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub name: String,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Identifiable for Person {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Person {
    fn name(&self) -> &str {
        &self.name
    }
}
