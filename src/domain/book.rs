use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    account::Account,
    category::{Category, SubCategory, TransactionNature},
    ledgers::{CashbackLedgerEntry, DebtLedgerEntry},
    person::Person,
    transaction::Transaction,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The whole data set of one finance book: every collection the original
/// application keeps, plus bookkeeping metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub subcategories: Vec<SubCategory>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub cashback_ledger: Vec<CashbackLedgerEntry>,
    #[serde(default)]
    pub debt_ledger: Vec<DebtLedgerEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Book::schema_version_default")]
    pub schema_version: u8,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts: Vec::new(),
            people: Vec::new(),
            categories: Vec::new(),
            subcategories: Vec::new(),
            transactions: Vec::new(),
            cashback_ledger: Vec::new(),
            debt_ledger: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_account(&mut self, account: Account) -> String {
        let id = account.id.clone();
        self.accounts.push(account);
        self.touch();
        id
    }

    pub fn add_person(&mut self, person: Person) -> String {
        let id = person.id.clone();
        self.people.push(person);
        self.touch();
        id
    }

    pub fn add_category(&mut self, category: Category) -> String {
        let id = category.id.clone();
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn add_subcategory(&mut self, subcategory: SubCategory) -> String {
        let id = subcategory.id.clone();
        self.subcategories.push(subcategory);
        self.touch();
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn account_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn subcategory(&self, id: &str) -> Option<&SubCategory> {
        self.subcategories.iter().find(|sub| sub.id == id)
    }

    /// Nature of a transaction as declared by its subcategory's parent
    /// category, when both links resolve.
    pub fn nature_of(&self, transaction: &Transaction) -> Option<TransactionNature> {
        let sub = self.subcategory(transaction.subcategory_id.as_deref()?)?;
        self.category(&sub.category_id).map(|c| c.nature)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn cashback_entry(&self, account_id: &str, cycle_tag: &str) -> Option<&CashbackLedgerEntry> {
        self.cashback_ledger
            .iter()
            .find(|entry| entry.account_id == account_id && entry.cycle_tag == cycle_tag)
    }

    /// Mutable handle to the cycle entry, creating a zeroed one on first use.
    pub fn cashback_entry_mut(
        &mut self,
        account_id: &str,
        cycle_tag: &str,
    ) -> &mut CashbackLedgerEntry {
        let index = self
            .cashback_ledger
            .iter()
            .position(|entry| entry.account_id == account_id && entry.cycle_tag == cycle_tag);
        match index {
            Some(index) => &mut self.cashback_ledger[index],
            None => {
                self.cashback_ledger
                    .push(CashbackLedgerEntry::new(account_id, cycle_tag));
                self.cashback_ledger.last_mut().unwrap()
            }
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    /// Referential-integrity report surfaced after loads and imports.
    pub fn referential_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for txn in &self.transactions {
            if let Some(from) = txn.from_account.as_deref() {
                if self.account(from).is_none() {
                    warnings.push(format!(
                        "transaction {} references unknown source account {}",
                        txn.id, from
                    ));
                }
            }
            if let Some(to) = txn.to_account.as_deref() {
                if self.account(to).is_none() {
                    warnings.push(format!(
                        "transaction {} references unknown target account {}",
                        txn.id, to
                    ));
                }
            }
            if let Some(person) = txn.person_id.as_deref() {
                if self.person(person).is_none() {
                    warnings.push(format!(
                        "transaction {} references unknown person {}",
                        txn.id, person
                    ));
                }
            }
            if let Some(sub) = txn.subcategory_id.as_deref() {
                match self.subcategory(sub) {
                    None => warnings.push(format!(
                        "transaction {} references unknown subcategory {}",
                        txn.id, sub
                    )),
                    Some(sub) if self.category(&sub.category_id).is_none() => warnings.push(
                        format!("subcategory {} references missing category {}", sub.id, sub.category_id),
                    ),
                    Some(_) => {}
                }
            }
        }
        warnings
    }
}
