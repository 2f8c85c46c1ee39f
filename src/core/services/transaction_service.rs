//! Transaction entry: validation, discount clamping, cashback posting, and
//! debt-period tagging.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::cashback::{clamp_fixed, clamp_percent, compute_cap, resolve_cycle_tag};
use crate::core::services::{CashbackService, DebtService};
use crate::domain::{Book, Transaction};
use crate::errors::{FlowError, Result};

/// Input for a new entry, as collected by the form.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: i64,
    pub from_account: Option<String>,
    pub to_account: Option<String>,
    pub person_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub notes: Option<String>,
    pub percent_discount: f64,
    pub fixed_discount: i64,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, amount: i64) -> Self {
        Self {
            date,
            amount,
            from_account: None,
            to_account: None,
            person_id: None,
            subcategory_id: None,
            notes: None,
            percent_discount: 0.0,
            fixed_discount: 0,
        }
    }

    pub fn from_account(mut self, id: impl Into<String>) -> Self {
        self.from_account = Some(id.into());
        self
    }

    pub fn to_account(mut self, id: impl Into<String>) -> Self {
        self.to_account = Some(id.into());
        self
    }

    pub fn person(mut self, id: impl Into<String>) -> Self {
        self.person_id = Some(id.into());
        self
    }

    pub fn subcategory(mut self, id: impl Into<String>) -> Self {
        self.subcategory_id = Some(id.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn discounts(mut self, percent: f64, fixed: i64) -> Self {
        self.percent_discount = percent;
        self.fixed_discount = fixed;
        self
    }
}

pub struct TransactionService;

impl TransactionService {
    /// Validates, clamps, and records a new transaction, returning its id.
    ///
    /// When the source account carries a cashback policy the proposed
    /// discounts are clamped against the cycle budget and the resulting
    /// cashback is posted to the cycle ledger entry.
    pub fn add(book: &mut Book, input: NewTransaction) -> Result<Uuid> {
        if input.amount <= 0 {
            return Err(FlowError::InvalidInput(
                "transaction amount must be positive".into(),
            ));
        }
        let mut txn = Transaction::new(input.date, input.amount).with_accounts(
            input.from_account.clone(),
            input.to_account.clone(),
        );
        txn.person_id = input.person_id;
        txn.subcategory_id = input.subcategory_id;
        txn.notes = input.notes;
        txn.percent_discount = input.percent_discount;
        txn.fixed_discount = input.fixed_discount;

        Self::validate(book, &txn)?;
        Self::finalize(book, &mut txn)?;
        Ok(book.add_transaction(txn))
    }

    /// Applies `mutator` to the transaction and re-runs clamping, cashback
    /// posting, and debt tagging against the mutated state. The original
    /// cashback posting is reversed first so the cycle budget is judged
    /// without this transaction's own contribution.
    pub fn update<F>(book: &mut Book, id: Uuid, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Transaction),
    {
        let index = book
            .transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(FlowError::TransactionNotFound(id))?;
        let mut txn = book.transactions.remove(index);
        let backup = txn.clone();
        Self::reverse_cashback(book, &mut txn)?;
        mutator(&mut txn);
        match Self::revalidate_and_finalize(book, &mut txn) {
            Ok(()) => {
                book.transactions.insert(index, txn);
                book.touch();
                Ok(())
            }
            Err(err) => {
                // roll back: re-post the reversed cashback and keep the
                // original transaction untouched
                Self::restore_posting(book, &backup)?;
                book.transactions.insert(index, backup);
                Err(err)
            }
        }
    }

    fn revalidate_and_finalize(book: &mut Book, txn: &mut Transaction) -> Result<()> {
        if txn.amount <= 0 {
            return Err(FlowError::InvalidInput(
                "transaction amount must be positive".into(),
            ));
        }
        Self::validate(book, txn)?;
        Self::finalize(book, txn)
    }

    fn restore_posting(book: &mut Book, txn: &Transaction) -> Result<()> {
        if txn.cashback_earned <= 0 {
            return Ok(());
        }
        let Some(from) = txn.from_account.clone() else {
            return Ok(());
        };
        if let Some(policy) = book.account(&from).and_then(|account| account.cashback) {
            let cycle_tag = resolve_cycle_tag(txn.date, policy.statement_day)?;
            book.cashback_entry_mut(&from, &cycle_tag).sum_back_earned += txn.cashback_earned;
        }
        Ok(())
    }

    /// Removes the transaction and reverses its cashback posting.
    pub fn remove(book: &mut Book, id: Uuid) -> Result<Transaction> {
        let mut txn = book
            .remove_transaction(id)
            .ok_or(FlowError::TransactionNotFound(id))?;
        Self::reverse_cashback(book, &mut txn)?;
        Ok(txn)
    }

    /// Most recent transactions first, the ordering the history screen uses.
    pub fn recent(book: &Book, limit: usize) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = book.transactions.iter().collect();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        transactions.truncate(limit);
        transactions
    }

    fn validate(book: &Book, txn: &Transaction) -> Result<()> {
        if txn.from_account.is_none() && txn.to_account.is_none() {
            return Err(FlowError::InvalidInput(
                "transaction needs a source or target account".into(),
            ));
        }
        for account in [txn.from_account.as_deref(), txn.to_account.as_deref()]
            .into_iter()
            .flatten()
        {
            if book.account(account).is_none() {
                return Err(FlowError::AccountNotFound(account.to_string()));
            }
        }
        if let Some(person) = txn.person_id.as_deref() {
            if book.person(person).is_none() {
                return Err(FlowError::PersonNotFound(person.to_string()));
            }
        }
        if let Some(sub) = txn.subcategory_id.as_deref() {
            if book.subcategory(sub).is_none() {
                return Err(FlowError::SubCategoryNotFound(sub.to_string()));
            }
        }
        Ok(())
    }

    fn finalize(book: &mut Book, txn: &mut Transaction) -> Result<()> {
        let policy = txn
            .from_account
            .as_deref()
            .and_then(|id| book.account(id))
            .and_then(|account| account.cashback);

        match policy {
            Some(policy) => {
                let from = txn.from_account.clone().unwrap_or_default();
                let cycle_tag = resolve_cycle_tag(txn.date, policy.statement_day)?;
                let used = CashbackService::cycle_usage(book, &from, &cycle_tag);
                let cap =
                    compute_cap(txn.amount, policy.rate_percent, policy.max_per_cycle, used);
                let percent =
                    clamp_percent(txn.percent_discount, txn.fixed_discount, txn.amount, cap.effective_cap);
                let fixed = clamp_fixed(txn.fixed_discount, percent, txn.amount, cap.effective_cap);
                txn.apply_discounts(percent, fixed);
                let earned = txn.discount_value();
                if earned > 0 {
                    book.cashback_entry_mut(&from, &cycle_tag).sum_back_earned += earned;
                    txn.cashback_earned = earned;
                }
            }
            None => {
                let percent = txn.percent_discount.clamp(0.0, 100.0);
                let fixed = txn.fixed_discount.max(0);
                txn.apply_discounts(percent, fixed);
            }
        }

        txn.debt_tag = txn
            .person_id
            .as_ref()
            .map(|_| DebtService::period_tag(txn.date));
        Ok(())
    }

    fn reverse_cashback(book: &mut Book, txn: &mut Transaction) -> Result<()> {
        if txn.cashback_earned <= 0 {
            return Ok(());
        }
        let Some(from) = txn.from_account.clone() else {
            txn.cashback_earned = 0;
            return Ok(());
        };
        if let Some(policy) = book.account(&from).and_then(|account| account.cashback) {
            let cycle_tag = resolve_cycle_tag(txn.date, policy.statement_day)?;
            let entry = book.cashback_entry_mut(&from, &cycle_tag);
            entry.sum_back_earned = (entry.sum_back_earned - txn.cashback_earned).max(0);
        }
        txn.cashback_earned = 0;
        Ok(())
    }
}
