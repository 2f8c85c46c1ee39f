//! Account CRUD and the balance refresh.

use crate::domain::{Account, Book};
use crate::errors::{FlowError, Result};

pub struct AccountService;

impl AccountService {
    pub fn add(book: &mut Book, account: Account) -> Result<String> {
        if account.id.trim().is_empty() {
            return Err(FlowError::InvalidInput("account id must not be empty".into()));
        }
        if book.account(&account.id).is_some() {
            return Err(FlowError::InvalidInput(format!(
                "account {} already exists",
                account.id
            )));
        }
        Ok(book.add_account(account))
    }

    pub fn get<'a>(book: &'a Book, id: &str) -> Result<&'a Account> {
        book.account(id)
            .ok_or_else(|| FlowError::AccountNotFound(id.to_string()))
    }

    pub fn list(book: &Book) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = book.accounts.iter().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        accounts
    }

    pub fn set_active(book: &mut Book, id: &str, active: bool) -> Result<()> {
        let account = book
            .account_mut(id)
            .ok_or_else(|| FlowError::AccountNotFound(id.to_string()))?;
        account.is_active = active;
        book.touch();
        Ok(())
    }

    /// Rebuilds every account's inflow/outflow sums and current balance
    /// from the transaction log. This is the "balance refresh" the original
    /// application performed as a batched write over all accounts.
    pub fn recompute_balances(book: &mut Book) {
        let mut totals: Vec<(String, i64, i64)> = book
            .accounts
            .iter()
            .map(|account| (account.id.clone(), 0_i64, 0_i64))
            .collect();
        for txn in &book.transactions {
            for entry in totals.iter_mut() {
                if txn.to_account.as_deref() == Some(entry.0.as_str()) {
                    entry.1 += txn.final_price;
                }
                if txn.from_account.as_deref() == Some(entry.0.as_str()) {
                    entry.2 += txn.final_price;
                }
            }
        }
        for (id, inflow, outflow) in totals {
            if let Some(account) = book.account_mut(&id) {
                account.sum_inflow = inflow;
                account.sum_outflow = outflow;
                account.current_balance = account.opening_balance + inflow - outflow;
            }
        }
        book.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{NewTransaction, TransactionService};
    use crate::domain::AccountKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut book = Book::new("Dup");
        AccountService::add(&mut book, Account::new("VCB", "Bank", AccountKind::Bank)).unwrap();
        let err = AccountService::add(&mut book, Account::new("VCB", "Other", AccountKind::Cash))
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
    }

    #[test]
    fn recompute_balances_uses_final_prices() {
        let mut book = Book::new("Balances");
        AccountService::add(
            &mut book,
            Account::new("VCB", "Bank", AccountKind::Bank).with_opening_balance(1_000_000),
        )
        .unwrap();
        AccountService::add(&mut book, Account::new("CASH", "Cash", AccountKind::Cash)).unwrap();

        // transfer 300,000 bank -> cash, then a 90,000 expense from cash
        // (100,000 gross with a 10,000 discount)
        TransactionService::add(
            &mut book,
            NewTransaction::new(date(2025, 9, 1), 300_000)
                .from_account("VCB")
                .to_account("CASH"),
        )
        .unwrap();
        TransactionService::add(
            &mut book,
            NewTransaction::new(date(2025, 9, 2), 100_000)
                .from_account("CASH")
                .discounts(0.0, 10_000),
        )
        .unwrap();

        AccountService::recompute_balances(&mut book);

        let bank = AccountService::get(&book, "VCB").unwrap();
        assert_eq!(bank.sum_outflow, 300_000);
        assert_eq!(bank.sum_inflow, 0);
        assert_eq!(bank.current_balance, 700_000);

        let cash = AccountService::get(&book, "CASH").unwrap();
        assert_eq!(cash.sum_inflow, 300_000);
        assert_eq!(cash.sum_outflow, 90_000);
        assert_eq!(cash.current_balance, 210_000);
    }
}
