//! Debt-ledger derivation and reporting.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Book, DebtLedgerEntry, DebtStatus, TransactionNature};

/// One row of the consolidated debt report, joined with the person's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtRow {
    pub period_tag: String,
    pub person_id: String,
    pub person_name: String,
    pub sum_debt: i64,
    pub sum_repaid: i64,
    pub remaining_debt: i64,
    pub status: DebtStatus,
}

pub struct DebtService;

impl DebtService {
    /// Calendar-month tag a dated transaction's debt belongs to.
    pub fn period_tag(date: NaiveDate) -> String {
        format!("{:04}-{:02}", date.year(), date.month())
    }

    /// Rebuilds the debt ledger from the transaction log: expenses carried
    /// for a person accrue debt in that person's period, income from the
    /// person counts as repayment. Transfers stay out of the ledger.
    pub fn rebuild(book: &mut Book) {
        let mut totals: BTreeMap<(String, String), (i64, i64)> = BTreeMap::new();
        for txn in &book.transactions {
            let Some(person) = txn.person_id.clone() else {
                continue;
            };
            let Some(nature) = book.nature_of(txn) else {
                continue;
            };
            let tag = txn
                .debt_tag
                .clone()
                .unwrap_or_else(|| Self::period_tag(txn.date));
            let entry = totals.entry((person, tag)).or_insert((0, 0));
            match nature {
                TransactionNature::Expense => entry.0 += txn.final_price,
                TransactionNature::Income => entry.1 += txn.final_price,
                TransactionNature::Transfer => {}
            }
        }
        book.debt_ledger = totals
            .into_iter()
            .map(|((person_id, period_tag), (debt, repaid))| {
                let mut entry = DebtLedgerEntry::new(person_id, period_tag);
                entry.sum_debt = debt;
                entry.sum_repaid = repaid;
                entry
            })
            .collect();
        book.touch();
    }

    /// Report rows ordered the way the ledger screen lists them: newest
    /// period first, then person name. Unknown people fall back to their id.
    pub fn report(book: &Book) -> Vec<DebtRow> {
        let mut rows: Vec<DebtRow> = book
            .debt_ledger
            .iter()
            .map(|entry| {
                let person_name = book
                    .person(&entry.person_id)
                    .map(|person| person.name.clone())
                    .unwrap_or_else(|| entry.person_id.clone());
                DebtRow {
                    period_tag: entry.period_tag.clone(),
                    person_id: entry.person_id.clone(),
                    person_name,
                    sum_debt: entry.sum_debt,
                    sum_repaid: entry.sum_repaid,
                    remaining_debt: entry.remaining_debt(),
                    status: entry.status(),
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.period_tag
                .cmp(&a.period_tag)
                .then_with(|| a.person_name.cmp(&b.person_name))
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{NewTransaction, TransactionService};
    use crate::domain::{Account, AccountKind, Category, Person, SubCategory};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book_with_people() -> Book {
        let mut book = Book::new("Debts");
        book.add_account(Account::new("VCB", "Bank", AccountKind::Bank));
        book.add_person(Person::new("P01", "Linh"));
        book.add_person(Person::new("P02", "An"));
        book.add_category(Category::new("EX", "Expenses", TransactionNature::Expense));
        book.add_category(Category::new("IN", "Income", TransactionNature::Income));
        book.add_subcategory(SubCategory::new("EX-FOOD", "EX", "Food"));
        book.add_subcategory(SubCategory::new("IN-REPAY", "IN", "Repayment"));
        book
    }

    #[test]
    fn period_tag_is_zero_padded() {
        assert_eq!(DebtService::period_tag(date(2025, 3, 7)), "2025-03");
    }

    #[test]
    fn rebuild_accrues_debt_and_repayments_per_period() {
        let mut book = book_with_people();
        TransactionService::add(
            &mut book,
            NewTransaction::new(date(2025, 9, 5), 200_000)
                .from_account("VCB")
                .person("P01")
                .subcategory("EX-FOOD"),
        )
        .unwrap();
        TransactionService::add(
            &mut book,
            NewTransaction::new(date(2025, 9, 20), 80_000)
                .to_account("VCB")
                .person("P01")
                .subcategory("IN-REPAY"),
        )
        .unwrap();
        TransactionService::add(
            &mut book,
            NewTransaction::new(date(2025, 10, 1), 50_000)
                .from_account("VCB")
                .person("P01")
                .subcategory("EX-FOOD"),
        )
        .unwrap();

        DebtService::rebuild(&mut book);
        assert_eq!(book.debt_ledger.len(), 2);

        let rows = DebtService::report(&book);
        assert_eq!(rows[0].period_tag, "2025-10");
        assert_eq!(rows[0].sum_debt, 50_000);
        assert_eq!(rows[0].status, DebtStatus::Open);
        assert_eq!(rows[1].period_tag, "2025-09");
        assert_eq!(rows[1].sum_debt, 200_000);
        assert_eq!(rows[1].sum_repaid, 80_000);
        assert_eq!(rows[1].remaining_debt, 120_000);
    }

    #[test]
    fn full_repayment_closes_the_period() {
        let mut book = book_with_people();
        TransactionService::add(
            &mut book,
            NewTransaction::new(date(2025, 9, 5), 100_000)
                .from_account("VCB")
                .person("P02")
                .subcategory("EX-FOOD"),
        )
        .unwrap();
        TransactionService::add(
            &mut book,
            NewTransaction::new(date(2025, 9, 25), 100_000)
                .to_account("VCB")
                .person("P02")
                .subcategory("IN-REPAY"),
        )
        .unwrap();

        DebtService::rebuild(&mut book);
        let rows = DebtService::report(&book);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, DebtStatus::FullyRepaid);
        assert_eq!(rows[0].remaining_debt, 0);
    }

    #[test]
    fn report_sorts_periods_desc_then_names() {
        let mut book = book_with_people();
        for (person, month) in [("P01", 9), ("P02", 9), ("P01", 10)] {
            TransactionService::add(
                &mut book,
                NewTransaction::new(date(2025, month, 5), 10_000)
                    .from_account("VCB")
                    .person(person)
                    .subcategory("EX-FOOD"),
            )
            .unwrap();
        }
        DebtService::rebuild(&mut book);
        let rows = DebtService::report(&book);
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.period_tag.as_str(), row.person_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("2025-10", "Linh"), ("2025-09", "An"), ("2025-09", "Linh")]
        );
    }
}
