//! Bulk CSV import for the book's collections.
//!
//! Mirrors the original importer's behavior: the collection is inferred
//! from the file name (`... - Accounts.csv`), `TRUE`/`FALSE` cells become
//! booleans, digit-grouped numbers (`1,000,000` or `1.000.000`) become
//! integers, and unknown references produce warnings instead of failures.

use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;

use crate::core::services::DebtService;
use crate::domain::{
    Account, AccountKind, Book, Category, Person, SubCategory, Transaction, TransactionNature,
};
use crate::errors::{FlowError, Result};

/// Importable collections, one per CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvCollection {
    Accounts,
    People,
    Categories,
    SubCategories,
    Transactions,
}

impl CsvCollection {
    /// Infers the collection from an export file name such as
    /// `Money Flow - Accounts.csv` (or a plain `accounts.csv`).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(".csv").unwrap_or(name);
        let label = stem.rsplit(" - ").next().unwrap_or(stem);
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "accounts" => Some(CsvCollection::Accounts),
            "people" => Some(CsvCollection::People),
            "categories" => Some(CsvCollection::Categories),
            "subcategories" => Some(CsvCollection::SubCategories),
            "transactions" => Some(CsvCollection::Transactions),
            _ => None,
        }
    }
}

/// Outcome summary of one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub warnings: Vec<String>,
}

/// Imports one CSV stream into the book. Existing rows with the same id
/// are replaced, matching the original's overwrite-by-document-id batches.
pub fn import_csv<R: Read>(
    book: &mut Book,
    collection: CsvCollection,
    reader: R,
) -> Result<ImportReport> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect();

    let mut report = ImportReport::default();
    for (row_number, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = Row {
            columns: &columns,
            record: &record,
            number: row_number + 2, // header is line 1
        };
        match import_row(book, collection, &row, &mut report) {
            Ok(true) => report.imported += 1,
            Ok(false) => {}
            Err(err) => report
                .warnings
                .push(format!("line {}: {}", row.number, err)),
        }
    }
    book.touch();
    Ok(report)
}

struct Row<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
    number: usize,
}

impl Row<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        let idx = *self.columns.get(name)?;
        let value = self.record.get(idx)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn required(&self, name: &str) -> Result<&str> {
        self.field(name)
            .ok_or_else(|| FlowError::Import(format!("missing column `{}`", name)))
    }
}

fn import_row(
    book: &mut Book,
    collection: CsvCollection,
    row: &Row<'_>,
    report: &mut ImportReport,
) -> Result<bool> {
    match collection {
        CsvCollection::Accounts => {
            let id = row.required("AccountID")?.to_string();
            let name = row.required("AccountName")?.to_string();
            let kind = row
                .field("AccountTypeID")
                .map(AccountKind::from_type_code)
                .unwrap_or(AccountKind::Bank);
            let mut account = Account::new(id.clone(), name, kind);
            if let Some(balance) = row.field("CurrentBalance") {
                account.current_balance = parse_amount(balance)?;
            }
            if let Some(limit) = row.field("CreditLimit") {
                account.credit_limit = Some(parse_amount(limit)?);
            }
            if let Some(active) = row.field("IsActive") {
                account.is_active = parse_bool(active)?;
            }
            book.accounts.retain(|existing| existing.id != id);
            book.add_account(account);
            Ok(true)
        }
        CsvCollection::People => {
            let id = row.required("PersonID")?.to_string();
            let name = row.required("PersonName")?.to_string();
            book.people.retain(|existing| existing.id != id);
            book.add_person(Person::new(id, name));
            Ok(true)
        }
        CsvCollection::Categories => {
            let id = row.required("CategoryID")?.to_string();
            let name = row.required("CategoryName")?.to_string();
            let nature_code = row.required("TransactionNature")?;
            let nature = TransactionNature::from_code(nature_code).ok_or_else(|| {
                FlowError::Import(format!("unknown transaction nature `{}`", nature_code))
            })?;
            book.categories.retain(|existing| existing.id != id);
            book.add_category(Category::new(id, name, nature));
            Ok(true)
        }
        CsvCollection::SubCategories => {
            let id = row.required("SubCategoryID")?.to_string();
            let category_id = row.required("CategoryID")?.to_string();
            let name = row.required("SubCategoryName")?.to_string();
            if book.category(&category_id).is_none() {
                report.warnings.push(format!(
                    "line {}: subcategory {} references unknown category {}",
                    row.number, id, category_id
                ));
            }
            book.subcategories.retain(|existing| existing.id != id);
            book.add_subcategory(SubCategory::new(id, category_id, name));
            Ok(true)
        }
        CsvCollection::Transactions => {
            let date_text = row.required("Date")?;
            let date = chrono::NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
                .map_err(|_| FlowError::Import(format!("invalid date `{}`", date_text)))?;
            let amount = parse_amount(row.required("Amount")?)?;
            let mut txn = Transaction::new(date, amount).with_accounts(
                row.field("FromAccountID").map(str::to_string),
                row.field("ToAccountID").map(str::to_string),
            );
            txn.person_id = row.field("PersonID").map(str::to_string);
            txn.subcategory_id = row.field("SubCategoryID").map(str::to_string);
            txn.notes = row.field("Notes").map(str::to_string);

            let percent = row
                .field("PercentDiscount")
                .map(parse_percent)
                .transpose()?
                .unwrap_or(0.0);
            let fixed = row
                .field("FixedDiscount")
                .map(parse_amount)
                .transpose()?
                .unwrap_or(0);
            txn.apply_discounts(percent.clamp(0.0, 100.0), fixed.max(0));
            if let Some(final_price) = row.field("FinalPrice") {
                txn.final_price = parse_amount(final_price)?;
            }

            for (label, reference) in [
                ("source account", txn.from_account.as_deref()),
                ("target account", txn.to_account.as_deref()),
            ] {
                if let Some(id) = reference {
                    if book.account(id).is_none() {
                        report.warnings.push(format!(
                            "line {}: unknown {} {}",
                            row.number, label, id
                        ));
                    }
                }
            }
            if let Some(person) = txn.person_id.as_deref() {
                if book.person(person).is_none() {
                    report
                        .warnings
                        .push(format!("line {}: unknown person {}", row.number, person));
                }
                txn.debt_tag = Some(DebtService::period_tag(date));
            }

            // record the cashback posting when the source account's policy
            // applies, so a later ledger rebuild can pick it up
            if let Some(from) = txn.from_account.as_deref() {
                if book.account(from).and_then(|a| a.cashback).is_some() {
                    txn.cashback_earned = txn.discount_value();
                }
            }

            book.add_transaction(txn);
            Ok(true)
        }
    }
}

/// Parses an integral amount, tolerating `,` and `.` digit grouping.
fn parse_amount(value: &str) -> Result<i64> {
    let cleaned: String = value.chars().filter(|c| !matches!(c, ',' | '.')).collect();
    cleaned
        .parse::<i64>()
        .map_err(|_| FlowError::Import(format!("invalid amount `{}`", value)))
}

/// Parses a percentage; only `,` is treated as grouping so decimal points
/// survive.
fn parse_percent(value: &str) -> Result<f64> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| FlowError::Import(format!("invalid percentage `{}`", value)))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        other => Err(FlowError::Import(format!("invalid boolean `{}`", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_inferred_from_export_names() {
        assert_eq!(
            CsvCollection::from_file_name("Money Flow - Accounts.csv"),
            Some(CsvCollection::Accounts)
        );
        assert_eq!(
            CsvCollection::from_file_name("transactions.csv"),
            Some(CsvCollection::Transactions)
        );
        assert_eq!(
            CsvCollection::from_file_name("Money Flow - Sub Categories.csv"),
            Some(CsvCollection::SubCategories)
        );
        assert_eq!(CsvCollection::from_file_name("notes.txt"), None);
    }

    #[test]
    fn amounts_tolerate_digit_grouping() {
        assert_eq!(parse_amount("1,000,000").unwrap(), 1_000_000);
        assert_eq!(parse_amount("1.000.000").unwrap(), 1_000_000);
        assert_eq!(parse_amount("500000").unwrap(), 500_000);
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn percentages_keep_their_decimal_point() {
        assert!((parse_percent("3.5").unwrap() - 3.5).abs() < 1e-9);
        assert!((parse_percent("1,234.5").unwrap() - 1234.5).abs() < 1e-9);
    }

    #[test]
    fn booleans_are_case_insensitive() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(parse_bool("yes").is_err());
    }
}
