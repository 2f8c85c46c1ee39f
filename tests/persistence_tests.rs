use chrono::NaiveDate;
use tempfile::tempdir;

use moneyflow_core::core::services::{NewTransaction, TransactionService};
use moneyflow_core::core::BookManager;
use moneyflow_core::domain::{Account, AccountKind, Book, CashbackPolicy};
use moneyflow_core::storage::{JsonStorage, StorageBackend};

fn sample_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn populated_book() -> Book {
    let mut book = Book::new("Sep Money Flow");
    book.add_account(
        Account::new("SAC-CA12A-CRE", "Sacombank Credit", AccountKind::Credit)
            .with_cashback(CashbackPolicy::new(5.0, 500_000, 11)),
    );
    TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 12), 1_000_000)
            .from_account("SAC-CA12A-CRE")
            .discounts(5.0, 0),
    )
    .expect("add transaction");
    book
}

#[test]
fn whole_book_roundtrips_through_json() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();

    let book = populated_book();
    storage.save(&book, "moneyflow").unwrap();
    let loaded = storage.load("moneyflow").unwrap();

    assert_eq!(loaded.name, "Sep Money Flow");
    assert_eq!(loaded.transaction_count(), 1);
    assert_eq!(loaded.cashback_ledger.len(), 1);
    assert_eq!(loaded.cashback_ledger[0].cycle_tag, "2025-09");
    assert_eq!(loaded.cashback_ledger[0].sum_back_earned, 50_000);
    let account = loaded.account("SAC-CA12A-CRE").unwrap();
    assert_eq!(
        account.cashback,
        Some(CashbackPolicy::new(5.0, 500_000, 11))
    );
}

#[test]
fn resaving_creates_a_backup_of_the_previous_file() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();

    let mut book = populated_book();
    storage.save(&book, "moneyflow").unwrap();
    book.name = "Renamed".into();
    storage.save(&book, "moneyflow").unwrap();

    let backups = storage.list_backups("moneyflow").unwrap();
    assert_eq!(backups.len(), 1);
    let restored = storage.restore("moneyflow", &backups[0]).unwrap();
    assert_eq!(restored.name, "Sep Money Flow");
}

#[test]
fn manager_tracks_last_opened_book() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
    let mut manager = BookManager::new(Box::new(storage));

    manager.set_current(populated_book(), None);
    manager.save_as("household").unwrap();
    assert_eq!(manager.last_opened().unwrap().as_deref(), Some("household"));

    manager.clear();
    let metadata = manager.load("household").unwrap();
    assert_eq!(metadata.name, "household");
    assert!(metadata.warnings.is_empty());
    assert_eq!(manager.book().unwrap().transaction_count(), 1);
}

#[test]
fn load_surfaces_referential_warnings() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
    let mut manager = BookManager::new(Box::new(storage));

    let mut book = Book::new("Dangling");
    book.add_account(Account::new("VCB", "Vietcombank", AccountKind::Bank));
    let mut txn = moneyflow_core::domain::Transaction::new(sample_date(2025, 9, 1), 10_000);
    txn.from_account = Some("MISSING".into());
    book.add_transaction(txn);

    manager.set_current(book, None);
    manager.save_as("dangling").unwrap();
    manager.clear();

    let metadata = manager.load("dangling").unwrap();
    assert_eq!(metadata.warnings.len(), 1);
    assert!(metadata.warnings[0].contains("MISSING"));
}
