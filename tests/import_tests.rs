use assert_fs::prelude::*;
use std::fs::File;

use moneyflow_core::core::services::{AccountService, DebtService};
use moneyflow_core::domain::{AccountKind, Book, DebtStatus};
use moneyflow_core::import::{import_csv, CsvCollection};

fn write_fixture(temp: &assert_fs::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let child = temp.child(name);
    child.write_str(contents).expect("write fixture");
    child.path().to_path_buf()
}

#[test]
fn imports_accounts_with_coerced_cells() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = write_fixture(
        &temp,
        "Money Flow - Accounts.csv",
        "AccountID,AccountName,AccountTypeID,CurrentBalance,CreditLimit,IsActive\n\
         SAC-CA12A-CRE,Sacombank Credit,CRE-SAC,\"1,500,000\",\"20,000,000\",TRUE\n\
         VCB-01,Vietcombank,BNK-VCB,250000,,FALSE\n",
    );

    let mut book = Book::new("Import");
    let report = import_csv(
        &mut book,
        CsvCollection::Accounts,
        File::open(&path).unwrap(),
    )
    .unwrap();
    assert_eq!(report.imported, 2);
    assert!(report.warnings.is_empty());

    let credit = book.account("SAC-CA12A-CRE").unwrap();
    assert_eq!(credit.kind, AccountKind::Credit);
    assert_eq!(credit.current_balance, 1_500_000);
    assert_eq!(credit.credit_limit, Some(20_000_000));
    assert!(credit.is_active);

    let bank = book.account("VCB-01").unwrap();
    assert_eq!(bank.kind, AccountKind::Bank);
    assert_eq!(bank.credit_limit, None);
    assert!(!bank.is_active);
}

#[test]
fn reimport_replaces_rows_by_id() {
    let temp = assert_fs::TempDir::new().unwrap();
    let first = write_fixture(
        &temp,
        "accounts.csv",
        "AccountID,AccountName,AccountTypeID\nVCB-01,Old Name,BNK\n",
    );
    let second = write_fixture(
        &temp,
        "accounts2.csv",
        "AccountID,AccountName,AccountTypeID\nVCB-01,New Name,BNK\n",
    );

    let mut book = Book::new("Reimport");
    import_csv(&mut book, CsvCollection::Accounts, File::open(&first).unwrap()).unwrap();
    import_csv(&mut book, CsvCollection::Accounts, File::open(&second).unwrap()).unwrap();
    assert_eq!(book.accounts.len(), 1);
    assert_eq!(book.account("VCB-01").unwrap().name, "New Name");
}

#[test]
fn malformed_rows_warn_instead_of_aborting() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = write_fixture(
        &temp,
        "accounts.csv",
        "AccountID,AccountName,AccountTypeID,IsActive\n\
         A1,First,BNK,TRUE\n\
         A2,Second,BNK,maybe\n\
         A3,Third,BNK,FALSE\n",
    );

    let mut book = Book::new("Partial");
    let report = import_csv(
        &mut book,
        CsvCollection::Accounts,
        File::open(&path).unwrap(),
    )
    .unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("line 3"));
    assert!(report.warnings[0].contains("maybe"));
}

#[test]
fn full_export_roundtrip_feeds_reports() {
    let temp = assert_fs::TempDir::new().unwrap();
    let accounts = write_fixture(
        &temp,
        "Money Flow - Accounts.csv",
        "AccountID,AccountName,AccountTypeID\nVCB-01,Vietcombank,BNK\nCASH,Cash,CASH\n",
    );
    let people = write_fixture(
        &temp,
        "Money Flow - People.csv",
        "PersonID,PersonName\nP01,Linh\n",
    );
    let categories = write_fixture(
        &temp,
        "Money Flow - Categories.csv",
        "CategoryID,CategoryName,TransactionNature\nEX,Expenses,EX\nIN,Income,IN\n",
    );
    let subcategories = write_fixture(
        &temp,
        "Money Flow - Sub Categories.csv",
        "SubCategoryID,CategoryID,SubCategoryName\nEX-FOOD,EX,Food\nIN-REPAY,IN,Repayment\n",
    );
    let transactions = write_fixture(
        &temp,
        "Money Flow - Transactions.csv",
        "Date,Amount,PercentDiscount,FixedDiscount,Notes,PersonID,FromAccountID,ToAccountID,SubCategoryID\n\
         2025-09-05,\"1,200,000\",,,Dinner,P01,VCB-01,,EX-FOOD\n\
         2025-09-20,\"500,000\",,,Repayment,P01,,VCB-01,IN-REPAY\n\
         2025-09-22,\"80,000\",,,Coffee,,CASH,,EX-FOOD\n",
    );

    let mut book = Book::new("Roundtrip");
    for (collection, path) in [
        (CsvCollection::Accounts, &accounts),
        (CsvCollection::People, &people),
        (CsvCollection::Categories, &categories),
        (CsvCollection::SubCategories, &subcategories),
        (CsvCollection::Transactions, &transactions),
    ] {
        let report = import_csv(&mut book, collection, File::open(path).unwrap()).unwrap();
        assert!(
            report.warnings.is_empty(),
            "unexpected warnings: {:?}",
            report.warnings
        );
    }
    assert_eq!(book.transaction_count(), 3);

    AccountService::recompute_balances(&mut book);
    let bank = book.account("VCB-01").unwrap();
    assert_eq!(bank.sum_outflow, 1_200_000);
    assert_eq!(bank.sum_inflow, 500_000);
    assert_eq!(bank.current_balance, -700_000);

    DebtService::rebuild(&mut book);
    let rows = DebtService::report(&book);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].person_name, "Linh");
    assert_eq!(rows[0].sum_debt, 1_200_000);
    assert_eq!(rows[0].sum_repaid, 500_000);
    assert_eq!(rows[0].status, DebtStatus::Open);
}

#[test]
fn unknown_references_surface_as_warnings() {
    let temp = assert_fs::TempDir::new().unwrap();
    let path = write_fixture(
        &temp,
        "transactions.csv",
        "Date,Amount,FromAccountID,PersonID\n2025-09-05,100000,GHOST-ACC,GHOST-P\n",
    );

    let mut book = Book::new("Warnings");
    let report = import_csv(
        &mut book,
        CsvCollection::Transactions,
        File::open(&path).unwrap(),
    )
    .unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings[0].contains("GHOST-ACC"));
    assert!(report.warnings[1].contains("GHOST-P"));
}
