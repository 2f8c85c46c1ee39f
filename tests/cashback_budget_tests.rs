use chrono::NaiveDate;
use moneyflow_core::cashback::CapStatus;
use moneyflow_core::core::services::{
    CashbackService, NewTransaction, TransactionService,
};
use moneyflow_core::domain::{Account, AccountKind, Book, CashbackPolicy};

const CARD: &str = "SAC-CA12A-CRE";

fn sample_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn book_with_card() -> Book {
    let mut book = Book::new("Cashback");
    book.add_account(
        Account::new(CARD, "Sacombank Credit", AccountKind::Credit)
            .with_cashback(CashbackPolicy::new(5.0, 500_000, 11)),
    );
    book
}

#[test]
fn cycle_budget_caps_accumulate_across_transactions() {
    let mut book = book_with_card();

    // 9,600,000 at 5% uses 480,000 of the 500,000 budget
    TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 12), 9_600_000)
            .from_account(CARD)
            .discounts(5.0, 0),
    )
    .unwrap();
    assert_eq!(CashbackService::cycle_usage(&book, CARD, "2025-09"), 480_000);

    // the next 1,000,000 transaction asks for 5% (50,000) but only 20,000
    // of the cycle budget is left
    let id = TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 20), 1_000_000)
            .from_account(CARD)
            .discounts(5.0, 0),
    )
    .unwrap();
    let txn = book.transaction(id).unwrap();
    assert_eq!(txn.cashback_earned, 20_000);
    assert!((txn.percent_discount - 2.0).abs() < 1e-9);
    assert_eq!(txn.final_price, 980_000);
    assert_eq!(CashbackService::cycle_usage(&book, CARD, "2025-09"), 500_000);

    // budget exhausted: further discounts clamp to zero
    let id = TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 25), 500_000)
            .from_account(CARD)
            .discounts(3.0, 40_000),
    )
    .unwrap();
    let txn = book.transaction(id).unwrap();
    assert_eq!(txn.cashback_earned, 0);
    assert_eq!(txn.discount_value(), 0);
    assert_eq!(txn.final_price, 500_000);
}

#[test]
fn statement_day_splits_cycles() {
    let mut book = book_with_card();

    // 10 September is still in the cycle that started 11 August
    TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 10), 2_000_000)
            .from_account(CARD)
            .discounts(5.0, 0),
    )
    .unwrap();
    // 11 September opens the new cycle with a fresh budget
    TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 11), 2_000_000)
            .from_account(CARD)
            .discounts(5.0, 0),
    )
    .unwrap();

    assert_eq!(CashbackService::cycle_usage(&book, CARD, "2025-08"), 100_000);
    assert_eq!(CashbackService::cycle_usage(&book, CARD, "2025-09"), 100_000);
}

#[test]
fn mixed_percent_and_fixed_discounts_stay_under_the_cap() {
    let mut book = book_with_card();
    let id = TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 12), 1_000_000)
            .from_account(CARD)
            .discounts(4.0, 30_000), // 40,000 + 30,000 proposed, cap is 50,000
    )
    .unwrap();
    let txn = book.transaction(id).unwrap();
    assert!(txn.discount_value() <= 50_000 + 1);
    assert_eq!(txn.cashback_earned, txn.discount_value());
}

#[test]
fn preview_matches_posted_state() {
    let mut book = book_with_card();
    TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 12), 9_600_000)
            .from_account(CARD)
            .discounts(5.0, 0),
    )
    .unwrap();

    let account = book.account(CARD).unwrap();
    let usage = CashbackService::cycle_usage(&book, CARD, "2025-09");
    let preview =
        CashbackService::preview(account, sample_date(2025, 9, 20), 1_000_000, Ok(usage))
            .unwrap()
            .unwrap();
    assert_eq!(preview.cycle_tag, "2025-09");
    assert_eq!(preview.used_budget, 480_000);
    assert_eq!(preview.effective_cap, 20_000);
    assert_eq!(preview.status, CapStatus::Capped);
}

#[test]
fn rebuild_restores_the_ledger_from_transactions() {
    let mut book = book_with_card();
    TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 9, 12), 1_000_000)
            .from_account(CARD)
            .discounts(5.0, 0),
    )
    .unwrap();
    TransactionService::add(
        &mut book,
        NewTransaction::new(sample_date(2025, 10, 15), 2_000_000)
            .from_account(CARD)
            .discounts(2.0, 0),
    )
    .unwrap();

    // wipe the ledger, then rebuild it from the recorded postings
    book.cashback_ledger.clear();
    CashbackService::rebuild(&mut book).unwrap();

    assert_eq!(CashbackService::cycle_usage(&book, CARD, "2025-09"), 50_000);
    assert_eq!(CashbackService::cycle_usage(&book, CARD, "2025-10"), 40_000);
}
