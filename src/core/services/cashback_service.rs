//! Cycle-usage lookups and the form-facing budget preview.

use chrono::NaiveDate;

use crate::cashback::{compute_cap, resolve_cycle_tag, CapStatus};
use crate::domain::{Account, Book};
use crate::errors::Result;

/// Everything the entry form shows next to the discount fields: the
/// resolved cycle, how much of the budget is gone, and the binding cap.
#[derive(Debug, Clone, PartialEq)]
pub struct CashbackPreview {
    pub cycle_tag: String,
    pub used_budget: i64,
    pub remaining_budget: i64,
    pub effective_cap: i64,
    pub status: CapStatus,
    pub equivalent_percent: f64,
    /// Set when the ledger lookup failed and `used_budget` fell back to
    /// zero; callers must surface this instead of presenting the figure as
    /// authoritative.
    pub degraded: bool,
}

pub struct CashbackService;

impl CashbackService {
    /// Cashback already earned for the account in the given cycle.
    pub fn cycle_usage(book: &Book, account_id: &str, cycle_tag: &str) -> i64 {
        book.cashback_entry(account_id, cycle_tag)
            .map(|entry| entry.sum_back_earned)
            .unwrap_or(0)
    }

    /// Computes the budget preview for a proposed transaction against a
    /// cashback-bearing account. Returns `None` when the account carries no
    /// cashback policy.
    ///
    /// `usage` is the ledger lookup outcome. On failure the preview
    /// degrades to `used_budget = 0` with the `degraded` flag set, rather
    /// than blocking entry or silently claiming the full budget is intact.
    pub fn preview(
        account: &Account,
        date: NaiveDate,
        amount: i64,
        usage: Result<i64>,
    ) -> Result<Option<CashbackPreview>> {
        let Some(policy) = account.cashback else {
            return Ok(None);
        };
        let cycle_tag = resolve_cycle_tag(date, policy.statement_day)?;
        let (used_budget, degraded) = match usage {
            Ok(used) => (used, false),
            Err(err) => {
                tracing::warn!(
                    account = %account.id,
                    cycle = %cycle_tag,
                    error = %err,
                    "cashback ledger lookup failed; treating cycle usage as zero"
                );
                (0, true)
            }
        };
        let outcome = compute_cap(amount, policy.rate_percent, policy.max_per_cycle, used_budget);
        Ok(Some(CashbackPreview {
            equivalent_percent: outcome.equivalent_percent(amount),
            remaining_budget: (policy.max_per_cycle - used_budget).max(0),
            cycle_tag,
            used_budget,
            effective_cap: outcome.effective_cap,
            status: outcome.status,
            degraded,
        }))
    }

    /// Rebuilds the whole cashback ledger from the transactions' recorded
    /// postings, the reconciliation counterpart to the balance refresh.
    pub fn rebuild(book: &mut Book) -> Result<()> {
        book.cashback_ledger.clear();
        let postings: Vec<(String, NaiveDate, i64)> = book
            .transactions
            .iter()
            .filter(|txn| txn.cashback_earned > 0)
            .filter_map(|txn| {
                txn.from_account
                    .clone()
                    .map(|account| (account, txn.date, txn.cashback_earned))
            })
            .collect();
        for (account_id, date, earned) in postings {
            let Some(policy) = book.account(&account_id).and_then(|a| a.cashback) else {
                continue;
            };
            let tag = resolve_cycle_tag(date, policy.statement_day)?;
            book.cashback_entry_mut(&account_id, &tag).sum_back_earned += earned;
        }
        book.touch();
        Ok(())
    }
}
