//! Budget cap computation and discount clamping.
//!
//! All monetary quantities are whole minor currency units (`i64`);
//! percentages stay `f64` at full precision until a clamp materializes
//! them. Derived caps floor toward zero so the allocator can under-grant
//! by at most one unit but never over-grant.

/// Tolerance for the combined-discount invariant: one minor currency unit,
/// absorbing the float-to-integer flooring in percent conversions.
pub const CYCLE_BUDGET_EPSILON: i64 = 1;

/// Which constraint binds the current transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapStatus {
    /// The per-transaction rate limit applies; cycle budget is not binding.
    Unconstrained,
    /// The remaining cycle budget is smaller than the rate-derived limit.
    Capped,
    /// The cycle budget is already fully consumed.
    Exhausted,
}

/// Result of a cap computation: the binding limit plus its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapOutcome {
    pub effective_cap: i64,
    pub status: CapStatus,
}

impl CapOutcome {
    /// Discount the cap would represent as a percentage of `amount`, used
    /// for the "~x%" hint shown next to the budget figure.
    pub fn equivalent_percent(&self, amount: i64) -> f64 {
        if amount > 0 {
            self.effective_cap as f64 / amount as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Computes the binding cashback limit for one transaction.
///
/// `effective_cap` is the lesser of the rate-derived per-transaction limit
/// and whatever is left of the per-cycle budget. A non-positive `amount`
/// yields a zero cap without touching the budget: no discount can be
/// proposed against it, but it is not an error.
pub fn compute_cap(amount: i64, rate_percent: f64, max_per_cycle: i64, used_budget: i64) -> CapOutcome {
    if amount <= 0 {
        return CapOutcome {
            effective_cap: 0,
            status: CapStatus::Unconstrained,
        };
    }
    let per_transaction_cap = (amount as f64 * rate_percent / 100.0).floor() as i64;
    let remaining_cycle_budget = (max_per_cycle - used_budget).max(0);
    if remaining_cycle_budget <= 0 {
        return CapOutcome {
            effective_cap: 0,
            status: CapStatus::Exhausted,
        };
    }
    if per_transaction_cap > remaining_cycle_budget {
        CapOutcome {
            effective_cap: remaining_cycle_budget,
            status: CapStatus::Capped,
        }
    } else {
        CapOutcome {
            effective_cap: per_transaction_cap,
            status: CapStatus::Unconstrained,
        }
    }
}

/// Clamps a proposed percentage discount so that, combined with the current
/// fixed discount, the total stays within `effective_cap`.
///
/// With a non-positive `amount` there is no constraint to apply yet (the
/// cap is zero and the percentage has no monetary meaning), so the range-
/// clamped input is returned untouched rather than dividing by zero.
///
/// Idempotent: the clamped branch depends only on (`effective_cap`,
/// `current_fixed`, `amount`), so reapplying the clamp returns the same
/// value.
pub fn clamp_percent(proposed: f64, current_fixed: i64, amount: i64, effective_cap: i64) -> f64 {
    let percent = proposed.clamp(0.0, 100.0);
    if amount <= 0 {
        return percent;
    }
    let other_amount = current_fixed.max(0) as f64;
    let proposed_total = percent * amount as f64 / 100.0 + other_amount;
    if proposed_total > effective_cap as f64 {
        ((effective_cap as f64 - other_amount) / amount as f64 * 100.0).max(0.0)
    } else {
        percent
    }
}

/// Clamps a proposed fixed discount against the cap left over after the
/// current percentage discount. Fixed discounts are integral minor units;
/// the clamped value floors so the pair never exceeds the cap.
pub fn clamp_fixed(proposed: i64, current_percent: f64, amount: i64, effective_cap: i64) -> i64 {
    let fixed = proposed.max(0);
    let other_amount = current_percent.clamp(0.0, 100.0) * amount.max(0) as f64 / 100.0;
    let proposed_total = fixed as f64 + other_amount;
    if proposed_total > effective_cap as f64 {
        ((effective_cap as f64 - other_amount).floor() as i64).max(0)
    } else {
        fixed
    }
}
