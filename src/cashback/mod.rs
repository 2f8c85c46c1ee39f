//! Cashback budget allocation for credit-card statement cycles.
//!
//! Pure computations only: cycle-tag resolution from a statement anchor
//! day, per-cycle budget cap derivation, and clamping of the two mutually
//! constraining discount fields. Ledger lookups and persistence live in the
//! service layer; everything here is referentially transparent.

pub mod allocator;
pub mod cycle;

pub use allocator::{
    clamp_fixed, clamp_percent, compute_cap, CapOutcome, CapStatus, CYCLE_BUDGET_EPSILON,
};
pub use cycle::{resolve_cycle, resolve_cycle_tag, CycleWindow};
