#![doc(test(attr(deny(warnings))))]

//! Money Flow Core offers the domain model, cashback budget allocation,
//! debt/balance reporting, and persistence that back the Money Flow
//! personal-finance workflows and CLI.

pub mod cashback;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod import;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Money Flow Core tracing initialized.");
    });
}
