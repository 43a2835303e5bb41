#![doc(test(attr(deny(warnings))))]

//! Compliance Desk tracks accessibility-compliance work: client records,
//! remediation projects, and WCAG issues, with multi-step entry wizards,
//! searchable listings, and a dashboard summary.

pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod listing;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Compliance Desk tracing initialized.");
    });
}
