#![doc(test(attr(deny(warnings))))]

//! Fluxo records personal expenses through a validated entry form, keeps them
//! in a shared collection, and aggregates them per category for charting.

pub mod cli;
pub mod config;
pub mod errors;
pub mod expense;
pub mod forms;
pub mod host;
pub mod ids;
pub mod store;
pub mod summary;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Fluxo tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
