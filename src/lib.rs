#![doc(test(attr(deny(warnings))))]

//! Compass Core keeps budget "quests" (an income plus a list of commitments)
//! in a key-value store, and keeps the active quests, the archived quests and
//! the current selection consistent with each other.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::{QuestStore, SummaryService};
pub use crate::domain::{Commitment, Quest, Settings};
pub use crate::errors::{QuestError, QuestResult, StorageError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup log.
pub fn init() {
    init_with_filter(config::DEFAULT_LOG_FILTER);
}

/// Like [`init`], with an explicit `tracing` filter directive.
pub fn init_with_filter(directive: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(directive);
        tracing::info!("Compass Core tracing initialized.");
    });
}
