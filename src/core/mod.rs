//! Quest store, reconciliation rules and the services built on them.

pub mod clock;
pub mod input;
pub mod quest_store;
pub mod reconcile;
pub mod services;
pub mod utils;

pub use clock::{Clock, IdGenerator, SequentialIds, SteppingClock, SystemClock, UuidGenerator};
pub use quest_store::QuestStore;
pub use services::SummaryService;
pub use reconcile::{reconcile, QuestState, ReconcileRule, Reconciliation, Touched};
