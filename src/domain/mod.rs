pub mod commitment;
pub mod common;
pub mod quest;
pub mod settings;

pub use commitment::Commitment;
pub use common::Displayable;
pub use quest::{Quest, INITIAL_QUEST_NAME};
pub use settings::Settings;
