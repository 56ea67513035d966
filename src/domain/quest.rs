//! Budget periods ("quests") and their commitments.

use serde::{Deserialize, Serialize};

use crate::domain::{commitment::Commitment, common::*};

/// Name given to the quest materialized when no quests exist at all.
pub const INITIAL_QUEST_NAME: &str = "My First Quest";

/// A named budget period with an income and an ordered list of commitments.
///
/// Whether a quest is archived is not stored here; it follows from which
/// collection of the store holds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub commitments: Vec<Commitment>,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Quest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            income: 0.0,
            commitments: Vec::new(),
            created_at,
        }
    }

    pub fn commitment(&self, id: &str) -> Option<&Commitment> {
        self.commitments.iter().find(|c| c.id == id)
    }

    pub fn commitment_mut(&mut self, id: &str) -> Option<&mut Commitment> {
        self.commitments.iter_mut().find(|c| c.id == id)
    }

    /// Orders quests by recency: later `created_at` first, then larger id.
    pub fn is_newer_than(&self, other: &Quest) -> bool {
        (self.created_at, self.id.as_str()) > (other.created_at, other.id.as_str())
    }
}

impl Displayable for Quest {
    fn display_label(&self) -> String {
        let count = self.commitments.len();
        let noun = if count == 1 { "commitment" } else { "commitments" };
        format!("{} ({} {})", self.name, count, noun)
    }
}

/// Picks the most recently created quest, breaking ties by id.
pub fn newest<'a, I>(quests: I) -> Option<&'a Quest>
where
    I: IntoIterator<Item = &'a Quest>,
{
    let mut best: Option<&'a Quest> = None;
    for candidate in quests {
        if best.map_or(true, |current| candidate.is_newer_than(current)) {
            best = Some(candidate);
        }
    }
    best
}
