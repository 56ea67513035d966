//! Rules that keep the active/archived collections and the selection consistent.
//!
//! [`reconcile`] is pure: it takes the current state plus a closure that mints
//! a fresh quest and returns the corrected state. Running it on its own output
//! changes nothing.

use std::collections::HashSet;

use crate::domain::quest::{newest, Quest};

/// The three collections the store reconciles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestState {
    pub active: Vec<Quest>,
    pub archived: Vec<Quest>,
    pub selected_id: Option<String>,
}

impl QuestState {
    pub fn contains(&self, id: &str) -> bool {
        self.active.iter().chain(&self.archived).any(|q| q.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.archived.is_empty()
    }
}

/// Which rule changed the selection (or seeded a quest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileRule {
    /// Both collections were empty; a fresh quest was created and selected.
    SeededInitialQuest,
    /// Nothing was selected; the newest active quest was chosen.
    SelectedNewestActive,
    /// Nothing was selected and no quest is active; the newest archived quest was chosen.
    SelectedNewestArchived,
    /// The selection pointed at a quest that no longer exists.
    ReplacedMissingSelection,
}

/// Persisted keys whose values changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub active: bool,
    pub archived: bool,
    pub selected: bool,
    pub settings: bool,
}

impl Touched {
    pub fn any(&self) -> bool {
        self.active || self.archived || self.selected || self.settings
    }

    pub fn merge(self, other: Touched) -> Touched {
        Touched {
            active: self.active || other.active,
            archived: self.archived || other.archived,
            selected: self.selected || other.selected,
            settings: self.settings || other.settings,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: QuestState,
    pub rule: Option<ReconcileRule>,
    /// Entries dropped because their id was already present.
    pub dropped_duplicates: usize,
    pub touched: Touched,
}

impl Reconciliation {
    pub fn changed(&self) -> bool {
        self.touched.any()
    }
}

/// Restores the collection invariants.
///
/// Duplicate ids are removed first (archived wins over active, the first
/// occurrence wins within a collection). Then, in order:
/// 1. no quests at all: mint one, make it active and selected;
/// 2. no selection: select the newest active quest;
/// 3. no selection and nothing active: select the newest archived quest;
/// 4. selection points nowhere: reselect as in 2 and 3.
pub fn reconcile<F>(mut state: QuestState, mint: F) -> Reconciliation
where
    F: FnOnce() -> Quest,
{
    let mut touched = Touched::default();
    let dropped_duplicates = drop_duplicates(&mut state, &mut touched);

    if state.is_empty() {
        let quest = mint();
        state.selected_id = Some(quest.id.clone());
        state.active.push(quest);
        touched.active = true;
        touched.selected = true;
        return Reconciliation {
            state,
            rule: Some(ReconcileRule::SeededInitialQuest),
            dropped_duplicates,
            touched,
        };
    }

    let rule = match state.selected_id.as_deref() {
        Some(id) if state.contains(id) => None,
        current => {
            let missing = current.is_some();
            let (next, rule) = match newest(&state.active) {
                Some(quest) => (Some(quest.id.clone()), ReconcileRule::SelectedNewestActive),
                None => (
                    newest(&state.archived).map(|quest| quest.id.clone()),
                    ReconcileRule::SelectedNewestArchived,
                ),
            };
            state.selected_id = next;
            touched.selected = true;
            Some(if missing {
                ReconcileRule::ReplacedMissingSelection
            } else {
                rule
            })
        }
    };

    Reconciliation {
        state,
        rule,
        dropped_duplicates,
        touched,
    }
}

fn drop_duplicates(state: &mut QuestState, touched: &mut Touched) -> usize {
    let mut archived_ids = HashSet::new();
    let archived_before = state.archived.len();
    state
        .archived
        .retain(|quest| archived_ids.insert(quest.id.clone()));

    let mut active_ids = HashSet::new();
    let active_before = state.active.len();
    state
        .active
        .retain(|quest| !archived_ids.contains(&quest.id) && active_ids.insert(quest.id.clone()));

    let dropped_archived = archived_before - state.archived.len();
    let dropped_active = active_before - state.active.len();
    touched.archived |= dropped_archived > 0;
    touched.active |= dropped_active > 0;
    dropped_archived + dropped_active
}
