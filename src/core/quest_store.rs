use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::{
    core::{
        clock::{Clock, IdGenerator, SystemClock, UuidGenerator},
        reconcile::{reconcile, QuestState, Touched},
    },
    currency::CurrencyCode,
    domain::{
        commitment::is_valid_value, common::normalized_name, Commitment, Quest, Settings,
        INITIAL_QUEST_NAME,
    },
    errors::{QuestError, QuestResult},
    storage::{
        decode, read_json, write_json, KeyValueStorage, ALL_KEYS, HISTORY_KEY, QUESTS_KEY,
        SELECTED_KEY, SETTINGS_KEY,
    },
};

/// Owns the persisted quest collections, the selection and the settings.
///
/// Every mutator validates its input before touching state, then runs the
/// reconciliation rules and writes the keys that changed. Storage failures are
/// logged and never undo the in-memory change.
pub struct QuestStore {
    state: QuestState,
    settings: Settings,
    storage: Box<dyn KeyValueStorage>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl QuestStore {
    /// Loads the store from `storage` using the system clock and UUID ids.
    pub fn open(storage: Box<dyn KeyValueStorage>) -> Self {
        Self::with_collaborators(storage, Box::new(SystemClock), Box::new(UuidGenerator))
    }

    pub fn with_collaborators(
        storage: Box<dyn KeyValueStorage>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let mut store = Self {
            state: QuestState::default(),
            settings: Settings::default(),
            storage,
            clock,
            ids,
        };
        store.reload();
        store
    }

    /// Re-reads every key from storage, then reconciles.
    pub fn reload(&mut self) {
        let storage = self.storage.as_ref();
        self.state = QuestState {
            active: load_or_default(storage, QUESTS_KEY),
            archived: load_or_default(storage, HISTORY_KEY),
            selected_id: load_or_default(storage, SELECTED_KEY),
        };
        self.settings = load_or_default(storage, SETTINGS_KEY);
        debug!(
            active = self.state.active.len(),
            archived = self.state.archived.len(),
            "loaded quest store"
        );
        self.settle(Touched::default());
    }

    pub fn active(&self) -> &[Quest] {
        &self.state.active
    }

    pub fn archived(&self) -> &[Quest] {
        &self.state.archived
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.state.selected_id.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &QuestState {
        &self.state
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.state
            .active
            .iter()
            .chain(&self.state.archived)
            .find(|quest| quest.id == id)
    }

    pub fn selected_quest(&self) -> Option<&Quest> {
        self.selected_id().and_then(|id| self.quest(id))
    }

    pub fn is_archived(&self, id: &str) -> bool {
        self.state.archived.iter().any(|quest| quest.id == id)
    }

    /// Creates an active quest and selects it.
    pub fn create_quest(&mut self, name: &str) -> QuestResult<Quest> {
        let name = normalized_name(name)
            .ok_or_else(|| QuestError::Validation("quest name cannot be empty".into()))?;
        let quest = Quest::new(self.ids.new_id(), name, self.clock.now_millis());
        self.state.active.push(quest.clone());
        self.state.selected_id = Some(quest.id.clone());
        debug!(quest_id = %quest.id, name = %quest.name, "created quest");
        self.settle(Touched {
            active: true,
            selected: true,
            ..Touched::default()
        });
        Ok(quest)
    }

    /// Replaces every stored copy of `quest`, or appends it to the active list
    /// when its id is unknown. Quests carrying a non-finite income or
    /// commitment value are rejected since JSON cannot hold them.
    pub fn update_quest(&mut self, quest: Quest) -> QuestResult<()> {
        validate_amounts(&quest)?;
        self.upsert(quest);
        Ok(())
    }

    fn upsert(&mut self, quest: Quest) {
        let mut touched = Touched::default();
        if let Some(slot) = self.state.active.iter_mut().find(|q| q.id == quest.id) {
            *slot = quest.clone();
            touched.active = true;
        }
        if let Some(slot) = self.state.archived.iter_mut().find(|q| q.id == quest.id) {
            *slot = quest.clone();
            touched.archived = true;
        }
        if !touched.any() {
            debug!(quest_id = %quest.id, "inserting unknown quest as active");
            self.state.active.push(quest);
            touched.active = true;
        }
        self.settle(touched);
    }

    /// Moves an active quest to the archive. Returns `false` when `id` is not active.
    pub fn archive_quest(&mut self, id: &str) -> bool {
        let Some(position) = self.state.active.iter().position(|q| q.id == id) else {
            return false;
        };
        let quest = self.state.active.remove(position);
        if !self.state.archived.iter().any(|q| q.id == id) {
            self.state.archived.push(quest);
        }
        let mut touched = Touched {
            active: true,
            archived: true,
            ..Touched::default()
        };
        if self.state.selected_id.as_deref() == Some(id) {
            self.state.selected_id = None;
            touched.selected = true;
        }
        debug!(quest_id = %id, "archived quest");
        self.settle(touched);
        true
    }

    /// Removes `id` from both collections. Returns whether anything was removed.
    pub fn delete_quest(&mut self, id: &str) -> bool {
        let active_before = self.state.active.len();
        let archived_before = self.state.archived.len();
        self.state.active.retain(|q| q.id != id);
        self.state.archived.retain(|q| q.id != id);
        let touched = Touched {
            active: self.state.active.len() != active_before,
            archived: self.state.archived.len() != archived_before,
            ..Touched::default()
        };
        let removed = touched.any();
        if removed {
            debug!(quest_id = %id, "deleted quest");
        }
        self.settle(touched);
        removed
    }

    /// Selects `id`. An unknown id is replaced by the reconciliation rules.
    pub fn set_selected(&mut self, id: Option<&str>) {
        self.state.selected_id = id.map(str::to_string);
        self.settle(Touched {
            selected: true,
            ..Touched::default()
        });
    }

    pub fn add_commitment(
        &mut self,
        quest_id: &str,
        name: &str,
        value: f64,
    ) -> QuestResult<Commitment> {
        let mut quest = match self.editable_quest(quest_id) {
            Ok(quest) => quest.clone(),
            Err(QuestError::Archived(id)) => {
                return Err(QuestError::Validation(format!(
                    "cannot add commitments to archived quest `{}`",
                    id
                )))
            }
            Err(err) => return Err(err),
        };
        let name = validate_commitment(name, value)?;
        let commitment = Commitment::new(self.ids.new_id(), name, value);
        quest.commitments.push(commitment.clone());
        debug!(quest_id, commitment_id = %commitment.id, "added commitment");
        self.upsert(quest);
        Ok(commitment)
    }

    /// Renames and revalues a commitment, keeping its id and paid flag.
    pub fn edit_commitment(
        &mut self,
        quest_id: &str,
        commitment_id: &str,
        name: &str,
        value: f64,
    ) -> QuestResult<()> {
        let mut quest = self.editable_quest(quest_id)?.clone();
        let commitment = quest.commitment_mut(commitment_id).ok_or_else(|| {
            QuestError::NotFound(format!(
                "commitment `{}` in quest `{}`",
                commitment_id, quest_id
            ))
        })?;
        let name = validate_commitment(name, value)?;
        commitment.name = name.to_string();
        commitment.value = value;
        debug!(quest_id, commitment_id, "edited commitment");
        self.upsert(quest);
        Ok(())
    }

    /// Removes a commitment from an active quest. Archived quests and unknown
    /// ids are left alone.
    pub fn delete_commitment(&mut self, quest_id: &str, commitment_id: &str) -> bool {
        let Ok(quest) = self.editable_quest(quest_id) else {
            return false;
        };
        let mut quest = quest.clone();
        let before = quest.commitments.len();
        quest.commitments.retain(|c| c.id != commitment_id);
        if quest.commitments.len() == before {
            return false;
        }
        debug!(quest_id, commitment_id, "deleted commitment");
        self.upsert(quest);
        true
    }

    /// Flips the paid flag; allowed on archived quests too. Returns the new
    /// flag, or `None` when either id is unknown.
    pub fn toggle_commitment_paid(&mut self, quest_id: &str, commitment_id: &str) -> Option<bool> {
        let mut quest = self.quest(quest_id)?.clone();
        let paid = quest.commitment_mut(commitment_id)?.toggle_paid();
        debug!(quest_id, commitment_id, paid, "toggled commitment");
        self.upsert(quest);
        Some(paid)
    }

    pub fn set_income(&mut self, quest_id: &str, value: f64) -> QuestResult<()> {
        let mut quest = self.editable_quest(quest_id)?.clone();
        if !value.is_finite() || value < 0.0 {
            return Err(QuestError::Validation(format!(
                "income must be a non-negative number, got {}",
                value
            )));
        }
        quest.income = value;
        self.upsert(quest);
        Ok(())
    }

    pub fn set_currency(&mut self, currency: CurrencyCode) {
        if self.settings.currency == currency {
            return;
        }
        self.settings.currency = currency;
        self.settle(Touched {
            settings: true,
            ..Touched::default()
        });
    }

    /// Forgets everything. Reconciliation immediately seeds a fresh quest.
    pub fn reset_all(&mut self) {
        for key in ALL_KEYS {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, error = %err, "failed to remove persisted key");
            }
        }
        self.state = QuestState::default();
        self.settings = Settings::default();
        info!("reset all quest data");
        self.settle(Touched {
            active: true,
            archived: true,
            selected: true,
            ..Touched::default()
        });
    }

    /// Applies a write made to `key` by another owner of the same storage
    /// (another tab or process). The foreign value wins; an absent or
    /// malformed value falls back to the key's default. Returns `false` for
    /// keys this store does not own.
    pub fn apply_external_change(&mut self, key: &str, new_value: Option<&str>) -> bool {
        match key {
            QUESTS_KEY => self.state.active = decode_or_default(key, new_value),
            HISTORY_KEY => self.state.archived = decode_or_default(key, new_value),
            SELECTED_KEY => self.state.selected_id = decode_or_default(key, new_value),
            SETTINGS_KEY => self.settings = decode_or_default(key, new_value),
            _ => return false,
        }
        debug!(key, "applied external change");
        self.settle(Touched::default());
        true
    }

    fn editable_quest(&self, id: &str) -> QuestResult<&Quest> {
        if self.is_archived(id) {
            return Err(QuestError::Archived(id.to_string()));
        }
        self.state
            .active
            .iter()
            .find(|quest| quest.id == id)
            .ok_or_else(|| QuestError::NotFound(format!("quest `{}`", id)))
    }

    /// Reconciles, then persists everything in `touched` plus whatever
    /// reconciliation changed.
    fn settle(&mut self, touched: Touched) {
        let clock = &self.clock;
        let ids = &self.ids;
        let outcome = reconcile(std::mem::take(&mut self.state), || {
            Quest::new(ids.new_id(), INITIAL_QUEST_NAME, clock.now_millis())
        });
        if let Some(rule) = outcome.rule {
            info!(?rule, selected = ?outcome.state.selected_id, "reconciled quests");
        }
        if outcome.dropped_duplicates > 0 {
            warn!(
                dropped = outcome.dropped_duplicates,
                "dropped quests with duplicate ids"
            );
        }
        self.state = outcome.state;
        self.persist(touched.merge(outcome.touched));
    }

    fn persist(&self, touched: Touched) {
        if touched.active {
            self.write(QUESTS_KEY, &self.state.active);
        }
        if touched.archived {
            self.write(HISTORY_KEY, &self.state.archived);
        }
        if touched.selected {
            self.write(SELECTED_KEY, &self.state.selected_id);
        }
        if touched.settings {
            self.write(SETTINGS_KEY, &self.settings);
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = write_json(self.storage.as_ref(), key, value) {
            warn!(key, error = %err, "failed to persist key");
        }
    }
}

fn validate_amounts(quest: &Quest) -> QuestResult<()> {
    if !quest.income.is_finite() {
        return Err(QuestError::Validation(format!(
            "quest `{}` income must be finite, got {}",
            quest.id, quest.income
        )));
    }
    if let Some(commitment) = quest.commitments.iter().find(|c| !c.value.is_finite()) {
        return Err(QuestError::Validation(format!(
            "commitment `{}` value must be finite, got {}",
            commitment.id, commitment.value
        )));
    }
    Ok(())
}

fn validate_commitment(name: &str, value: f64) -> QuestResult<&str> {
    let name = normalized_name(name)
        .ok_or_else(|| QuestError::Validation("commitment name cannot be empty".into()))?;
    if !is_valid_value(value) {
        return Err(QuestError::Validation(format!(
            "commitment value must be a positive number, got {}",
            value
        )));
    }
    Ok(name)
}

fn load_or_default<T: DeserializeOwned + Default>(storage: &dyn KeyValueStorage, key: &str) -> T {
    match read_json(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            warn!(key, error = %err, "falling back to default value");
            T::default()
        }
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> T {
    match raw.map(|raw| decode(key, raw)) {
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            warn!(key, error = %err, "falling back to default value");
            T::default()
        }
        None => T::default(),
    }
}
