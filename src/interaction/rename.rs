//! Inline renaming for one item.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::RenameConfig;
use crate::model::{Item, ItemId, ItemPatch, ItemUpdate};

use super::debounce::Debounce;
use super::InteractionError;

/// Why a proposed name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name must be at least {min} characters")]
    TooShort { min: usize },
    #[error("name must be at most {max} characters")]
    TooLong { max: usize },
}

/// Trim the ends and collapse inner whitespace runs to single spaces.
pub fn sanitize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check the trimmed length of `value` against the configured bounds.
pub fn validate_name(value: &str, config: &RenameConfig) -> Result<(), NameError> {
    let len = value.trim().chars().count();
    if len < config.min_len {
        Err(NameError::TooShort {
            min: config.min_len,
        })
    } else if len > config.max_len {
        Err(NameError::TooLong {
            max: config.max_len,
        })
    } else {
        Ok(())
    }
}

/// Result of asking the controller to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// A new name was proposed; the controller is idle again.
    Committed(ItemUpdate),
    /// The name did not change; idle again, nothing emitted.
    Unchanged,
    /// Validation failed; still editing with the error surfaced.
    Invalid(NameError),
    /// There was no edit in progress.
    NotEditing,
}

#[derive(Debug)]
pub struct EditSession {
    edit_value: String,
    /// Name the edit is compared against; moves forward on auto-save.
    baseline: String,
    error: Option<NameError>,
    autosave: Debounce,
}

impl EditSession {
    pub fn value(&self) -> &str {
        &self.edit_value
    }

    pub fn error(&self) -> Option<NameError> {
        self.error
    }
}

#[derive(Debug, Default)]
pub enum RenameState {
    #[default]
    Idle,
    Editing(EditSession),
}

/// Per-item rename state machine: `Idle` ⇄ `Editing`.
#[derive(Debug)]
pub struct RenameController {
    item_id: ItemId,
    /// Name shown while idle; follows external updates.
    displayed: String,
    config: RenameConfig,
    state: RenameState,
}

impl RenameController {
    pub fn new(item: &Item, config: RenameConfig) -> Self {
        Self {
            item_id: item.id.clone(),
            displayed: item.name.clone(),
            config,
            state: RenameState::Idle,
        }
    }

    pub fn state(&self) -> &RenameState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, RenameState::Editing(_))
    }

    /// What the name field should show right now.
    pub fn displayed_name(&self) -> &str {
        match &self.state {
            RenameState::Editing(session) => &session.edit_value,
            RenameState::Idle => &self.displayed,
        }
    }

    pub fn validation_error(&self) -> Option<NameError> {
        match &self.state {
            RenameState::Editing(session) => session.error,
            RenameState::Idle => None,
        }
    }

    /// The store's copy of the name changed. Ignored mid-edit so typing is
    /// not clobbered.
    pub fn sync_name(&mut self, name: &str) {
        if let RenameState::Idle = self.state {
            self.displayed = name.to_string();
        }
    }

    /// Enter editing, seeded with the current name.
    pub fn begin(&mut self) -> Result<(), InteractionError> {
        if self.is_editing() {
            return Err(InteractionError::AlreadyEditing);
        }
        debug!(id = %self.item_id, "rename started");
        self.state = RenameState::Editing(EditSession {
            edit_value: self.displayed.clone(),
            baseline: self.displayed.clone(),
            error: None,
            autosave: Debounce::new(self.config.debounce()),
        });
        Ok(())
    }

    /// A keystroke changed the field. Clears a stale error and restarts the
    /// auto-save timer.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        if let RenameState::Editing(session) = &mut self.state {
            session.edit_value = value.into();
            session.error = None;
            session.autosave.schedule(now);
        }
    }

    /// Drive the auto-save timer. Emits a commit when the debounce elapsed and
    /// the edit is valid and new; stays in `Editing` either way.
    pub fn tick(&mut self, now: Instant) -> Option<ItemUpdate> {
        let RenameState::Editing(session) = &mut self.state else {
            return None;
        };
        if !session.autosave.fire(now) {
            return None;
        }
        let name = sanitize_name(&session.edit_value);
        if let Err(e) = validate_name(&name, &self.config) {
            session.error = Some(e);
            return None;
        }
        if name == session.baseline {
            return None;
        }
        info!(id = %self.item_id, %name, "rename auto-saved");
        session.baseline = name.clone();
        self.displayed = name.clone();
        Some(ItemUpdate {
            id: self.item_id.clone(),
            patch: ItemPatch::name(name),
        })
    }

    /// Enter, Tab or blur.
    pub fn commit(&mut self) -> RenameOutcome {
        let RenameState::Editing(session) = &mut self.state else {
            return RenameOutcome::NotEditing;
        };
        let name = sanitize_name(&session.edit_value);
        if let Err(e) = validate_name(&name, &self.config) {
            session.error = Some(e);
            return RenameOutcome::Invalid(e);
        }
        let changed = name != session.baseline;
        self.state = RenameState::Idle;
        self.displayed = name.clone();
        if !changed {
            debug!(id = %self.item_id, "rename closed without change");
            return RenameOutcome::Unchanged;
        }
        info!(id = %self.item_id, %name, "rename committed");
        RenameOutcome::Committed(ItemUpdate {
            id: self.item_id.clone(),
            patch: ItemPatch::name(name),
        })
    }

    /// Escape: drop the edit and go back to the last saved name.
    pub fn cancel(&mut self) {
        if let RenameState::Editing(_) = std::mem::take(&mut self.state) {
            debug!(id = %self.item_id, "rename cancelled");
        }
    }
}
