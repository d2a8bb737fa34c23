//! Per-item interaction sessions: resize-by-drag and inline rename.
//!
//! Each item gets its own [`ItemSession`]; sessions for different items never
//! share state. Within one item a drag and a rename exclude each other.
//! Controllers never touch the item: they emit [`ItemUpdate`]s for the
//! owner of the item store to apply.

pub mod capture;
pub mod debounce;
pub mod drag;
pub mod rename;

use std::collections::HashMap;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::model::{Item, ItemId, ItemPatch, ItemUpdate};

pub use capture::{PointerCapture, Subscription};
pub use debounce::Debounce;
pub use drag::{DateRange, DragController, Edge};
pub use rename::{sanitize_name, validate_name, NameError, RenameController, RenameOutcome};

/// Why a session could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    #[error("item is already being dragged")]
    AlreadyDragging,
    #[error("item is already being renamed")]
    AlreadyEditing,
    #[error("item is busy with another interaction")]
    Busy,
    #[error("item dates cannot be parsed")]
    UnparsableDates,
}

/// Drag and rename state for a single item.
#[derive(Debug)]
pub struct ItemSession {
    pub drag: DragController,
    pub rename: RenameController,
}

impl ItemSession {
    pub fn new(item: &Item, config: &EngineConfig) -> Self {
        Self {
            drag: DragController::new(item.id.clone(), config.drag.clone()),
            rename: RenameController::new(item, config.rename.clone()),
        }
    }

    pub fn begin_drag(
        &mut self,
        item: &Item,
        edge: Edge,
        pointer_x: f64,
        capture: &PointerCapture,
    ) -> Result<(), InteractionError> {
        if self.rename.is_editing() {
            return Err(InteractionError::Busy);
        }
        self.drag.begin(item, edge, pointer_x, capture)
    }

    pub fn begin_rename(&mut self) -> Result<(), InteractionError> {
        if self.drag.is_dragging() {
            return Err(InteractionError::Busy);
        }
        self.rename.begin()
    }

    /// Tear down whatever is running. Nothing is committed.
    pub fn unmount(&mut self) {
        self.drag.cancel();
        self.rename.cancel();
    }
}

/// All live item sessions plus the pointer-capture registry that routes
/// global pointer events to the item being dragged.
#[derive(Debug)]
pub struct Interactions {
    config: EngineConfig,
    capture: PointerCapture,
    sessions: HashMap<ItemId, ItemSession>,
}

impl Interactions {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            capture: PointerCapture::new(),
            sessions: HashMap::new(),
        }
    }

    pub fn capture(&self) -> &PointerCapture {
        &self.capture
    }

    /// The session for `item`, created on first use.
    pub fn session(&mut self, item: &Item) -> &mut ItemSession {
        let config = &self.config;
        self.sessions
            .entry(item.id.clone())
            .or_insert_with(|| ItemSession::new(item, config))
    }

    pub fn get(&self, id: &ItemId) -> Option<&ItemSession> {
        self.sessions.get(id)
    }

    /// Start a drag on `item`. `pixels_per_day` is the current screen scale;
    /// `None` uses the configured default.
    pub fn begin_drag(
        &mut self,
        item: &Item,
        edge: Edge,
        pointer_x: f64,
        pixels_per_day: Option<f64>,
    ) -> Result<(), InteractionError> {
        let capture = self.capture.clone();
        let scale = pixels_per_day.unwrap_or(self.config.drag.pixels_per_day);
        let session = self.session(item);
        session.drag.set_pixels_per_day(scale);
        session.begin_drag(item, edge, pointer_x, &capture)
    }

    /// Start renaming `item`, seeded with its current name.
    pub fn begin_rename(&mut self, item: &Item) -> Result<(), InteractionError> {
        let session = self.session(item);
        session.rename.sync_name(&item.name);
        session.begin_rename()
    }

    /// Preview dates for an item mid-drag.
    pub fn preview(&self, id: &ItemId) -> Option<DateRange> {
        self.sessions.get(id).and_then(|s| s.drag.preview())
    }

    /// The pending change of an item mid-drag, for drawing a ghost bar.
    pub fn preview_patch(&self, id: &ItemId) -> Option<ItemPatch> {
        self.sessions.get(id).and_then(|s| s.drag.preview_patch())
    }

    pub fn is_dragging(&self) -> bool {
        !self.capture.is_empty()
    }

    pub fn is_editing(&self) -> bool {
        self.sessions.values().any(|s| s.rename.is_editing())
    }

    /// Abandon every running drag without committing.
    pub fn cancel_drags(&mut self) {
        for id in self.capture.listeners() {
            if let Some(session) = self.sessions.get_mut(&id) {
                session.drag.cancel();
            }
        }
    }

    /// Route a global pointer move to every captured item.
    pub fn pointer_move(&mut self, pointer_x: f64) {
        for id in self.capture.listeners() {
            if let Some(session) = self.sessions.get_mut(&id) {
                session.drag.pointer_move(pointer_x);
            }
        }
    }

    /// Global pointer release: end every captured drag.
    pub fn pointer_up(&mut self) -> Vec<ItemUpdate> {
        self.capture
            .listeners()
            .iter()
            .filter_map(|id| self.sessions.get_mut(id)?.drag.finish())
            .collect()
    }

    /// Drive rename auto-save timers.
    pub fn tick(&mut self, now: Instant) -> Vec<ItemUpdate> {
        self.sessions
            .values_mut()
            .filter_map(|session| session.rename.tick(now))
            .collect()
    }

    /// Feed fresh item data to idle rename controllers and unmount sessions
    /// whose item disappeared.
    pub fn sync(&mut self, items: &[Item]) {
        let mut names: HashMap<&ItemId, &str> =
            items.iter().map(|item| (&item.id, item.name.as_str())).collect();
        self.sessions.retain(|id, session| match names.remove(id) {
            Some(name) => {
                session.rename.sync_name(name);
                true
            }
            None => {
                session.unmount();
                false
            }
        });
    }
}
