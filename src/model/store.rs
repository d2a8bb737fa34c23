use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::item::{Item, ItemId, ItemUpdate};

/// An in-memory collection of items that accepts commits.
///
/// The layout engine never writes here itself; interaction controllers emit
/// [`ItemUpdate`]s and the owner applies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStore {
    pub name: String,
    pub items: Vec<Item>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self {
            name: "Untitled Timeline".to_string(),
            items: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl ItemStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_items(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::new(name)
        }
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
        self.touch();
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        let removed = self.items.remove(index);
        self.touch();
        Some(removed)
    }

    /// Merge a commit into the matching item. Unknown ids are ignored.
    ///
    /// Returns whether an item changed.
    pub fn apply(&mut self, update: &ItemUpdate) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == update.id) else {
            warn!(id = %update.id, "update for unknown item ignored");
            return false;
        };
        item.apply(&update.patch);
        info!(id = %update.id, patch = ?update.patch, "item updated");
        self.touch();
        true
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
