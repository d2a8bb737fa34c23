use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::date::parse_timestamp;

/// Opaque identifier of a timeline item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<Uuid> for ItemId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// Anything with a start and end on the calendar.
///
/// Unparsable dates surface as `None`.
pub trait Scheduled {
    fn start_at(&self) -> Option<NaiveDateTime>;
    fn end_at(&self) -> Option<NaiveDateTime>;
}

/// A single time-bounded item on the timeline.
///
/// Dates are kept as the caller supplied them; they are parsed on demand so
/// malformed input never fails deserialization. Unknown fields are carried
/// through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub start: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub end: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Attach a caller-defined passthrough field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Merge a patch into this item, field by field.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(start) = &patch.start {
            self.start = start.clone();
        }
        if let Some(end) = &patch.end {
            self.end = end.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
    }
}

impl Scheduled for Item {
    fn start_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.start)
    }

    fn end_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.end)
    }
}

impl<T: Scheduled + ?Sized> Scheduled for &T {
    fn start_at(&self) -> Option<NaiveDateTime> {
        (**self).start_at()
    }

    fn end_at(&self) -> Option<NaiveDateTime> {
        (**self).end_at()
    }
}

/// Hover text for an item: `"name (start to end)"`.
pub fn item_tooltip(item: &Item) -> String {
    format!("{} ({} to {})", item.name, item.start, item.end)
}

/// Replacement field values proposed for an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ItemPatch {
    pub fn dates(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
            name: None,
        }
    }

    /// Only the start field.
    pub fn start(start: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            ..Default::default()
        }
    }

    /// Only the end field.
    pub fn end(end: impl Into<String>) -> Self {
        Self {
            end: Some(end.into()),
            ..Default::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// A commit: the only way interaction code proposes changes to the item store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub id: ItemId,
    pub patch: ItemPatch,
}

/// Accept strings, numbers and `null` for text fields; `null` becomes empty.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Numeric ids are accepted and kept as text.
impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "item id must be a string or number, got {other}"
            ))),
        }
    }
}
