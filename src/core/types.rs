use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of one schedule item as issued by the collaborator.
///
/// Collaborators emit either integers or strings; both normalize to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawItemId {
    Integer(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawItemId::deserialize(deserializer)? {
            RawItemId::Integer(value) => Self::from(value),
            RawItemId::Text(value) => Self(value),
        })
    }
}

/// Employee that owns a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account whose schedule is being viewed. Passed explicitly into every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    #[serde(alias = "assignment")]
    Task,
    Personal,
}

/// Row identity: the unassigned bucket or one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKey {
    Unassigned,
    Owner(OwnerId),
}

/// A date-ranged work item already projected onto the current week.
///
/// `start_offset` is relative to the window Monday and may be negative;
/// `span` is at least one day and may run past the Sunday column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub owner_id: Option<OwnerId>,
    pub start_offset: i64,
    pub span: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl ScheduleItem {
    /// Builds a task item; `span` is raised to one day when smaller.
    #[must_use]
    pub fn task(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        start_offset: i64,
        span: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: ItemKind::Task,
            owner_id: None,
            start_offset,
            span: span.max(1),
            priority: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner_id = Some(owner);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Exclusive end offset in days.
    #[must_use]
    pub fn end_offset(&self) -> i64 {
        self.start_offset.saturating_add(self.span)
    }
}
