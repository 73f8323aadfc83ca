//! Wire shapes returned by the scheduling collaborator.
//!
//! Decoding is lenient: both the camelCase contract and the snake_case field
//! names emitted by the backing service are accepted, and item fields that are
//! missing or carry the wrong JSON type are left empty rather than failing the
//! payload. Sanitizing turns each raw item into a [`ScheduleItem`] or drops it,
//! so one bad record never fails the week.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::{ItemId, ItemKind, OwnerId, ScheduleItem};
use crate::error::{TimelineError, TimelineResult};

const UNTITLED: &str = "Untitled";

/// One item as received; every field is optional until sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", from = "WireScheduleItem")]
pub struct RawScheduleItem {
    pub id: Option<ItemId>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub owner_id: Option<OwnerId>,
    pub start_offset: Option<i64>,
    pub span: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Fields present on the wire but unusable (wrong type, unknown kind).
    #[serde(skip)]
    pub malformed_fields: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireScheduleItem {
    #[serde(default, alias = "assignment_id", alias = "entry_id")]
    id: Option<Value>,
    #[serde(default, alias = "label")]
    title: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default, alias = "employee_id")]
    owner_id: Option<Value>,
    #[serde(default, alias = "start_offset")]
    start_offset: Option<Value>,
    #[serde(default)]
    span: Option<Value>,
    #[serde(default)]
    priority: Option<Value>,
}

fn decode_field<T: DeserializeOwned>(
    field: &'static str,
    value: Option<Value>,
    malformed: &mut usize,
) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(field, error = %err, "ignoring malformed schedule item field");
            *malformed += 1;
            None
        }
    }
}

impl From<WireScheduleItem> for RawScheduleItem {
    fn from(wire: WireScheduleItem) -> Self {
        let mut malformed = 0;
        let id = decode_field("id", wire.id, &mut malformed);
        let title = decode_field("title", wire.title, &mut malformed);
        let kind = decode_field("type", wire.kind, &mut malformed);
        let owner_id = decode_field("ownerId", wire.owner_id, &mut malformed);
        let start_offset = decode_field("startOffset", wire.start_offset, &mut malformed);
        let span = decode_field("span", wire.span, &mut malformed);
        let priority = decode_field("priority", wire.priority, &mut malformed);
        Self {
            id,
            title,
            kind,
            owner_id,
            start_offset,
            span,
            priority,
            malformed_fields: malformed,
        }
    }
}

impl From<ScheduleItem> for RawScheduleItem {
    fn from(item: ScheduleItem) -> Self {
        Self {
            id: Some(item.id),
            title: Some(item.title),
            kind: Some(item.kind),
            owner_id: item.owner_id,
            start_offset: Some(item.start_offset),
            span: Some(item.span),
            priority: item.priority,
            malformed_fields: 0,
        }
    }
}

/// Decodes an item list element by element; non-object entries become
/// id-less items and are skipped during sanitization.
fn lenient_items<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<RawScheduleItem>, D::Error> {
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|err| {
                warn!(error = %err, "schedule item is not an object");
                RawScheduleItem::default()
            })
        })
        .collect())
}

/// Result of sanitizing one raw item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sanitized {
    Clean(ScheduleItem),
    /// Usable after filling in missing or out-of-range fields.
    Defaulted(ScheduleItem),
    /// No id, so the item cannot be addressed or laid out.
    Skipped,
}

impl RawScheduleItem {
    /// Normalizes this item for a row owned by `owner`.
    #[must_use]
    pub fn sanitize(self, owner: Option<OwnerId>) -> Sanitized {
        let Some(id) = self.id else {
            warn!(title = ?self.title, "skipping schedule item without id");
            return Sanitized::Skipped;
        };

        let mut defaulted = self.malformed_fields > 0;
        let title = match self.title.map(|title| title.trim().to_owned()) {
            Some(title) if !title.is_empty() => title,
            _ => {
                defaulted = true;
                UNTITLED.to_owned()
            }
        };
        let start_offset = self.start_offset.unwrap_or_else(|| {
            defaulted = true;
            0
        });
        let span = match self.span {
            Some(span) if span >= 1 => span,
            _ => {
                defaulted = true;
                1
            }
        };

        if defaulted {
            warn!(item_id = %id, "defaulted malformed schedule item fields");
        }

        let item = ScheduleItem {
            id,
            title,
            kind: self.kind.unwrap_or_default(),
            owner_id: owner,
            start_offset,
            span,
            priority: self.priority,
        };
        if defaulted {
            Sanitized::Defaulted(item)
        } else {
            Sanitized::Clean(item)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSchedulePayload {
    #[serde(alias = "employee_id")]
    pub owner_id: OwnerId,
    pub name: String,
    #[serde(default, alias = "items", deserialize_with = "lenient_items")]
    pub tasks: Vec<RawScheduleItem>,
}

/// Owner identity without items, as sent by single-owner calendar responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    #[serde(alias = "employee_id")]
    pub owner_id: OwnerId,
    pub name: String,
}

/// Owner choice offered by the write path; `owner_id = None` is unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerOption {
    #[serde(default, alias = "employee_id")]
    pub owner_id: Option<OwnerId>,
    pub name: String,
}

/// Full reload payload for one week.
///
/// Two shapes are accepted: the team view (`employees` plus `unassigned`) and
/// the single-owner calendar (`employee` plus `items`). [`Self::normalized`]
/// folds the latter into the former.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "week_start")]
    pub week_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "week_end")]
    pub week_end: Option<String>,
    #[serde(default)]
    pub employees: Vec<OwnerSchedulePayload>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub unassigned: Vec<RawScheduleItem>,
    #[serde(default, alias = "employee_options")]
    pub employee_options: Vec<OwnerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<OwnerRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient_items")]
    pub items: Vec<RawScheduleItem>,
}

impl SchedulePayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a collaborator response; undecodable bodies are load failures.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            TimelineError::LoadFailure(format!("failed to parse schedule payload: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize schedule payload: {e}"))
        })
    }

    /// Folds a single-owner calendar (`employee` + `items`) into `employees`.
    ///
    /// Items listed without an `employee` land in the unassigned bucket.
    /// Calling this on an already normalized payload is a no-op.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let items = std::mem::take(&mut self.items);
        match self.employee.take() {
            Some(owner) => {
                match self
                    .employees
                    .iter_mut()
                    .find(|existing| existing.owner_id == owner.owner_id)
                {
                    Some(existing) => existing.tasks.extend(items),
                    None => self.employees.push(OwnerSchedulePayload {
                        owner_id: owner.owner_id,
                        name: owner.name,
                        tasks: items,
                    }),
                }
            }
            None if !items.is_empty() => {
                warn!(
                    items = items.len(),
                    "calendar items without an owner moved to unassigned"
                );
                self.unassigned.extend(items);
            }
            None => {}
        }
        self
    }

    #[must_use]
    pub fn with_week_start(mut self, key: impl Into<String>) -> Self {
        self.week_start = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_owner(
        mut self,
        owner_id: OwnerId,
        name: impl Into<String>,
        items: Vec<ScheduleItem>,
    ) -> Self {
        self.employees.push(OwnerSchedulePayload {
            owner_id,
            name: name.into(),
            tasks: items.into_iter().map(RawScheduleItem::from).collect(),
        });
        self
    }

    #[must_use]
    pub fn with_unassigned(mut self, items: Vec<ScheduleItem>) -> Self {
        self.unassigned
            .extend(items.into_iter().map(RawScheduleItem::from));
        self
    }

    /// Owner picker entries, always led by the unassigned choice.
    ///
    /// Expects a [`normalized`](Self::normalized) payload.
    #[must_use]
    pub fn owner_options(&self, unassigned_label: &str) -> Vec<OwnerOption> {
        let mut options = vec![OwnerOption {
            owner_id: None,
            name: unassigned_label.to_owned(),
        }];
        let source: Vec<OwnerOption> = if self.employee_options.is_empty() {
            self.employees
                .iter()
                .map(|owner| OwnerOption {
                    owner_id: Some(owner.owner_id),
                    name: owner.name.clone(),
                })
                .collect()
        } else {
            self.employee_options.clone()
        };
        options.extend(source.into_iter().filter(|option| option.owner_id.is_some()));
        options
    }
}
