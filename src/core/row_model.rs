use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::payload::{RawScheduleItem, Sanitized, SchedulePayload};
use crate::core::{OwnerId, RowKey, ScheduleItem};

/// One horizontal grouping of items: the unassigned bucket or one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: RowKey,
    pub display_name: String,
    pub items: Vec<ScheduleItem>,
}

impl Row {
    #[must_use]
    pub fn unassigned(display_name: impl Into<String>) -> Self {
        Self {
            key: RowKey::Unassigned,
            display_name: display_name.into(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ordered rows for one week: unassigned first, then owners in payload order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowModel {
    rows: Vec<Row>,
    error: Option<String>,
    skipped_items: usize,
    defaulted_items: usize,
}

impl RowModel {
    /// Model holding only an empty unassigned row.
    #[must_use]
    pub fn empty(unassigned_label: &str) -> Self {
        Self {
            rows: vec![Row::unassigned(unassigned_label)],
            error: None,
            skipped_items: 0,
            defaulted_items: 0,
        }
    }

    /// Model shown after a failed reload: no items, error flag set.
    #[must_use]
    pub fn failed(unassigned_label: &str, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::empty(unassigned_label)
        }
    }

    /// Builds rows from a collaborator payload.
    ///
    /// The payload is assumed to be filtered to the current window already;
    /// no date filtering happens here. Repeated owners share one row.
    #[must_use]
    pub fn build(payload: SchedulePayload, unassigned_label: &str) -> Self {
        let payload = payload.normalized();
        let mut model = Self::empty(unassigned_label);

        let unassigned = model.sanitize_items(payload.unassigned, None);
        model.rows[0].items = unassigned;

        for owner in payload.employees {
            let key = RowKey::Owner(owner.owner_id);
            let items = model.sanitize_items(owner.tasks, Some(owner.owner_id));
            match model.rows.iter_mut().find(|row| row.key == key) {
                Some(row) => {
                    warn!(owner_id = %owner.owner_id, "merging duplicate owner row");
                    row.items.extend(items);
                }
                None => model.rows.push(Row {
                    key,
                    display_name: owner.name,
                    items,
                }),
            }
        }

        debug!(
            rows = model.rows.len(),
            items = model.item_count(),
            skipped = model.skipped_items,
            defaulted = model.defaulted_items,
            "built row model"
        );
        model
    }

    fn sanitize_items(
        &mut self,
        raw: Vec<RawScheduleItem>,
        owner: Option<OwnerId>,
    ) -> Vec<ScheduleItem> {
        let mut items = Vec::with_capacity(raw.len());
        for item in raw {
            match item.sanitize(owner) {
                Sanitized::Clean(item) => items.push(item),
                Sanitized::Defaulted(item) => {
                    self.defaulted_items += 1;
                    items.push(item);
                }
                Sanitized::Skipped => self.skipped_items += 1,
            }
        }
        items
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, key: RowKey) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    #[must_use]
    pub fn unassigned_row(&self) -> &Row {
        &self.rows[0]
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.rows.iter().map(|row| row.items.len()).sum()
    }

    /// True when no row carries any item; the view shows its empty-state indicator.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    #[must_use]
    pub fn skipped_items(&self) -> usize {
        self.skipped_items
    }

    #[must_use]
    pub fn defaulted_items(&self) -> usize {
        self.defaulted_items
    }
}
