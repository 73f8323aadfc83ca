//! Reference scheduling collaborator backed by process memory.
//!
//! Mirrors the remote service closely enough for headless hosts and tests:
//! stored records keep absolute dates and are projected onto the requested
//! week on every fetch, clipped to Monday..Sunday.

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use crate::core::{
    ItemId, ItemKind, OwnerId, OwnerOption, OwnerSchedulePayload, RawScheduleItem,
    SchedulePayload, SubjectId, WeekWindow, format_date_key,
};
use crate::error::{TimelineError, TimelineResult};

use super::{ScheduleQuery, ScheduleSource, ValidatedScheduleItem};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OwnerRecord {
    subject_id: SubjectId,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredItem {
    subject_id: SubjectId,
    title: String,
    kind: ItemKind,
    owner_id: Option<OwnerId>,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl StoredItem {
    fn overlaps(&self, window: WeekWindow) -> bool {
        self.start_date <= window.end() && self.end_date >= window.start()
    }

    fn project(&self, id: i64, window: WeekWindow) -> RawScheduleItem {
        let visible_start = self.start_date.max(window.start());
        let visible_end = self.end_date.min(window.end());
        RawScheduleItem {
            id: Some(ItemId::from(id)),
            title: Some(self.title.clone()),
            kind: Some(self.kind),
            owner_id: self.owner_id,
            start_offset: Some(window.offset_of(visible_start)),
            span: Some(visible_end.signed_duration_since(visible_start).num_days() + 1),
            priority: None,
            malformed_fields: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleSource {
    owners: IndexMap<OwnerId, OwnerRecord>,
    items: IndexMap<i64, StoredItem>,
    next_id: i64,
    unavailable: bool,
}

impl InMemoryScheduleSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_owner(
        mut self,
        subject_id: SubjectId,
        owner_id: OwnerId,
        name: impl Into<String>,
    ) -> Self {
        self.owners.insert(
            owner_id,
            OwnerRecord {
                subject_id,
                name: name.into(),
            },
        );
        self
    }

    /// Makes every fetch fail until switched back.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn check_owner(&self, subject_id: SubjectId, owner_id: Option<OwnerId>) -> TimelineResult<()> {
        let Some(owner_id) = owner_id else {
            return Ok(());
        };
        match self.owners.get(&owner_id) {
            Some(owner) if owner.subject_id == subject_id => Ok(()),
            _ => Err(TimelineError::WriteRejected(format!(
                "owner {owner_id} not found for this subject"
            ))),
        }
    }

    fn stored_key(&self, subject_id: SubjectId, item_id: &ItemId) -> TimelineResult<i64> {
        item_id
            .as_str()
            .parse::<i64>()
            .ok()
            .filter(|key| {
                self.items
                    .get(key)
                    .is_some_and(|item| item.subject_id == subject_id)
            })
            .ok_or_else(|| {
                TimelineError::WriteRejected(format!("schedule item {item_id} not found"))
            })
    }

    fn stored_from(subject_id: SubjectId, item: &ValidatedScheduleItem) -> StoredItem {
        StoredItem {
            subject_id,
            title: item.title().to_owned(),
            kind: item.kind(),
            owner_id: item.owner_id(),
            start_date: item.start_date(),
            end_date: item.end_date(),
        }
    }
}

impl ScheduleSource for InMemoryScheduleSource {
    fn fetch_week(&self, query: &ScheduleQuery) -> TimelineResult<SchedulePayload> {
        if self.unavailable {
            return Err(TimelineError::LoadFailure(
                "schedule service unavailable".to_owned(),
            ));
        }
        let window = WeekWindow::containing(query.week_start()?)?;

        let mut visible: Vec<(&i64, &StoredItem)> = self
            .items
            .iter()
            .filter(|(_, item)| item.subject_id == query.subject_id && item.overlaps(window))
            .collect();
        visible.sort_by_key(|(id, item)| (item.start_date, **id));

        let mut employees: IndexMap<OwnerId, OwnerSchedulePayload> = IndexMap::new();
        let mut unassigned = Vec::new();
        for (id, item) in visible {
            let projected = item.project(*id, window);
            match item.owner_id {
                None => unassigned.push(projected),
                Some(owner_id) => {
                    let name = self
                        .owners
                        .get(&owner_id)
                        .map_or_else(|| owner_id.to_string(), |owner| owner.name.clone());
                    employees
                        .entry(owner_id)
                        .or_insert_with(|| OwnerSchedulePayload {
                            owner_id,
                            name,
                            tasks: Vec::new(),
                        })
                        .tasks
                        .push(projected);
                }
            }
        }

        let mut employees: Vec<OwnerSchedulePayload> = employees.into_values().collect();
        employees.sort_by_key(|owner| owner.name.to_lowercase());
        unassigned.sort_by_key(|item| item.title.as_deref().unwrap_or_default().to_lowercase());

        let mut employee_options: Vec<OwnerOption> = self
            .owners
            .iter()
            .filter(|(_, owner)| owner.subject_id == query.subject_id)
            .map(|(owner_id, owner)| OwnerOption {
                owner_id: Some(*owner_id),
                name: owner.name.clone(),
            })
            .collect();
        employee_options.sort_by_key(|option| option.name.to_lowercase());

        debug!(
            subject_id = %query.subject_id,
            week_start = %query.week_start_key,
            owners = employees.len(),
            unassigned = unassigned.len(),
            "served in-memory schedule week"
        );

        Ok(SchedulePayload {
            week_start: Some(window.start_key()),
            week_end: Some(format_date_key(window.end())),
            employees,
            unassigned,
            employee_options,
            ..SchedulePayload::default()
        })
    }

    fn create_item(
        &mut self,
        subject_id: SubjectId,
        item: &ValidatedScheduleItem,
    ) -> TimelineResult<ItemId> {
        self.check_owner(subject_id, item.owner_id())?;
        self.next_id += 1;
        let key = self.next_id;
        self.items.insert(key, Self::stored_from(subject_id, item));
        debug!(item_id = key, "stored schedule item");
        Ok(ItemId::from(key))
    }

    fn update_item(
        &mut self,
        subject_id: SubjectId,
        item_id: &ItemId,
        item: &ValidatedScheduleItem,
    ) -> TimelineResult<()> {
        let key = self.stored_key(subject_id, item_id)?;
        self.check_owner(subject_id, item.owner_id())?;
        self.items.insert(key, Self::stored_from(subject_id, item));
        Ok(())
    }

    fn delete_item(&mut self, subject_id: SubjectId, item_id: &ItemId) -> TimelineResult<()> {
        let key = self.stored_key(subject_id, item_id)?;
        self.items.shift_remove(&key);
        Ok(())
    }
}
