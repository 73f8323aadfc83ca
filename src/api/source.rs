use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{
    ItemId, ItemKind, OwnerId, SchedulePayload, SubjectId, WeekWindow, parse_date_key,
};
use crate::error::{TimelineError, TimelineResult};

/// Explicit session context handed to the engine by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub subject_id: Option<SubjectId>,
}

impl SessionContext {
    #[must_use]
    pub fn for_subject(subject_id: SubjectId) -> Self {
        Self {
            subject_id: Some(subject_id),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn require_subject(self) -> TimelineResult<SubjectId> {
        self.subject_id.ok_or(TimelineError::NoSession)
    }
}

/// Collaborator request for one week of one subject's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    pub subject_id: SubjectId,
    pub week_start_key: String,
}

impl ScheduleQuery {
    #[must_use]
    pub fn new(subject_id: SubjectId, window: WeekWindow) -> Self {
        Self {
            subject_id,
            week_start_key: window.start_key(),
        }
    }

    pub fn week_start(&self) -> TimelineResult<NaiveDate> {
        parse_date_key(&self.week_start_key)
    }
}

/// Unvalidated input from the "new item" form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItemDraft {
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub owner_id: Option<OwnerId>,
    #[serde(default)]
    pub kind: ItemKind,
}

impl ScheduleItemDraft {
    #[must_use]
    pub fn task(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            start_date: Some(start_date),
            end_date: Some(end_date),
            owner_id: None,
            kind: ItemKind::Task,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Checks the draft locally; nothing is sent when this fails.
    pub fn validate(&self) -> TimelineResult<ValidatedScheduleItem> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TimelineError::ValidationFailure(
                "title is required".to_owned(),
            ));
        }
        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err(TimelineError::ValidationFailure(
                "start and end dates are required".to_owned(),
            ));
        };
        if start_date > end_date {
            return Err(TimelineError::ValidationFailure(
                "start date cannot be after end date".to_owned(),
            ));
        }
        if self.kind == ItemKind::Personal && self.owner_id.is_none() {
            return Err(TimelineError::ValidationFailure(
                "personal entries need an owner".to_owned(),
            ));
        }

        Ok(ValidatedScheduleItem {
            title: title.to_owned(),
            start_date,
            end_date,
            owner_id: self.owner_id,
            kind: self.kind,
        })
    }
}

/// A draft that passed local validation. Only [`ScheduleItemDraft::validate`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedScheduleItem {
    title: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    owner_id: Option<OwnerId>,
    kind: ItemKind,
}

impl ValidatedScheduleItem {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<OwnerId> {
        self.owner_id
    }

    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Inclusive length in days.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        self.end_date.signed_duration_since(self.start_date).num_days() + 1
    }
}

/// Remote scheduling collaborator.
///
/// `fetch_week` must return items already filtered to the requested week with
/// `start_offset`/`span` computed relative to its Monday; the engine never
/// recomputes them from dates.
pub trait ScheduleSource {
    fn fetch_week(&self, query: &ScheduleQuery) -> TimelineResult<SchedulePayload>;

    fn create_item(
        &mut self,
        subject_id: SubjectId,
        item: &ValidatedScheduleItem,
    ) -> TimelineResult<ItemId>;

    fn update_item(
        &mut self,
        subject_id: SubjectId,
        item_id: &ItemId,
        item: &ValidatedScheduleItem,
    ) -> TimelineResult<()>;

    fn delete_item(&mut self, subject_id: SubjectId, item_id: &ItemId) -> TimelineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::{ScheduleItemDraft, SessionContext};
    use crate::core::{ItemKind, OwnerId};
    use crate::error::TimelineError;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    #[test]
    fn draft_requires_title_and_dates() {
        let blank = ScheduleItemDraft::task("   ", date(1), date(2));
        assert!(matches!(
            blank.validate(),
            Err(TimelineError::ValidationFailure(_))
        ));

        let missing_end = ScheduleItemDraft {
            title: "Inventory".to_owned(),
            start_date: Some(date(1)),
            ..ScheduleItemDraft::default()
        };
        assert!(matches!(
            missing_end.validate(),
            Err(TimelineError::ValidationFailure(_))
        ));
    }

    #[test]
    fn draft_rejects_reversed_dates() {
        let reversed = ScheduleItemDraft::task("Inventory", date(5), date(2));
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn validated_draft_trims_title_and_counts_days() {
        let item = ScheduleItemDraft::task("  Inventory ", date(1), date(3))
            .with_owner(OwnerId(2))
            .with_kind(ItemKind::Personal)
            .validate()
            .expect("valid draft");
        assert_eq!(item.title(), "Inventory");
        assert_eq!(item.day_count(), 3);
    }

    #[test]
    fn anonymous_session_has_no_subject() {
        assert_eq!(
            SessionContext::anonymous().require_subject(),
            Err(TimelineError::NoSession)
        );
    }
}
