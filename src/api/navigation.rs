use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{OwnerOption, RowModel, SchedulePayload, SubjectId, WeekWindow};
use crate::error::{TimelineError, TimelineResult};

use super::ScheduleQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Tag attached to one reload request.
///
/// The host sends `query()` to the collaborator and hands the ticket back with
/// the response. Only the most recently issued ticket can still apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadTicket {
    generation: u64,
    window: WeekWindow,
    query: ScheduleQuery,
}

impl ReloadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn window(&self) -> WeekWindow {
        self.window
    }

    #[must_use]
    pub fn query(&self) -> &ScheduleQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied,
    /// A newer request superseded this one; the response was dropped.
    Stale,
}

/// Week navigation state machine: `Idle -> Loading -> {Loaded | Errored}`.
///
/// All transitions happen on the host's event thread. Superseded requests are
/// not aborted; their responses are recognized by generation and ignored.
#[derive(Debug, Clone)]
pub struct NavigationController {
    subject_id: SubjectId,
    window: WeekWindow,
    generation: u64,
    in_flight: Option<u64>,
    state: LoadState,
    error: Option<String>,
    model: RowModel,
    owner_options: Vec<OwnerOption>,
    unassigned_label: String,
}

impl NavigationController {
    pub fn new(
        subject_id: SubjectId,
        anchor: NaiveDate,
        unassigned_label: impl Into<String>,
    ) -> TimelineResult<Self> {
        let unassigned_label = unassigned_label.into();
        Ok(Self {
            subject_id,
            window: WeekWindow::containing(anchor)?,
            generation: 0,
            in_flight: None,
            state: LoadState::Idle,
            error: None,
            model: RowModel::empty(&unassigned_label),
            owner_options: Vec::new(),
            unassigned_label,
        })
    }

    #[must_use]
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    #[must_use]
    pub fn window(&self) -> WeekWindow {
        self.window
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn model(&self) -> &RowModel {
        &self.model
    }

    #[must_use]
    pub fn owner_options(&self) -> &[OwnerOption] {
        &self.owner_options
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn next_week(&mut self) -> TimelineResult<ReloadTicket> {
        let window = self.window.next()?;
        Ok(self.begin(window))
    }

    pub fn previous_week(&mut self) -> TimelineResult<ReloadTicket> {
        let window = self.window.previous()?;
        Ok(self.begin(window))
    }

    pub fn jump_to(&mut self, date: NaiveDate) -> TimelineResult<ReloadTicket> {
        let window = WeekWindow::containing(date)?;
        Ok(self.begin(window))
    }

    /// Re-requests the current window, e.g. after a write or a failed load.
    pub fn reload_current(&mut self) -> ReloadTicket {
        self.begin(self.window)
    }

    fn begin(&mut self, window: WeekWindow) -> ReloadTicket {
        self.generation += 1;
        if window != self.window {
            // Rows from another week must not show under the new headers.
            self.model = RowModel::empty(&self.unassigned_label);
            self.owner_options.clear();
        }
        self.window = window;
        self.in_flight = Some(self.generation);
        self.state = LoadState::Loading;
        self.error = None;

        debug!(
            week_start = %window.start(),
            generation = self.generation,
            "schedule reload requested"
        );

        ReloadTicket {
            generation: self.generation,
            window,
            query: ScheduleQuery::new(self.subject_id, window),
        }
    }

    /// Applies a collaborator response if its ticket is still current.
    pub fn complete(
        &mut self,
        ticket: &ReloadTicket,
        result: TimelineResult<SchedulePayload>,
    ) -> ReloadOutcome {
        if self.in_flight != Some(ticket.generation) || ticket.window != self.window {
            trace!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                week_start = %ticket.window.start(),
                "dropping stale schedule response"
            );
            return ReloadOutcome::Stale;
        }
        self.in_flight = None;

        match result.and_then(|payload| self.check_echo(payload)) {
            Ok(payload) => {
                let payload = payload.normalized();
                self.owner_options = payload.owner_options(&self.unassigned_label);
                self.model = RowModel::build(payload, &self.unassigned_label);
                self.state = LoadState::Loaded;
                debug!(
                    week_start = %self.window.start(),
                    rows = self.model.rows().len(),
                    items = self.model.item_count(),
                    "schedule reload applied"
                );
            }
            Err(err) => {
                let message = err.to_string();
                warn!(
                    week_start = %self.window.start(),
                    error = %err,
                    "schedule reload failed"
                );
                self.model = RowModel::failed(&self.unassigned_label, message.clone());
                self.owner_options.clear();
                self.error = Some(message);
                self.state = LoadState::Errored;
            }
        }
        ReloadOutcome::Applied
    }

    fn check_echo(&self, payload: SchedulePayload) -> TimelineResult<SchedulePayload> {
        match payload.week_start.as_deref() {
            Some(echoed) if echoed != self.window.start_key() => {
                Err(TimelineError::LoadFailure(format!(
                    "response is for week {echoed}, requested {}",
                    self.window.start_key()
                )))
            }
            _ => Ok(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadState, NavigationController, ReloadOutcome};
    use crate::core::{SchedulePayload, SubjectId};
    use crate::error::TimelineError;
    use chrono::NaiveDate;

    fn controller() -> NavigationController {
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 3).expect("valid date");
        NavigationController::new(SubjectId(1), anchor, "Unassigned").expect("controller")
    }

    #[test]
    fn starts_idle_on_anchor_week() {
        let nav = controller();
        assert_eq!(nav.state(), LoadState::Idle);
        assert_eq!(nav.window().start_key(), "2024-01-01");
        assert_eq!(nav.model().rows().len(), 1);
    }

    #[test]
    fn ticket_applies_at_most_once() {
        let mut nav = controller();
        let ticket = nav.reload_current();
        assert_eq!(
            nav.complete(&ticket, Ok(SchedulePayload::new())),
            ReloadOutcome::Applied
        );
        assert_eq!(
            nav.complete(
                &ticket,
                Err(TimelineError::LoadFailure("late".to_owned()))
            ),
            ReloadOutcome::Stale
        );
        assert_eq!(nav.state(), LoadState::Loaded);
    }

    #[test]
    fn mismatched_week_echo_is_a_load_failure() {
        let mut nav = controller();
        let ticket = nav.reload_current();
        let payload = SchedulePayload::new().with_week_start("2024-01-08");
        nav.complete(&ticket, Ok(payload));
        assert_eq!(nav.state(), LoadState::Errored);
        assert!(nav.error_message().is_some());
    }
}
