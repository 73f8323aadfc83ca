use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::core::{ItemId, OwnerOption, RowModel, SchedulePayload, WeekWindow, layout_row};
use crate::error::TimelineResult;
use crate::render::{Renderer, TimelineFrame};

use super::{
    LoadState, NavigationController, ReloadOutcome, ReloadTicket, ScheduleItemDraft,
    ScheduleSource, SessionContext, TimelineEngineConfig,
};

/// Weekly schedule timeline: navigation, reload bookkeeping, and layout.
///
/// Hosts with an asynchronous transport drive the ticket API directly
/// (`next_week` / `complete_reload`); synchronous hosts hand a
/// [`ScheduleSource`] to the `*_with` helpers.
pub struct TimelineEngine<R: Renderer> {
    renderer: R,
    config: TimelineEngineConfig,
    navigation: NavigationController,
}

impl<R: Renderer> TimelineEngine<R> {
    pub fn new(
        renderer: R,
        config: TimelineEngineConfig,
        session: SessionContext,
        anchor: NaiveDate,
    ) -> TimelineResult<Self> {
        let config = config.validate()?;
        let subject_id = session.require_subject()?;
        let navigation =
            NavigationController::new(subject_id, anchor, config.unassigned_label.clone())?;
        debug!(
            subject_id = %subject_id,
            week_start = %navigation.window().start(),
            "timeline engine initialized"
        );
        Ok(Self {
            renderer,
            config,
            navigation,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TimelineEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn window(&self) -> WeekWindow {
        self.navigation.window()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.navigation.state()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.navigation.error_message()
    }

    #[must_use]
    pub fn row_model(&self) -> &RowModel {
        self.navigation.model()
    }

    #[must_use]
    pub fn owner_options(&self) -> &[OwnerOption] {
        self.navigation.owner_options()
    }

    pub fn next_week(&mut self) -> TimelineResult<ReloadTicket> {
        self.navigation.next_week()
    }

    pub fn previous_week(&mut self) -> TimelineResult<ReloadTicket> {
        self.navigation.previous_week()
    }

    pub fn jump_to(&mut self, date: NaiveDate) -> TimelineResult<ReloadTicket> {
        self.navigation.jump_to(date)
    }

    pub fn reload(&mut self) -> ReloadTicket {
        self.navigation.reload_current()
    }

    /// Hands a collaborator response back; stale tickets are ignored.
    pub fn complete_reload(
        &mut self,
        ticket: &ReloadTicket,
        result: TimelineResult<SchedulePayload>,
    ) -> ReloadOutcome {
        self.navigation.complete(ticket, result)
    }

    /// Fetches `ticket`'s week from `source` and applies it.
    pub fn load_with<S: ScheduleSource + ?Sized>(
        &mut self,
        source: &S,
        ticket: &ReloadTicket,
    ) -> ReloadOutcome {
        let result = source.fetch_week(ticket.query());
        self.complete_reload(ticket, result)
    }

    pub fn next_week_with<S: ScheduleSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> TimelineResult<ReloadOutcome> {
        let ticket = self.next_week()?;
        Ok(self.load_with(source, &ticket))
    }

    pub fn previous_week_with<S: ScheduleSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> TimelineResult<ReloadOutcome> {
        let ticket = self.previous_week()?;
        Ok(self.load_with(source, &ticket))
    }

    pub fn jump_to_with<S: ScheduleSource + ?Sized>(
        &mut self,
        source: &S,
        date: NaiveDate,
    ) -> TimelineResult<ReloadOutcome> {
        let ticket = self.jump_to(date)?;
        Ok(self.load_with(source, &ticket))
    }

    pub fn reload_with<S: ScheduleSource + ?Sized>(&mut self, source: &S) -> ReloadOutcome {
        let ticket = self.reload();
        self.load_with(source, &ticket)
    }

    /// Creates an item and reloads the current week on success.
    ///
    /// Invalid drafts fail with `ValidationFailure` before anything is sent.
    pub fn create_item_with<S: ScheduleSource + ?Sized>(
        &mut self,
        source: &mut S,
        draft: &ScheduleItemDraft,
    ) -> TimelineResult<ItemId> {
        let item = draft.validate()?;
        let subject_id = self.navigation.subject_id();
        let item_id = source.create_item(subject_id, &item).inspect_err(|err| {
            warn!(error = %err, "schedule item create rejected");
        })?;
        debug!(item_id = %item_id, "schedule item created");
        self.reload_with(&*source);
        Ok(item_id)
    }

    pub fn update_item_with<S: ScheduleSource + ?Sized>(
        &mut self,
        source: &mut S,
        item_id: &ItemId,
        draft: &ScheduleItemDraft,
    ) -> TimelineResult<()> {
        let item = draft.validate()?;
        let subject_id = self.navigation.subject_id();
        source
            .update_item(subject_id, item_id, &item)
            .inspect_err(|err| warn!(error = %err, "schedule item update rejected"))?;
        debug!(item_id = %item_id, "schedule item updated");
        self.reload_with(&*source);
        Ok(())
    }

    pub fn delete_item_with<S: ScheduleSource + ?Sized>(
        &mut self,
        source: &mut S,
        item_id: &ItemId,
    ) -> TimelineResult<()> {
        let subject_id = self.navigation.subject_id();
        source
            .delete_item(subject_id, item_id)
            .inspect_err(|err| warn!(error = %err, "schedule item delete rejected"))?;
        debug!(item_id = %item_id, "schedule item deleted");
        self.reload_with(&*source);
        Ok(())
    }

    /// Derives the render contract from the current rows and window.
    #[must_use]
    pub fn frame(&self) -> TimelineFrame {
        let constants = self.config.layout;
        self.navigation.model().rows().iter().fold(
            TimelineFrame::new(self.window(), self.load_state())
                .with_error(self.error_message().map(str::to_owned)),
            |frame, row| {
                frame.with_row(layout_row(
                    row,
                    constants,
                    self.config.lane_policy,
                    self.config.width_policy,
                ))
            },
        )
    }

    pub fn render(&mut self) -> TimelineResult<()> {
        let frame = self.frame();
        self.renderer.render(&frame)
    }
}
