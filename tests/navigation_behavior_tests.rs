use chrono::NaiveDate;
use week_timeline::TimelineError;
use week_timeline::api::{
    LoadState, ReloadOutcome, SessionContext, TimelineEngine, TimelineEngineConfig,
};
use week_timeline::core::{ItemKind, OwnerId, RowKey, ScheduleItem, SchedulePayload, SubjectId};
use week_timeline::render::NullRenderer;

fn build_engine() -> TimelineEngine<NullRenderer> {
    let anchor = NaiveDate::from_ymd_opt(2024, 1, 3).expect("valid date");
    TimelineEngine::new(
        NullRenderer::default(),
        TimelineEngineConfig::default(),
        SessionContext::for_subject(SubjectId(1)),
        anchor,
    )
    .expect("engine init")
}

fn payload_for(week_start_key: &str, title: &str) -> SchedulePayload {
    SchedulePayload::new()
        .with_week_start(week_start_key)
        .with_owner(
            OwnerId(7),
            "Ada",
            vec![ScheduleItem::task("t1", title, 0, 2)],
        )
}

#[test]
fn forward_then_back_renders_latest_window_when_forward_resolves_last() {
    let mut engine = build_engine();
    let forward = engine.next_week().expect("forward");
    let back = engine.previous_week().expect("back");
    assert_eq!(back.window().start_key(), "2024-01-01");

    assert_eq!(
        engine.complete_reload(&back, Ok(payload_for("2024-01-01", "current week"))),
        ReloadOutcome::Applied
    );
    assert_eq!(
        engine.complete_reload(&forward, Ok(payload_for("2024-01-08", "next week"))),
        ReloadOutcome::Stale
    );

    assert_eq!(engine.load_state(), LoadState::Loaded);
    assert_eq!(engine.window().start_key(), "2024-01-01");
    let row = engine
        .row_model()
        .row(RowKey::Owner(OwnerId(7)))
        .expect("owner row");
    assert_eq!(row.items[0].title, "current week");
}

#[test]
fn forward_then_back_ignores_forward_response_arriving_first() {
    let mut engine = build_engine();
    let forward = engine.next_week().expect("forward");
    let back = engine.previous_week().expect("back");

    assert_eq!(
        engine.complete_reload(&forward, Ok(payload_for("2024-01-08", "next week"))),
        ReloadOutcome::Stale
    );
    assert_eq!(engine.load_state(), LoadState::Loading);
    assert!(engine.row_model().is_empty());

    engine.complete_reload(&back, Ok(payload_for("2024-01-01", "current week")));
    let titles: Vec<&str> = engine
        .row_model()
        .rows()
        .iter()
        .flat_map(|row| row.items.iter().map(|item| item.title.as_str()))
        .collect();
    assert_eq!(titles, vec!["current week"]);
}

#[test]
fn stale_failure_does_not_error_the_current_week() {
    let mut engine = build_engine();
    let first = engine.jump_to(NaiveDate::from_ymd_opt(2024, 5, 15).expect("date")).expect("jump");
    let second = engine.reload();

    engine.complete_reload(&second, Ok(SchedulePayload::new()));
    let outcome = engine.complete_reload(
        &first,
        Err(TimelineError::LoadFailure("timeout".to_owned())),
    );

    assert_eq!(outcome, ReloadOutcome::Stale);
    assert_eq!(engine.load_state(), LoadState::Loaded);
    assert_eq!(engine.error_message(), None);
    assert_eq!(engine.window().start_key(), "2024-05-13");
}

#[test]
fn failed_reload_clears_rows_and_surfaces_message() {
    let mut engine = build_engine();
    let ticket = engine.reload();
    engine.complete_reload(&ticket, Ok(payload_for("2024-01-01", "loaded")));
    assert_eq!(engine.row_model().item_count(), 1);

    let retry = engine.reload();
    engine.complete_reload(
        &retry,
        Err(TimelineError::LoadFailure("service returned 500".to_owned())),
    );

    assert_eq!(engine.load_state(), LoadState::Errored);
    assert_eq!(
        engine.error_message(),
        Some("schedule load failed: service returned 500")
    );
    let model = engine.row_model();
    assert!(model.is_errored());
    assert_eq!(model.rows().len(), 1);
    assert_eq!(model.unassigned_row().key, RowKey::Unassigned);
    assert!(model.is_empty());

    let frame = engine.frame();
    assert_eq!(frame.block_count(), 0);
    assert!(!frame.shows_empty_state());
    assert!(frame.error.is_some());
}

#[test]
fn empty_payload_yields_single_empty_unassigned_row() {
    let mut engine = build_engine();
    let ticket = engine.reload();
    engine.complete_reload(&ticket, Ok(SchedulePayload::new()));

    assert_eq!(engine.load_state(), LoadState::Loaded);
    let frame = engine.frame();
    assert_eq!(frame.rows.len(), 1);
    assert_eq!(frame.rows[0].display_name, "Unassigned");
    assert!(frame.rows[0].is_empty());
    assert_eq!(frame.rows[0].height_px, 70);
    assert!(frame.shows_empty_state());
    assert_eq!(frame.error, None);
}

#[test]
fn rows_keep_unassigned_first_then_collaborator_order() {
    let mut engine = build_engine();
    let ticket = engine.reload();
    let payload = SchedulePayload::new()
        .with_owner(OwnerId(3), "Zed", vec![ScheduleItem::task("z", "Z", 1, 1)])
        .with_owner(OwnerId(2), "Amy", Vec::new())
        .with_unassigned(vec![ScheduleItem::task("u", "U", 0, 7)]);
    engine.complete_reload(&ticket, Ok(payload));

    let names: Vec<&str> = engine
        .row_model()
        .rows()
        .iter()
        .map(|row| row.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["Unassigned", "Zed", "Amy"]);
}

#[test]
fn malformed_json_is_reported_as_load_failure() {
    let mut engine = build_engine();
    let ticket = engine.reload();
    let result = SchedulePayload::from_json_str("{\"employees\": 12}");
    assert!(matches!(result, Err(TimelineError::LoadFailure(_))));

    engine.complete_reload(&ticket, result);
    assert_eq!(engine.load_state(), LoadState::Errored);
}

#[test]
fn one_malformed_item_does_not_blank_the_week() {
    let mut engine = build_engine();
    let ticket = engine.reload();
    let json = r#"{
        "employees": [{
            "ownerId": 4,
            "name": "Ada",
            "tasks": [
                {"id": 1, "title": "Valid", "type": "task", "startOffset": 1, "span": 2},
                {"title": "No id", "startOffset": 0, "span": 1},
                {"id": "x-2", "title": "No geometry", "type": "personal"}
            ]
        }],
        "unassigned": []
    }"#;
    engine.complete_reload(&ticket, SchedulePayload::from_json_str(json));

    let model = engine.row_model();
    assert_eq!(engine.load_state(), LoadState::Loaded);
    assert_eq!(model.item_count(), 2);
    assert_eq!(model.skipped_items(), 1);
    assert_eq!(model.defaulted_items(), 1);
    assert!(engine.frame().validate().is_ok());
}

#[test]
fn wrong_typed_item_fields_are_defaulted_not_fatal() {
    let mut engine = build_engine();
    let ticket = engine.reload();
    let json = r#"{
        "employees": [{
            "ownerId": 4,
            "name": "Ada",
            "tasks": [
                {"id": 1, "title": "Valid", "type": "task", "startOffset": 1, "span": 2},
                {"id": 2, "title": "Standup", "type": "meeting", "startOffset": 3, "span": "3"},
                {"id": 2.5, "title": "Float id", "startOffset": 0, "span": 1},
                42
            ]
        }],
        "unassigned": []
    }"#;
    engine.complete_reload(&ticket, SchedulePayload::from_json_str(json));

    assert_eq!(engine.load_state(), LoadState::Loaded);
    let model = engine.row_model();
    assert_eq!(model.item_count(), 2);
    assert_eq!(model.skipped_items(), 2);
    assert_eq!(model.defaulted_items(), 1);

    let row = model.row(RowKey::Owner(OwnerId(4))).expect("owner row");
    let standup = row
        .items
        .iter()
        .find(|item| item.title == "Standup")
        .expect("standup kept");
    assert_eq!(standup.kind, ItemKind::Task);
    assert_eq!(standup.start_offset, 3);
    assert_eq!(standup.span, 1);
    assert!(engine.frame().validate().is_ok());
}

#[test]
fn single_employee_calendar_response_becomes_owner_row() {
    let mut engine = build_engine();
    let ticket = engine.reload();
    let json = r#"{
        "week_start": "2024-01-01",
        "week_end": "2024-01-07",
        "employee": {"employee_id": 5, "name": "Grace"},
        "items": [
            {"id": 31, "type": "assignment", "title": "Audit", "start_date": "2023-12-30",
             "end_date": "2024-01-02", "start_offset": 0, "span": 2},
            {"id": 8, "type": "personal", "title": "Dentist", "start_date": "2024-01-05",
             "end_date": "2024-01-05", "start_offset": 4, "span": 1}
        ]
    }"#;
    engine.complete_reload(&ticket, SchedulePayload::from_json_str(json));

    assert_eq!(engine.load_state(), LoadState::Loaded);
    let model = engine.row_model();
    assert_eq!(model.rows().len(), 2);
    assert!(model.unassigned_row().is_empty());

    let row = model.row(RowKey::Owner(OwnerId(5))).expect("employee row");
    assert_eq!(row.display_name, "Grace");
    assert_eq!(row.items.len(), 2);
    assert_eq!(row.items[1].kind, ItemKind::Personal);
    assert!(row.items.iter().all(|item| item.owner_id == Some(OwnerId(5))));

    let options = engine.owner_options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[1].owner_id, Some(OwnerId(5)));
}

#[test]
fn engine_requires_a_session_subject() {
    let anchor = NaiveDate::from_ymd_opt(2024, 1, 3).expect("valid date");
    let result = TimelineEngine::new(
        NullRenderer::default(),
        TimelineEngineConfig::default(),
        SessionContext::anonymous(),
        anchor,
    );
    assert!(matches!(result, Err(TimelineError::NoSession)));
}

#[test]
fn tickets_carry_subject_and_week_key() {
    let mut engine = build_engine();
    let ticket = engine.next_week().expect("next");
    assert_eq!(ticket.query().subject_id, SubjectId(1));
    assert_eq!(ticket.query().week_start_key, "2024-01-08");
    let later = engine.next_week().expect("next again");
    assert!(later.generation() > ticket.generation());
}
