use week_timeline::TimelineError;
use week_timeline::api::TimelineEngineConfig;
use week_timeline::core::{LanePolicy, LayoutConstants, WidthClipPolicy};

#[test]
fn defaults_match_reference_layout() {
    let config = TimelineEngineConfig::default();
    assert_eq!(
        config.layout,
        LayoutConstants {
            min_height: 70,
            lane_height: 44,
            lane_gap: 8,
            base_offset: 10,
        }
    );
    assert_eq!(config.lane_policy, LanePolicy::PerItem);
    assert_eq!(config.width_policy, WidthClipPolicy::ClipToWindow);
    assert_eq!(config.unassigned_label, "Unassigned");
}

#[test]
fn partial_json_fills_in_defaults() {
    let config = TimelineEngineConfig::from_json_str(
        r#"{"lane_policy": "overlap_aware", "layout": {"minHeight": 90, "laneHeight": 30, "laneGap": 4, "baseOffset": 6}}"#,
    )
    .expect("parse config");
    assert_eq!(config.lane_policy, LanePolicy::OverlapAware);
    assert_eq!(config.width_policy, WidthClipPolicy::ClipToWindow);
    assert_eq!(config.layout.row_height(2), 90);
    assert_eq!(config.unassigned_label, "Unassigned");
}

#[test]
fn config_roundtrips_through_json() {
    let config = TimelineEngineConfig::new()
        .with_width_policy(WidthClipPolicy::Legacy)
        .with_unassigned_label("Open shifts");
    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(
        TimelineEngineConfig::from_json_str(&json).expect("parse"),
        config
    );
}

#[test]
fn invalid_configs_are_rejected() {
    let zero_lane = TimelineEngineConfig::new().with_layout(LayoutConstants {
        lane_height: 0,
        ..LayoutConstants::default()
    });
    assert!(matches!(
        zero_lane.validate(),
        Err(TimelineError::InvalidData(_))
    ));

    let blank_label = TimelineEngineConfig::new().with_unassigned_label("  ");
    assert!(blank_label.validate().is_err());

    assert!(TimelineEngineConfig::from_json_str("{\"lane_policy\": \"zigzag\"}").is_err());
}
