use serde::{Deserialize, Serialize};

use crate::core::{LanePolicy, LayoutConstants, WidthClipPolicy};
use crate::error::{TimelineError, TimelineResult};

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist layout preferences
/// without inventing their own format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEngineConfig {
    #[serde(default)]
    pub layout: LayoutConstants,
    #[serde(default)]
    pub lane_policy: LanePolicy,
    #[serde(default)]
    pub width_policy: WidthClipPolicy,
    #[serde(default = "default_unassigned_label")]
    pub unassigned_label: String,
}

impl Default for TimelineEngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConstants::default(),
            lane_policy: LanePolicy::default(),
            width_policy: WidthClipPolicy::default(),
            unassigned_label: default_unassigned_label(),
        }
    }
}

impl TimelineEngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConstants) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_lane_policy(mut self, policy: LanePolicy) -> Self {
        self.lane_policy = policy;
        self
    }

    #[must_use]
    pub fn with_width_policy(mut self, policy: WidthClipPolicy) -> Self {
        self.width_policy = policy;
        self
    }

    #[must_use]
    pub fn with_unassigned_label(mut self, label: impl Into<String>) -> Self {
        self.unassigned_label = label.into();
        self
    }

    pub fn validate(self) -> TimelineResult<Self> {
        self.layout.validate()?;
        if self.unassigned_label.trim().is_empty() {
            return Err(TimelineError::InvalidData(
                "unassigned row label must not be blank".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| TimelineError::InvalidData(format!("failed to parse engine config: {e}")))?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize engine config: {e}"))
        })
    }
}

fn default_unassigned_label() -> String {
    "Unassigned".to_owned()
}
