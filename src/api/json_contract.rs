use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};
use crate::render::{Renderer, TimelineFrame};

use super::TimelineEngine;

pub const TIMELINE_FRAME_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineFrameJsonContractV1 {
    pub schema_version: u32,
    pub frame: TimelineFrame,
}

impl TimelineFrame {
    pub fn to_json_contract_v1_pretty(&self) -> TimelineResult<String> {
        let payload = TimelineFrameJsonContractV1 {
            schema_version: TIMELINE_FRAME_JSON_SCHEMA_V1,
            frame: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize frame contract v1: {e}"))
        })
    }

    /// Accepts either a bare frame or a versioned v1 contract.
    pub fn from_json_compat_str(input: &str) -> TimelineResult<Self> {
        if let Ok(frame) = serde_json::from_str::<TimelineFrame>(input) {
            return Ok(frame);
        }
        let payload: TimelineFrameJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse frame json payload: {e}"))
        })?;
        if payload.schema_version != TIMELINE_FRAME_JSON_SCHEMA_V1 {
            return Err(TimelineError::InvalidData(format!(
                "unsupported frame schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.frame)
    }
}

impl<R: Renderer> TimelineEngine<R> {
    pub fn frame_json_contract_v1_pretty(&self) -> TimelineResult<String> {
        self.frame().to_json_contract_v1_pretty()
    }
}
