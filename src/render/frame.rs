use serde::{Deserialize, Serialize};

use crate::api::LoadState;
use crate::core::{DayHeader, RowLayout, WeekWindow};
use crate::error::TimelineResult;

/// Backend-agnostic scene for one timeline draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    pub window: WeekWindow,
    pub range_label: String,
    pub headers: Vec<DayHeader>,
    pub rows: Vec<RowLayout>,
    pub load_state: LoadState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TimelineFrame {
    #[must_use]
    pub fn new(window: WeekWindow, load_state: LoadState) -> Self {
        Self {
            window,
            range_label: window.range_label(),
            headers: window.day_headers(),
            rows: Vec::new(),
            load_state,
            error: None,
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: RowLayout) -> Self {
        self.rows.push(row);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn validate(&self) -> TimelineResult<()> {
        for row in &self.rows {
            for block in &row.blocks {
                block.validate()?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.rows.iter().map(|row| row.blocks.len()).sum()
    }

    /// No blocks anywhere and no error: the view shows its empty-state indicator.
    #[must_use]
    pub fn shows_empty_state(&self) -> bool {
        self.error.is_none() && self.block_count() == 0
    }

    /// Total pixel height of all row containers.
    #[must_use]
    pub fn content_height_px(&self) -> u64 {
        self.rows.iter().map(|row| u64::from(row.height_px)).sum()
    }
}
