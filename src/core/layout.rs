use serde::{Deserialize, Serialize};

use crate::core::lane_packer::{LanePolicy, pack_lanes};
use crate::core::week_window::DAYS_PER_WEEK;
use crate::core::{ItemId, ItemKind, Row, RowKey, ScheduleItem};
use crate::error::{TimelineError, TimelineResult};

const DAYS: f64 = DAYS_PER_WEEK as f64;

/// Pixel constants for vertical placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConstants {
    pub min_height: u32,
    pub lane_height: u32,
    pub lane_gap: u32,
    pub base_offset: u32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            min_height: 70,
            lane_height: 44,
            lane_gap: 8,
            base_offset: 10,
        }
    }
}

impl LayoutConstants {
    pub(crate) fn validate(self) -> TimelineResult<Self> {
        if self.lane_height == 0 {
            return Err(TimelineError::InvalidData(
                "layout lane_height must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn lane_pitch(self) -> u32 {
        self.lane_height.saturating_add(self.lane_gap)
    }

    #[must_use]
    pub fn lane_top(self, lane_index: usize) -> u32 {
        let lane = u32::try_from(lane_index).unwrap_or(u32::MAX);
        self.base_offset
            .saturating_add(lane.saturating_mul(self.lane_pitch()))
    }

    /// `max(min_height, base_offset + lanes * (lane_height + lane_gap))`.
    #[must_use]
    pub fn row_height(self, lane_count: usize) -> u32 {
        self.lane_top(lane_count).max(self.min_height)
    }
}

/// How block width is derived when an item starts before the visible Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WidthClipPolicy {
    /// Width covers only the days inside the window.
    #[default]
    ClipToWindow,
    /// `min(span / 7 * 100, 100 - left)`: left is clamped but width uses the
    /// unclamped ratio, understating the visible part of early-starting items.
    Legacy,
}

/// Render contract for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBlock {
    pub row: RowKey,
    pub item_id: ItemId,
    pub title: String,
    pub kind: ItemKind,
    pub lane_index: usize,
    pub left_percent: f64,
    pub width_percent: f64,
    pub top_px: u32,
    pub height_px: u32,
}

impl LayoutBlock {
    pub fn validate(&self) -> TimelineResult<()> {
        let horizontal_ok = self.left_percent.is_finite()
            && self.width_percent.is_finite()
            && (0.0..=100.0).contains(&self.left_percent)
            && self.width_percent >= 0.0
            && self.left_percent + self.width_percent <= 100.0 + 1e-9;
        if !horizontal_ok {
            return Err(TimelineError::InvalidData(format!(
                "block `{}` leaves the week grid: left={} width={}",
                self.item_id, self.left_percent, self.width_percent
            )));
        }
        Ok(())
    }
}

/// Render-ready geometry for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLayout {
    pub key: RowKey,
    pub display_name: String,
    pub height_px: u32,
    pub lane_count: usize,
    pub blocks: Vec<LayoutBlock>,
}

impl RowLayout {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Horizontal placement `(left, width)` in percent of the week for one item.
#[must_use]
pub fn project_horizontal(start_offset: i64, span: i64, policy: WidthClipPolicy) -> (f64, f64) {
    let left = (start_offset as f64 / DAYS * 100.0).clamp(0.0, 100.0);
    let width = match policy {
        WidthClipPolicy::Legacy => span as f64 / DAYS * 100.0,
        WidthClipPolicy::ClipToWindow => {
            let visible_start = start_offset.clamp(0, DAYS_PER_WEEK);
            let visible_end = start_offset.saturating_add(span).clamp(0, DAYS_PER_WEEK);
            (visible_end - visible_start).max(0) as f64 / DAYS * 100.0
        }
    };
    (left, width.clamp(0.0, 100.0 - left))
}

/// Projects one laned item onto the grid.
#[must_use]
pub fn project_item(
    row: RowKey,
    item: &ScheduleItem,
    lane_index: usize,
    constants: LayoutConstants,
    policy: WidthClipPolicy,
) -> LayoutBlock {
    let (left_percent, width_percent) = project_horizontal(item.start_offset, item.span, policy);
    LayoutBlock {
        row,
        item_id: item.id.clone(),
        title: item.title.clone(),
        kind: item.kind,
        lane_index,
        left_percent,
        width_percent,
        top_px: constants.lane_top(lane_index),
        height_px: constants.lane_height,
    }
}

/// Packs and projects a whole row. Blocks come out in stacking order.
#[must_use]
pub fn layout_row(
    row: &Row,
    constants: LayoutConstants,
    lane_policy: LanePolicy,
    width_policy: WidthClipPolicy,
) -> RowLayout {
    let packed = pack_lanes(&row.items, lane_policy);
    let blocks = packed
        .entries
        .iter()
        .map(|(item, lane)| project_item(row.key, item, *lane, constants, width_policy))
        .collect();

    RowLayout {
        key: row.key,
        display_name: row.display_name.clone(),
        height_px: constants.row_height(packed.lane_count),
        lane_count: packed.lane_count,
        blocks,
    }
}
