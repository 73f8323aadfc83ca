use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ItemId, ScheduleItem};

/// Vertical stacking policy for items within one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LanePolicy {
    /// Every item gets its own lane, ordered by `(span, start_offset)`.
    ///
    /// A row with N items always reserves N lanes even when nothing overlaps.
    #[default]
    PerItem,
    /// Greedy interval packing: items ordered by `(start_offset, span)` take the
    /// lowest lane whose previous occupant ended on or before their start day.
    OverlapAware,
}

/// Lane assignment for one item, unique per item within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneSlot {
    pub item_id: ItemId,
    pub lane_index: usize,
}

/// A row's items in stacking order with their lanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRow<'a> {
    pub entries: Vec<(&'a ScheduleItem, usize)>,
    pub lane_count: usize,
}

impl PackedRow<'_> {
    #[must_use]
    pub fn slots(&self) -> Vec<LaneSlot> {
        self.entries
            .iter()
            .map(|(item, lane_index)| LaneSlot {
                item_id: item.id.clone(),
                lane_index: *lane_index,
            })
            .collect()
    }
}

/// Orders `items` and assigns lanes.
///
/// Sorting is stable, so equal keys keep input order and repeated packing of
/// the same slice yields identical lanes.
#[must_use]
pub fn pack_lanes(items: &[ScheduleItem], policy: LanePolicy) -> PackedRow<'_> {
    let mut ordered: Vec<&ScheduleItem> = items.iter().collect();

    match policy {
        LanePolicy::PerItem => {
            ordered.sort_by_key(|item| (item.span, item.start_offset));
            let lane_count = ordered.len();
            PackedRow {
                entries: ordered.into_iter().enumerate().map(|(lane, item)| (item, lane)).collect(),
                lane_count,
            }
        }
        LanePolicy::OverlapAware => {
            ordered.sort_by_key(|item| (item.start_offset, item.span));
            // Exclusive end offset of the last item placed in each lane.
            let mut lane_ends: SmallVec<[i64; 8]> = SmallVec::new();
            let mut entries = Vec::with_capacity(ordered.len());
            for item in ordered {
                let lane = match lane_ends.iter().position(|end| *end <= item.start_offset) {
                    Some(lane) => {
                        lane_ends[lane] = item.end_offset();
                        lane
                    }
                    None => {
                        lane_ends.push(item.end_offset());
                        lane_ends.len() - 1
                    }
                };
                entries.push((item, lane));
            }
            PackedRow {
                entries,
                lane_count: lane_ends.len(),
            }
        }
    }
}
