pub mod lane_packer;
pub mod layout;
pub mod payload;
pub mod row_model;
pub mod types;
pub mod week_window;

pub use lane_packer::{LanePolicy, LaneSlot, PackedRow, pack_lanes};
pub use layout::{
    LayoutBlock, LayoutConstants, RowLayout, WidthClipPolicy, layout_row, project_horizontal,
    project_item,
};
pub use payload::{
    OwnerOption, OwnerRef, OwnerSchedulePayload, RawScheduleItem, Sanitized, SchedulePayload,
};
pub use row_model::{Row, RowModel};
pub use types::{ItemId, ItemKind, OwnerId, RowKey, ScheduleItem, SubjectId};
pub use week_window::{
    DAYS_PER_WEEK, DayHeader, WeekWindow, add_days, format_date_key, month_day_label,
    parse_date_key, week_start, weekday_day_label,
};
