mod engine;
mod engine_config;
mod in_memory_source;
mod json_contract;
mod navigation;
mod source;

pub use engine::TimelineEngine;
pub use engine_config::TimelineEngineConfig;
pub use in_memory_source::InMemoryScheduleSource;
pub use json_contract::{TIMELINE_FRAME_JSON_SCHEMA_V1, TimelineFrameJsonContractV1};
pub use navigation::{LoadState, NavigationController, ReloadOutcome, ReloadTicket};
pub use source::{
    ScheduleItemDraft, ScheduleQuery, ScheduleSource, SessionContext, ValidatedScheduleItem,
};
