//! Osborn Events - Analytics Event Log
//!
//! An append-only, size-bounded buffer of named, timestamped events with
//! open-ended properties. The log is an explicit instance owned by the
//! composing application; there is no process-wide default.
//!
//! # Retention
//!
//! Once the buffer holds more than [`MAX_EVENTS`] events it is cut back to
//! the newest [`RETAINED_EVENTS`] in a single step:
//!
//! ```text
//! append #1001 → [e1 .. e1001] → keep [e502 .. e1001]
//! ```

mod event;
mod event_log;
mod report;

pub use event::{AnalyticsEvent, Properties};
pub use event_log::{EventLog, MAX_EVENTS, PAGE_VIEW_EVENT, RETAINED_EVENTS, USER_ACTION_EVENT};
pub use report::{AnalyticsReport, TimeRange};
