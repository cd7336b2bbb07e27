//! Two-phase timing instrumentation.
//!
//! ```text
//! start("rank") ──→ handle ──→ end(handle, "rank") ──→ Measurement
//!                                  │
//!                      unknown handle: warn, 0
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;
use osborn_core::{new_entity_id, EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Identifies one open measurement. Unique even for repeated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(EntityId);

impl TimerHandle {
    fn new() -> Self {
        Self(new_entity_id())
    }

    pub fn as_uuid(&self) -> EntityId {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A completed measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub handle: TimerHandle,
    pub name: String,
    pub duration: Duration,
    /// Wall-clock time the measurement ended.
    pub timestamp: Timestamp,
}

#[derive(Debug)]
struct OpenTimer {
    name: String,
    started: Instant,
}

#[derive(Debug, Default)]
struct TimerState {
    open: HashMap<TimerHandle, OpenTimer>,
    completed: Vec<Measurement>,
}

/// Registry of open and completed measurements.
///
/// Elapsed time comes from the monotonic clock; only the completion
/// timestamp uses wall-clock time.
#[derive(Debug, Default)]
pub struct Timer {
    state: Mutex<TimerState>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a measurement and return its handle.
    pub fn start(&self, name: &str) -> TimerHandle {
        let handle = TimerHandle::new();
        self.lock().open.insert(
            handle,
            OpenTimer {
                name: name.to_string(),
                started: Instant::now(),
            },
        );
        handle
    }

    /// Close the measurement behind `handle` and return its duration.
    ///
    /// An unknown or already-ended handle is logged and yields
    /// `Duration::ZERO`; nothing is recorded.
    pub fn end(&self, handle: TimerHandle, name: &str) -> Duration {
        let mut state = self.lock();
        let Some(open) = state.open.remove(&handle) else {
            tracing::warn!(%handle, timer_name = name, "timer not found");
            return Duration::ZERO;
        };

        let duration = open.started.elapsed();
        if open.name != name {
            tracing::debug!(%handle, started_as = %open.name, ended_as = name, "timer renamed at end");
        }
        state.completed.push(Measurement {
            handle,
            name: name.to_string(),
            duration,
            timestamp: Utc::now(),
        });
        duration
    }

    /// Time `f` under `name`.
    pub fn measure<R>(&self, name: &str, f: impl FnOnce() -> R) -> (R, Duration) {
        let handle = self.start(name);
        let result = f();
        let duration = self.end(handle, name);
        (result, duration)
    }

    /// Snapshot copy of completed measurements in completion order.
    pub fn metrics(&self) -> Vec<Measurement> {
        self.lock().completed.clone()
    }

    /// Number of measurements started but not yet ended.
    pub fn open_count(&self) -> usize {
        self.lock().open.len()
    }

    /// Forget all open and completed measurements.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.open.clear();
        state.completed.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================
