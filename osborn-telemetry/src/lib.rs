//! Osborn Telemetry - Timing and Logging
//!
//! - [`Timer`]: two-phase named measurements keyed by unique handles, so
//!   concurrent measurements of the same name never collide.
//! - [`init_tracing`]: installs the process-wide `tracing` subscriber.

mod timer;
mod tracer;

pub use timer::{Measurement, Timer, TimerHandle};
pub use tracer::{init_tracing, LogFormat, TelemetryError, TracingConfig};
