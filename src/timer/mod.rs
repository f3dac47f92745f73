//! Timer module for countdown state and time measurement
//!
//! This module provides:
//! - The countdown state machine and its lifecycle events
//! - A clock abstraction for monotonic time injection

pub mod clock;
pub mod core;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use core::{ActionOutcome, ActionSource, TimerCore, TimerEvent};
