//! Kitchen Timer Library
//!
//! This library provides the core functionality for the kitchen timer host.
//! It includes:
//! - Countdown state machine with drift-corrected ticking
//! - Sink registry publishing derived timer values on change
//! - Home-automation peer reconciliation and write-back
//! - Cooperative scheduler multiplexing ticks, syncs, and host requests
//! - CLI argument and console command parsing
//! - Type definitions for configuration, actions, and snapshots

pub mod cli;
pub mod peer;
pub mod scheduler;
pub mod sink;
pub mod sync;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ConfigError, TimerAction, TimerConfig, TimerSnapshot, TimerState,
};

// Re-export timer types
pub use timer::{
    ActionOutcome, ActionSource, Clock, ManualClock, MonotonicClock, TimerCore, TimerEvent,
};

// Re-export sink types
pub use sink::{
    BinarySink, ConsoleSink, MockBinarySink, MockNumericSink, MockTextSink, NumericSink, Sinks,
    TextSink,
};

// Re-export peer types
pub use peer::{HaPeer, PeerError, PeerState, SharedPeer};

// Re-export publisher and scheduler types
pub use scheduler::{Scheduler, SchedulerRequest};
pub use sync::SyncPublisher;
