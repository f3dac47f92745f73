//! Output sinks for published timer values.
//!
//! This module provides:
//!
//! - Typed sink traits for text, numeric, and boolean values
//! - A registry wiring each published field to an optional sink
//! - Console sinks for the interactive host
//! - Mock sinks for testing
//!
//! Sinks are one-way consumers: publishing cannot fail and returns nothing.
//! Every slot in the registry is optional; publishing to an absent slot is
//! a no-op.

use std::fmt;
use std::sync::{Arc, Mutex};

mod console;

pub use console::ConsoleSink;

// ============================================================================
// Sink Traits
// ============================================================================

/// Trait for text-valued sinks.
///
/// Carries the state label (`idle`, `running`, `paused`, `finished`,
/// `overdue`).
pub trait TextSink: Send {
    /// Publishes a new text value.
    fn publish(&self, value: &str);
}

/// Trait for numeric sinks.
///
/// Carries the remaining-seconds and set-seconds values.
pub trait NumericSink: Send {
    /// Publishes a new numeric value.
    fn publish(&self, value: u32);
}

/// Trait for boolean sinks.
///
/// Carries the running, paused, and overdue flags.
pub trait BinarySink: Send {
    /// Publishes a new boolean value.
    fn publish(&self, value: bool);
}

// ============================================================================
// Sinks Registry
// ============================================================================

/// Registry of output sinks, one optional slot per published field.
#[derive(Default)]
pub struct Sinks {
    state: Option<Box<dyn TextSink>>,
    remaining_seconds: Option<Box<dyn NumericSink>>,
    set_seconds: Option<Box<dyn NumericSink>>,
    running: Option<Box<dyn BinarySink>>,
    paused: Option<Box<dyn BinarySink>>,
    overdue: Option<Box<dyn BinarySink>>,
}

impl Sinks {
    /// Creates an empty registry with no sinks wired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the state-label sink.
    #[must_use]
    pub fn with_state(mut self, sink: Box<dyn TextSink>) -> Self {
        self.state = Some(sink);
        self
    }

    /// Wires the remaining-seconds sink.
    #[must_use]
    pub fn with_remaining_seconds(mut self, sink: Box<dyn NumericSink>) -> Self {
        self.remaining_seconds = Some(sink);
        self
    }

    /// Wires the set-seconds sink.
    #[must_use]
    pub fn with_set_seconds(mut self, sink: Box<dyn NumericSink>) -> Self {
        self.set_seconds = Some(sink);
        self
    }

    /// Wires the running-flag sink.
    #[must_use]
    pub fn with_running(mut self, sink: Box<dyn BinarySink>) -> Self {
        self.running = Some(sink);
        self
    }

    /// Wires the paused-flag sink.
    #[must_use]
    pub fn with_paused(mut self, sink: Box<dyn BinarySink>) -> Self {
        self.paused = Some(sink);
        self
    }

    /// Wires the overdue-flag sink.
    #[must_use]
    pub fn with_overdue(mut self, sink: Box<dyn BinarySink>) -> Self {
        self.overdue = Some(sink);
        self
    }

    /// Publishes the state label if a sink is wired.
    pub fn publish_state(&self, value: &str) {
        if let Some(sink) = &self.state {
            sink.publish(value);
        }
    }

    /// Publishes the remaining seconds if a sink is wired.
    pub fn publish_remaining_seconds(&self, value: u32) {
        if let Some(sink) = &self.remaining_seconds {
            sink.publish(value);
        }
    }

    /// Publishes the set seconds if a sink is wired.
    pub fn publish_set_seconds(&self, value: u32) {
        if let Some(sink) = &self.set_seconds {
            sink.publish(value);
        }
    }

    /// Publishes the running flag if a sink is wired.
    pub fn publish_running(&self, value: bool) {
        if let Some(sink) = &self.running {
            sink.publish(value);
        }
    }

    /// Publishes the paused flag if a sink is wired.
    pub fn publish_paused(&self, value: bool) {
        if let Some(sink) = &self.paused {
            sink.publish(value);
        }
    }

    /// Publishes the overdue flag if a sink is wired.
    pub fn publish_overdue(&self, value: bool) {
        if let Some(sink) = &self.overdue {
            sink.publish(value);
        }
    }
}

impl fmt::Debug for Sinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sinks")
            .field("state", &self.state.is_some())
            .field("remaining_seconds", &self.remaining_seconds.is_some())
            .field("set_seconds", &self.set_seconds.is_some())
            .field("running", &self.running.is_some())
            .field("paused", &self.paused.is_some())
            .field("overdue", &self.overdue.is_some())
            .finish()
    }
}

// ============================================================================
// Mock Sinks
// ============================================================================

/// Mock text sink recording every published value.
///
/// Clones share the same recording, so a clone kept by the test still sees
/// values published through the boxed copy inside a registry.
#[derive(Debug, Default, Clone)]
pub struct MockTextSink {
    values: Arc<Mutex<Vec<String>>>,
}

impl MockTextSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every value published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<String> {
        self.values.lock().unwrap().clone()
    }

    #[must_use]
    pub fn publish_count(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.values.lock().unwrap().clear();
    }
}

impl TextSink for MockTextSink {
    fn publish(&self, value: &str) {
        self.values.lock().unwrap().push(value.to_string());
    }
}

/// Mock numeric sink recording every published value.
#[derive(Debug, Default, Clone)]
pub struct MockNumericSink {
    values: Arc<Mutex<Vec<u32>>>,
}

impl MockNumericSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every value published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<u32> {
        self.values.lock().unwrap().clone()
    }

    #[must_use]
    pub fn publish_count(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.values.lock().unwrap().clear();
    }
}

impl NumericSink for MockNumericSink {
    fn publish(&self, value: u32) {
        self.values.lock().unwrap().push(value);
    }
}

/// Mock boolean sink recording every published value.
#[derive(Debug, Default, Clone)]
pub struct MockBinarySink {
    values: Arc<Mutex<Vec<bool>>>,
}

impl MockBinarySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every value published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<bool> {
        self.values.lock().unwrap().clone()
    }

    #[must_use]
    pub fn publish_count(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.values.lock().unwrap().clear();
    }
}

impl BinarySink for MockBinarySink {
    fn publish(&self, value: bool) {
        self.values.lock().unwrap().push(value);
    }
}

// ============================================================================
// Tests
// ============================================================================
