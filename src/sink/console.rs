//! Console sinks for the interactive host.

use crate::sink::{BinarySink, NumericSink, TextSink};

/// Sink that prints published values to stdout as `<name> = <value>` lines.
///
/// One instance per published field; the name distinguishes the lines.
/// Implements all three sink traits so one type covers every registry slot.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    name: String,
}

impl ConsoleSink {
    /// Creates a console sink labelled with the given field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the field name this sink prints under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn print(&self, value: impl std::fmt::Display) {
        println!("{} = {}", self.name, value);
    }
}

impl TextSink for ConsoleSink {
    fn publish(&self, value: &str) {
        self.print(value);
    }
}

impl NumericSink for ConsoleSink {
    fn publish(&self, value: u32) {
        self.print(value);
    }
}

impl BinarySink for ConsoleSink {
    fn publish(&self, value: bool) {
        self.print(value);
    }
}
