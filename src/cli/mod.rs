//! CLI module for the kitchen timer.
//!
//! This module provides the command-line surface:
//! - `commands`: Argument definitions using clap derive
//! - `console`: Line commands read from stdin while the timer runs

pub mod commands;
pub mod console;

pub use commands::{Cli, Commands, RunArgs};
pub use console::ConsoleCommand;
