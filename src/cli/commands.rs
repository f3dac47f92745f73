//! Command definitions for the kitchen-timer CLI.
//!
//! Uses clap derive macro for argument parsing. Duration flags carry range
//! validators, so an invalid configuration is rejected before the timer is
//! constructed.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::types::TimerConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Kitchen timer console host
#[derive(Parser, Debug)]
#[command(
    name = "kitchen-timer",
    version,
    about = "Countdown timer with sink publishing and home-automation sync",
    long_about = "Hosts one countdown timer on a cooperative scheduler.\n\
                  Published values go to stdout, lifecycle events go to the \
                  log, and actions are read line by line from stdin.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a timer behind an interactive console
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Countdown tick cadence in milliseconds (10-60000)
    #[arg(
        long,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(10..=60_000)
    )]
    pub tick_interval_ms: u64,

    /// Sink/peer sync cadence in milliseconds (10-600000)
    #[arg(
        long,
        default_value = "5000",
        value_parser = clap::value_parser!(u64).range(10..=600_000)
    )]
    pub sync_interval_ms: u64,

    /// Ceiling clamped onto every requested duration, in seconds (1-604800)
    #[arg(
        long,
        default_value = "7200",
        value_parser = clap::value_parser!(u32).range(1..=604_800)
    )]
    pub max_duration_seconds: u32,

    /// Duration pre-armed at boot without starting the countdown
    #[arg(long, default_value = "0")]
    pub initial_set_seconds: u32,

    /// Disable reconciliation with the home-automation peer
    #[arg(long)]
    pub no_ha_sync: bool,
}

impl RunArgs {
    /// Builds the timer configuration these arguments describe.
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig::default()
            .with_tick_interval(Duration::from_millis(self.tick_interval_ms))
            .with_sync_interval(Duration::from_millis(self.sync_interval_ms))
            .with_max_duration_seconds(self.max_duration_seconds)
            .with_initial_set_seconds(self.initial_set_seconds)
            .with_ha_sync(!self.no_ha_sync)
    }
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            sync_interval_ms: 5000,
            max_duration_seconds: 7200,
            initial_set_seconds: 0,
            no_ha_sync: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
