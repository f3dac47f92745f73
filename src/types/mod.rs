//! Core data types for the kitchen timer.
//!
//! This module defines the data structures used for:
//! - Timer state representation
//! - Timer configuration with validation
//! - Read-only state snapshots handed to publishers and status queries

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// No countdown armed or in progress
    Idle,
    /// Counting down
    Running,
    /// Countdown frozen, remaining time preserved
    Paused,
    /// Countdown reached zero
    Finished,
    /// Remained finished past the overdue window without a new start
    Overdue,
}

impl TimerState {
    /// Returns the string representation of the state, as published to the
    /// state text sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
            TimerState::Overdue => "overdue",
        }
    }

    /// Returns true if the timer is actively counting down.
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        matches!(self, TimerState::Paused)
    }

    /// Returns true if the timer finished and was left unattended.
    pub fn is_overdue(&self) -> bool {
        matches!(self, TimerState::Overdue)
    }

    /// Returns true if a new countdown may be started from this state.
    pub fn can_start(&self) -> bool {
        matches!(
            self,
            TimerState::Idle | TimerState::Finished | TimerState::Overdue
        )
    }
}

impl Default for TimerState {
    fn default() -> Self {
        TimerState::Idle
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration for a timer instance.
///
/// Consumed once at construction; cadences are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Cadence at which the scheduler advances the countdown
    pub tick_interval: Duration,
    /// Cadence at which derived state is republished and reconciled
    pub sync_interval: Duration,
    /// Ceiling applied to every requested duration, in seconds
    pub max_duration_seconds: u32,
    /// Duration pre-armed at construction without starting, in seconds
    pub initial_set_seconds: u32,
    /// Whether to reconcile with the home-automation peer during sync
    pub enable_ha_sync: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            sync_interval: Duration::from_millis(5000),
            max_duration_seconds: 7200,
            initial_set_seconds: 0,
            enable_ha_sync: true,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified tick cadence.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Creates a new configuration with the specified sync cadence.
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Creates a new configuration with the specified duration ceiling.
    pub fn with_max_duration_seconds(mut self, seconds: u32) -> Self {
        self.max_duration_seconds = seconds;
        self
    }

    /// Creates a new configuration with a duration pre-armed at boot.
    pub fn with_initial_set_seconds(mut self, seconds: u32) -> Self {
        self.initial_set_seconds = seconds;
        self
    }

    /// Creates a new configuration with peer reconciliation toggled.
    pub fn with_ha_sync(mut self, enabled: bool) -> Self {
        self.enable_ha_sync = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// Must pass before a timer is constructed from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.sync_interval.is_zero() {
            return Err(ConfigError::ZeroSyncInterval);
        }
        if self.max_duration_seconds == 0 {
            return Err(ConfigError::ZeroMaxDuration);
        }
        Ok(())
    }

    /// Returns the sync cadence actually used by the scheduler.
    ///
    /// Syncing more often than the countdown advances cannot observe
    /// anything new, so the configured sync interval is floored at the
    /// tick interval.
    pub fn effective_sync_interval(&self) -> Duration {
        self.sync_interval.max(self.tick_interval)
    }
}

/// Configuration validation errors.
///
/// Raised outside the timer core, before construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Tick interval was zero
    #[error("tick interval must be a positive duration")]
    ZeroTickInterval,
    /// Sync interval was zero
    #[error("sync interval must be a positive duration")]
    ZeroSyncInterval,
    /// Max duration was zero
    #[error("max duration must be a positive number of seconds")]
    ZeroMaxDuration,
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Point-in-time view of a timer's observable state.
///
/// This is the read surface for the sync publisher and for host status
/// queries; whole seconds only, sub-second bookkeeping stays internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current state
    pub state: TimerState,
    /// Remaining whole seconds, rounded up
    pub remaining_seconds: u32,
    /// Most recently requested duration in seconds
    pub set_seconds: u32,
    /// Derived: state == Running
    pub running: bool,
    /// Derived: state == Paused
    pub paused: bool,
    /// Derived: state == Overdue
    pub overdue: bool,
}

// ============================================================================
// TimerAction
// ============================================================================

/// An action requested against the timer by the host or automation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Start a countdown, optionally with a fresh duration
    Start {
        /// Duration in seconds; when absent the armed `set_seconds` is used
        seconds: Option<u32>,
    },
    /// Freeze the running countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Abort the countdown and return to idle
    Cancel,
    /// Arm a duration for the next start
    SetSeconds {
        /// Duration in seconds
        seconds: u32,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(TimerState::default(), TimerState::Idle);
        }

        #[test]
        fn test_as_str() {
            assert_eq!(TimerState::Idle.as_str(), "idle");
            assert_eq!(TimerState::Running.as_str(), "running");
            assert_eq!(TimerState::Paused.as_str(), "paused");
            assert_eq!(TimerState::Finished.as_str(), "finished");
            assert_eq!(TimerState::Overdue.as_str(), "overdue");
        }

        #[test]
        fn test_is_running() {
            assert!(TimerState::Running.is_running());
            assert!(!TimerState::Idle.is_running());
            assert!(!TimerState::Paused.is_running());
            assert!(!TimerState::Finished.is_running());
            assert!(!TimerState::Overdue.is_running());
        }

        #[test]
        fn test_is_paused() {
            assert!(TimerState::Paused.is_paused());
            assert!(!TimerState::Running.is_paused());
        }

        #[test]
        fn test_is_overdue() {
            assert!(TimerState::Overdue.is_overdue());
            assert!(!TimerState::Finished.is_overdue());
        }

        #[test]
        fn test_can_start() {
            assert!(TimerState::Idle.can_start());
            assert!(TimerState::Finished.can_start());
            assert!(TimerState::Overdue.can_start());
            assert!(!TimerState::Running.can_start());
            assert!(!TimerState::Paused.can_start());
        }

        #[test]
        fn test_serialize_deserialize() {
            let state = TimerState::Running;
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, "\"running\"");

            let deserialized: TimerState = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, TimerState::Running);
        }

        #[test]
        fn test_serde_labels_match_as_str() {
            for state in [
                TimerState::Idle,
                TimerState::Running,
                TimerState::Paused,
                TimerState::Finished,
                TimerState::Overdue,
            ] {
                let json = serde_json::to_string(&state).unwrap();
                assert_eq!(json, format!("\"{}\"", state.as_str()));
            }
        }
    }

    // ------------------------------------------------------------------------
    // TimerConfig Tests
    // ------------------------------------------------------------------------

    mod timer_config_tests {
        use super::*;

        #[test]
        fn test_default_values() {
            let config = TimerConfig::default();
            assert_eq!(config.tick_interval, Duration::from_millis(1000));
            assert_eq!(config.sync_interval, Duration::from_millis(5000));
            assert_eq!(config.max_duration_seconds, 7200);
            assert_eq!(config.initial_set_seconds, 0);
            assert!(config.enable_ha_sync);
        }

        #[test]
        fn test_builder_pattern() {
            let config = TimerConfig::default()
                .with_tick_interval(Duration::from_millis(250))
                .with_sync_interval(Duration::from_millis(1500))
                .with_max_duration_seconds(600)
                .with_initial_set_seconds(30)
                .with_ha_sync(false);

            assert_eq!(config.tick_interval, Duration::from_millis(250));
            assert_eq!(config.sync_interval, Duration::from_millis(1500));
            assert_eq!(config.max_duration_seconds, 600);
            assert_eq!(config.initial_set_seconds, 30);
            assert!(!config.enable_ha_sync);
        }

        #[test]
        fn test_validate_success() {
            assert!(TimerConfig::default().validate().is_ok());
        }

        #[test]
        fn test_validate_zero_tick_interval() {
            let config = TimerConfig::default().with_tick_interval(Duration::ZERO);
            assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
        }

        #[test]
        fn test_validate_zero_sync_interval() {
            let config = TimerConfig::default().with_sync_interval(Duration::ZERO);
            assert_eq!(config.validate(), Err(ConfigError::ZeroSyncInterval));
        }

        #[test]
        fn test_validate_zero_max_duration() {
            let config = TimerConfig::default().with_max_duration_seconds(0);
            assert_eq!(config.validate(), Err(ConfigError::ZeroMaxDuration));
        }

        #[test]
        fn test_effective_sync_interval_uses_configured_value() {
            let config = TimerConfig::default()
                .with_tick_interval(Duration::from_millis(1000))
                .with_sync_interval(Duration::from_millis(5000));
            assert_eq!(
                config.effective_sync_interval(),
                Duration::from_millis(5000)
            );
        }

        #[test]
        fn test_effective_sync_interval_capped_at_tick_cadence() {
            let config = TimerConfig::default()
                .with_tick_interval(Duration::from_millis(1000))
                .with_sync_interval(Duration::from_millis(200));
            assert_eq!(
                config.effective_sync_interval(),
                Duration::from_millis(1000)
            );
        }

        #[test]
        fn test_config_error_messages() {
            assert_eq!(
                ConfigError::ZeroTickInterval.to_string(),
                "tick interval must be a positive duration"
            );
            assert_eq!(
                ConfigError::ZeroSyncInterval.to_string(),
                "sync interval must be a positive duration"
            );
            assert_eq!(
                ConfigError::ZeroMaxDuration.to_string(),
                "max duration must be a positive number of seconds"
            );
        }
    }

    // ------------------------------------------------------------------------
    // TimerSnapshot Tests
    // ------------------------------------------------------------------------

    mod timer_snapshot_tests {
        use super::*;

        #[test]
        fn test_serialize_deserialize() {
            let snapshot = TimerSnapshot {
                state: TimerState::Running,
                remaining_seconds: 42,
                set_seconds: 60,
                running: true,
                paused: false,
                overdue: false,
            };

            let json = serde_json::to_string(&snapshot).unwrap();
            assert!(json.contains("\"state\":\"running\""));
            assert!(json.contains("\"remaining_seconds\":42"));

            let deserialized: TimerSnapshot = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, snapshot);
        }
    }
}
