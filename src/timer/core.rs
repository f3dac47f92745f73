//! Countdown state machine for the kitchen timer.
//!
//! This module provides the timer core:
//! - Five-state transition table (idle, running, paused, finished, overdue)
//! - Drift-corrected countdown against a monotonic clock
//! - Lifecycle event emission for the automation layer
//! - Duration clamping against the configured ceiling

use std::fmt;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::timer::clock::{Clock, MonotonicClock};
use crate::types::{TimerConfig, TimerSnapshot, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Lifecycle events emitted to the automation layer.
///
/// Transition events record whether the home-automation peer drove them;
/// `Tick` instead carries the remaining whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A countdown started
    Started {
        /// Whether the peer requested the start
        from_ha: bool,
    },
    /// The countdown was frozen
    Paused {
        /// Whether the peer requested the pause
        from_ha: bool,
    },
    /// The countdown was resumed
    Resumed {
        /// Whether the peer requested the resume
        from_ha: bool,
    },
    /// The countdown was aborted
    Cancelled {
        /// Whether the peer requested the cancel
        from_ha: bool,
    },
    /// The countdown reached zero
    Finished {
        /// Whether the peer drove the finishing transition
        from_ha: bool,
    },
    /// Periodic advance while running
    Tick {
        /// Remaining whole seconds, rounded up
        remaining_seconds: u32,
    },
}

// ============================================================================
// ActionSource / ActionOutcome
// ============================================================================

/// Origin of a requested transition, used to tag lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    /// The local automation layer or host console
    Local,
    /// The home-automation peer, during sync reconciliation
    HomeAssistant,
}

impl ActionSource {
    /// Returns true when the action came from the home-automation peer.
    pub fn is_ha(&self) -> bool {
        matches!(self, ActionSource::HomeAssistant)
    }
}

/// Result of requesting a transition.
///
/// A request whose guard is not satisfied is dropped silently (no state
/// change, no event) so that automation scripts stay idempotent; the
/// returned outcome is how callers and tests observe the drop.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The transition took effect
    Applied,
    /// The guard was not satisfied; nothing changed
    Ignored,
}

impl ActionOutcome {
    /// Returns true if the transition took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, ActionOutcome::Applied)
    }

    /// Returns true if the request was dropped.
    pub fn is_ignored(&self) -> bool {
        matches!(self, ActionOutcome::Ignored)
    }
}

// ============================================================================
// TimerCore
// ============================================================================

/// Countdown timer core: state, remaining-time accounting, and transition
/// rules.
///
/// Constructed once at host boot and driven strictly sequentially by a
/// cooperative scheduler; `tick()`, `sync` reads, and the action mutators
/// must never run concurrently. Sub-second time is tracked internally in
/// milliseconds; everything published is whole seconds.
pub struct TimerCore {
    /// Immutable configuration
    config: TimerConfig,
    /// Current state
    state: TimerState,
    /// Duration most recently armed by start/set_seconds, in seconds
    set_seconds: u32,
    /// Milliseconds left; 0 whenever not running or paused
    remaining_millis: u64,
    /// Anchor for measuring elapsed real time between ticks
    last_tick: Option<Instant>,
    /// When the countdown finished, for the overdue window
    finished_at: Option<Instant>,
    /// Monotonic time source
    clock: Box<dyn Clock>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerCore {
    /// Creates a timer with the given configuration and event channel.
    ///
    /// The configuration must already be validated. A nonzero
    /// `initial_set_seconds` pre-arms the countdown without starting it.
    pub fn new(config: TimerConfig, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self::with_clock(config, event_tx, Box::new(MonotonicClock))
    }

    /// Creates a timer reading time from the supplied clock.
    pub fn with_clock(
        config: TimerConfig,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let set_seconds = config.initial_set_seconds.min(config.max_duration_seconds);
        Self {
            config,
            state: TimerState::Idle,
            set_seconds,
            remaining_millis: 0,
            last_tick: None,
            finished_at: None,
            clock,
            event_tx,
        }
    }

    /// Advances the countdown by the real time elapsed since the previous
    /// tick.
    ///
    /// Decrementing by the measured monotonic difference instead of a fixed
    /// step keeps scheduler jitter from accumulating. While running, every
    /// call emits a `Tick` with the remaining whole seconds; the call that
    /// reaches zero emits `Finished` followed by the final `Tick` of 0. A
    /// finished timer left alone past the overdue window becomes overdue
    /// here, silently. All other states ignore the call.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        match self.state {
            TimerState::Running => {
                let elapsed = self
                    .last_tick
                    .map(|anchor| now.saturating_duration_since(anchor))
                    .unwrap_or_default();
                self.last_tick = Some(now);
                self.remaining_millis = self
                    .remaining_millis
                    .saturating_sub(elapsed.as_millis() as u64);

                if self.remaining_millis == 0 {
                    self.state = TimerState::Finished;
                    self.finished_at = Some(now);
                    self.emit(TimerEvent::Finished { from_ha: false });
                }
                self.emit(TimerEvent::Tick {
                    remaining_seconds: self.remaining_seconds(),
                });
            }
            TimerState::Finished => {
                let overdue_after = self.config.effective_sync_interval();
                if let Some(finished_at) = self.finished_at {
                    if now.saturating_duration_since(finished_at) > overdue_after {
                        self.state = TimerState::Overdue;
                    }
                }
            }
            _ => {}
        }
    }

    /// Starts a countdown.
    ///
    /// An explicit duration is clamped to the ceiling and becomes the new
    /// armed `set_seconds`; without one, the previously armed duration is
    /// used. Guard: the timer is idle, finished, or overdue, and the
    /// effective duration is nonzero.
    pub fn start(&mut self, seconds: Option<u32>, source: ActionSource) -> ActionOutcome {
        if !self.state.can_start() {
            return ActionOutcome::Ignored;
        }
        let armed = match seconds {
            Some(requested) => self.clamp_seconds(requested),
            None => self.set_seconds,
        };
        if armed == 0 {
            return ActionOutcome::Ignored;
        }

        self.set_seconds = armed;
        self.remaining_millis = u64::from(armed) * 1000;
        self.state = TimerState::Running;
        self.last_tick = Some(self.clock.now());
        self.finished_at = None;
        self.emit(TimerEvent::Started {
            from_ha: source.is_ha(),
        });
        ActionOutcome::Applied
    }

    /// Freezes a running countdown, preserving the remaining time.
    pub fn pause(&mut self, source: ActionSource) -> ActionOutcome {
        if self.state != TimerState::Running {
            return ActionOutcome::Ignored;
        }
        self.state = TimerState::Paused;
        self.emit(TimerEvent::Paused {
            from_ha: source.is_ha(),
        });
        ActionOutcome::Applied
    }

    /// Resumes a paused countdown.
    ///
    /// The elapsed anchor is reset to now, so time spent paused costs no
    /// remaining time.
    pub fn resume(&mut self, source: ActionSource) -> ActionOutcome {
        if self.state != TimerState::Paused {
            return ActionOutcome::Ignored;
        }
        self.state = TimerState::Running;
        self.last_tick = Some(self.clock.now());
        self.emit(TimerEvent::Resumed {
            from_ha: source.is_ha(),
        });
        ActionOutcome::Applied
    }

    /// Aborts a running or paused countdown and returns to idle.
    pub fn cancel(&mut self, source: ActionSource) -> ActionOutcome {
        if !matches!(self.state, TimerState::Running | TimerState::Paused) {
            return ActionOutcome::Ignored;
        }
        self.state = TimerState::Idle;
        self.remaining_millis = 0;
        self.emit(TimerEvent::Cancelled {
            from_ha: source.is_ha(),
        });
        ActionOutcome::Applied
    }

    /// Arms a duration for the next start, clamped to the ceiling.
    ///
    /// Valid in every state and never touches a countdown in progress; a
    /// zero request is ignored. Emits no event.
    pub fn set_seconds(&mut self, seconds: u32) -> ActionOutcome {
        if seconds == 0 {
            return ActionOutcome::Ignored;
        }
        self.set_seconds = self.clamp_seconds(seconds);
        ActionOutcome::Applied
    }

    /// Overwrites the remaining time of a running countdown.
    ///
    /// Used by sync reconciliation when the peer's externally-driven value
    /// drifts from ours. Clamped and re-anchored; emits no event.
    pub fn adopt_remaining(&mut self, seconds: u32) -> ActionOutcome {
        if self.state != TimerState::Running || seconds == 0 {
            return ActionOutcome::Ignored;
        }
        self.remaining_millis = u64::from(self.clamp_seconds(seconds)) * 1000;
        self.last_tick = Some(self.clock.now());
        ActionOutcome::Applied
    }

    /// Returns the current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Returns the remaining whole seconds, rounded up.
    ///
    /// Rounding up keeps a display from showing 0 while time is left; 0 is
    /// reported exactly when the countdown is over or never ran.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_millis.div_ceil(1000) as u32
    }

    /// Returns the remaining time in milliseconds.
    pub fn remaining_millis(&self) -> u64 {
        self.remaining_millis
    }

    /// Returns the configuration the timer was constructed with.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Returns a point-in-time view of the observable state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            remaining_seconds: self.remaining_seconds(),
            set_seconds: self.set_seconds,
            running: self.state.is_running(),
            paused: self.state.is_paused(),
            overdue: self.state.is_overdue(),
        }
    }

    fn clamp_seconds(&self, seconds: u32) -> u32 {
        seconds.min(self.config.max_duration_seconds)
    }

    fn emit(&self, event: TimerEvent) {
        // A closed channel means the host dropped the receiver during
        // shutdown; there is nobody left to observe the event.
        let _ = self.event_tx.send(event);
    }
}

impl fmt::Debug for TimerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerCore")
            .field("state", &self.state)
            .field("set_seconds", &self.set_seconds)
            .field("remaining_millis", &self.remaining_millis)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
