//! Home-automation peer abstraction.
//!
//! This module provides:
//!
//! - The three-valued peer state vocabulary of a home-automation timer
//!   entity
//! - A capability trait for reading and writing the peer
//! - An in-process peer used by the host console and by tests
//!
//! The peer is an external collaborator: reads and writes can fail, and a
//! failure only ever skips the affected sync step for that cycle.

use std::sync::{Arc, Mutex};

use thiserror::Error;

// ============================================================================
// PeerState
// ============================================================================

/// State of the home-automation timer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerState {
    /// No countdown on the remote side
    #[default]
    Idle,
    /// Remote countdown in progress
    Active,
    /// Remote countdown frozen
    Paused,
}

impl PeerState {
    /// Returns the home-automation label for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerState::Idle => "idle",
            PeerState::Active => "active",
            PeerState::Paused => "paused",
        }
    }

    /// Parses a home-automation state label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(PeerState::Idle),
            "active" => Some(PeerState::Active),
            "paused" => Some(PeerState::Paused),
            _ => None,
        }
    }
}

impl std::fmt::Display for PeerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PeerError
// ============================================================================

/// Errors raised when the peer cannot be read or written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    /// The peer entity has not reported a state yet
    #[error("peer is not ready")]
    NotReady,
    /// The peer cannot be reached
    #[error("peer unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// HaPeer Trait
// ============================================================================

/// Capability trait for the external synchronization peer.
///
/// Reads feed reconciliation; writes push the local timer's view back so
/// the remote entity converges. Every call can fail independently.
pub trait HaPeer: Send {
    /// Reads the peer's current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the peer has no state yet or cannot be reached.
    fn state(&self) -> Result<PeerState, PeerError>;

    /// Reads the peer's remaining seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the peer has no state yet or cannot be reached.
    fn remaining_seconds(&self) -> Result<u32, PeerError>;

    /// Pushes a state to the peer.
    ///
    /// # Errors
    ///
    /// Returns an error if the peer cannot be reached.
    fn set_state(&self, state: PeerState) -> Result<(), PeerError>;

    /// Pushes a remaining-seconds value to the peer.
    ///
    /// # Errors
    ///
    /// Returns an error if the peer cannot be reached.
    fn set_remaining_seconds(&self, seconds: u32) -> Result<(), PeerError>;
}

// ============================================================================
// SharedPeer
// ============================================================================

#[derive(Debug)]
struct PeerInner {
    state: PeerState,
    remaining_seconds: u32,
    ready: bool,
    available: bool,
    state_writes: usize,
    remaining_writes: usize,
}

impl Default for PeerInner {
    fn default() -> Self {
        Self {
            state: PeerState::Idle,
            remaining_seconds: 0,
            ready: false,
            available: true,
            state_writes: 0,
            remaining_writes: 0,
        }
    }
}

/// In-process peer backing the host console and the test suite.
///
/// Clones share one entity, so the publisher can own a boxed handle while
/// the console (standing in for the remote human) drives the same entity
/// through [`SharedPeer::drive`]. The peer reports
/// [`PeerError::NotReady`] until the first write from either side, and
/// [`PeerError::Unavailable`] while marked unavailable.
#[derive(Debug, Default, Clone)]
pub struct SharedPeer {
    inner: Arc<Mutex<PeerInner>>,
}

impl SharedPeer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the peer's state and remaining seconds, as the remote human
    /// would.
    ///
    /// Marks the peer ready. Bypasses the availability flag, which models
    /// the link between the local timer and the entity, not the entity
    /// itself.
    pub fn drive(&self, state: PeerState, remaining_seconds: u32) {
        let mut inner = self.inner.lock().unwrap();
        inner.state = state;
        inner.remaining_seconds = remaining_seconds;
        inner.ready = true;
    }

    /// Marks the entity reachable or unreachable for trait reads and
    /// writes.
    pub fn set_available(&self, available: bool) {
        self.inner.lock().unwrap().available = available;
    }

    /// Returns the entity's current values regardless of readiness.
    #[must_use]
    pub fn current(&self) -> (PeerState, u32) {
        let inner = self.inner.lock().unwrap();
        (inner.state, inner.remaining_seconds)
    }

    /// Returns how many state writes the trait has accepted.
    #[must_use]
    pub fn state_write_count(&self) -> usize {
        self.inner.lock().unwrap().state_writes
    }

    /// Returns how many remaining-seconds writes the trait has accepted.
    #[must_use]
    pub fn remaining_write_count(&self) -> usize {
        self.inner.lock().unwrap().remaining_writes
    }
}

impl HaPeer for SharedPeer {
    fn state(&self) -> Result<PeerState, PeerError> {
        let inner = self.inner.lock().unwrap();
        if !inner.available {
            return Err(PeerError::Unavailable("peer marked unavailable".to_string()));
        }
        if !inner.ready {
            return Err(PeerError::NotReady);
        }
        Ok(inner.state)
    }

    fn remaining_seconds(&self) -> Result<u32, PeerError> {
        let inner = self.inner.lock().unwrap();
        if !inner.available {
            return Err(PeerError::Unavailable("peer marked unavailable".to_string()));
        }
        if !inner.ready {
            return Err(PeerError::NotReady);
        }
        Ok(inner.remaining_seconds)
    }

    fn set_state(&self, state: PeerState) -> Result<(), PeerError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.available {
            return Err(PeerError::Unavailable("peer marked unavailable".to_string()));
        }
        inner.state = state;
        inner.ready = true;
        inner.state_writes += 1;
        Ok(())
    }

    fn set_remaining_seconds(&self, seconds: u32) -> Result<(), PeerError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.available {
            return Err(PeerError::Unavailable("peer marked unavailable".to_string()));
        }
        inner.remaining_seconds = seconds;
        inner.ready = true;
        inner.remaining_writes += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
