//! Sync publisher: derived-state publishing and peer reconciliation.
//!
//! This module provides the second half of the timer component:
//! - Change-suppressed publishing of derived state to the output sinks
//! - Reconciliation of externally-driven peer transitions into the core
//! - Change-suppressed write-back of the core's state to the peer
//!
//! One `sync()` pass runs at the effective sync cadence, between ticks, on
//! the same cooperative scheduler as the core. It borrows the core for the
//! duration of the pass and never blocks.

use tracing::debug;

use crate::peer::{HaPeer, PeerState};
use crate::sink::Sinks;
use crate::timer::{ActionSource, TimerCore};
use crate::types::{TimerSnapshot, TimerState};

// ============================================================================
// SyncPublisher
// ============================================================================

/// Publishes the timer's observable state to sinks and reconciles it with
/// the home-automation peer.
///
/// The publisher keeps no state of its own beyond the last values handed to
/// each side, used to suppress redundant sink writes and to tell an
/// externally-driven peer change from an echo of its own write-back. The
/// first pass after construction publishes everything.
pub struct SyncPublisher {
    /// Output sinks, one optional slot per published field
    sinks: Sinks,
    /// Home-automation peer, absent unless wired by the host
    peer: Option<Box<dyn HaPeer>>,
    /// Snapshot behind the most recent sink publish
    last_published: Option<TimerSnapshot>,
    /// Peer values at the last successful read or write-back
    last_peer: Option<(PeerState, u32)>,
}

impl SyncPublisher {
    /// Creates a publisher over the given sink registry, with no peer.
    pub fn new(sinks: Sinks) -> Self {
        Self {
            sinks,
            peer: None,
            last_published: None,
            last_peer: None,
        }
    }

    /// Wires the home-automation peer.
    ///
    /// The peer is only consulted while the core's configuration has HA-sync
    /// enabled.
    #[must_use]
    pub fn with_peer(mut self, peer: Box<dyn HaPeer>) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Runs one sync pass against the core.
    ///
    /// In order: publish the current snapshot to the sinks (suppressing
    /// unchanged values), fold any externally-driven peer change back into
    /// the core, then push the core's own view to the peer so the remote
    /// side converges. A peer read or write failure skips only the affected
    /// step for this cycle; the core is never disturbed by it.
    pub fn sync(&mut self, core: &mut TimerCore) {
        self.publish(core.snapshot());

        if core.config().enable_ha_sync && self.peer.is_some() {
            self.reconcile(core);
            self.push_to_peer(core.snapshot());
        }
    }

    /// Publishes each changed field of the snapshot to its sink.
    fn publish(&mut self, snapshot: TimerSnapshot) {
        let last = self.last_published;

        if last.map_or(true, |last| last.state != snapshot.state) {
            self.sinks.publish_state(snapshot.state.as_str());
        }
        if last.map_or(true, |last| last.remaining_seconds != snapshot.remaining_seconds) {
            self.sinks.publish_remaining_seconds(snapshot.remaining_seconds);
        }
        if last.map_or(true, |last| last.set_seconds != snapshot.set_seconds) {
            self.sinks.publish_set_seconds(snapshot.set_seconds);
        }
        if last.map_or(true, |last| last.running != snapshot.running) {
            self.sinks.publish_running(snapshot.running);
        }
        if last.map_or(true, |last| last.paused != snapshot.paused) {
            self.sinks.publish_paused(snapshot.paused);
        }
        if last.map_or(true, |last| last.overdue != snapshot.overdue) {
            self.sinks.publish_overdue(snapshot.overdue);
        }

        if last == Some(snapshot) {
            debug!("sink publish suppressed, nothing changed");
        }
        self.last_published = Some(snapshot);
    }

    /// Applies an externally-driven peer transition to the core.
    ///
    /// The peer is polled, not subscribed to, so a change is detected by
    /// comparing against the values we last read or wrote; an unchanged
    /// reading (including the echo of our own write-back) drives nothing.
    /// Peer values win a genuine conflict: whatever the remote side changed
    /// since the last pass is applied here, last-write-wins, before the
    /// core's own view is pushed back.
    fn reconcile(&mut self, core: &mut TimerCore) {
        let Some(peer) = self.peer.as_deref() else {
            return;
        };

        let read = peer
            .state()
            .and_then(|state| peer.remaining_seconds().map(|remaining| (state, remaining)));
        let (peer_state, peer_remaining) = match read {
            Ok(values) => values,
            Err(err) => {
                debug!("skipping peer reconciliation: {err}");
                return;
            }
        };

        if self.last_peer == Some((peer_state, peer_remaining)) {
            return;
        }
        self.last_peer = Some((peer_state, peer_remaining));
        debug!(
            peer_state = peer_state.as_str(),
            peer_remaining, "peer changed, reconciling"
        );

        match (peer_state, core.state()) {
            // Remote cancel.
            (PeerState::Idle, TimerState::Running | TimerState::Paused) => {
                let _ = core.cancel(ActionSource::HomeAssistant);
            }
            // Remote pause.
            (PeerState::Paused, TimerState::Running) => {
                let _ = core.pause(ActionSource::HomeAssistant);
            }
            // Adopt a remotely-paused countdown we never saw start.
            (PeerState::Paused, TimerState::Idle) if peer_remaining > 0 => {
                let _ = core.start(Some(peer_remaining), ActionSource::HomeAssistant);
                let _ = core.pause(ActionSource::HomeAssistant);
            }
            // Remote resume.
            (PeerState::Active, TimerState::Paused) => {
                let _ = core.resume(ActionSource::HomeAssistant);
            }
            // Remote start; fall back to the armed duration when the peer
            // reports no remaining time.
            (
                PeerState::Active,
                TimerState::Idle | TimerState::Finished | TimerState::Overdue,
            ) => {
                let seconds = (peer_remaining > 0).then_some(peer_remaining);
                let _ = core.start(seconds, ActionSource::HomeAssistant);
            }
            // Both counting: adopt the peer's remaining time unless the gap
            // is within tick phase offset.
            (PeerState::Active, TimerState::Running) => {
                if peer_remaining.abs_diff(core.remaining_seconds()) > 1 {
                    let _ = core.adopt_remaining(peer_remaining);
                }
            }
            _ => {}
        }
    }

    /// Pushes the core's state to the peer, suppressed when unchanged.
    fn push_to_peer(&mut self, snapshot: TimerSnapshot) {
        let Some(peer) = self.peer.as_deref() else {
            return;
        };

        let target = (peer_state_for(snapshot.state), snapshot.remaining_seconds);
        if self.last_peer == Some(target) {
            return;
        }

        let written = peer
            .set_state(target.0)
            .and_then(|()| peer.set_remaining_seconds(target.1));
        match written {
            // Remember the push so the next read is not mistaken for a
            // remote change.
            Ok(()) => self.last_peer = Some(target),
            Err(err) => debug!("skipping peer write-back: {err}"),
        }
    }
}

impl std::fmt::Debug for SyncPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPublisher")
            .field("sinks", &self.sinks)
            .field("peer", &self.peer.is_some())
            .field("last_published", &self.last_published)
            .finish_non_exhaustive()
    }
}

/// Maps the timer's state onto the peer's three-valued vocabulary.
fn peer_state_for(state: TimerState) -> PeerState {
    match state {
        TimerState::Running => PeerState::Active,
        TimerState::Paused => PeerState::Paused,
        TimerState::Idle | TimerState::Finished | TimerState::Overdue => PeerState::Idle,
    }
}

// ============================================================================
// Tests
// ============================================================================
