//! Cooperative scheduler driving the timer core and the sync publisher.
//!
//! This module provides the single periodic scheduler the component runs
//! under:
//! - A tick interval advancing the countdown
//! - A sync interval publishing derived state and reconciling the peer
//! - A request channel carrying host actions and snapshot queries
//! - Lifecycle-event dispatch to the log, standing in for the automation
//!   layer
//!
//! Everything is multiplexed in one task, so ticks, syncs, and mutators are
//! strictly serialized and the core needs no locking.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::sync::SyncPublisher;
use crate::timer::{ActionOutcome, ActionSource, TimerCore, TimerEvent};
use crate::types::{TimerAction, TimerSnapshot};

// ============================================================================
// SchedulerRequest
// ============================================================================

/// A request from the host to the scheduling task.
#[derive(Debug)]
pub enum SchedulerRequest {
    /// Apply a timer action
    Action(TimerAction),
    /// Reply with the current snapshot
    Query(oneshot::Sender<TimerSnapshot>),
}

// ============================================================================
// Scheduler
// ============================================================================

/// Owns the timer core and publisher and drives them at their cadences.
///
/// `run()` loops until the host drops its request sender; dropping it is
/// the graceful-shutdown signal.
pub struct Scheduler {
    /// The countdown state machine
    core: TimerCore,
    /// Derived-state publisher and peer reconciler
    publisher: SyncPublisher,
    /// Lifecycle events emitted by the core
    event_rx: mpsc::UnboundedReceiver<TimerEvent>,
    /// Inbound host requests
    request_rx: mpsc::UnboundedReceiver<SchedulerRequest>,
}

impl Scheduler {
    /// Creates a scheduler over an already-constructed core and publisher.
    pub fn new(
        core: TimerCore,
        publisher: SyncPublisher,
        event_rx: mpsc::UnboundedReceiver<TimerEvent>,
        request_rx: mpsc::UnboundedReceiver<SchedulerRequest>,
    ) -> Self {
        Self {
            core,
            publisher,
            event_rx,
            request_rx,
        }
    }

    /// Runs the scheduling loop.
    ///
    /// Multiplexes the tick cadence, the sync cadence, host requests, and
    /// event dispatch in one task. Both intervals fire once immediately;
    /// the first sync is the boot-time initial publish. Missed ticks are
    /// skipped rather than bursted, so a stall never causes a flurry of
    /// catch-up ticks (the countdown itself is drift-corrected and loses no
    /// time). Returns when the request channel closes.
    pub async fn run(mut self) {
        self.log_config();

        let mut tick = interval(self.core.config().tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sync = interval(self.core.config().effective_sync_interval());
        sync.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.core.tick();
                }
                _ = sync.tick() => {
                    self.publisher.sync(&mut self.core);
                }
                request = self.request_rx.recv() => {
                    match request {
                        Some(request) => self.handle_request(request),
                        None => break,
                    }
                }
                event = self.event_rx.recv() => {
                    if let Some(event) = event {
                        dispatch_event(event);
                    }
                }
            }
        }

        info!("scheduler stopped");
    }

    /// Handles one host request.
    fn handle_request(&mut self, request: SchedulerRequest) {
        match request {
            SchedulerRequest::Action(action) => {
                let outcome = self.apply_action(action);
                if outcome == ActionOutcome::Ignored {
                    debug!(?action, "action ignored, guard not satisfied");
                }
            }
            SchedulerRequest::Query(reply) => {
                // The requester may have stopped waiting for the reply.
                let _ = reply.send(self.core.snapshot());
            }
        }
    }

    /// Applies a host action to the core.
    fn apply_action(&mut self, action: TimerAction) -> ActionOutcome {
        match action {
            TimerAction::Start { seconds } => self.core.start(seconds, ActionSource::Local),
            TimerAction::Pause => self.core.pause(ActionSource::Local),
            TimerAction::Resume => self.core.resume(ActionSource::Local),
            TimerAction::Cancel => self.core.cancel(ActionSource::Local),
            TimerAction::SetSeconds { seconds } => self.core.set_seconds(seconds),
        }
    }

    /// Logs the resolved configuration once at startup.
    fn log_config(&self) {
        let config = self.core.config();
        info!(
            tick_interval_ms = config.tick_interval.as_millis() as u64,
            sync_interval_ms = config.effective_sync_interval().as_millis() as u64,
            max_duration_seconds = config.max_duration_seconds,
            initial_set_seconds = config.initial_set_seconds,
            enable_ha_sync = config.enable_ha_sync,
            "kitchen timer ready"
        );
    }
}

/// Forwards a lifecycle event to the log.
///
/// Stands in for the automation layer: transition events at info, the
/// periodic tick at debug.
fn dispatch_event(event: TimerEvent) {
    match event {
        TimerEvent::Started { from_ha } => info!(from_ha, "timer started"),
        TimerEvent::Paused { from_ha } => info!(from_ha, "timer paused"),
        TimerEvent::Resumed { from_ha } => info!(from_ha, "timer resumed"),
        TimerEvent::Cancelled { from_ha } => info!(from_ha, "timer cancelled"),
        TimerEvent::Finished { from_ha } => info!(from_ha, "timer finished"),
        TimerEvent::Tick { remaining_seconds } => debug!(remaining_seconds, "tick"),
    }
}

// ============================================================================
// Tests
// ============================================================================
