//! Countdown timer for an active session.
//!
//! A [`Countdown`] is a spawned tokio task that sends one
//! [`CountdownEvent::Tick`] per second and a single [`CountdownEvent::Expired`]
//! after the tick that reaches zero. Events go out over the caller's unbounded
//! channel, converted with `From`, so the TUI event bus receives them without
//! an adapter task.
//!
//! Dropping the handle aborts the task. Ticks already queued in the channel
//! still carry the old [`SessionId`], which the state machine rejects.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::machine::SessionId;

/// Length of one countdown step.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Messages produced by a running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed; `remaining` seconds are left.
    Tick { session: SessionId, remaining: u32 },
    /// The countdown reached zero. Sent exactly once, after the last tick.
    Expired { session: SessionId },
}

impl CountdownEvent {
    pub fn session(&self) -> SessionId {
        match *self {
            CountdownEvent::Tick { session, .. } | CountdownEvent::Expired { session } => session,
        }
    }
}

/// Handle to a running countdown. At most one should exist per session.
#[derive(Debug)]
pub struct Countdown {
    session: SessionId,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawns the countdown for `session` with `seconds` on the clock.
    ///
    /// Must be called from within a tokio runtime. The first tick fires one
    /// full period after the call. A zero duration expires immediately with no
    /// ticks.
    pub fn start<E>(session: SessionId, seconds: u32, tx: UnboundedSender<E>) -> Self
    where
        E: From<CountdownEvent> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            // A stalled runtime must not fire a burst of catch-up ticks.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut remaining = seconds;
            while remaining > 0 {
                ticker.tick().await;
                remaining -= 1;
                if tx.send(CountdownEvent::Tick { session, remaining }.into()).is_err() {
                    // Receiver gone, nobody to expire.
                    return;
                }
            }
            let _ = tx.send(CountdownEvent::Expired { session }.into());
        });
        log::debug!("{session}: countdown started at {seconds}s");
        Self { session, handle }
    }

    /// True once the task has sent `Expired` or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the countdown. No further events are produced.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            log::debug!("{}: countdown stopped", self.session);
        }
        self.handle.abort();
    }
}
