//! Cancellable timer bookkeeping.
//!
//! The engine never sleeps. It hands out [`TimerId`]s through
//! [`PlaybackEffect::TimerScheduled`](super::PlaybackEffect) and the host
//! reports them back when they elapse. Only the single pending timer is live;
//! any other id is stale and ignored.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// What happens when a timer elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TimerPurpose {
    /// Leave the current static screen.
    Advance,
    /// Hide the title/controls overlay drawn over a running game.
    HideOverlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct PendingTimer {
    pub id: TimerId,
    pub purpose: TimerPurpose,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct TimerSlot {
    pending: Option<PendingTimer>,
    next_id: u64,
}

impl TimerSlot {
    /// Replaces the pending timer. Returns the new id and the cancelled one, if any.
    pub fn arm(&mut self, purpose: TimerPurpose) -> (TimerId, Option<TimerId>) {
        let cancelled = self.disarm();
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending = Some(PendingTimer { id, purpose });
        (id, cancelled)
    }

    pub fn disarm(&mut self) -> Option<TimerId> {
        self.pending.take().map(|timer| timer.id)
    }

    /// Consumes the pending timer if `id` is the live one.
    pub fn fire(&mut self, id: TimerId) -> Option<TimerPurpose> {
        match self.pending {
            Some(timer) if timer.id == id => {
                self.pending = None;
                Some(timer.purpose)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }
}
