//! Typing presence debouncer.
//!
//! Turns a stream of input-change events into edge-triggered `typing=true` /
//! `typing=false` signals. A non-empty edit starts (or restarts) a quiet-period
//! timer; when it expires without further input the user is reported idle.
//! The timer is a deadline owned by the debouncer and driven by `poll`, so at
//! most one is ever pending.

use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use crate::protocol::BackendAction;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(2000);

/// Where presence changes go. Delivery is best effort.
pub trait PresenceSink {
    fn send_typing(&mut self, typing: bool) -> Result<(), String>;
}

impl PresenceSink for Sender<BackendAction> {
    fn send_typing(&mut self, typing: bool) -> Result<(), String> {
        self.send(BackendAction::SetTyping(typing))
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    Idle,
    Active,
}

pub struct TypingDebouncer<S> {
    sink: S,
    state: TypingState,
    /// Pending quiet-period expiry, if any.
    deadline: Option<Instant>,
    quiet_period: Duration,
}

impl<S: PresenceSink> TypingDebouncer<S> {
    pub fn new(sink: S) -> Self {
        Self::with_quiet_period(sink, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(sink: S, quiet_period: Duration) -> Self {
        Self {
            sink,
            state: TypingState::Idle,
            deadline: None,
            quiet_period,
        }
    }

    pub fn state(&self) -> TypingState {
        self.state
    }

    /// Last value actually transmitted.
    pub fn is_typing(&self) -> bool {
        self.state == TypingState::Active
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The message input changed; `text` is its new content.
    pub fn input_changed(&mut self, text: &str, now: Instant) {
        if text.is_empty() {
            self.deadline = None;
            self.transmit(false);
            return;
        }
        self.transmit(true);
        self.deadline = Some(now + self.quiet_period);
    }

    /// Fire the quiet-period timer if it has expired.
    pub fn poll(&mut self, now: Instant) {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.transmit(false);
            }
            _ => {}
        }
    }

    /// A message went out: the user is no longer typing it.
    pub fn message_sent(&mut self) {
        self.deadline = None;
        self.transmit(false);
    }

    /// Drop the pending timer without signalling anything.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// The session is gone. Forget all presence without signalling, so a fresh
    /// session starts from `Idle`.
    pub fn reset(&mut self) {
        self.cancel();
        self.state = TypingState::Idle;
    }

    fn transmit(&mut self, typing: bool) {
        if self.is_typing() == typing {
            return;
        }
        self.state = if typing {
            TypingState::Active
        } else {
            TypingState::Idle
        };
        debug!(typing, "typing presence changed");
        if let Err(e) = self.sink.send_typing(typing) {
            trace!(error = %e, "typing presence dropped");
        }
    }
}
