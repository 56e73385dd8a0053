//! Playback state machine over an immutable trace
//!
//! The controller owns the current step index, the running flag and the
//! autoplay timer. The timer is a deadline rather than a spawned task: the
//! owner's event loop sleeps until [`PlaybackController::deadline`] and then
//! calls [`PlaybackController::poll_timer`]. Cancelling playback clears the
//! deadline synchronously, so a tick scheduled before `pause` or `reset` can
//! never advance the index afterwards.
//!
//! ```text
//!            start                 tick (index < last)
//!   Idle ───────────────► Running ◄──────────┐
//!    ▲                     │  │  └───────────┘
//!    │ reset         pause │  │ tick reaches last
//!    │                     ▼  ▼
//!    └───────────────── Ready  Finished ──start──► Running (replay)
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::algorithm::state::Step;
use crate::execution::history::Trace;

/// Configuration for timer-driven playback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between autoplay steps (milliseconds)
    pub step_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { step_delay_ms: 600 }
    }
}

impl PlaybackConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Observable playback position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// `None` is the pre-start state showing the raw input
    pub current_index: Option<usize>,
    pub is_running: bool,
}

/// Coarse phase derived from [`PlaybackState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    Idle,
    Ready,
    Running,
    Finished,
}

/// Walks a trace forward and backward, with optional autoplay
#[derive(Debug)]
pub struct PlaybackController {
    trace: Arc<Trace>,
    state: PlaybackState,
    delay: Duration,
    deadline: Option<Instant>,
}

impl PlaybackController {
    pub fn new(trace: Arc<Trace>, config: &PlaybackConfig) -> Self {
        Self {
            trace,
            state: PlaybackState::default(),
            delay: config.step_delay(),
            deadline: None,
        }
    }

    pub fn trace(&self) -> &Arc<Trace> {
        &self.trace
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Step at the current index, `None` before start
    pub fn current_step(&self) -> Option<&Step> {
        self.state.current_index.and_then(|index| self.trace.step(index))
    }

    pub fn phase(&self) -> PlaybackPhase {
        match self.state.current_index {
            None => PlaybackPhase::Idle,
            Some(_) if self.state.is_running => PlaybackPhase::Running,
            Some(index) if index == self.trace.last_index() => PlaybackPhase::Finished,
            Some(_) => PlaybackPhase::Ready,
        }
    }

    /// When the armed autoplay timer fires, if one is armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn step_delay(&self) -> Duration {
        self.delay
    }

    /// Starts autoplay, replaying from the beginning when finished.
    ///
    /// Returns whether the visible step changed.
    pub fn start(&mut self) -> bool {
        self.start_at(Instant::now())
    }

    /// [`start`](Self::start) with an explicit clock reading
    pub fn start_at(&mut self, now: Instant) -> bool {
        if self.state.is_running {
            return false;
        }

        let before = self.state.current_index;
        if self.at_end() {
            self.state.current_index = None;
        }
        if self.state.current_index.is_none() {
            self.state.current_index = Some(0);
        }

        self.state.is_running = true;
        self.rearm(now);
        debug!("Playback started at step {:?}", self.state.current_index);
        before != self.state.current_index
    }

    /// Stops autoplay, keeping the current index
    pub fn pause(&mut self) -> bool {
        if self.state.is_running {
            debug!("Playback paused at step {:?}", self.state.current_index);
        }
        self.stop();
        false
    }

    /// Advances one step; ignored while running or at the end
    pub fn step_forward(&mut self) -> bool {
        if self.state.is_running || self.at_end() {
            return false;
        }
        self.state.current_index = Some(self.state.current_index.map_or(0, |index| index + 1));
        true
    }

    /// Goes back one step; ignored while running or at the first step
    pub fn step_back(&mut self) -> bool {
        if self.state.is_running {
            return false;
        }
        match self.state.current_index {
            Some(index) if index > 0 => {
                self.state.current_index = Some(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Stops autoplay and returns to the pre-start state
    pub fn reset(&mut self) -> bool {
        self.stop();
        let changed = self.state.current_index.is_some();
        self.state.current_index = None;
        changed
    }

    /// Fires the autoplay timer if its deadline has passed.
    ///
    /// Returns whether the index advanced. Reaching the last step finishes
    /// playback and disarms the timer.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if self.state.is_running && now >= deadline => {}
            _ => return false,
        }

        let next = self.state.current_index.map_or(0, |index| index + 1);
        self.state.current_index = Some(next.min(self.trace.last_index()));
        trace!("Autoplay tick to step {}", next);
        self.rearm(now);
        true
    }

    fn at_end(&self) -> bool {
        self.state.current_index == Some(self.trace.last_index())
    }

    fn rearm(&mut self, now: Instant) {
        if self.at_end() {
            debug!("Playback finished after {} steps", self.trace.len());
            self.stop();
        } else {
            self.deadline = Some(now + self.delay);
        }
    }

    fn stop(&mut self) {
        self.state.is_running = false;
        self.deadline = None;
    }
}
