//! Batch runner lifecycle
//!
//! The runner moves through an explicit state machine driven by events:
//!
//! ```text
//! Starting --Started--> Running --StopRequested--> Stopping --Drained--> Stopped
//!     \                                                                     ^
//!      `-------------------------- StopRequested --------------------------'
//! ```
//!
//! Any other combination is rejected and leaves the state unchanged.

use crate::domain::{DeidError, Result};
use serde::Serialize;
use std::fmt;

/// Runner state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerState {
    /// Created, no document dispatched yet
    Starting,
    /// Dispatching documents
    Running,
    /// No new documents are dispatched; in-flight work is finishing
    Stopping,
    /// All work finished
    Stopped,
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Event driving a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Dispatch began
    Started,
    /// Input exhausted or shutdown signalled
    StopRequested,
    /// Every in-flight document finished
    Drained,
}

/// Lifecycle state machine
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: RunnerState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Start in [`RunnerState::Starting`]
    pub fn new() -> Self {
        Self {
            state: RunnerState::Starting,
        }
    }

    /// Current state
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Whether the runner has finished
    pub fn is_stopped(&self) -> bool {
        self.state == RunnerState::Stopped
    }

    /// Apply an event, returning the new state
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::Batch`] for a transition the state machine does
    /// not allow.
    pub fn apply(&mut self, event: LifecycleEvent) -> Result<RunnerState> {
        use LifecycleEvent::*;
        use RunnerState::*;

        let next = match (self.state, event) {
            (Starting, Started) => Running,
            (Starting, StopRequested) => Stopped,
            (Running, StopRequested) => Stopping,
            (Stopping, Drained) => Stopped,
            (state, event) => {
                return Err(DeidError::Batch(format!(
                    "Illegal lifecycle transition: {event:?} while {state}"
                )))
            }
        };

        tracing::debug!(from = %self.state, to = %next, "Lifecycle transition");
        self.state = next;
        Ok(next)
    }
}
