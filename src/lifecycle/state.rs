//! Listener lifecycle state machine.
//!
//! # State Transitions
//! ```text
//! Idle → Running: listener bound and serving
//! Running → Draining: stop requested, no new connections
//! Draining → Stopped: in-flight requests finished or grace period elapsed
//! Running → Stopped: serve loop ended on its own (error)
//! ```
//!
//! Stopped is terminal. There is no restart path.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Running,
    Draining,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Running => "running",
            LifecycleState::Draining => "draining",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
