//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Foreground (orchestrator.rs):
//!     start (validate → bind → spawn serve loop)
//!     → wait for interrupt (signals.rs)
//!     → stop (trigger shutdown.rs → drain within grace period)
//!
//! Service (service.rs):
//!     manager calls start → wait for SIGTERM → manager calls stop
//!     (same orchestrator start/stop)
//! ```
//!
//! # Design Decisions
//! - Bind happens before the serve task is spawned, so bind errors reach the caller
//! - Shutdown has a deadline: in-flight requests are abandoned when it elapses
//! - Idle → Running → Draining → Stopped, no restart

pub mod orchestrator;
pub mod service;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use orchestrator::LifecycleOrchestrator;
pub use service::{systemd_unit, ServiceAdapter};
pub use shutdown::Shutdown;
pub use state::LifecycleState;
