//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (accepted by lifecycle::orchestrator)
//!     → request.rs (assign / propagate request id)
//!     → server.rs middleware (trace, timeout)
//!     → application Router (or the default handler)
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{default_router, with_middleware};
