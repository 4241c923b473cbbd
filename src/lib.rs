//! RingHub - call session coordination for 1:1 chat rooms
//!
//! A Domain-Driven Design (DDD) implementation of the call signaling core
//! of a chat server: establishing a ring, enforcing room/peer busy
//! invariants, tracking ring timeouts, and mediating
//! accept/reject/cancel/end transitions with live socket delivery and
//! best-effort push fallback.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::call::CallOrchestrator;
pub use application::history::HistoryProjector;
pub use domain::shared::error::DomainError;
pub use domain::shared::result::Result;
pub use infrastructure::scheduler::TimeoutScheduler;
