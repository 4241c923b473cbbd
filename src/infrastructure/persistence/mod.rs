//! In-memory store adapters
//!
//! Process-local implementations of the session and participant store
//! ports. Every conditional primitive (busy-check insert, status CAS) runs
//! inside one write-lock critical section, which gives the atomicity the
//! orchestrator relies on.

pub mod participant_store;
pub mod session_store;

pub use participant_store::InMemoryCallParticipantStore;
pub use session_store::InMemoryCallSessionStore;
