//! Infrastructure layer - store adapters and the timer subsystem

pub mod persistence;
pub mod scheduler;
