//! Application layer - use cases coordinating stores, timers and boundaries

pub mod call;
pub mod history;
