//! Domain layer - entities, value objects, ports and domain services

pub mod ports;
pub mod session;
pub mod shared;
