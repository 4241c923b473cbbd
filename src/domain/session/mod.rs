//! Call session bounded context - manages the lifecycle of 1:1 calls

pub mod entity;
pub mod event;
pub mod repository;
pub mod service;
pub mod value_object;

pub use entity::{CallParticipantJoin, CallSession};
pub use event::CallSignal;
pub use repository::{BusyConflict, CallParticipantStore, CallSessionStore};
pub use service::{decide_hang_up, HangUpAction};
pub use value_object::{CallPlatform, CallStatus, ParticipantRole};
