//! External boundaries the call core depends on
//!
//! Each collaborator is a capability trait; any transport, directory or
//! storage satisfying the trait is substitutable without touching the
//! orchestrator.

pub mod directory;
pub mod membership;
pub mod messages;
pub mod notifier;
pub mod push;
pub mod settings;

pub use directory::UserDirectory;
pub use membership::{ResolvedMember, RoomMembershipGuard};
pub use messages::{CallAttachment, CallMessage, MessageRecorder, NewCallMessage};
pub use notifier::{DeviceConnection, RealtimeNotifier};
pub use push::{PushGateway, PushNotification};
pub use settings::{AppConfigSource, CallConfig};
