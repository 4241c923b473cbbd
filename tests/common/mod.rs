//! Shared test doubles and wiring for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use ringhub::application::call::CallOrchestrator;
use ringhub::application::history::HistoryProjector;
use ringhub::config::StaticConfigSource;
use ringhub::domain::ports::directory::UserDirectory;
use ringhub::domain::ports::membership::{ResolvedMember, RoomMembershipGuard};
use ringhub::domain::ports::messages::{CallMessage, MessageRecorder, NewCallMessage};
use ringhub::domain::ports::notifier::{DeviceConnection, RealtimeNotifier};
use ringhub::domain::ports::push::{PushGateway, PushNotification};
use ringhub::domain::ports::settings::CallConfig;
use ringhub::domain::session::event::CallSignal;
use ringhub::domain::shared::value_objects::{
    DeviceId, MessageId, RoomId, UserId, UserProfile,
};
use ringhub::{DomainError, Result};
use ringhub::infrastructure::persistence::{
    InMemoryCallParticipantStore, InMemoryCallSessionStore,
};
use ringhub::TimeoutScheduler;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ringhub=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Room membership guard backed by explicit registrations
#[derive(Default)]
pub struct FakeRoomGuard {
    direct_rooms: Mutex<HashMap<RoomId, (UserId, UserId)>>,
    live_rooms: Mutex<HashSet<RoomId>>,
    banned: Mutex<HashSet<UserId>>,
}

impl FakeRoomGuard {
    pub fn register_direct(&self, room: RoomId, a: UserId, b: UserId) {
        self.direct_rooms.lock().unwrap().insert(room, (a, b));
    }

    /// A room without a resolvable peer (group/broadcast context)
    pub fn register_live(&self, room: RoomId) {
        self.live_rooms.lock().unwrap().insert(room);
    }

    pub fn ban(&self, user: UserId) {
        self.banned.lock().unwrap().insert(user);
    }
}

#[async_trait]
impl RoomMembershipGuard for FakeRoomGuard {
    async fn resolve_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<ResolvedMember> {
        if self.live_rooms.lock().unwrap().contains(room_id) {
            return Ok(ResolvedMember {
                peer_id: None,
                is_banned: false,
            });
        }
        let rooms = self.direct_rooms.lock().unwrap();
        let (a, b) = rooms
            .get(room_id)
            .ok_or_else(|| DomainError::NotFound(format!("room {room_id}")))?;
        let peer = if user_id == a {
            *b
        } else if user_id == b {
            *a
        } else {
            return Err(DomainError::NotFound(format!(
                "user {user_id} is not a member of {room_id}"
            )));
        };
        Ok(ResolvedMember {
            peer_id: Some(peer),
            is_banned: self.banned.lock().unwrap().contains(user_id),
        })
    }
}

/// Device connection that records what was emitted to it
#[derive(Default)]
pub struct FakeConnection {
    pub sent: Mutex<Vec<CallSignal>>,
}

#[async_trait]
impl DeviceConnection for FakeConnection {
    async fn emit(&self, signal: &CallSignal) -> Result<()> {
        self.sent.lock().unwrap().push(signal.clone());
        Ok(())
    }
}

/// Notifier recording every emission, with a registry of live devices
#[derive(Default)]
pub struct RecordingNotifier {
    pub room_events: Mutex<Vec<(RoomId, CallSignal)>>,
    pub user_events: Mutex<Vec<(UserId, CallSignal)>>,
    devices: Mutex<HashMap<DeviceId, Arc<FakeConnection>>>,
}

impl RecordingNotifier {
    /// Mark a device as live and return its recording connection
    pub fn connect_device(&self, device: DeviceId) -> Arc<FakeConnection> {
        let connection = Arc::new(FakeConnection::default());
        self.devices.lock().unwrap().insert(device, connection.clone());
        connection
    }

    pub fn room_events_of(&self, event_type: &str) -> usize {
        self.room_events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| s.event_type() == event_type)
            .count()
    }

    pub fn user_events_of(&self, event_type: &str) -> Vec<UserId> {
        self.user_events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| s.event_type() == event_type)
            .map(|(user, _)| *user)
            .collect()
    }
}

#[async_trait]
impl RealtimeNotifier for RecordingNotifier {
    async fn emit_to_room(&self, room_id: &RoomId, signal: &CallSignal) -> Result<()> {
        self.room_events
            .lock()
            .unwrap()
            .push((*room_id, signal.clone()));
        Ok(())
    }

    async fn emit_to_user(&self, user_id: &UserId, signal: &CallSignal) -> Result<()> {
        self.user_events
            .lock()
            .unwrap()
            .push((*user_id, signal.clone()));
        Ok(())
    }

    async fn resolve_device(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<Arc<dyn DeviceConnection>>> {
        Ok(self
            .devices
            .lock()
            .unwrap()
            .get(device_id)
            .map(|c| c.clone() as Arc<dyn DeviceConnection>))
    }
}

/// Push gateway recording every delivery attempt
#[derive(Default)]
pub struct RecordingPush {
    pub delivered: Mutex<Vec<(UserId, PushNotification)>>,
}

impl RecordingPush {
    pub fn deliveries_to(&self, user: &UserId) -> usize {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == user)
            .count()
    }
}

#[async_trait]
impl PushGateway for RecordingPush {
    async fn deliver(&self, user_id: &UserId, notification: PushNotification) -> Result<()> {
        self.delivered.lock().unwrap().push((*user_id, notification));
        Ok(())
    }
}

/// Message recorder persisting into a vector
#[derive(Default)]
pub struct RecordingMessages {
    pub created: Mutex<Vec<CallMessage>>,
}

impl RecordingMessages {
    pub fn count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<CallMessage> {
        self.created.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MessageRecorder for RecordingMessages {
    async fn create(&self, message: NewCallMessage) -> Result<CallMessage> {
        let record = CallMessage {
            id: MessageId::new(),
            room_id: message.room_id,
            sender_id: message.sender_id,
            sender_name: message.sender_name,
            content: message.content,
            attachment: message.attachment,
            created_at: Utc::now(),
        };
        self.created.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

/// Directory handing out deterministic names
#[derive(Default)]
pub struct FakeDirectory {
    names: Mutex<HashMap<UserId, String>>,
}

impl FakeDirectory {
    pub fn name(&self, user: UserId, name: impl Into<String>) {
        self.names.lock().unwrap().insert(user, name.into());
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn profile(&self, user_id: &UserId) -> Result<UserProfile> {
        let name = self
            .names
            .lock()
            .unwrap()
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| "User".to_string());
        Ok(UserProfile::new(*user_id, name))
    }
}

/// Fully wired orchestrator over in-memory stores and recording fakes
pub struct TestWorld {
    pub orchestrator: Arc<CallOrchestrator>,
    pub projector: HistoryProjector,
    pub sessions: Arc<InMemoryCallSessionStore>,
    pub participants: Arc<InMemoryCallParticipantStore>,
    pub guard: Arc<FakeRoomGuard>,
    pub notifier: Arc<RecordingNotifier>,
    pub push: Arc<RecordingPush>,
    pub messages: Arc<RecordingMessages>,
    pub directory: Arc<FakeDirectory>,
    pub scheduler: Arc<TimeoutScheduler>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_ring_timeout(Duration::from_secs(60))
    }

    pub fn with_ring_timeout(ring_timeout: Duration) -> Self {
        init_tracing();
        let sessions = Arc::new(InMemoryCallSessionStore::new());
        let participants = Arc::new(InMemoryCallParticipantStore::new());
        let guard = Arc::new(FakeRoomGuard::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let push = Arc::new(RecordingPush::default());
        let messages = Arc::new(RecordingMessages::default());
        let directory = Arc::new(FakeDirectory::default());
        let scheduler = Arc::new(TimeoutScheduler::new());
        let settings = Arc::new(StaticConfigSource::from_call_config(CallConfig {
            allow_call: true,
            ring_timeout,
        }));

        let orchestrator = Arc::new(CallOrchestrator::new(
            sessions.clone(),
            participants.clone(),
            guard.clone(),
            notifier.clone(),
            push.clone(),
            messages.clone(),
            directory.clone(),
            settings,
            scheduler.clone(),
        ));
        let projector = HistoryProjector::new(sessions.clone(), directory.clone());

        Self {
            orchestrator,
            projector,
            sessions,
            participants,
            guard,
            notifier,
            push,
            messages,
            directory,
            scheduler,
        }
    }
}
