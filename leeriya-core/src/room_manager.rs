//! The process-wide room registry: creates rooms, looks them up, and
//! reaps idle ones on a timer. A single mutex guards the `room_id -> Room`
//! map; operations snapshot the registry before doing per-room work so the
//! manager lock is never held across a room's own lock or its I/O.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::RoomError;
use crate::generator::AudioChunkCallback;
use crate::generator::GeneratorSession;
use crate::room::Room;

pub const REAPER_INTERVAL: Duration = Duration::from_secs(20);

/// Configuration a freshly created room needs; owned by the manager and
/// handed to every `Room::new` call.
pub struct RoomManagerConfig {
    pub reservation_ttl: Duration,
    pub room_idle_timeout: Duration,
    pub use_mock_generator: bool,
    pub remote_config: Option<crate::generator::remote::RemoteSessionConfig>,
}

pub struct RoomManager {
    rooms: Mutex<HashMap<String, Arc<Room>>>,
    config: RoomManagerConfig,
}

impl RoomManager {
    pub fn new(config: RoomManagerConfig) -> Arc<RoomManager> {
        Arc::new(RoomManager {
            rooms: Mutex::new(HashMap::new()),
            config,
        })
    }

    pub async fn create_room(&self) -> Arc<Room> {
        let room_id = Uuid::new_v4().to_string();
        let use_mock = self.config.use_mock_generator;
        let remote_config = self.config.remote_config.clone();
        let room = Room::new(
            room_id.clone(),
            self.config.reservation_ttl,
            self.config.room_idle_timeout,
            move |callback: AudioChunkCallback| -> Arc<dyn GeneratorSession> {
                crate::generator::factory::create_generator_session(use_mock, remote_config, callback)
            },
        );
        self.rooms.lock().await.insert(room_id, room.clone());
        room
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Arc<Room>, RoomError> {
        self.rooms
            .lock()
            .await
            .get(room_id)
            .cloned()
            .ok_or(RoomError::RoomNotFound)
    }

    pub async fn list_room_ids(&self) -> Vec<String> {
        self.rooms.lock().await.keys().cloned().collect()
    }

    pub async fn close_room_if_idle(&self, room_id: &str) {
        let room = self.rooms.lock().await.get(room_id).cloned();
        let Some(room) = room else { return };
        if room.is_idle(chrono::Utc::now()).await {
            room.close().await;
            self.rooms.lock().await.remove(room_id);
        }
    }

    pub async fn close_idle_rooms(&self) {
        let ids = self.list_room_ids().await;
        for id in ids {
            self.close_room_if_idle(&id).await;
        }
    }

    pub async fn close_all(&self) {
        let rooms: Vec<Arc<Room>> = self.rooms.lock().await.drain().map(|(_, r)| r).collect();
        for room in rooms {
            room.close().await;
        }
    }
}

/// Runs for the process lifetime: repeatedly reaps idle rooms, then waits
/// for either the cancellation token or the fixed reaper interval.
pub async fn run_idle_reaper(manager: Arc<RoomManager>, cancel: tokio_util::sync::CancellationToken) {
    loop {
        manager.close_idle_rooms().await;
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(REAPER_INTERVAL) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RoomManagerConfig {
        RoomManagerConfig {
            reservation_ttl: Duration::from_secs(30),
            room_idle_timeout: Duration::from_secs(1800),
            use_mock_generator: true,
            remote_config: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let manager = RoomManager::new(test_config());
        let room = manager.create_room().await;
        let found = manager.get_room(room.room_id()).await.unwrap();
        assert_eq!(found.room_id(), room.room_id());
    }

    #[tokio::test]
    async fn get_unknown_room_fails() {
        let manager = RoomManager::new(test_config());
        assert!(matches!(
            manager.get_room("nope").await,
            Err(RoomError::RoomNotFound)
        ));
    }

    #[tokio::test]
    async fn idle_room_is_reaped() {
        let mut config = test_config();
        config.room_idle_timeout = Duration::from_secs(1);
        let manager = RoomManager::new(config);
        let room = manager.create_room().await;
        let room_id = room.room_id().to_string();

        room.set_updated_at_for_test(chrono::Utc::now() - chrono::Duration::seconds(2))
            .await;
        manager.close_idle_rooms().await;

        assert!(matches!(
            manager.get_room(&room_id).await,
            Err(RoomError::RoomNotFound)
        ));
    }

    #[tokio::test]
    async fn active_room_is_not_reaped() {
        let mut config = test_config();
        config.room_idle_timeout = Duration::from_secs(1800);
        let manager = RoomManager::new(config);
        let room = manager.create_room().await;
        let room_id = room.room_id().to_string();

        manager.close_idle_rooms().await;

        assert!(manager.get_room(&room_id).await.is_ok());
    }
}
