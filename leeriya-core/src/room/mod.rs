//! The per-room aggregate: authoritative `RoomState`, the generator session,
//! subscriber sets, and pending role reservations, all behind one
//! mutual-exclusion region. Mutations follow the lock-hygiene pattern: enter
//! the lock, mutate, snapshot, exit the lock, then perform generator I/O and
//! fan-out against the snapshot and a copied subscriber list.

mod fanout;
mod mutation;
mod reservation;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use leeriya_types::{Role, RoomState, ServerEvent};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::RoomError;
use crate::generator::GeneratorSession;

pub use reservation::Reservation;

pub type ControlSender = UnboundedSender<ServerEvent>;
pub type AudioSender = UnboundedSender<Vec<u8>>;

struct Inner {
    state: RoomState,
    reservations: HashMap<Role, Reservation>,
    control_sockets: HashMap<Role, ControlSender>,
    audio_sockets: HashMap<u64, AudioSender>,
}

pub struct Room {
    room_id: String,
    inner: Arc<Mutex<Inner>>,
    generator: Arc<dyn GeneratorSession>,
    audio_fanout: JoinHandle<()>,
    next_audio_subscriber_id: AtomicU64,
    session_started: AtomicBool,
    reservation_ttl: chrono::Duration,
    idle_timeout: chrono::Duration,
}

impl Room {
    /// `build_generator` receives the audio-chunk callback the room will use
    /// to fan chunks out to audio subscribers; it is invoked once, here,
    /// rather than the generator reaching back into the room.
    pub fn new(
        room_id: String,
        reservation_ttl: Duration,
        idle_timeout: Duration,
        build_generator: impl FnOnce(crate::generator::AudioChunkCallback) -> Arc<dyn GeneratorSession>,
    ) -> Arc<Room> {
        let now = Utc::now();
        let inner = Mutex::new(Inner {
            state: RoomState::new(room_id.clone(), now),
            reservations: HashMap::new(),
            control_sockets: HashMap::new(),
            audio_sockets: HashMap::new(),
        });

        let (audio_tx, audio_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let callback: crate::generator::AudioChunkCallback = Arc::new(move |chunk| {
            let _ = audio_tx.send(chunk);
        });
        let generator = build_generator(callback);

        let inner = Arc::new(inner);
        let audio_fanout = fanout::spawn(inner.clone(), audio_rx);

        Arc::new(Room {
            room_id,
            inner,
            generator,
            audio_fanout,
            next_audio_subscriber_id: AtomicU64::new(0),
            session_started: AtomicBool::new(false),
            reservation_ttl: chrono::Duration::from_std(reservation_ttl).unwrap_or_default(),
            idle_timeout: chrono::Duration::from_std(idle_timeout).unwrap_or_default(),
        })
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Lazily starts the generator on first subscriber registration; safe to
    /// call more than once.
    pub async fn ensure_session(&self) {
        if !self.session_started.swap(true, Ordering::SeqCst) {
            self.generator.start().await;
        }
    }

    pub async fn close(&self) {
        self.generator.close().await;
        self.audio_fanout.abort();
    }

    pub async fn snapshot(&self) -> RoomState {
        self.inner.lock().await.state.clone()
    }

    pub async fn is_idle(&self, now: chrono::DateTime<Utc>) -> bool {
        let inner = self.inner.lock().await;
        inner.control_sockets.is_empty()
            && inner.audio_sockets.is_empty()
            && (now - inner.state.updated_at) >= self.idle_timeout
    }

    #[cfg(test)]
    pub async fn set_updated_at_for_test(&self, when: chrono::DateTime<Utc>) {
        self.inner.lock().await.state.updated_at = when;
    }

    // --- role reservation -----------------------------------------------

    pub async fn reserve_role(&self, preferred: Option<Role>) -> Result<Role, RoomError> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();
        inner.reservations.retain(|_, r| r.expires_at > now);

        let taken: std::collections::HashSet<Role> = inner
            .control_sockets
            .keys()
            .copied()
            .chain(inner.reservations.keys().copied())
            .collect();

        let candidates = match preferred {
            Some(role) => vec![role, role.other()],
            None => vec![Role::A, Role::B],
        };

        for role in candidates {
            if !taken.contains(&role) {
                inner.reservations.insert(
                    role,
                    Reservation {
                        expires_at: now + self.reservation_ttl,
                    },
                );
                return Ok(role);
            }
        }
        Err(RoomError::Capacity)
    }

    // --- subscriber management -------------------------------------------

    pub async fn register_control_socket(&self, role: Role, sender: ControlSender) {
        let mut inner = self.inner.lock().await;
        inner.reservations.remove(&role);
        inner.control_sockets.insert(role, sender);
        if let Some(p) = inner.state.participants.get_mut(&role) {
            p.connected = true;
            p.active_control = None;
        }
        inner.state.updated_at = Utc::now();
    }

    pub async fn unregister_control_socket(&self, role: Role) {
        let mut inner = self.inner.lock().await;
        inner.control_sockets.remove(&role);
        if let Some(p) = inner.state.participants.get_mut(&role) {
            p.connected = false;
            p.active_control = None;
        }
        inner.state.updated_at = Utc::now();
    }

    pub async fn register_audio_socket(&self, sender: AudioSender) -> u64 {
        let id = self.next_audio_subscriber_id.fetch_add(1, Ordering::SeqCst);
        self.inner.lock().await.audio_sockets.insert(id, sender);
        id
    }

    pub async fn unregister_audio_socket(&self, id: u64) {
        self.inner.lock().await.audio_sockets.remove(&id);
    }

    /// Broadcasts the current snapshot to every control subscriber, dropping
    /// any whose send fails and marking that role disconnected.
    pub async fn broadcast_state(&self) {
        let (snapshot, subs) = {
            let inner = self.inner.lock().await;
            let subs: Vec<(Role, ControlSender)> = inner
                .control_sockets
                .iter()
                .map(|(r, s)| (*r, s.clone()))
                .collect();
            (inner.state.clone(), subs)
        };
        let event = ServerEvent::StateSnapshot { payload: snapshot };
        let mut stale = Vec::new();
        for (role, sender) in subs {
            if sender.send(event.clone()).is_err() {
                stale.push(role);
            }
        }
        if !stale.is_empty() {
            let mut inner = self.inner.lock().await;
            for role in stale {
                inner.control_sockets.remove(&role);
                if let Some(p) = inner.state.participants.get_mut(&role) {
                    p.connected = false;
                    p.active_control = None;
                }
            }
        }
    }

    pub async fn send_error_to(&self, role: Role, message: String) {
        let sender = self.inner.lock().await.control_sockets.get(&role).cloned();
        if let Some(sender) = sender {
            let _ = sender.send(ServerEvent::Error {
                payload: leeriya_types::event::ErrorPayload { message },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_room() -> Arc<Room> {
        test_room_with_ttl(Duration::from_secs(30))
    }

    fn test_room_with_ttl(reservation_ttl: Duration) -> Arc<Room> {
        Room::new(
            "room-1".into(),
            reservation_ttl,
            Duration::from_secs(1800),
            |cb| Arc::new(crate::generator::mock::MockGeneratorSession::new(cb)),
        )
    }

    #[tokio::test]
    async fn third_reservation_hits_capacity() {
        let room = test_room();
        room.reserve_role(None).await.unwrap();
        room.reserve_role(None).await.unwrap();
        assert!(matches!(room.reserve_role(None).await, Err(RoomError::Capacity)));
    }

    #[tokio::test]
    async fn expired_reservation_frees_its_role() {
        let room = test_room_with_ttl(Duration::from_millis(20));
        room.reserve_role(Some(Role::A)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(room.reserve_role(Some(Role::A)).await.unwrap(), Role::A);
    }

    #[tokio::test]
    async fn registered_role_cannot_be_reserved() {
        let room = test_room();
        let (tx, _rx) = mpsc::unbounded_channel();
        room.register_control_socket(Role::A, tx).await;

        assert_eq!(room.reserve_role(Some(Role::A)).await.unwrap(), Role::B);
        assert!(matches!(
            room.reserve_role(Some(Role::B)).await,
            Err(RoomError::Capacity)
        ));
    }

    #[tokio::test]
    async fn updated_at_never_decreases_across_mutations() {
        let room = test_room();
        let t0 = room.snapshot().await.updated_at;

        room.add_prompt(Role::A, "minimal techno".into(), 1.0).await.unwrap();
        let t1 = room.snapshot().await.updated_at;
        assert!(t1 >= t0);

        room.handle_playback_command("play").await.unwrap();
        let t2 = room.snapshot().await.updated_at;
        assert!(t2 >= t1);
    }

    #[tokio::test]
    async fn invalid_patch_leaves_config_untouched() {
        let room = test_room();
        let before = room.snapshot().await.music_config;

        let mut patch = serde_json::Map::new();
        patch.insert("bpm".to_string(), serde_json::json!(999));
        let err = room.apply_music_config_patch(patch).await.unwrap_err();
        assert!(matches!(err, RoomError::InvalidArgument(_)));
        assert_eq!(room.snapshot().await.music_config, before);
    }

    #[tokio::test]
    async fn broadcast_survives_one_stale_subscriber() {
        let room = test_room();
        let (tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        room.register_control_socket(Role::A, tx_a).await;
        room.register_control_socket(Role::B, tx_b).await;
        drop(rx_a);

        room.broadcast_state().await;

        assert!(rx_b.try_recv().is_ok());
        let snapshot = room.snapshot().await;
        assert!(!snapshot.participants[&Role::A].connected);
        assert!(snapshot.participants[&Role::B].connected);
    }
}
