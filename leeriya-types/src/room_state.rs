use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::music_config::MusicConfig;
use crate::participant::ParticipantState;
use crate::prompt::WeightedPrompt;
use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
    Stopped,
}

/// The authoritative per-room aggregate, broadcast in full to every control
/// subscriber on every mutation. Cheap to clone: this is the snapshot type
/// produced inside the room lock and handed outside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomState {
    pub room_id: String,
    pub prompts: Vec<WeightedPrompt>,
    pub music_config: MusicConfig,
    pub participants: HashMap<Role, ParticipantState>,
    pub playback_state: PlaybackState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomState {
    pub fn new(room_id: String, now: DateTime<Utc>) -> Self {
        let mut participants = HashMap::with_capacity(2);
        participants.insert(Role::A, ParticipantState::new(Role::A));
        participants.insert(Role::B, ParticipantState::new(Role::B));
        RoomState {
            room_id,
            prompts: Vec::new(),
            music_config: MusicConfig::default(),
            participants,
            playback_state: PlaybackState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_room_has_both_roles() {
        let now = Utc::now();
        let room = RoomState::new("room-1".into(), now);
        assert_eq!(room.participants.len(), 2);
        assert!(room.participants.contains_key(&Role::A));
        assert!(room.participants.contains_key(&Role::B));
        assert_eq!(room.playback_state, PlaybackState::Paused);
    }

    #[test]
    fn participants_serialize_as_ab_map() {
        let room = RoomState::new("room-1".into(), Utc::now());
        let json = serde_json::to_value(&room).unwrap();
        assert!(json["participants"]["A"].is_object());
        assert!(json["participants"]["B"].is_object());
    }
}
