use chrono::Utc;
use leeriya_types::room_state::PlaybackState;
use leeriya_types::{RoomState, WeightedPrompt};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::RoomError;

use super::Room;

fn normalize_config_key(key: &str) -> String {
    match key {
        "musicGenerationMode" => "music_generation_mode".to_string(),
        "muteBass" => "mute_bass".to_string(),
        "muteDrums" => "mute_drums".to_string(),
        "onlyBassAndDrums" => "only_bass_and_drums".to_string(),
        "topK" => "top_k".to_string(),
        other => other.to_string(),
    }
}

impl Room {
    pub async fn add_prompt(&self, role: leeriya_types::Role, text: String, weight: f64) -> Result<RoomState, RoomError> {
        if !WeightedPrompt::validate_text(&text) {
            return Err(RoomError::InvalidArgument("prompt text must be 1-300 characters".into()));
        }
        if !WeightedPrompt::validate_weight(weight) {
            return Err(RoomError::InvalidArgument("prompt weight must be in [-10, 10]".into()));
        }

        let snapshot = {
            let mut inner = self.inner.lock().await;
            inner.state.prompts.push(WeightedPrompt {
                id: Uuid::new_v4().to_string(),
                text,
                weight,
                created_by: role,
            });
            inner.state.updated_at = Utc::now();
            inner.state.clone()
        };
        self.generator.apply_state(&snapshot).await;
        Ok(snapshot)
    }

    pub async fn update_prompt_weight(&self, id: &str, weight: f64) -> Result<RoomState, RoomError> {
        if !WeightedPrompt::validate_weight(weight) {
            return Err(RoomError::InvalidArgument("prompt weight must be in [-10, 10]".into()));
        }

        let snapshot = {
            let mut inner = self.inner.lock().await;
            let prompt = inner
                .state
                .prompts
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(RoomError::PromptNotFound)?;
            prompt.weight = weight;
            inner.state.updated_at = Utc::now();
            inner.state.clone()
        };
        self.generator.apply_state(&snapshot).await;
        Ok(snapshot)
    }

    pub async fn remove_prompt(&self, id: &str) -> Result<RoomState, RoomError> {
        let snapshot = {
            let mut inner = self.inner.lock().await;
            let before = inner.state.prompts.len();
            inner.state.prompts.retain(|p| p.id != id);
            if inner.state.prompts.len() == before {
                return Err(RoomError::PromptNotFound);
            }
            inner.state.updated_at = Utc::now();
            inner.state.clone()
        };
        self.generator.apply_state(&snapshot).await;
        Ok(snapshot)
    }

    /// Normalizes patch keys, merges over the current config, re-validates
    /// the full resulting bundle, and replaces it atomically. The entire
    /// patch is rejected with no partial application on any range violation.
    pub async fn apply_music_config_patch(
        &self,
        patch: Map<String, Value>,
    ) -> Result<(RoomState, bool), RoomError> {
        let normalized: Map<String, Value> = patch
            .into_iter()
            .map(|(k, v)| (normalize_config_key(&k), v))
            .collect();

        let (snapshot, requires_reset) = {
            let mut inner = self.inner.lock().await;

            let mut merged = serde_json::to_value(&inner.state.music_config)
                .ok()
                .and_then(|v| v.as_object().cloned())
                .ok_or_else(|| RoomError::InvalidArgument("corrupt config".into()))?;

            let requires_reset = ["bpm", "scale"].iter().any(|&key| {
                normalized
                    .get(key)
                    .is_some_and(|new_value| merged.get(key) != Some(new_value))
            });

            for (k, v) in normalized {
                merged.insert(k, v);
            }

            let candidate: leeriya_types::MusicConfig = serde_json::from_value(Value::Object(merged))
                .map_err(|e| RoomError::InvalidArgument(format!("invalid config patch: {e}")))?;
            candidate
                .validate()
                .map_err(|e| RoomError::InvalidArgument(e.to_string()))?;

            inner.state.music_config = candidate;
            inner.state.updated_at = Utc::now();
            (inner.state.clone(), requires_reset)
        };

        self.generator.apply_state(&snapshot).await;
        if requires_reset {
            self.generator.reset_context().await;
        }
        Ok((snapshot, requires_reset))
    }

    pub async fn handle_playback_command(&self, command: &str) -> Result<RoomState, RoomError> {
        let command = command.to_ascii_lowercase();
        let snapshot = {
            let mut inner = self.inner.lock().await;
            match command.as_str() {
                "play" => inner.state.playback_state = PlaybackState::Playing,
                "pause" => inner.state.playback_state = PlaybackState::Paused,
                "stop" => inner.state.playback_state = PlaybackState::Stopped,
                "reset_context" => {}
                other => {
                    return Err(RoomError::InvalidArgument(format!(
                        "unknown playback command: {other}"
                    )))
                }
            }
            inner.state.updated_at = Utc::now();
            inner.state.clone()
        };

        match command.as_str() {
            "play" => self.generator.play().await,
            "pause" => self.generator.pause().await,
            "stop" => self.generator.stop().await,
            "reset_context" => self.generator.reset_context().await,
            _ => unreachable!("validated above"),
        }
        self.generator.apply_state(&snapshot).await;
        Ok(snapshot)
    }

    /// `active=false` always clears `active_control`, regardless of any
    /// provided id. `active=true` with an empty-string id stores `None`
    /// (empty strings are coerced to null), matching observed behavior.
    pub async fn set_active_control(
        &self,
        role: leeriya_types::Role,
        active: bool,
        control_id: Option<String>,
    ) -> RoomState {
        let mut inner = self.inner.lock().await;
        let resolved = if active {
            control_id.filter(|s| !s.is_empty())
        } else {
            None
        };
        if let Some(p) = inner.state.participants.get_mut(&role) {
            p.active_control = resolved;
        }
        inner.state.updated_at = Utc::now();
        inner.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Map, Value};

    use super::Room;
    use crate::error::RoomError;

    fn test_room() -> Arc<Room> {
        Room::new(
            "room-1".into(),
            Duration::from_secs(30),
            Duration::from_secs(1800),
            |cb| Arc::new(crate::generator::mock::MockGeneratorSession::new(cb)),
        )
    }

    fn patch(pairs: &[(&str, serde_json::Value)]) -> Map<String, Value> {
        pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[tokio::test]
    async fn same_value_bpm_patch_does_not_require_reset() {
        let room = test_room();
        let current_bpm = room.snapshot().await.music_config.bpm;
        let (_, requires_reset) = room
            .apply_music_config_patch(patch(&[("bpm", json!(current_bpm))]))
            .await
            .unwrap();
        assert!(!requires_reset);
    }

    #[tokio::test]
    async fn changed_bpm_requires_reset() {
        let room = test_room();
        let (_, requires_reset) = room
            .apply_music_config_patch(patch(&[("bpm", json!(150))]))
            .await
            .unwrap();
        assert!(requires_reset);
    }

    #[tokio::test]
    async fn changed_scale_requires_reset() {
        let room = test_room();
        let (_, requires_reset) = room
            .apply_music_config_patch(patch(&[("scale", json!("D_MAJOR_B_MINOR"))]))
            .await
            .unwrap();
        assert!(requires_reset);
    }

    #[tokio::test]
    async fn unrelated_field_change_does_not_require_reset() {
        let room = test_room();
        let (_, requires_reset) = room
            .apply_music_config_patch(patch(&[("guidance", json!(5.0))]))
            .await
            .unwrap();
        assert!(!requires_reset);
    }

    #[tokio::test]
    async fn rejected_patch_applies_nothing() {
        let room = test_room();
        let before = room.snapshot().await.music_config;
        let err = room
            .apply_music_config_patch(patch(&[("bpm", json!(999))]))
            .await
            .unwrap_err();
        assert!(matches!(err, RoomError::InvalidArgument(_)));
        assert_eq!(room.snapshot().await.music_config, before);
    }
}
