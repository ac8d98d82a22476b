//! The control dispatcher: a pure mapping from an authenticated inbound
//! control event to room mutations plus a broadcast. Errors never tear down
//! the room: the socket-handling layer in `leeriya-net` catches them and
//! returns `server.error` to the originating subscriber only.

use leeriya_types::{ClientEvent, Role};

use crate::error::RoomError;
use crate::room::Room;

pub async fn dispatch_event(room: &Room, role: Role, event: ClientEvent) -> Result<(), RoomError> {
    match event.event_type.as_str() {
        "control.patch" => {
            let patch = event
                .payload
                .get("patch")
                .and_then(|v| v.as_object())
                .cloned()
                .ok_or_else(|| RoomError::InvalidArgument("missing patch object".into()))?;
            room.apply_music_config_patch(patch).await?;
            room.broadcast_state().await;
        }
        "prompt.add" => {
            let text = event
                .payload
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| RoomError::InvalidArgument("missing text".into()))?
                .to_string();
            let weight = event.payload.get("weight").and_then(|v| v.as_f64()).unwrap_or(1.0);
            room.add_prompt(role, text, weight).await?;
            room.broadcast_state().await;
        }
        "prompt.update_weight" => {
            let prompt_id = event
                .payload
                .get("promptId")
                .and_then(|v| v.as_str())
                .ok_or_else(|| RoomError::InvalidArgument("missing promptId".into()))?;
            let weight = event
                .payload
                .get("weight")
                .and_then(|v| v.as_f64())
                .ok_or_else(|| RoomError::InvalidArgument("missing weight".into()))?;
            room.update_prompt_weight(prompt_id, weight).await?;
            room.broadcast_state().await;
        }
        "prompt.remove" => {
            let prompt_id = event
                .payload
                .get("promptId")
                .and_then(|v| v.as_str())
                .ok_or_else(|| RoomError::InvalidArgument("missing promptId".into()))?;
            room.remove_prompt(prompt_id).await?;
            room.broadcast_state().await;
        }
        "playback.command" => {
            let command = event
                .payload
                .get("command")
                .and_then(|v| v.as_str())
                .ok_or_else(|| RoomError::InvalidArgument("missing command".into()))?;
            room.handle_playback_command(command).await?;
            room.broadcast_state().await;
        }
        "control.interaction" => {
            let active = event.payload.get("active").and_then(|v| v.as_bool()).unwrap_or(false);
            let control_id = event
                .payload
                .get("controlId")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            room.set_active_control(role, active, control_id).await;
            room.broadcast_state().await;
        }
        "ping" => {}
        other => return Err(RoomError::UnsupportedEvent(other.to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use leeriya_types::ClientEvent;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_room() -> std::sync::Arc<Room> {
        Room::new(
            "room-1".into(),
            Duration::from_secs(30),
            Duration::from_secs(1800),
            |cb| std::sync::Arc::new(crate::generator::mock::MockGeneratorSession::new(cb)),
        )
    }

    /// Counts calls instead of doing anything, so a test can assert *that*
    /// a transport command reached the generator, not just that the room's
    /// own state changed.
    #[derive(Default)]
    struct CountingGeneratorSession {
        reset_calls: AtomicUsize,
    }

    #[async_trait]
    impl crate::generator::GeneratorSession for CountingGeneratorSession {
        async fn start(&self) {}
        async fn close(&self) {}
        async fn apply_state(&self, _state: &leeriya_types::RoomState) {}
        async fn play(&self) {}
        async fn pause(&self) {}
        async fn stop(&self) {}
        async fn reset_context(&self) {
            self.reset_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn test_room_with_counting_generator() -> (std::sync::Arc<Room>, Arc<CountingGeneratorSession>) {
        let generator = Arc::new(CountingGeneratorSession::default());
        let captured = generator.clone();
        let room = Room::new(
            "room-1".into(),
            Duration::from_secs(30),
            Duration::from_secs(1800),
            move |_cb| captured as Arc<dyn crate::generator::GeneratorSession>,
        );
        (room, generator)
    }

    fn event(event_type: &str, payload: serde_json::Value) -> ClientEvent {
        ClientEvent {
            event_type: event_type.to_string(),
            payload,
        }
    }

    #[tokio::test]
    async fn unsupported_event_errors() {
        let room = test_room();
        let err = dispatch_event(&room, Role::A, event("nonsense", json!({}))).await;
        assert!(matches!(err, Err(RoomError::UnsupportedEvent(_))));
    }

    #[tokio::test]
    async fn ping_is_a_no_op() {
        let room = test_room();
        assert!(dispatch_event(&room, Role::A, event("ping", json!({}))).await.is_ok());
    }

    #[tokio::test]
    async fn prompt_add_then_remove() {
        let room = test_room();
        dispatch_event(
            &room,
            Role::A,
            event("prompt.add", json!({"text": "Minimal techno", "weight": 1.0})),
        )
        .await
        .unwrap();
        let snapshot = room.snapshot().await;
        assert_eq!(snapshot.prompts.len(), 1);
        let id = snapshot.prompts[0].id.clone();

        dispatch_event(&room, Role::A, event("prompt.remove", json!({"promptId": id})))
            .await
            .unwrap();
        assert!(room.snapshot().await.prompts.is_empty());
    }

    #[tokio::test]
    async fn bpm_patch_requires_reset() {
        let room = test_room();
        dispatch_event(
            &room,
            Role::A,
            event("control.patch", json!({"patch": {"bpm": 140}})),
        )
        .await
        .unwrap();
        assert_eq!(room.snapshot().await.music_config.bpm, 140);
    }

    #[tokio::test]
    async fn bpm_patch_calls_reset_context_on_generator() {
        let (room, generator) = test_room_with_counting_generator();
        dispatch_event(
            &room,
            Role::A,
            event("control.patch", json!({"patch": {"bpm": 140}})),
        )
        .await
        .unwrap();
        assert_eq!(generator.reset_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn prompt_weight_update_applies() {
        let room = test_room();
        dispatch_event(
            &room,
            Role::A,
            event("prompt.add", json!({"text": "Minimal techno", "weight": 1.0})),
        )
        .await
        .unwrap();
        let id = room.snapshot().await.prompts[0].id.clone();

        dispatch_event(
            &room,
            Role::A,
            event("prompt.update_weight", json!({"promptId": id, "weight": 2.5})),
        )
        .await
        .unwrap();
        assert_eq!(room.snapshot().await.prompts[0].weight, 2.5);
    }

    #[tokio::test]
    async fn control_interaction_clears_on_inactive() {
        let room = test_room();
        dispatch_event(
            &room,
            Role::A,
            event("control.interaction", json!({"active": true, "controlId": "knob-1"})),
        )
        .await
        .unwrap();
        assert_eq!(
            room.snapshot().await.participants[&Role::A].active_control,
            Some("knob-1".to_string())
        );

        dispatch_event(
            &room,
            Role::A,
            event("control.interaction", json!({"active": false, "controlId": "knob-1"})),
        )
        .await
        .unwrap();
        assert_eq!(room.snapshot().await.participants[&Role::A].active_control, None);
    }
}
