use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use leeriya_core::generator::{CHANNELS, SAMPLE_RATE_HZ};
use leeriya_types::event::AudioFormatPayload;
use leeriya_types::ServerEvent;

use crate::state::AppState;
use crate::token_auth::authorize;
use crate::ws_control::TokenQuery;

const CLOSE_ROOM_NOT_FOUND: u16 = 4404;
const CLOSE_UNAUTHORIZED: u16 = 4401;

pub async fn audio_ws_handler(
    Path(room_id): Path<String>,
    Query(query): Query<TokenQuery>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_audio_socket(socket, room_id, query.token, state))
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: &str) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.to_string().into(),
        })))
        .await;
}

async fn handle_audio_socket(mut socket: WebSocket, room_id: String, token: Option<String>, state: AppState) {
    let Some(token) = token else {
        close_with(&mut socket, CLOSE_UNAUTHORIZED, "Missing token").await;
        return;
    };
    if authorize(&state.token_codec, &token, &room_id).is_err() {
        close_with(&mut socket, CLOSE_UNAUTHORIZED, "Invalid token").await;
        return;
    }

    let room = match state.room_manager.get_room(&room_id).await {
        Ok(room) => room,
        Err(_) => {
            close_with(&mut socket, CLOSE_ROOM_NOT_FOUND, "Room not found").await;
            return;
        }
    };
    room.ensure_session().await;

    let (mut sink, mut stream) = socket.split();

    let format_event = ServerEvent::AudioFormat {
        payload: AudioFormatPayload::pcm16(SAMPLE_RATE_HZ, CHANNELS as u8),
    };
    if let Ok(text) = serde_json::to_string(&format_event) {
        if sink.send(Message::Text(text)).await.is_err() {
            return;
        }
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Vec<u8>>();
    let subscriber_id = room.register_audio_socket(tx).await;

    let outbound = tokio::spawn(async move {
        while let Some(chunk) = rx.recv().await {
            if sink.send(Message::Binary(chunk)).await.is_err() {
                break;
            }
        }
    });

    // Inbound messages are ignored; this loop only exists to notice
    // disconnects (the stream ends) without blocking the outbound task.
    while stream.next().await.is_some() {}

    outbound.abort();
    room.unregister_audio_socket(subscriber_id).await;
    state.room_manager.close_room_if_idle(&room_id).await;
}
