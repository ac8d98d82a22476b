use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use leeriya_core::dispatch::dispatch_event;
use leeriya_types::ClientEvent;
use serde::Deserialize;

use crate::state::AppState;
use crate::token_auth::authorize;

#[derive(Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

const CLOSE_ROOM_NOT_FOUND: u16 = 4404;
const CLOSE_UNAUTHORIZED: u16 = 4401;

pub async fn control_ws_handler(
    Path(room_id): Path<String>,
    Query(query): Query<TokenQuery>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_control_socket(socket, room_id, query.token, state))
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: &str) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.to_string().into(),
        })))
        .await;
}

async fn handle_control_socket(mut socket: WebSocket, room_id: String, token: Option<String>, state: AppState) {
    let Some(token) = token else {
        close_with(&mut socket, CLOSE_UNAUTHORIZED, "Missing token").await;
        return;
    };
    let claims = match authorize(&state.token_codec, &token, &room_id) {
        Ok(claims) => claims,
        Err(_) => {
            close_with(&mut socket, CLOSE_UNAUTHORIZED, "Invalid token").await;
            return;
        }
    };
    let role = claims.role;

    let room = match state.room_manager.get_room(&room_id).await {
        Ok(room) => room,
        Err(_) => {
            close_with(&mut socket, CLOSE_ROOM_NOT_FOUND, "Room not found").await;
            return;
        }
    };
    room.ensure_session().await;

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    room.register_control_socket(role, tx).await;
    room.broadcast_state().await;

    let outbound = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else { continue };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else { continue };
        let client_event: ClientEvent = match serde_json::from_str(&text) {
            Ok(event) => event,
            Err(err) => {
                room.send_error_to(role, format!("malformed event: {err}")).await;
                continue;
            }
        };
        if let Err(err) = dispatch_event(&room, role, client_event).await {
            log::warn!("dispatch error in room {room_id} role {role}: {err}");
            room.send_error_to(role, err.to_string()).await;
        }
    }

    outbound.abort();
    room.unregister_control_socket(role).await;
    room.broadcast_state().await;
    state.room_manager.close_room_if_idle(&room_id).await;
}
