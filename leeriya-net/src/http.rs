use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use leeriya_types::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Serialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
    pub join_url: String,
}

pub async fn create_room(headers: HeaderMap, State(state): State<AppState>) -> impl IntoResponse {
    let room = state.room_manager.create_room().await;
    let base_url = base_url(&headers);
    Json(CreateRoomResponse {
        room_id: room.room_id().to_string(),
        join_url: format!("{base_url}/?room={}", room.room_id()),
    })
}

fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

#[derive(Deserialize)]
pub struct JoinRoomRequest {
    pub preferred_role: Option<Role>,
}

#[derive(Serialize)]
pub struct JoinRoomResponse {
    pub room_id: String,
    pub role: Role,
    pub token: String,
}

pub async fn join_room(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<JoinRoomRequest>,
) -> ApiResult<Json<JoinRoomResponse>> {
    let room = state.room_manager.get_room(&room_id).await?;
    let role = room.reserve_role(req.preferred_role).await?;

    let mut payload = BTreeMap::new();
    payload.insert("room_id".to_string(), Value::from(room_id.clone()));
    payload.insert("role".to_string(), Value::from(role.as_str()));
    let token = state.token_codec.create(payload, state.token_ttl_seconds);

    Ok(Json(JoinRoomResponse {
        room_id,
        role,
        token,
    }))
}

pub async fn get_room_state(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<leeriya_types::RoomState>> {
    let room = state.room_manager.get_room(&room_id).await?;
    Ok(Json(room.snapshot().await))
}
