use std::sync::Arc;

use leeriya_core::{RoomManager, TokenCodec};

/// Shared application state handed to every axum handler via `State`.
#[derive(Clone)]
pub struct AppState {
    pub room_manager: Arc<RoomManager>,
    pub token_codec: Arc<TokenCodec>,
    pub token_ttl_seconds: i64,
}
