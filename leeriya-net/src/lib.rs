//! HTTP/WebSocket transport for the room runtime: an axum `Router` exposing
//! the room-management REST endpoints and the two per-room WebSocket
//! channels, wired to a `leeriya_core::RoomManager`.
//!
//! ## Module overview
//! - [`state`]: the shared `AppState` handed to every handler.
//! - [`http`]: `/health`, `/api/rooms`, join, and state-snapshot handlers.
//! - [`ws_control`]: the bidirectional JSON control channel.
//! - [`ws_audio`]: the one-way binary audio channel.
//! - [`token_auth`]: WebSocket query-token verification.
//! - [`error`]: maps `leeriya_core::RoomError` onto HTTP responses.
//! - [`routes`]: assembles the full `Router`.

pub mod error;
pub mod http;
pub mod routes;
pub mod state;
pub mod token_auth;
pub mod ws_audio;
pub mod ws_control;

pub use routes::build_router;
pub use state::AppState;
