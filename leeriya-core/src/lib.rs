//! The room runtime: token codec, generator session, room, room manager,
//! and control dispatcher: the concurrent, per-room state machine that
//! backs the collaborative music-generation server.
//!
//! ## Module overview
//! - [`token`]: stateless bearer-token signing and verification.
//! - [`generator`]: the generator-session contract and its mock/remote variants.
//! - [`room`]: the per-room aggregate: state, subscribers, reservations.
//! - [`room_manager`]: the process-wide room registry and idle reaper.
//! - [`dispatch`]: maps an inbound control event to room mutations.
//! - [`error`]: the domain error types shared by all of the above.

pub mod dispatch;
pub mod error;
pub mod generator;
pub mod room;
pub mod room_manager;
pub mod token;

pub use error::{RoomError, TokenError};
pub use room::Room;
pub use room_manager::{RoomManager, RoomManagerConfig};
pub use token::TokenCodec;
