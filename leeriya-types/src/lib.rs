//! Shared data model for the collaborative room runtime.
//!
//! This crate has no behavior of its own: it only defines the wire and
//! in-memory shapes that `leeriya-core` mutates and `leeriya-net` serializes.
//! Keeping it dependency-light means both the room logic and the transport
//! layer can depend on it without dragging in tokio or axum.
//!
//! ## Module overview
//! - [`role`]: the two fixed participant identities and their display colors.
//! - [`scale`]: the 13-member musical scale enumeration.
//! - [`prompt`]: weighted text prompts steering the generator.
//! - [`music_config`]: the validated music-configuration bundle.
//! - [`participant`]: per-role connection/interaction state.
//! - [`room_state`]: the room aggregate broadcast to control subscribers.
//! - [`event`]: inbound/outbound control-channel envelopes.

pub mod event;
pub mod music_config;
pub mod participant;
pub mod prompt;
pub mod role;
pub mod room_state;
pub mod scale;

pub use event::{ClientEvent, ServerEvent};
pub use music_config::MusicConfig;
pub use participant::ParticipantState;
pub use prompt::WeightedPrompt;
pub use role::Role;
pub use room_state::{PlaybackState, RoomState};
pub use scale::Scale;
