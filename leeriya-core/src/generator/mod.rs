//! The generator-session contract: a long-lived object producing raw PCM
//! audio frames, with lifecycle, transport, and state-reconciliation
//! operations. Rooms depend on this capability set, not on a concrete
//! variant: [`mock::MockGeneratorSession`] and [`remote::RemoteGeneratorSession`]
//! are interchangeable behind it.

pub mod factory;
pub mod mock;
pub mod remote;
pub mod synth;

use std::sync::Arc;

use async_trait::async_trait;
use leeriya_types::RoomState;

pub use synth::{CHANNELS, FRAME_BYTES, FRAME_MS, FRAME_SAMPLES, SAMPLE_RATE_HZ};

/// Invoked on every frame boundary while a session is playing, with a
/// freshly allocated buffer of raw interleaved PCM16 stereo audio.
pub type AudioChunkCallback = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

#[async_trait]
pub trait GeneratorSession: Send + Sync {
    /// Idempotent; begins producing frames.
    async fn start(&self);
    /// Idempotent; stops production and awaits any background producer.
    async fn close(&self);
    /// Reconciles internal configuration with the room's current state.
    async fn apply_state(&self, state: &RoomState);
    async fn play(&self);
    async fn pause(&self);
    async fn stop(&self);
    async fn reset_context(&self);
}
