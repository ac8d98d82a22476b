use serde::{Deserialize, Serialize};

use crate::room_state::RoomState;

/// Raw inbound control-channel envelope, exactly `{type, payload}`. The
/// dispatcher interprets `payload` according to `event_type`; this crate
/// only carries the untyped shape across the wire boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Outbound control-channel envelopes. Serializes with an internally
/// tagged `type` discriminant matching the documented wire shapes exactly.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "server.state_snapshot")]
    StateSnapshot { payload: RoomState },
    #[serde(rename = "server.error")]
    Error { payload: ErrorPayload },
    #[serde(rename = "server.audio_format")]
    AudioFormat { payload: AudioFormatPayload },
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioFormatPayload {
    #[serde(rename = "sampleRateHz")]
    pub sample_rate_hz: u32,
    pub channels: u8,
    pub encoding: &'static str,
}

impl AudioFormatPayload {
    pub fn pcm16(sample_rate_hz: u32, channels: u8) -> Self {
        AudioFormatPayload {
            sample_rate_hz,
            channels,
            encoding: "pcm16",
        }
    }
}
