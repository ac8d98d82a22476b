use leeriya_core::{RoomError, TokenCodec, TokenError};
use leeriya_types::Role;
use serde_json::Value;

pub struct TokenClaims {
    pub role: Role,
}

/// Verifies signature and expiry, then checks that `payload.room_id`
/// matches the path and that `payload.role` is a valid role.
pub fn authorize(codec: &TokenCodec, token: &str, expected_room_id: &str) -> Result<TokenClaims, RoomError> {
    let payload = codec.verify(token).map_err(RoomError::Token)?;

    let room_id = payload
        .get("room_id")
        .and_then(Value::as_str)
        .ok_or(RoomError::Token(TokenError::InvalidFormat))?;
    if room_id != expected_room_id {
        return Err(RoomError::Token(TokenError::InvalidFormat));
    }

    let role = payload
        .get("role")
        .and_then(Value::as_str)
        .and_then(Role::parse)
        .ok_or(RoomError::Token(TokenError::InvalidFormat))?;

    Ok(TokenClaims { role })
}
