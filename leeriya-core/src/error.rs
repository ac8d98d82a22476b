use thiserror::Error;

/// Errors raised validating or verifying a bearer token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    InvalidFormat,
    #[error("signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

/// Errors raised by room, room-manager, and dispatcher operations.
///
/// Every variant here corresponds to one of the error kinds named in the
/// transport-facing error design: HTTP/WS surfacing is implemented at the
/// `leeriya-net` boundary, not here, so this crate stays free of axum.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room not found")]
    RoomNotFound,
    #[error("both roles are taken")]
    Capacity,
    #[error("prompt not found")]
    PromptNotFound,
    #[error("unsupported event type: {0}")]
    UnsupportedEvent(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Token(#[from] TokenError),
}
