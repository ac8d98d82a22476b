use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leeriya_core::RoomError;
use serde_json::json;

/// Wraps [`RoomError`] so this crate can implement `IntoResponse` for it
/// (the trait and the error type both live outside this crate otherwise).
/// Maps each kind to the HTTP status the error-handling design specifies.
pub struct ApiError(pub RoomError);

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RoomError::RoomNotFound => StatusCode::NOT_FOUND,
            RoomError::Capacity => StatusCode::CONFLICT,
            RoomError::PromptNotFound => StatusCode::NOT_FOUND,
            RoomError::UnsupportedEvent(_) | RoomError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            RoomError::Token(_) => StatusCode::UNAUTHORIZED,
        };
        (status, Json(json!({ "message": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
