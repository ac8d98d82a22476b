use chrono::{DateTime, Utc};

/// A short-lived claim on a role, granted at HTTP join time and consumed at
/// WebSocket registration. Not part of the externally observable room state:
/// purely transient bookkeeping inside the room.
#[derive(Debug, Clone, Copy)]
pub struct Reservation {
    pub expires_at: DateTime<Utc>,
}
