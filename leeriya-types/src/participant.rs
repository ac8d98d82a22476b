use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Per-role connection and interaction state. Always exactly two entries
/// exist in a room's participant map, even while disconnected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantState {
    pub role: Role,
    pub color: String,
    pub connected: bool,
    pub active_control: Option<String>,
}

impl ParticipantState {
    pub fn new(role: Role) -> Self {
        ParticipantState {
            color: role.color().to_string(),
            role,
            connected: false,
            active_control: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_disconnected_with_fixed_color() {
        let p = ParticipantState::new(Role::A);
        assert!(!p.connected);
        assert_eq!(p.color, "#2f7bff");
        assert_eq!(p.active_control, None);
    }
}
