use serde::{Deserialize, Serialize};

/// One of the two fixed seats in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    A,
    B,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::A => Role::B,
            Role::B => Role::A,
        }
    }

    /// Fixed display color for this role, matching the original `ROLE_COLORS`
    /// table. Not configurable.
    pub fn color(self) -> &'static str {
        match self {
            Role::A => "#2f7bff",
            Role::B => "#ff4a4a",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::A => "A",
            Role::B => "B",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "A" => Some(Role::A),
            "B" => Some(Role::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
