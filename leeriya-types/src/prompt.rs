use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A single text prompt steering the generator, weighted relative to the
/// others in the room's prompt list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPrompt {
    pub id: String,
    pub text: String,
    pub weight: f64,
    pub created_by: Role,
}

impl WeightedPrompt {
    pub const MAX_TEXT_LEN: usize = 300;
    pub const MIN_WEIGHT: f64 = -10.0;
    pub const MAX_WEIGHT: f64 = 10.0;

    pub fn validate_text(text: &str) -> bool {
        !text.is_empty() && text.chars().count() <= Self::MAX_TEXT_LEN
    }

    pub fn validate_weight(weight: f64) -> bool {
        (Self::MIN_WEIGHT..=Self::MAX_WEIGHT).contains(&weight)
    }
}
