//! Voice catalog and voice assignment
//!
//! Voices are grouped by how they are perceived:
//! - male-leaning: Charon, Fenrir, Orus, Puck
//! - female-leaning: Aoede, Kore, Leda, Zephyr
//!
//! When the category is unknown the pick falls back to a coin flip between
//! Charon and Aoede.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::inference::InferredCategory;

/// Voices offered by the speech service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    Aoede,
    Charon,
    Fenrir,
    Kore,
    Leda,
    Orus,
    Puck,
    Zephyr,
}

impl Voice {
    /// Every voice, in catalog order
    pub const ALL: [Voice; 8] = [
        Voice::Aoede,
        Voice::Charon,
        Voice::Fenrir,
        Voice::Kore,
        Voice::Leda,
        Voice::Orus,
        Voice::Puck,
        Voice::Zephyr,
    ];

    pub const MALE: [Voice; 4] = [Voice::Charon, Voice::Fenrir, Voice::Orus, Voice::Puck];

    pub const FEMALE: [Voice; 4] = [Voice::Aoede, Voice::Kore, Voice::Leda, Voice::Zephyr];

    /// Fallback pair used when the category could not be inferred
    pub const UNCERTAIN: [Voice; 2] = [Voice::Charon, Voice::Aoede];

    pub fn name(&self) -> &'static str {
        match self {
            Voice::Aoede => "Aoede",
            Voice::Charon => "Charon",
            Voice::Fenrir => "Fenrir",
            Voice::Kore => "Kore",
            Voice::Leda => "Leda",
            Voice::Orus => "Orus",
            Voice::Puck => "Puck",
            Voice::Zephyr => "Zephyr",
        }
    }

    /// Coin flip between the two fallback voices
    pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> Voice {
        if rng.gen_bool(0.5) { Voice::Charon } else { Voice::Aoede }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Voice::ALL
            .iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown voice: {}", s))
    }
}

/// Voices a category may be assigned
pub fn candidates(category: InferredCategory) -> &'static [Voice] {
    match category {
        InferredCategory::Male => &Voice::MALE,
        InferredCategory::Female => &Voice::FEMALE,
        InferredCategory::Uncertain => &Voice::UNCERTAIN,
    }
}

/// Pick a voice for an inferred category
pub fn assign_voice<R: Rng + ?Sized>(category: InferredCategory, rng: &mut R) -> Voice {
    match category {
        InferredCategory::Uncertain => Voice::coin_flip(rng),
        // Both pools are non-empty constants
        _ => *candidates(category).choose(rng).unwrap_or(&Voice::Charon),
    }
}
