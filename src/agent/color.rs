//! Avatar body color palette

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the eight palette colors an avatar body can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyColor {
    Blue,
    Red,
    Yellow,
    Green,
    Orange,
    Pink,
    Purple,
    Cyan,
}

impl BodyColor {
    pub const PALETTE: [BodyColor; 8] = [
        BodyColor::Blue,
        BodyColor::Red,
        BodyColor::Yellow,
        BodyColor::Green,
        BodyColor::Orange,
        BodyColor::Pink,
        BodyColor::Purple,
        BodyColor::Cyan,
    ];

    /// Lowercase `#rrggbb` form
    pub fn hex(&self) -> &'static str {
        match self {
            BodyColor::Blue => "#4285f4",
            BodyColor::Red => "#ea4335",
            BodyColor::Yellow => "#fbbc04",
            BodyColor::Green => "#34a853",
            BodyColor::Orange => "#fa7b17",
            BodyColor::Pink => "#f538a0",
            BodyColor::Purple => "#a142f4",
            BodyColor::Cyan => "#24c1e0",
        }
    }

    /// Uniform pick from the palette
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> BodyColor {
        *Self::PALETTE.choose(rng).unwrap_or(&BodyColor::Blue)
    }
}

impl std::fmt::Display for BodyColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hex())
    }
}

impl std::str::FromStr for BodyColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let wanted = if wanted.starts_with('#') { wanted } else { format!("#{}", wanted) };
        Self::PALETTE
            .iter()
            .find(|c| c.hex() == wanted)
            .copied()
            .ok_or_else(|| format!("Color {} is not in the palette", s))
    }
}

impl Serialize for BodyColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

impl<'de> Deserialize<'de> for BodyColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
