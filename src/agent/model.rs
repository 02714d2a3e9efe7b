//! Agent records and partial updates

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::BodyColor;
use super::voice::Voice;

/// A conversational persona the avatar can role-play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Opaque id, unique across presets and personal agents
    pub id: String,

    /// Display name
    pub name: String,

    /// Instruction text handed to the speech model
    pub personality: String,

    pub body_color: BodyColor,

    pub voice: Voice,

    /// Thumbnail; absent means the face is drawn procedurally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Agent {
    /// A blank agent for hand authoring: random color, coin-flip voice
    #[allow(dead_code)] // for an agent editor front end
    pub fn blank<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            id: new_id(rng),
            name: String::new(),
            personality: String::new(),
            body_color: BodyColor::random(rng),
            voice: Voice::coin_flip(rng),
            image_url: None,
        }
    }

    /// Apply the fields set in `patch`
    pub fn apply(&mut self, patch: &AgentPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref personality) = patch.personality {
            self.personality = personality.clone();
        }
        if let Some(color) = patch.body_color {
            self.body_color = color;
        }
        if let Some(voice) = patch.voice {
            self.voice = voice;
        }
        if let Some(ref image_url) = patch.image_url {
            self.image_url = image_url.clone();
        }
    }
}

/// Partial agent update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPatch {
    pub name: Option<String>,
    pub personality: Option<String>,
    pub body_color: Option<BodyColor>,
    pub voice: Option<Voice>,
    /// `Some(None)` clears the image
    pub image_url: Option<Option<String>>,
}

impl AgentPatch {
    pub fn is_empty(&self) -> bool {
        *self == AgentPatch::default()
    }
}

/// Random v4 UUID drawn from the caller's RNG, so seeded runs are reproducible
pub fn new_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}
