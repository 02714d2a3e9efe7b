//! Agent personas for the talking avatar
//!
//! An agent is a named persona with:
//! - personality text (what the speech model role-plays)
//! - a voice from the fixed catalog
//! - a body color from the fixed palette
//! - an optional thumbnail

pub mod color;
pub mod model;
pub mod presets;
pub mod prompt;
pub mod registry;
pub mod voice;

pub use color::BodyColor;
pub use model::{Agent, AgentPatch};
pub use registry::AgentRegistry;
pub use voice::Voice;
