//! In-memory agent registry
//!
//! Holds two collections keyed by id:
//! - presets: the built-in agents
//! - personal: agents synthesized or authored during this process
//!
//! Ids are unique across both. Exactly one agent is current at a time.

use thiserror::Error;

use super::model::{Agent, AgentPatch};
use super::presets;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Agent id already registered: {0}")]
    DuplicateId(String),

    #[error("Agent not found: {0}")]
    UnknownAgent(String),
}

/// Which collection an agent lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Preset,
    Personal,
}

#[derive(Debug, Clone)]
pub struct AgentRegistry {
    presets: Vec<Agent>,
    personal: Vec<Agent>,
    current: String,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::with_presets(presets::all(), presets::DEFAULT_AGENT_ID)
            .unwrap_or_else(|_| Self::empty_with(presets::paul_etiqueta()))
    }
}

impl AgentRegistry {
    /// Build a registry from a preset list; `current` must name one of them
    pub fn with_presets(presets: Vec<Agent>, current: &str) -> Result<Self, RegistryError> {
        for (i, agent) in presets.iter().enumerate() {
            if presets[..i].iter().any(|a| a.id == agent.id) {
                return Err(RegistryError::DuplicateId(agent.id.clone()));
            }
        }
        if !presets.iter().any(|a| a.id == current) {
            return Err(RegistryError::UnknownAgent(current.to_string()));
        }

        Ok(Self {
            presets,
            personal: Vec::new(),
            current: current.to_string(),
        })
    }

    fn empty_with(agent: Agent) -> Self {
        let current = agent.id.clone();
        Self {
            presets: vec![agent],
            personal: Vec::new(),
            current,
        }
    }

    pub fn presets(&self) -> &[Agent] {
        &self.presets
    }

    pub fn personal(&self) -> &[Agent] {
        &self.personal
    }

    /// Look up an agent by id, personal collection first
    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.personal
            .iter()
            .find(|a| a.id == id)
            .or_else(|| self.presets.iter().find(|a| a.id == id))
    }

    pub fn collection_of(&self, id: &str) -> Option<Collection> {
        if self.personal.iter().any(|a| a.id == id) {
            Some(Collection::Personal)
        } else if self.presets.iter().any(|a| a.id == id) {
            Some(Collection::Preset)
        } else {
            None
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn current(&self) -> &Agent {
        // current always names a registered id; the preset list is never empty
        self.get(&self.current).unwrap_or(&self.presets[0])
    }

    pub fn current_id(&self) -> &str {
        &self.current
    }

    /// Select an existing agent; unknown ids leave the selection untouched
    pub fn set_current(&mut self, id: &str) -> Result<(), RegistryError> {
        if !self.contains(id) {
            return Err(RegistryError::UnknownAgent(id.to_string()));
        }
        log::debug!("Current agent: {}", id);
        self.current = id.to_string();
        Ok(())
    }

    /// Add to the personal collection
    pub fn add_agent(&mut self, agent: Agent) -> Result<(), RegistryError> {
        if self.contains(&agent.id) {
            return Err(RegistryError::DuplicateId(agent.id));
        }
        log::info!("Registered agent {} ({})", agent.id, agent.name);
        self.personal.push(agent);
        Ok(())
    }

    /// Add and select in one step; on error nothing changes
    pub fn add_and_select(&mut self, agent: Agent) -> Result<(), RegistryError> {
        let id = agent.id.clone();
        self.add_agent(agent)?;
        self.current = id;
        Ok(())
    }

    /// Apply a partial update to whichever collection holds `id`
    pub fn update(&mut self, id: &str, patch: &AgentPatch) -> Result<&Agent, RegistryError> {
        let agent = match self.personal.iter_mut().find(|a| a.id == id) {
            Some(agent) => agent,
            None => self
                .presets
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| RegistryError::UnknownAgent(id.to_string()))?,
        };
        agent.apply(patch);
        log::debug!("Updated agent {}", id);
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::voice::Voice;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn blank(seed: u64) -> Agent {
        Agent::blank(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_default_registry() {
        let registry = AgentRegistry::default();
        assert_eq!(registry.presets().len(), 4);
        assert!(registry.personal().is_empty());
        assert_eq!(registry.current().id, presets::DEFAULT_AGENT_ID);
    }

    #[test]
    fn test_add_and_select() {
        let mut registry = AgentRegistry::default();
        let agent = blank(1);
        let id = agent.id.clone();

        registry.add_and_select(agent).unwrap();

        assert_eq!(registry.personal().len(), 1);
        assert_eq!(registry.current_id(), id);
        assert_eq!(registry.collection_of(&id), Some(Collection::Personal));
    }

    #[test]
    fn test_duplicate_id_rejected_without_side_effects() {
        let mut registry = AgentRegistry::default();
        let agent = blank(1);
        registry.add_agent(agent.clone()).unwrap();

        let err = registry.add_and_select(agent.clone()).unwrap_err();

        assert_eq!(err, RegistryError::DuplicateId(agent.id));
        assert_eq!(registry.personal().len(), 1);
        assert_eq!(registry.current_id(), presets::DEFAULT_AGENT_ID);
    }

    #[test]
    fn test_preset_id_collision_rejected() {
        let mut registry = AgentRegistry::default();
        let mut agent = blank(2);
        agent.id = "chef-shane".to_string();
        assert!(matches!(registry.add_agent(agent), Err(RegistryError::DuplicateId(_))));
    }

    #[test]
    fn test_set_current_unknown() {
        let mut registry = AgentRegistry::default();
        let err = registry.set_current("nobody").unwrap_err();
        assert_eq!(err, RegistryError::UnknownAgent("nobody".to_string()));
        assert_eq!(registry.current_id(), presets::DEFAULT_AGENT_ID);
    }

    #[test]
    fn test_set_current_preset() {
        let mut registry = AgentRegistry::default();
        registry.set_current("passport-penny").unwrap();
        assert_eq!(registry.current().voice, Voice::Leda);
    }

    #[test]
    fn test_update_personal_reflects_in_current() {
        let mut registry = AgentRegistry::default();
        let agent = blank(3);
        let id = agent.id.clone();
        registry.add_and_select(agent).unwrap();

        registry
            .update(
                &id,
                &AgentPatch {
                    name: Some("Ada Lovelace".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(registry.current().name, "Ada Lovelace");
    }

    #[test]
    fn test_update_preset_copy() {
        let mut registry = AgentRegistry::default();
        registry
            .update(
                "chef-shane",
                &AgentPatch {
                    voice: Some(Voice::Puck),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(registry.get("chef-shane").unwrap().voice, Voice::Puck);
        assert_eq!(presets::chef_shane().voice, Voice::Charon);
    }

    #[test]
    fn test_update_unknown() {
        let mut registry = AgentRegistry::default();
        assert!(registry.update("ghost", &AgentPatch::default()).is_err());
    }

    #[test]
    fn test_with_presets_validates() {
        let a = blank(1);
        let dup = vec![a.clone(), a.clone()];
        assert!(matches!(
            AgentRegistry::with_presets(dup, &a.id),
            Err(RegistryError::DuplicateId(_))
        ));
        assert!(matches!(
            AgentRegistry::with_presets(vec![a], "other"),
            Err(RegistryError::UnknownAgent(_))
        ));
    }
}
