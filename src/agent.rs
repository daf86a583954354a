use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;
use crate::genome::Specialization;

/// Read-only snapshot of an agent's developmental state.
///
/// Owned and evolved by the agent collaborator; this core only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub development_stage: f64,
    pub age_days: u32,
    pub experiences_count: u64,
    pub neural_connections: HashMap<String, f64>,
    pub specializations: Vec<Specialization>,
    pub potential_capabilities: HashMap<String, f64>,
}

/// One concrete experience applied to an agent during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "type")]
    pub kind: String,
    pub complexity: f64,
    pub data: String,
}

/// Result of applying one experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceOutcome {
    pub processing_quality: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// The narrow collaborator contract the training core depends on.
///
/// Any concrete agent implementation satisfies this; the core never
/// depends on a concrete agent type.
#[cfg_attr(test, mockall::automock)]
pub trait EmbryoAgent {
    /// Stable unique identifier, used as the persistence key.
    fn id(&self) -> String;

    /// Cheap, side-effect-free snapshot of current state.
    fn status(&self) -> AgentStatus;

    /// Apply one experience; may mutate internal agent state.
    fn apply_experience(&mut self, experience: &Experience) -> Result<ExperienceOutcome>;

    /// Advance internal state by one simulated development step.
    fn advance_development(&mut self);
}

/// Resolves an embryo id to a live agent for the operations surface.
pub trait AgentProvider {
    /// `Ok(None)` means no agent exists for the id; an unreadable backing
    /// record is an error, not a miss.
    fn resolve(&mut self, embryo_id: &str) -> Result<Option<&mut dyn EmbryoAgent>>;
}
