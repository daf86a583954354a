//! Deterministic simulated embryo, the reference agent collaborator.
//!
//! The training core only ever talks to the `EmbryoAgent` trait; this module
//! supplies the concrete implementation used by the CLI and the integration
//! tests. All state transitions are pure functions of the conception record
//! and the experiences applied, so runs are reproducible.

use std::collections::HashMap;

use crate::agent::{AgentProvider, AgentStatus, EmbryoAgent, Experience, ExperienceOutcome};
use crate::conception::ConceptionRecord;
use crate::error::Result;
use crate::genome::{round2, Specialization, TRAIT_MAX};
use crate::store::ConceptionStore;

/// Initial neural connection strength per unit of combined trait value.
const CONNECTION_SCALE: f64 = 30.0;

/// Ceiling on the development stage.
const MAX_STAGE: f64 = 10.0;

/// An embryo whose development is simulated from its genetic data.
#[derive(Debug, Clone)]
pub struct SimulatedEmbryo {
    embryo_id: String,
    development_stage: f64,
    age_days: u32,
    experiences_count: u64,
    neural_connections: HashMap<String, f64>,
    specializations: Vec<Specialization>,
    potential_capabilities: HashMap<String, f64>,
    growth_rate: f64,
}

impl SimulatedEmbryo {
    /// Seed a fresh embryo from its conception record. Connection strength
    /// starts proportional to the combined trait values; suppressed traits
    /// start at zero.
    pub fn from_record(record: &ConceptionRecord) -> Self {
        let neural_connections = record
            .genetic_data
            .combined_traits
            .iter()
            .map(|(name, &value)| (name.as_str().to_string(), round2(value * CONNECTION_SCALE)))
            .collect();
        let potential_capabilities = record
            .genetic_data
            .potential_capabilities
            .as_map()
            .into_iter()
            .collect();
        Self {
            embryo_id: record.embryo_id.clone(),
            development_stage: 0.0,
            age_days: 0,
            experiences_count: 0,
            neural_connections,
            specializations: record.genetic_data.specializations.clone(),
            potential_capabilities,
            growth_rate: record.genetic_data.growth_rate,
        }
    }

    fn mean_connection(&self) -> f64 {
        if self.neural_connections.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.neural_connections.values().sum();
        sum / self.neural_connections.len() as f64
    }
}

impl EmbryoAgent for SimulatedEmbryo {
    fn id(&self) -> String {
        self.embryo_id.clone()
    }

    fn status(&self) -> AgentStatus {
        AgentStatus {
            development_stage: self.development_stage,
            age_days: self.age_days,
            experiences_count: self.experiences_count,
            neural_connections: self.neural_connections.clone(),
            specializations: self.specializations.clone(),
            potential_capabilities: self.potential_capabilities.clone(),
        }
    }

    fn apply_experience(&mut self, experience: &Experience) -> Result<ExperienceOutcome> {
        // Capacity relative to the strongest possible trait loadout, eroded
        // by complexity and recovered by development progress.
        let capacity = self.mean_connection() / (TRAIT_MAX * CONNECTION_SCALE);
        let quality = (capacity * (1.0 - experience.complexity * 0.4)
            + self.development_stage * 0.01)
            .clamp(0.05, 1.0);

        let gain = experience.complexity * quality * self.growth_rate * 10.0;
        for strength in self.neural_connections.values_mut() {
            *strength = round2(*strength + gain);
        }
        self.experiences_count += 1;

        Ok(ExperienceOutcome {
            processing_quality: round2(quality),
            details: None,
        })
    }

    fn advance_development(&mut self) {
        self.age_days += 1;
        self.development_stage = round2((self.development_stage + self.growth_rate).min(MAX_STAGE));
    }
}

/// Resolves embryo ids to simulated agents backed by persisted conception
/// records. Agents are instantiated lazily on first resolution and kept
/// live across calls so training progress accumulates.
pub struct RecordAgentProvider<S: ConceptionStore> {
    store: S,
    live: HashMap<String, SimulatedEmbryo>,
}

impl<S: ConceptionStore> RecordAgentProvider<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            live: HashMap::new(),
        }
    }

    /// Register a freshly conceived embryo without a store round-trip.
    pub fn register(&mut self, record: &ConceptionRecord) {
        self.live
            .insert(record.embryo_id.clone(), SimulatedEmbryo::from_record(record));
    }
}

impl<S: ConceptionStore> AgentProvider for RecordAgentProvider<S> {
    fn resolve(&mut self, embryo_id: &str) -> Result<Option<&mut dyn EmbryoAgent>> {
        if !self.live.contains_key(embryo_id) {
            match self.store.load(embryo_id)? {
                Some(record) => self.register(&record),
                None => return Ok(None),
            }
        }
        Ok(self
            .live
            .get_mut(embryo_id)
            .map(|agent| agent as &mut dyn EmbryoAgent))
    }
}
