//! Operations surface tying the genetics and training engines together.
//!
//! One service instance owns the catalog, the stores, the agent provider
//! and a single seeded RNG, so a full session driven from one seed is
//! reproducible end to end.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::agent::AgentProvider;
use crate::catalog::TrainingCatalog;
use crate::conception::{new_embryo_id, ConceptionRecord, GeneticDataGenerator, Parentage};
use crate::config::Config;
use crate::error::{EmbryoError, Result};
use crate::genome::GeneticData;
use crate::readiness::{Evaluation, ReadinessEvaluator};
use crate::sim::RecordAgentProvider;
use crate::store::{ConceptionStore, FileConceptionStore, FileTrainingStore};
use crate::training::{Curriculum, TrainingExecutor, TrainingRecord};

/// Result of a conception call.
#[derive(Debug, Clone)]
pub struct ConceptionOutcome {
    pub embryo_id: String,
    pub record: ConceptionRecord,
    /// True when parent lookups failed and genetics fell back to random.
    pub fell_back: bool,
}

pub struct EmbryoService {
    catalog: TrainingCatalog,
    evaluator: ReadinessEvaluator,
    executor: TrainingExecutor,
    generator: GeneticDataGenerator,
    conceptions: FileConceptionStore,
    trainings: FileTrainingStore,
    provider: RecordAgentProvider<FileConceptionStore>,
    rng: StdRng,
}

impl EmbryoService {
    pub fn new(config: &Config) -> Result<Self> {
        let conceptions = FileConceptionStore::open(&config.storage.conception_dir)?;
        let trainings = FileTrainingStore::open(&config.storage.training_dir)?;
        let provider =
            RecordAgentProvider::new(FileConceptionStore::open(&config.storage.conception_dir)?);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            catalog: TrainingCatalog::new(),
            evaluator: ReadinessEvaluator::new(),
            executor: TrainingExecutor::new(),
            generator: GeneticDataGenerator::new(),
            conceptions,
            trainings,
            provider,
            rng,
        })
    }

    pub fn catalog(&self) -> &TrainingCatalog {
        &self.catalog
    }

    /// Conceive a new embryo: random genetics when no parents are given,
    /// combined genetics when both parent records resolve, random with a
    /// warning when either parent record is missing. A malformed parent
    /// record is an error, not a fallback.
    pub fn conceive(
        &mut self,
        parent1: Option<&str>,
        parent2: Option<&str>,
    ) -> Result<ConceptionOutcome> {
        let (genetic_data, parentage, fell_back) = match (parent1, parent2) {
            (Some(id1), Some(id2)) => match (
                self.conceptions.load(id1)?,
                self.conceptions.load(id2)?,
            ) {
                (Some(a), Some(b)) => {
                    let data = self
                        .generator
                        .generate(Some((&a.genetic_data, &b.genetic_data)), &mut self.rng);
                    let parentage = Parentage {
                        parent1_id: id1.to_string(),
                        parent2_id: id2.to_string(),
                    };
                    (data, Some(parentage), false)
                }
                _ => {
                    warn!(
                        parent1 = %id1,
                        parent2 = %id2,
                        "parent record missing, falling back to random genetics"
                    );
                    (self.random_genetics(), None, true)
                }
            },
            (None, None) => (self.random_genetics(), None, false),
            _ => {
                warn!("only one parent id supplied, falling back to random genetics");
                (self.random_genetics(), None, true)
            }
        };

        let embryo_id = new_embryo_id();
        let record = ConceptionRecord::new(embryo_id.clone(), genetic_data, parentage);
        self.conceptions.save(&record)?;
        self.provider.register(&record);

        info!(
            embryo_id = %embryo_id,
            generation = record.genetic_data.dna_information.generation,
            specializations = record.genetic_data.specializations.len(),
            fell_back,
            "embryo conceived"
        );
        Ok(ConceptionOutcome {
            embryo_id,
            record,
            fell_back,
        })
    }

    /// Full readiness evaluation against every catalog program.
    pub fn evaluate(&mut self, embryo_id: &str) -> Result<Evaluation> {
        let status = self.agent_status(embryo_id)?;
        Ok(self.evaluator.evaluate(&status, &self.catalog))
    }

    /// Personalized curriculum from the agent's current specializations.
    pub fn curriculum(&mut self, embryo_id: &str) -> Result<Curriculum> {
        let status = self.agent_status(embryo_id)?;
        Ok(self
            .executor
            .build_curriculum(&self.catalog, embryo_id, &status))
    }

    /// Run one training program against the agent and persist the record.
    pub fn train(&mut self, embryo_id: &str, program: &str) -> Result<TrainingRecord> {
        let agent = self
            .provider
            .resolve(embryo_id)?
            .ok_or_else(|| EmbryoError::AgentNotFound(embryo_id.to_string()))?;
        self.executor
            .train(&self.catalog, &self.trainings, agent, program, &mut self.rng)
    }

    /// Previously persisted training runs for one (embryo, program) pair.
    pub fn training_history(&self, embryo_id: &str, program: &str) -> Result<Vec<TrainingRecord>> {
        use crate::store::TrainingStore;
        self.trainings.load(embryo_id, program)
    }

    fn agent_status(&mut self, embryo_id: &str) -> Result<crate::agent::AgentStatus> {
        let agent = self
            .provider
            .resolve(embryo_id)?
            .ok_or_else(|| EmbryoError::AgentNotFound(embryo_id.to_string()))?;
        Ok(agent.status())
    }

    fn random_genetics(&mut self) -> GeneticData {
        self.generator.generate(None, &mut self.rng)
    }
}
