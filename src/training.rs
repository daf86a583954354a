use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::agent::{AgentStatus, EmbryoAgent, Experience, ExperienceOutcome};
use crate::catalog::TrainingCatalog;
use crate::error::{EmbryoError, Result};
use crate::genome::{Specialization, TraitName};
use crate::readiness::ReadinessEvaluator;
use crate::store::TrainingStore;

/// One applied experience in the chronological training log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLogEntry {
    pub timestamp: DateTime<Utc>,
    pub program: String,
    pub day: u32,
    pub experience: Experience,
    pub result: ExperienceOutcome,
}

/// Per-experience performance inside one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperiencePerformance {
    #[serde(rename = "type")]
    pub kind: String,
    pub performance: f64,
}

/// Aggregated snapshot of one simulated training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPerformance {
    pub day: u32,
    pub experiences: Vec<ExperiencePerformance>,
    pub metrics: BTreeMap<String, f64>,
}

/// Complete record of one training run. Created once, then appended to the
/// append-only training store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub program: String,
    pub embryo_id: String,
    pub training_log: Vec<TrainingLogEntry>,
    pub performance_history: Vec<DailyPerformance>,
    pub initial_metrics: BTreeMap<String, f64>,
    pub final_metrics: BTreeMap<String, f64>,
    pub improvement: BTreeMap<String, f64>,
}

/// Details of one scheduled program inside a curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDetail {
    pub duration_days: u32,
    pub required_stage: u32,
    pub focus_metrics: Vec<TraitName>,
}

/// A matched specialization path contributing to a curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializationPath {
    pub specialization: Specialization,
    pub path: Vec<String>,
}

/// Personalized, de-duplicated program sequence for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub embryo_id: String,
    pub current_stage: f64,
    pub recommended_curriculum: Vec<String>,
    pub specialization_paths: Vec<SpecializationPath>,
    pub estimated_duration: u32,
    pub estimated_completion_stage: f64,
    pub program_details: BTreeMap<String, ProgramDetail>,
}

/// Runs agents through training programs day by day and builds curricula.
#[derive(Debug, Default)]
pub struct TrainingExecutor {
    evaluator: ReadinessEvaluator,
}

impl TrainingExecutor {
    pub fn new() -> Self {
        Self {
            evaluator: ReadinessEvaluator::new(),
        }
    }

    /// Run the agent through the named program and persist the resulting
    /// record. An unknown program fails before anything is applied; a
    /// collaborator error mid-run aborts the run with nothing persisted.
    ///
    /// Readiness is advisory here: an unqualified agent is trained anyway
    /// (callers gate via the evaluator), with a warning logged.
    pub fn train<R: Rng + ?Sized>(
        &self,
        catalog: &TrainingCatalog,
        store: &dyn TrainingStore,
        agent: &mut dyn EmbryoAgent,
        program_name: &str,
        rng: &mut R,
    ) -> Result<TrainingRecord> {
        let program = catalog
            .get(program_name)
            .ok_or_else(|| EmbryoError::UnknownProgram(program_name.to_string()))?;

        let embryo_id = agent.id();
        let initial_status = agent.status();
        let assessment = self.evaluator.assess_readiness(&initial_status, program);
        if !assessment.ready {
            warn!(
                embryo_id = %embryo_id,
                program = %program_name,
                reason = %assessment.reason,
                "training an agent that does not currently qualify"
            );
        }

        let initial_metrics = self.evaluator.compute_metrics(&initial_status);
        let mut training_log = Vec::new();
        let mut performance_history = Vec::new();

        for day in 1..=program.duration_days {
            let mut daily = Vec::new();
            for template in &program.experiences {
                // Randomize complexity around the template's base value.
                let experience = Experience {
                    kind: template.kind.clone(),
                    complexity: template.complexity * rng.gen_range(0.9..=1.1),
                    data: template.data.clone(),
                };
                let result = agent.apply_experience(&experience)?;
                daily.push(ExperiencePerformance {
                    kind: experience.kind.clone(),
                    performance: result.processing_quality,
                });
                training_log.push(TrainingLogEntry {
                    timestamp: Utc::now(),
                    program: program.name.clone(),
                    day,
                    experience,
                    result,
                });
            }

            agent.advance_development();

            performance_history.push(DailyPerformance {
                day,
                experiences: daily,
                metrics: self.evaluator.compute_metrics(&agent.status()),
            });
        }

        let final_metrics = self.evaluator.compute_metrics(&agent.status());
        let improvement: BTreeMap<String, f64> = initial_metrics
            .iter()
            .map(|(key, &initial)| {
                let delta = final_metrics.get(key).copied().unwrap_or(0.0) - initial;
                (key.clone(), delta)
            })
            .collect();

        let record = TrainingRecord {
            program: program.name.clone(),
            embryo_id: embryo_id.clone(),
            training_log,
            performance_history,
            initial_metrics,
            final_metrics,
            improvement,
        };
        store.append(&record)?;

        info!(
            embryo_id = %embryo_id,
            program = %program_name,
            days = program.duration_days,
            overall_improvement = record
                .improvement
                .get(crate::readiness::OVERALL_SCORE_KEY)
                .copied()
                .unwrap_or(0.0),
            "training run complete"
        );

        Ok(record)
    }

    /// Build a personalized curriculum from the agent's specializations:
    /// matched paths concatenated in specialization order, de-duplicated
    /// by first occurrence.
    pub fn build_curriculum(
        &self,
        catalog: &TrainingCatalog,
        embryo_id: &str,
        status: &AgentStatus,
    ) -> Curriculum {
        let mut specialization_paths = Vec::new();
        let mut recommended: Vec<String> = Vec::new();

        for &spec in &status.specializations {
            if let Some(path) = catalog.curriculum_path(spec) {
                specialization_paths.push(SpecializationPath {
                    specialization: spec,
                    path: path.to_vec(),
                });
                for name in path {
                    if !recommended.iter().any(|p| p == name) {
                        recommended.push(name.clone());
                    }
                }
            }
        }

        let mut estimated_duration = 0;
        let mut estimated_completion_stage = status.development_stage;
        let mut program_details = BTreeMap::new();
        for name in &recommended {
            if let Some(program) = catalog.get(name) {
                estimated_duration += program.duration_days;
                // Progression heuristic: half a stage per training day.
                estimated_completion_stage += program.duration_days as f64 * 0.5;
                program_details.insert(
                    name.clone(),
                    ProgramDetail {
                        duration_days: program.duration_days,
                        required_stage: program.required_stage,
                        focus_metrics: program.metrics.clone(),
                    },
                );
            }
        }

        Curriculum {
            embryo_id: embryo_id.to_string(),
            current_stage: status.development_stage,
            recommended_curriculum: recommended,
            specialization_paths,
            estimated_duration,
            estimated_completion_stage,
            program_details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockEmbryoAgent;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory training store for executor tests.
    #[derive(Default)]
    struct MemStore {
        records: RefCell<Vec<TrainingRecord>>,
    }

    impl TrainingStore for MemStore {
        fn append(&self, record: &TrainingRecord) -> Result<()> {
            self.records.borrow_mut().push(record.clone());
            Ok(())
        }

        fn load(&self, embryo_id: &str, program: &str) -> Result<Vec<TrainingRecord>> {
            Ok(self
                .records
                .borrow()
                .iter()
                .filter(|r| r.embryo_id == embryo_id && r.program == program)
                .cloned()
                .collect())
        }
    }

    fn blank_status() -> AgentStatus {
        AgentStatus {
            development_stage: 0.0,
            age_days: 0,
            experiences_count: 0,
            neural_connections: HashMap::new(),
            specializations: vec![
                Specialization::PatternAnalysis,
                Specialization::MultiTaskProcessing,
            ],
            potential_capabilities: HashMap::new(),
        }
    }

    fn mock_agent() -> MockEmbryoAgent {
        let mut agent = MockEmbryoAgent::new();
        agent.expect_id().return_const("emb_test1".to_string());
        agent.expect_status().returning(blank_status);
        agent
            .expect_apply_experience()
            .returning(|experience| {
                Ok(ExperienceOutcome {
                    processing_quality: 1.0 - experience.complexity / 2.0,
                    details: None,
                })
            });
        agent.expect_advance_development().return_const(());
        agent
    }

    #[test]
    fn test_train_runs_every_day_and_experience() {
        let catalog = TrainingCatalog::new();
        let store = MemStore::default();
        let executor = TrainingExecutor::new();
        // basic_cognition: 5 days x 3 experiences.
        let mut agent = MockEmbryoAgent::new();
        agent.expect_id().return_const("emb_test1".to_string());
        agent.expect_status().returning(blank_status);
        agent.expect_apply_experience().times(15).returning(|_| {
            Ok(ExperienceOutcome {
                processing_quality: 0.8,
                details: None,
            })
        });
        agent.expect_advance_development().times(5).return_const(());

        let mut rng = StdRng::seed_from_u64(1);
        let record = executor
            .train(&catalog, &store, &mut agent, "basic_cognition", &mut rng)
            .unwrap();

        assert_eq!(record.training_log.len(), 15);
        assert_eq!(record.performance_history.len(), 5);
        assert_eq!(record.performance_history[0].experiences.len(), 3);
        assert_eq!(record.embryo_id, "emb_test1");
        assert_eq!(store.load("emb_test1", "basic_cognition").unwrap().len(), 1);
    }

    #[test]
    fn test_train_improvement_keys_match_initial_metrics() {
        let catalog = TrainingCatalog::new();
        let store = MemStore::default();
        let executor = TrainingExecutor::new();
        let mut agent = mock_agent();
        let mut rng = StdRng::seed_from_u64(2);
        let record = executor
            .train(&catalog, &store, &mut agent, "basic_cognition", &mut rng)
            .unwrap();

        assert_eq!(record.improvement.len(), 5);
        for key in record.initial_metrics.keys() {
            assert!(record.improvement.contains_key(key), "missing {}", key);
        }
        assert!(record.improvement.contains_key("overall_score"));
    }

    #[test]
    fn test_train_randomizes_complexity_within_band() {
        let catalog = TrainingCatalog::new();
        let store = MemStore::default();
        let executor = TrainingExecutor::new();
        let mut agent = mock_agent();
        let mut rng = StdRng::seed_from_u64(3);
        let record = executor
            .train(&catalog, &store, &mut agent, "basic_cognition", &mut rng)
            .unwrap();

        let program = catalog.get("basic_cognition").unwrap();
        for (i, entry) in record.training_log.iter().enumerate() {
            let base = program.experiences[i % program.experiences.len()].complexity;
            assert!(entry.experience.complexity >= base * 0.9 - 1e-9);
            assert!(entry.experience.complexity <= base * 1.1 + 1e-9);
        }
    }

    #[test]
    fn test_unknown_program_persists_nothing() {
        let catalog = TrainingCatalog::new();
        let store = MemStore::default();
        let executor = TrainingExecutor::new();
        let mut agent = MockEmbryoAgent::new();
        let mut rng = StdRng::seed_from_u64(4);

        let err = executor
            .train(&catalog, &store, &mut agent, "not_a_real_program", &mut rng)
            .unwrap_err();
        assert!(matches!(err, EmbryoError::UnknownProgram(_)));
        assert!(store.records.borrow().is_empty());
    }

    #[test]
    fn test_agent_failure_aborts_without_persisting() {
        let catalog = TrainingCatalog::new();
        let store = MemStore::default();
        let executor = TrainingExecutor::new();

        let mut agent = MockEmbryoAgent::new();
        agent.expect_id().return_const("emb_fail".to_string());
        agent.expect_status().returning(blank_status);
        agent
            .expect_apply_experience()
            .returning(|_| Err(EmbryoError::Agent("saturated".to_string())));

        let mut rng = StdRng::seed_from_u64(5);
        let err = executor
            .train(&catalog, &store, &mut agent, "basic_cognition", &mut rng)
            .unwrap_err();
        assert!(matches!(err, EmbryoError::Agent(_)));
        assert!(store.records.borrow().is_empty());
    }

    #[test]
    fn test_curriculum_deduplicates_shared_programs() {
        let catalog = TrainingCatalog::new();
        let executor = TrainingExecutor::new();
        // pattern_analysis and multi_task_processing share basic_cognition,
        // advanced_patterns and parallel_processing.
        let status = blank_status();
        let curriculum = executor.build_curriculum(&catalog, "emb_test1", &status);

        let mut sorted = curriculum.recommended_curriculum.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), curriculum.recommended_curriculum.len());
        assert_eq!(curriculum.specialization_paths.len(), 2);
        // Duplicates kept at first occurrence.
        assert_eq!(curriculum.recommended_curriculum[0], "basic_cognition");
        assert_eq!(
            curriculum.recommended_curriculum,
            vec![
                "basic_cognition",
                "advanced_patterns",
                "parallel_processing",
                "pattern_analysis_specialist",
                "multi_task_specialist",
            ]
        );
    }

    #[test]
    fn test_curriculum_estimates() {
        let catalog = TrainingCatalog::new();
        let executor = TrainingExecutor::new();
        let mut status = blank_status();
        status.development_stage = 1.0;
        status.specializations = vec![Specialization::PatternAnalysis];

        let curriculum = executor.build_curriculum(&catalog, "emb_test1", &status);
        // basic_cognition 5 + advanced_patterns 8 + parallel_processing 8
        // + pattern_analysis_specialist 10.
        assert_eq!(curriculum.estimated_duration, 31);
        assert!((curriculum.estimated_completion_stage - (1.0 + 31.0 * 0.5)).abs() < 1e-9);
        assert_eq!(curriculum.program_details.len(), 4);
        assert_eq!(
            curriculum.program_details["basic_cognition"].duration_days,
            5
        );
    }

    #[test]
    fn test_curriculum_empty_without_matching_paths() {
        let catalog = TrainingCatalog::new();
        let executor = TrainingExecutor::new();
        let mut status = blank_status();
        status.specializations = vec![];
        let curriculum = executor.build_curriculum(&catalog, "emb_test1", &status);
        assert!(curriculum.recommended_curriculum.is_empty());
        assert_eq!(curriculum.estimated_duration, 0);
    }
}
