use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::agent::AgentStatus;
use crate::catalog::{TrainingCatalog, TrainingProgram};
use crate::genome::{Specialization, TraitName};

/// Key under which the summed weighted score is reported.
pub const OVERALL_SCORE_KEY: &str = "overall_score";

/// Weighted assessment criteria: (key, weight, constituent sub-metrics).
pub const ASSESSMENT_CRITERIA: [(&str, f64, [TraitName; 2]); 4] = [
    (
        "learning_efficiency",
        0.3,
        [TraitName::LearningCapacity, TraitName::MemoryCapacity],
    ),
    (
        "processing_capability",
        0.25,
        [TraitName::ProcessingSpeed, TraitName::ParallelProcessing],
    ),
    (
        "adaptation_rate",
        0.25,
        [TraitName::Adaptability, TraitName::ErrorTolerance],
    ),
    (
        "specialization_progress",
        0.2,
        [TraitName::TaskSpecialization, TraitName::PatternRecognition],
    ),
];

/// Per-metric readiness requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRequirement {
    pub current: f64,
    pub required: f64,
    pub met: bool,
}

/// Whether an agent qualifies for one training program, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessAssessment {
    pub ready: bool,
    pub reason: String,
    pub current_stage: f64,
    pub required_stage: u32,
    /// Empty when the development-stage gate already failed.
    pub metrics: BTreeMap<TraitName, MetricRequirement>,
}

/// Full evaluation document for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub development_stage: f64,
    pub experience_level: u64,
    pub specializations: Vec<Specialization>,
    pub performance_metrics: BTreeMap<String, f64>,
    pub readiness_assessment: BTreeMap<String, ReadinessAssessment>,
    pub recommended_programs: Vec<String>,
}

/// Determines program readiness and computes weighted performance metrics.
#[derive(Debug, Default)]
pub struct ReadinessEvaluator;

impl ReadinessEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Weighted performance snapshot: one score per assessment criterion
    /// plus the overall sum. Sub-metric values come from the neural
    /// connection map, falling back to potential capabilities scaled by
    /// 100, then to zero.
    pub fn compute_metrics(&self, status: &AgentStatus) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        for (key, weight, sub_metrics) in ASSESSMENT_CRITERIA {
            let mut score = 0.0;
            for metric in sub_metrics {
                let name = metric.as_str();
                if let Some(&value) = status.neural_connections.get(name) {
                    score += value;
                } else if let Some(&value) = status.potential_capabilities.get(name) {
                    score += value * 100.0;
                }
            }
            metrics.insert(key.to_string(), score / sub_metrics.len() as f64 * weight);
        }
        let overall: f64 = metrics.values().sum();
        metrics.insert(OVERALL_SCORE_KEY.to_string(), overall);
        metrics
    }

    /// Assess whether the agent qualifies for a program: the development
    /// stage gate first, then one threshold of `100 * required_stage / 10`
    /// per target metric.
    pub fn assess_readiness(
        &self,
        status: &AgentStatus,
        program: &TrainingProgram,
    ) -> ReadinessAssessment {
        if status.development_stage < program.required_stage as f64 {
            return ReadinessAssessment {
                ready: false,
                reason: "insufficient development stage".to_string(),
                current_stage: status.development_stage,
                required_stage: program.required_stage,
                metrics: BTreeMap::new(),
            };
        }

        let required = 100.0 * (program.required_stage as f64 / 10.0);
        let mut metrics = BTreeMap::new();
        for &metric in &program.metrics {
            let current = status
                .neural_connections
                .get(metric.as_str())
                .copied()
                .unwrap_or(0.0);
            metrics.insert(
                metric,
                MetricRequirement {
                    current,
                    required,
                    met: current >= required,
                },
            );
        }

        let ready = metrics.values().all(|req| req.met);
        ReadinessAssessment {
            ready,
            reason: if ready {
                "ready for training".to_string()
            } else {
                "insufficient metrics".to_string()
            },
            current_stage: status.development_stage,
            required_stage: program.required_stage,
            metrics,
        }
    }

    /// Full evaluation: performance metrics plus a readiness assessment
    /// for every program in the catalog.
    pub fn evaluate(&self, status: &AgentStatus, catalog: &TrainingCatalog) -> Evaluation {
        let mut readiness_assessment = BTreeMap::new();
        let mut recommended_programs = Vec::new();
        for program in catalog.programs() {
            let assessment = self.assess_readiness(status, program);
            if assessment.ready {
                recommended_programs.push(program.name.clone());
            }
            readiness_assessment.insert(program.name.clone(), assessment);
        }

        Evaluation {
            development_stage: status.development_stage,
            experience_level: status.experiences_count,
            specializations: status.specializations.clone(),
            performance_metrics: self.compute_metrics(status),
            readiness_assessment,
            recommended_programs,
        }
    }
}
