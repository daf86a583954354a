use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::genome::{Specialization, TraitName};

/// Static experience template inside a training program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    pub complexity: f64,
    pub data: String,
}

/// One catalog-defined training program. Never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub name: String,
    pub experiences: Vec<ExperienceTemplate>,
    pub duration_days: u32,
    pub required_stage: u32,
    pub metrics: Vec<TraitName>,
}

/// Immutable catalog of training programs and per-specialization
/// curriculum paths. Read-only after initialization.
pub struct TrainingCatalog {
    programs: Vec<TrainingProgram>,
    curriculum_paths: BTreeMap<Specialization, Vec<String>>,
}

fn exp(kind: &str, complexity: f64, data: &str) -> ExperienceTemplate {
    ExperienceTemplate {
        kind: kind.to_string(),
        complexity,
        data: data.to_string(),
    }
}

fn program(
    name: &str,
    experiences: Vec<ExperienceTemplate>,
    duration_days: u32,
    required_stage: u32,
    metrics: Vec<TraitName>,
) -> TrainingProgram {
    TrainingProgram {
        name: name.to_string(),
        experiences,
        duration_days,
        required_stage,
        metrics,
    }
}

impl Default for TrainingCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingCatalog {
    pub fn new() -> Self {
        use Specialization as S;
        use TraitName as T;

        let programs = vec![
            // Basic tier
            program(
                "basic_cognition",
                vec![
                    exp("pattern", 0.3, "sequential_learning"),
                    exp("logical", 0.2, "basic_reasoning"),
                    exp("visual", 0.25, "pattern_matching"),
                ],
                5,
                0,
                vec![T::PatternRecognition, T::LearningCapacity],
            ),
            program(
                "memory_foundations",
                vec![
                    exp("recall", 0.25, "short_term_retention"),
                    exp("association", 0.3, "concept_linking"),
                    exp("consolidation", 0.2, "memory_reinforcement"),
                ],
                6,
                1,
                vec![T::MemoryCapacity, T::LearningCapacity],
            ),
            program(
                "social_adaptation",
                vec![
                    exp("social", 0.3, "basic_interaction"),
                    exp("emotional", 0.25, "response_patterns"),
                    exp("collaborative", 0.2, "group_dynamics"),
                ],
                6,
                2,
                vec![T::SocialInteraction, T::Adaptability],
            ),
            program(
                "resource_efficiency",
                vec![
                    exp("optimization", 0.4, "resource_allocation"),
                    exp("management", 0.35, "efficiency_patterns"),
                    exp("analytical", 0.3, "usage_analysis"),
                ],
                7,
                3,
                vec![T::ResourceManagement, T::EnergyEfficiency],
            ),
            // Advanced tier
            program(
                "advanced_patterns",
                vec![
                    exp("pattern", 0.7, "complex_patterns"),
                    exp("logical", 0.6, "pattern_analysis"),
                    exp("visual", 0.65, "visual_patterns"),
                    exp("temporal", 0.7, "sequence_prediction"),
                ],
                8,
                5,
                vec![T::PatternRecognition, T::ProcessingSpeed],
            ),
            program(
                "decision_mastery",
                vec![
                    exp("decision", 0.75, "complex_choices"),
                    exp("analysis", 0.7, "outcome_prediction"),
                    exp("strategic", 0.8, "strategy_formation"),
                ],
                9,
                6,
                vec![T::DecisionMaking, T::Adaptability],
            ),
            program(
                "parallel_processing",
                vec![
                    exp("multi_task", 0.8, "simultaneous_processing"),
                    exp("coordination", 0.75, "task_coordination"),
                    exp("efficiency", 0.7, "resource_distribution"),
                ],
                8,
                7,
                vec![T::ParallelProcessing, T::ProcessingSpeed],
            ),
            // Specialist tier
            program(
                "pattern_analysis_specialist",
                vec![
                    exp("pattern", 0.9, "advanced_pattern_recognition"),
                    exp("analysis", 0.85, "pattern_interpretation"),
                    exp("synthesis", 0.95, "pattern_synthesis"),
                    exp("application", 0.9, "pattern_application"),
                ],
                10,
                8,
                vec![T::PatternRecognition, T::ProcessingSpeed, T::LearningCapacity],
            ),
            program(
                "decision_optimization_specialist",
                vec![
                    exp("optimization", 0.95, "decision_optimization"),
                    exp("analysis", 0.9, "outcome_analysis"),
                    exp("strategy", 0.85, "strategy_optimization"),
                ],
                10,
                8,
                vec![T::DecisionMaking, T::Adaptability, T::ProcessingSpeed],
            ),
            program(
                "multi_task_specialist",
                vec![
                    exp("parallel", 0.95, "advanced_parallel_processing"),
                    exp("coordination", 0.9, "advanced_coordination"),
                    exp("optimization", 0.85, "task_optimization"),
                ],
                10,
                8,
                vec![T::ParallelProcessing, T::TaskSpecialization, T::EnergyEfficiency],
            ),
            program(
                "adaptive_learning_specialist",
                vec![
                    exp("adaptation", 0.95, "advanced_adaptation"),
                    exp("learning", 0.9, "learning_optimization"),
                    exp("integration", 0.85, "knowledge_integration"),
                ],
                10,
                8,
                vec![T::LearningCapacity, T::Adaptability, T::MemoryCapacity],
            ),
            program(
                "error_correction_specialist",
                vec![
                    exp("detection", 0.9, "fault_identification"),
                    exp("recovery", 0.95, "state_restoration"),
                    exp("prevention", 0.85, "error_pattern_learning"),
                ],
                10,
                8,
                vec![T::ErrorTolerance, T::MemoryCapacity, T::Adaptability],
            ),
        ];

        let path = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let curriculum_paths = BTreeMap::from([
            (
                S::PatternAnalysis,
                path(&[
                    "basic_cognition",
                    "advanced_patterns",
                    "parallel_processing",
                    "pattern_analysis_specialist",
                ]),
            ),
            (
                S::DecisionOptimization,
                path(&[
                    "basic_cognition",
                    "resource_efficiency",
                    "decision_mastery",
                    "decision_optimization_specialist",
                ]),
            ),
            (
                S::MultiTaskProcessing,
                path(&[
                    "basic_cognition",
                    "parallel_processing",
                    "advanced_patterns",
                    "multi_task_specialist",
                ]),
            ),
            (
                S::CollaborativeLearning,
                path(&[
                    "basic_cognition",
                    "social_adaptation",
                    "decision_mastery",
                    "adaptive_learning_specialist",
                ]),
            ),
            (
                S::ResourceOptimization,
                path(&[
                    "basic_cognition",
                    "resource_efficiency",
                    "parallel_processing",
                    "multi_task_specialist",
                ]),
            ),
            (
                S::ErrorCorrection,
                path(&[
                    "basic_cognition",
                    "memory_foundations",
                    "advanced_patterns",
                    "error_correction_specialist",
                ]),
            ),
            (
                S::AdaptiveLearning,
                path(&[
                    "basic_cognition",
                    "social_adaptation",
                    "advanced_patterns",
                    "adaptive_learning_specialist",
                ]),
            ),
            (
                S::ParallelComputation,
                path(&[
                    "basic_cognition",
                    "memory_foundations",
                    "parallel_processing",
                    "multi_task_specialist",
                ]),
            ),
        ]);

        Self {
            programs,
            curriculum_paths,
        }
    }

    /// Look up a program by name.
    pub fn get(&self, name: &str) -> Option<&TrainingProgram> {
        self.programs.iter().find(|p| p.name == name)
    }

    /// All programs in catalog order.
    pub fn programs(&self) -> &[TrainingProgram] {
        &self.programs
    }

    /// The curriculum path for a specialization, basic to specialist.
    pub fn curriculum_path(&self, specialization: Specialization) -> Option<&[String]> {
        self.curriculum_paths
            .get(&specialization)
            .map(|v| v.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_twelve_programs() {
        let catalog = TrainingCatalog::new();
        assert_eq!(catalog.programs().len(), 12);
    }

    #[test]
    fn test_program_names_unique() {
        let catalog = TrainingCatalog::new();
        let mut names: Vec<&str> = catalog.programs().iter().map(|p| p.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn test_basic_cognition_shape() {
        let catalog = TrainingCatalog::new();
        let p = catalog.get("basic_cognition").unwrap();
        assert_eq!(p.duration_days, 5);
        assert_eq!(p.required_stage, 0);
        assert_eq!(p.experiences.len(), 3);
        assert_eq!(p.metrics.len(), 2);
    }

    #[test]
    fn test_experience_complexity_in_unit_interval() {
        let catalog = TrainingCatalog::new();
        for p in catalog.programs() {
            for e in &p.experiences {
                assert!(e.complexity > 0.0 && e.complexity <= 1.0, "{}", p.name);
            }
        }
    }

    #[test]
    fn test_every_specialization_has_a_path() {
        let catalog = TrainingCatalog::new();
        for spec in Specialization::ALL {
            let path = catalog.curriculum_path(spec).unwrap_or_else(|| {
                panic!("no curriculum path for {}", spec);
            });
            assert_eq!(path.len(), 4, "{}", spec);
        }
    }

    #[test]
    fn test_path_programs_exist_in_catalog() {
        let catalog = TrainingCatalog::new();
        for spec in Specialization::ALL {
            for name in catalog.curriculum_path(spec).unwrap() {
                assert!(catalog.get(name).is_some(), "{} references {}", spec, name);
            }
        }
    }

    #[test]
    fn test_unknown_program_lookup() {
        let catalog = TrainingCatalog::new();
        assert!(catalog.get("not_a_real_program").is_none());
    }

    #[test]
    fn test_paths_end_in_specialist_tier() {
        let catalog = TrainingCatalog::new();
        for spec in Specialization::ALL {
            let path = catalog.curriculum_path(spec).unwrap();
            let last = catalog.get(path.last().unwrap()).unwrap();
            assert_eq!(last.required_stage, 8, "{}", spec);
        }
    }
}
