use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::dna::DnaStrand;
use crate::nucleotide::Nucleotide;

/// Number of nucleotides encoding one trait.
pub const TRAIT_SEQUENCE_LEN: usize = 8;

/// Bounds for combined trait values.
pub const TRAIT_MIN: f64 = 1.5;
pub const TRAIT_MAX: f64 = 3.0;

/// Bounds for potential capability values.
pub const CAPABILITY_MIN: f64 = 2.0;
pub const CAPABILITY_MAX: f64 = 3.0;

/// The closed catalog of trait names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitName {
    LearningCapacity,
    PatternRecognition,
    DecisionMaking,
    MemoryCapacity,
    Adaptability,
    SocialInteraction,
    TaskSpecialization,
    ResourceManagement,
    ProcessingSpeed,
    EnergyEfficiency,
    ErrorTolerance,
    ParallelProcessing,
}

impl TraitName {
    pub const ALL: [TraitName; 12] = [
        TraitName::LearningCapacity,
        TraitName::PatternRecognition,
        TraitName::DecisionMaking,
        TraitName::MemoryCapacity,
        TraitName::Adaptability,
        TraitName::SocialInteraction,
        TraitName::TaskSpecialization,
        TraitName::ResourceManagement,
        TraitName::ProcessingSpeed,
        TraitName::EnergyEfficiency,
        TraitName::ErrorTolerance,
        TraitName::ParallelProcessing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitName::LearningCapacity => "learning_capacity",
            TraitName::PatternRecognition => "pattern_recognition",
            TraitName::DecisionMaking => "decision_making",
            TraitName::MemoryCapacity => "memory_capacity",
            TraitName::Adaptability => "adaptability",
            TraitName::SocialInteraction => "social_interaction",
            TraitName::TaskSpecialization => "task_specialization",
            TraitName::ResourceManagement => "resource_management",
            TraitName::ProcessingSpeed => "processing_speed",
            TraitName::EnergyEfficiency => "energy_efficiency",
            TraitName::ErrorTolerance => "error_tolerance",
            TraitName::ParallelProcessing => "parallel_processing",
        }
    }
}

impl fmt::Display for TraitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed catalog of specializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    PatternAnalysis,
    DecisionOptimization,
    MultiTaskProcessing,
    CollaborativeLearning,
    ResourceOptimization,
    ErrorCorrection,
    AdaptiveLearning,
    ParallelComputation,
}

impl Specialization {
    pub const ALL: [Specialization; 8] = [
        Specialization::PatternAnalysis,
        Specialization::DecisionOptimization,
        Specialization::MultiTaskProcessing,
        Specialization::CollaborativeLearning,
        Specialization::ResourceOptimization,
        Specialization::ErrorCorrection,
        Specialization::AdaptiveLearning,
        Specialization::ParallelComputation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::PatternAnalysis => "pattern_analysis",
            Specialization::DecisionOptimization => "decision_optimization",
            Specialization::MultiTaskProcessing => "multi_task_processing",
            Specialization::CollaborativeLearning => "collaborative_learning",
            Specialization::ResourceOptimization => "resource_optimization",
            Specialization::ErrorCorrection => "error_correction",
            Specialization::AdaptiveLearning => "adaptive_learning",
            Specialization::ParallelComputation => "parallel_computation",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to 2 decimal places, the precision of persisted records.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// A named scalar trait backed by an 8-nucleotide encoding.
///
/// Traits are immutable once constructed; combination produces new traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticTrait {
    pub name: TraitName,
    pub value: f64,
    pub dominant: bool,
    pub suppressed: bool,
    pub sequence: [Nucleotide; TRAIT_SEQUENCE_LEN],
}

impl GeneticTrait {
    /// Build a trait with the given value and flags and a fresh random
    /// nucleotide encoding.
    pub fn new<R: Rng + ?Sized>(
        name: TraitName,
        value: f64,
        dominant: bool,
        suppressed: bool,
        rng: &mut R,
    ) -> Self {
        Self {
            name,
            value,
            dominant,
            suppressed,
            sequence: std::array::from_fn(|_| Nucleotide::random(rng)),
        }
    }

    /// A fully randomized trait: value uniform in [1.5, 3.0] rounded to 2
    /// decimals, dominant with p=0.5, suppressed with p=0.1.
    pub fn random<R: Rng + ?Sized>(name: TraitName, rng: &mut R) -> Self {
        let value = round2(rng.gen_range(TRAIT_MIN..=TRAIT_MAX));
        let dominant = rng.gen_bool(0.5);
        let suppressed = rng.gen_bool(0.1);
        Self::new(name, value, dominant, suppressed, rng)
    }

    /// Combine two same-named parent traits into a child trait.
    ///
    /// Flags are each coin-flipped between the parents; the value is one
    /// parent's value plus a uniform offset in [-0.2, 0.2], clamped to
    /// [1.5, 3.0] and rounded. The name is carried from the first parent.
    /// The child's encoding recombines the parents' strands and replicates
    /// them at the standard mutation rates.
    pub fn from_parents<R: Rng + ?Sized>(a: &GeneticTrait, b: &GeneticTrait, rng: &mut R) -> Self {
        debug_assert_eq!(a.name, b.name, "combined traits must share a name");
        let dominant = if rng.gen_bool(0.5) { a.dominant } else { b.dominant };
        let suppressed = if rng.gen_bool(0.5) { a.suppressed } else { b.suppressed };
        let base = if rng.gen_bool(0.5) { a.value } else { b.value };
        let offset = rng.gen_range(-0.2..=0.2);
        let value = round2((base + offset).clamp(TRAIT_MIN, TRAIT_MAX));

        let strand = DnaStrand::from_values(&a.sequence_values())
            .crossover(&DnaStrand::from_values(&b.sequence_values()), rng)
            .replicate(&MutationRates::default(), rng);
        let values = strand.values();
        // Structural mutations can change the strand length; the trait
        // encoding stays fixed at 8, padded with fresh nucleotides.
        let sequence = std::array::from_fn(|i| match values.get(i) {
            Some(&v) => Nucleotide::new(v),
            None => Nucleotide::random(rng),
        });

        Self {
            name: a.name,
            value,
            dominant,
            suppressed,
            sequence,
        }
    }

    /// Raw 2-bit values of the nucleotide encoding.
    pub fn sequence_values(&self) -> [u8; TRAIT_SEQUENCE_LEN] {
        std::array::from_fn(|i| self.sequence[i].value)
    }
}

/// Fixed mutation-rate table carried in every DNA-information block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    pub point: f64,
    pub insertion: f64,
    pub deletion: f64,
    pub duplication: f64,
    pub inversion: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            point: 0.001,
            insertion: 0.0005,
            deletion: 0.0005,
            duplication: 0.0002,
            inversion: 0.0002,
        }
    }
}

/// Audit block: mutation rates, lineage generation, and the raw nucleotide
/// snapshot of each pre-merge candidate trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaInformation {
    pub mutation_rates: MutationRates,
    pub generation: u32,
    pub trait_sequences: BTreeMap<TraitName, [u8; TRAIT_SEQUENCE_LEN]>,
}

/// The four fixed potential capabilities, each in [2.0, 3.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialCapabilities {
    pub learning_potential: f64,
    pub adaptation_capacity: f64,
    pub processing_capability: f64,
    pub social_capability: f64,
}

impl PotentialCapabilities {
    pub const NAMES: [&'static str; 4] = [
        "learning_potential",
        "adaptation_capacity",
        "processing_capability",
        "social_capability",
    ];

    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("learning_potential".to_string(), self.learning_potential),
            ("adaptation_capacity".to_string(), self.adaptation_capacity),
            ("processing_capability".to_string(), self.processing_capability),
            ("social_capability".to_string(), self.social_capability),
        ])
    }
}

/// Complete genetic bundle produced at conception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticData {
    pub combined_traits: BTreeMap<TraitName, f64>,
    pub specializations: Vec<Specialization>,
    pub potential_capabilities: PotentialCapabilities,
    pub growth_rate: f64,
    pub dna_information: DnaInformation,
}

impl GeneticData {
    /// Validate the bundle against its documented invariants. Used at the
    /// persistence boundary to reject malformed documents early.
    pub fn validate(&self) -> Result<(), String> {
        if self.combined_traits.len() != TraitName::ALL.len() {
            return Err(format!(
                "expected {} combined traits, found {}",
                TraitName::ALL.len(),
                self.combined_traits.len()
            ));
        }
        for (name, &value) in &self.combined_traits {
            // 0.0 is the sentinel for a doubly-suppressed trait.
            if value != 0.0 && !(TRAIT_MIN..=TRAIT_MAX).contains(&value) {
                return Err(format!("trait {} value {} out of range", name, value));
            }
        }
        if self.specializations.len() < 2 || self.specializations.len() > 4 {
            return Err(format!(
                "expected 2-4 specializations, found {}",
                self.specializations.len()
            ));
        }
        for (cap, value) in self.potential_capabilities.as_map() {
            if !(CAPABILITY_MIN..=CAPABILITY_MAX).contains(&value) {
                return Err(format!("capability {} value {} out of range", cap, value));
            }
        }
        if !(0.1..=0.2).contains(&self.growth_rate) {
            return Err(format!("growth_rate {} out of range", self.growth_rate));
        }
        Ok(())
    }
}
