use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use uuid::Uuid;

use crate::dominance::DominanceResolver;
use crate::genome::{
    round2, DnaInformation, GeneticData, GeneticTrait, MutationRates, PotentialCapabilities,
    Specialization, TraitName, CAPABILITY_MAX, CAPABILITY_MIN, TRAIT_MIN,
};

/// Identifiers of the two parents a record was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parentage {
    pub parent1_id: String,
    pub parent2_id: String,
}

/// The persisted genetic bundle produced at agent creation.
///
/// Created once at conception and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptionRecord {
    pub embryo_id: String,
    pub conception_time: DateTime<Utc>,
    pub genetic_data: GeneticData,
    pub parentage: Option<Parentage>,
}

impl ConceptionRecord {
    pub fn new(embryo_id: String, genetic_data: GeneticData, parentage: Option<Parentage>) -> Self {
        Self {
            embryo_id,
            conception_time: Utc::now(),
            genetic_data,
            parentage,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.embryo_id.is_empty() {
            return Err("empty embryo_id".to_string());
        }
        self.genetic_data.validate()
    }
}

/// Generate a short unique embryo identifier.
pub fn new_embryo_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Produces the full trait, specialization, and capability set for a new
/// agent, either by random sampling or by combining two parent bundles.
///
/// All randomness comes from the caller-supplied RNG, so generation is
/// reproducible under a fixed seed.
pub struct GeneticDataGenerator {
    resolver: DominanceResolver,
}

impl Default for GeneticDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneticDataGenerator {
    pub fn new() -> Self {
        Self {
            resolver: DominanceResolver::new(),
        }
    }

    /// Build a genetic bundle, randomly or by inheritance when both
    /// parents are supplied.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        parents: Option<(&GeneticData, &GeneticData)>,
        rng: &mut R,
    ) -> GeneticData {
        let mut combined_traits = BTreeMap::new();
        let mut trait_sequences = BTreeMap::new();

        for name in TraitName::ALL {
            let candidate = match parents {
                Some((p1, p2)) => {
                    let t1 = GeneticTrait::new(
                        name,
                        p1.combined_traits.get(&name).copied().unwrap_or(TRAIT_MIN),
                        rng.gen_bool(0.5),
                        rng.gen_bool(0.1),
                        rng,
                    );
                    let t2 = GeneticTrait::new(
                        name,
                        p2.combined_traits.get(&name).copied().unwrap_or(TRAIT_MIN),
                        rng.gen_bool(0.5),
                        rng.gen_bool(0.1),
                        rng,
                    );
                    GeneticTrait::from_parents(&t1, &t2, rng)
                }
                None => GeneticTrait::random(name, rng),
            };

            // A second, independently randomized candidate is always merged
            // in, so inheritance only partially constrains the offspring.
            let rival = GeneticTrait::random(name, rng);
            let merged = self.resolver.combine(&candidate, &rival, Some(name), rng);

            trait_sequences.insert(name, candidate.sequence_values());
            combined_traits.insert(name, merged.value);
        }

        let specializations = match parents {
            Some((p1, p2)) => {
                let union: BTreeSet<Specialization> = p1
                    .specializations
                    .iter()
                    .chain(p2.specializations.iter())
                    .copied()
                    .collect();
                let pool: Vec<Specialization> = union.into_iter().collect();
                let count = rng.gen_range(2..=pool.len().min(4).max(2));
                pool.choose_multiple(rng, count).copied().collect()
            }
            None => {
                let count = rng.gen_range(2..=4);
                Specialization::ALL
                    .choose_multiple(rng, count)
                    .copied()
                    .collect()
            }
        };

        let potential_capabilities = match parents {
            Some((p1, p2)) => Self::inherit_capabilities(
                &p1.potential_capabilities,
                &p2.potential_capabilities,
                rng,
            ),
            None => PotentialCapabilities {
                learning_potential: round2(rng.gen_range(CAPABILITY_MIN..=CAPABILITY_MAX)),
                adaptation_capacity: round2(rng.gen_range(CAPABILITY_MIN..=CAPABILITY_MAX)),
                processing_capability: round2(rng.gen_range(CAPABILITY_MIN..=CAPABILITY_MAX)),
                social_capability: round2(rng.gen_range(CAPABILITY_MIN..=CAPABILITY_MAX)),
            },
        };

        let generation = match parents {
            Some((p1, p2)) => {
                1 + p1
                    .dna_information
                    .generation
                    .max(p2.dna_information.generation)
            }
            None => 0,
        };

        debug!(generation, inherited = parents.is_some(), "genetic bundle generated");

        GeneticData {
            combined_traits,
            specializations,
            potential_capabilities,
            growth_rate: round2(rng.gen_range(0.1..=0.2)),
            dna_information: DnaInformation {
                mutation_rates: MutationRates::default(),
                generation,
                trait_sequences,
            },
        }
    }

    fn inherit_capabilities<R: Rng + ?Sized>(
        a: &PotentialCapabilities,
        b: &PotentialCapabilities,
        rng: &mut R,
    ) -> PotentialCapabilities {
        let mut blend = |x: f64, y: f64| {
            let base = (x + y) / 2.0;
            let variation = rng.gen_range(-0.2..=0.2);
            round2((base + variation).clamp(CAPABILITY_MIN, CAPABILITY_MAX))
        };
        PotentialCapabilities {
            learning_potential: blend(a.learning_potential, b.learning_potential),
            adaptation_capacity: blend(a.adaptation_capacity, b.adaptation_capacity),
            processing_capability: blend(a.processing_capability, b.processing_capability),
            social_capability: blend(a.social_capability, b.social_capability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{TRAIT_MAX, TRAIT_MIN};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn root_bundle(seed: u64) -> GeneticData {
        let mut rng = StdRng::seed_from_u64(seed);
        GeneticDataGenerator::new().generate(None, &mut rng)
    }

    #[test]
    fn test_random_bundle_shape() {
        let data = root_bundle(1);
        assert_eq!(data.combined_traits.len(), 12);
        assert_eq!(data.dna_information.trait_sequences.len(), 12);
        assert!(data.specializations.len() >= 2 && data.specializations.len() <= 4);
        assert_eq!(data.dna_information.generation, 0);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_trait_values_in_bounds_across_seeds() {
        for seed in 0..50 {
            let data = root_bundle(seed);
            for (&name, &value) in &data.combined_traits {
                assert!(
                    value == 0.0 || (TRAIT_MIN..=TRAIT_MAX).contains(&value),
                    "seed {} trait {} value {}",
                    seed,
                    name,
                    value
                );
            }
            for (_, value) in data.potential_capabilities.as_map() {
                assert!((CAPABILITY_MIN..=CAPABILITY_MAX).contains(&value));
            }
            assert!((0.1..=0.2).contains(&data.growth_rate));
        }
    }

    #[test]
    fn test_generation_is_root_zero_and_child_increment() {
        let p1 = root_bundle(2);
        let p2 = root_bundle(3);
        assert_eq!(p1.dna_information.generation, 0);

        let mut rng = StdRng::seed_from_u64(4);
        let child = GeneticDataGenerator::new().generate(Some((&p1, &p2)), &mut rng);
        assert_eq!(child.dna_information.generation, 1);

        let mut rng = StdRng::seed_from_u64(5);
        let grandchild = GeneticDataGenerator::new().generate(Some((&child, &p2)), &mut rng);
        assert_eq!(grandchild.dna_information.generation, 2);
    }

    #[test]
    fn test_inherited_specializations_from_union() {
        let p1 = root_bundle(6);
        let p2 = root_bundle(7);
        let union: BTreeSet<Specialization> = p1
            .specializations
            .iter()
            .chain(p2.specializations.iter())
            .copied()
            .collect();

        let mut rng = StdRng::seed_from_u64(8);
        let child = GeneticDataGenerator::new().generate(Some((&p1, &p2)), &mut rng);
        assert!(child.specializations.len() >= 2 && child.specializations.len() <= 4);
        for spec in &child.specializations {
            assert!(union.contains(spec), "{} not in parent union", spec);
        }
    }

    #[test]
    fn test_generation_deterministic_under_seed() {
        let generator = GeneticDataGenerator::new();
        let mut rng_a = StdRng::seed_from_u64(9);
        let mut rng_b = StdRng::seed_from_u64(9);
        assert_eq!(
            generator.generate(None, &mut rng_a),
            generator.generate(None, &mut rng_b)
        );
    }

    #[test]
    fn test_conception_record_roundtrip() {
        let data = root_bundle(10);
        let record = ConceptionRecord::new(
            new_embryo_id(),
            data,
            Some(Parentage {
                parent1_id: "aaaa1111".to_string(),
                parent2_id: "bbbb2222".to_string(),
            }),
        );
        assert!(record.validate().is_ok());

        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: ConceptionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.parentage.unwrap().parent1_id, "aaaa1111");
    }

    #[test]
    fn test_embryo_id_shape() {
        let id = new_embryo_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_embryo_id());
    }
}
