use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::genome::{round2, GeneticTrait, TraitName};

/// Which raw nucleotide values count as dominant vs recessive for one trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominancePattern {
    pub dominant: [u8; 2],
    pub recessive: [u8; 2],
}

/// Resolves two same-named traits into one, using either generic dominance
/// rules or the per-trait specialization pattern table.
pub struct DominanceResolver {
    patterns: BTreeMap<TraitName, DominancePattern>,
}

impl Default for DominanceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DominanceResolver {
    pub fn new() -> Self {
        let patterns = BTreeMap::from([
            (TraitName::LearningCapacity, DominancePattern { dominant: [3, 2], recessive: [0, 1] }),
            (TraitName::PatternRecognition, DominancePattern { dominant: [3, 2], recessive: [0, 1] }),
            (TraitName::DecisionMaking, DominancePattern { dominant: [1, 2], recessive: [0, 3] }),
            (TraitName::MemoryCapacity, DominancePattern { dominant: [0, 3], recessive: [1, 2] }),
            (TraitName::Adaptability, DominancePattern { dominant: [3, 2], recessive: [1, 0] }),
            (TraitName::SocialInteraction, DominancePattern { dominant: [2, 3], recessive: [0, 1] }),
            (TraitName::TaskSpecialization, DominancePattern { dominant: [1, 3], recessive: [0, 2] }),
            (TraitName::ResourceManagement, DominancePattern { dominant: [0, 1], recessive: [2, 3] }),
            (TraitName::ProcessingSpeed, DominancePattern { dominant: [3, 2], recessive: [0, 1] }),
            (TraitName::EnergyEfficiency, DominancePattern { dominant: [2, 3], recessive: [0, 1] }),
            (TraitName::ErrorTolerance, DominancePattern { dominant: [3, 1], recessive: [2, 0] }),
            (TraitName::ParallelProcessing, DominancePattern { dominant: [2, 3], recessive: [0, 1] }),
        ]);
        Self { patterns }
    }

    pub fn pattern(&self, name: TraitName) -> Option<&DominancePattern> {
        self.patterns.get(&name)
    }

    /// Merge two same-named traits into a resultant trait.
    ///
    /// Precedence: both suppressed, then single suppression, then the
    /// specialization pattern for `hint` when present, then generic
    /// dominant / co-dominant / recessive rules. The RNG only feeds the
    /// fresh nucleotide encoding of the result; the resolved value and
    /// flags are fully determined by the inputs.
    pub fn combine<R: Rng + ?Sized>(
        &self,
        a: &GeneticTrait,
        b: &GeneticTrait,
        hint: Option<TraitName>,
        rng: &mut R,
    ) -> GeneticTrait {
        if a.suppressed && b.suppressed {
            return GeneticTrait::new(a.name, 0.0, false, true, rng);
        }
        if a.suppressed {
            return GeneticTrait::new(b.name, b.value, b.dominant, false, rng);
        }
        if b.suppressed {
            return GeneticTrait::new(a.name, a.value, a.dominant, false, rng);
        }

        if let Some(pattern) = hint.and_then(|name| self.patterns.get(&name)) {
            let dom_a = Self::encodes_dominant(a, pattern);
            let dom_b = Self::encodes_dominant(b, pattern);
            return Self::resolve(a, b, dom_a, dom_b, rng);
        }

        Self::resolve(a, b, a.dominant, b.dominant, rng)
    }

    /// A side counts as dominant under a specialization pattern when at
    /// least half of its raw nucleotide values fall in the dominant set.
    fn encodes_dominant(t: &GeneticTrait, pattern: &DominancePattern) -> bool {
        let hits = t
            .sequence_values()
            .iter()
            .filter(|v| pattern.dominant.contains(v))
            .count();
        hits * 2 >= crate::genome::TRAIT_SEQUENCE_LEN
    }

    fn resolve<R: Rng + ?Sized>(
        a: &GeneticTrait,
        b: &GeneticTrait,
        dom_a: bool,
        dom_b: bool,
        rng: &mut R,
    ) -> GeneticTrait {
        match (dom_a, dom_b) {
            // Co-dominance: average the values, rounded back to the
            // 2-decimal domain so persisted values stay exact.
            (true, true) => {
                GeneticTrait::new(a.name, round2((a.value + b.value) / 2.0), true, false, rng)
            }
            (true, false) => GeneticTrait::new(a.name, a.value, true, false, rng),
            (false, true) => GeneticTrait::new(b.name, b.value, true, false, rng),
            // Both recessive: take the lower value.
            (false, false) => {
                GeneticTrait::new(a.name, round2(a.value.min(b.value)), false, false, rng)
            }
        }
    }
}
