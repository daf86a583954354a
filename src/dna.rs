//! Variable-length DNA strands: replication with structural mutations,
//! complementary strands, and multi-point crossover.
//!
//! Trait encodings in `genome` are fixed at 8 nucleotides; this layer is
//! where sequences grow, shrink, and recombine. `MutationRates` from the
//! DNA-information block drives `replicate`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::genome::MutationRates;
use crate::nucleotide::{MutationKind, Nucleotide};

/// Aggregate mutation counts over a strand's full history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationStats {
    pub total: usize,
    pub kinds: BTreeMap<MutationKind, usize>,
}

/// An ordered nucleotide sequence with a lineage generation counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaStrand {
    pub sequence: Vec<Nucleotide>,
    pub generation: u32,
}

impl DnaStrand {
    pub fn from_values(values: &[u8]) -> Self {
        Self {
            sequence: values.iter().map(|&v| Nucleotide::new(v)).collect(),
            generation: 0,
        }
    }

    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self {
            sequence: (0..len).map(|_| Nucleotide::random(rng)).collect(),
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Raw 2-bit values in sequence order.
    pub fn values(&self) -> Vec<u8> {
        self.sequence.iter().map(|n| n.value).collect()
    }

    /// A fresh strand where every position is the 2-bit complement.
    pub fn complementary(&self) -> Self {
        Self {
            sequence: self.sequence.iter().map(Nucleotide::complement).collect(),
            generation: 0,
        }
    }

    /// Replicate the strand into a child, applying structural mutations
    /// (insertion, deletion, duplication, inversion) and per-position
    /// point mutations at the supplied rates. The source strand is
    /// untouched; the child's generation advances by one.
    pub fn replicate<R: Rng + ?Sized>(&self, rates: &MutationRates, rng: &mut R) -> Self {
        let mut sequence = self.sequence.clone();

        if rng.gen_bool(rates.insertion) {
            let position = rng.gen_range(0..=sequence.len());
            sequence.insert(position, Nucleotide::random(rng));
        }

        if sequence.len() > 1 && rng.gen_bool(rates.deletion) {
            let position = rng.gen_range(0..sequence.len());
            sequence.remove(position);
        }

        if !sequence.is_empty() && rng.gen_bool(rates.duplication) {
            let start = rng.gen_range(0..sequence.len());
            let length = rng.gen_range(1..=sequence.len() - start);
            let segment: Vec<Nucleotide> = sequence[start..start + length].to_vec();
            for (offset, unit) in segment.into_iter().enumerate() {
                sequence.insert(start + offset, unit);
            }
        }

        if sequence.len() > 1 && rng.gen_bool(rates.inversion) {
            let start = rng.gen_range(0..sequence.len() - 1);
            let length = rng.gen_range(1..=sequence.len() - start);
            sequence[start..start + length].reverse();
        }

        let sequence = sequence
            .iter()
            .map(|unit| {
                if rng.gen_bool(rates.point) {
                    unit.mutate(rng)
                } else {
                    unit.clone()
                }
            })
            .collect();

        Self {
            sequence,
            generation: self.generation + 1,
        }
    }

    /// Multi-point crossover: 1 to 3 cut points, alternating source
    /// strands between cuts. Output length matches the shorter parent;
    /// the child's generation is one past the deeper lineage.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        let len = self.sequence.len().min(other.sequence.len());
        if len == 0 {
            return Self {
                sequence: Vec::new(),
                generation: self.generation.max(other.generation) + 1,
            };
        }

        let point_count = rng.gen_range(1..=3);
        let mut points: Vec<usize> = (0..point_count).map(|_| rng.gen_range(0..len)).collect();
        points.sort_unstable();

        let mut sequence = Vec::with_capacity(len);
        let mut from_self = true;
        let mut last = 0;
        for point in points {
            let source = if from_self { self } else { other };
            sequence.extend_from_slice(&source.sequence[last..point]);
            from_self = !from_self;
            last = point;
        }
        let source = if from_self { self } else { other };
        sequence.extend_from_slice(&source.sequence[last..len]);

        Self {
            sequence,
            generation: self.generation.max(other.generation) + 1,
        }
    }

    /// Shannon entropy of the value distribution, in bits. Uniform use of
    /// all four values gives 2.0; a constant strand gives 0.0.
    pub fn entropy(&self) -> f64 {
        if self.sequence.is_empty() {
            return 0.0;
        }
        let mut counts = [0usize; 4];
        for unit in &self.sequence {
            counts[unit.value as usize] += 1;
        }
        let total = self.sequence.len() as f64;
        -counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }

    /// Per-position divergence from an ancestor strand in [0, 1].
    /// Strands of different lengths are maximally distant.
    pub fn distance(&self, ancestor: &Self) -> f64 {
        if self.sequence.len() != ancestor.sequence.len() {
            return 1.0;
        }
        if self.sequence.is_empty() {
            return 0.0;
        }
        let differences = self
            .sequence
            .iter()
            .zip(&ancestor.sequence)
            .filter(|(a, b)| a.value != b.value)
            .count();
        differences as f64 / self.sequence.len() as f64
    }

    /// Mutation counts accumulated across every position's history.
    pub fn mutation_stats(&self) -> MutationStats {
        let mut stats = MutationStats::default();
        for unit in &self.sequence {
            for event in &unit.history {
                stats.total += 1;
                *stats.kinds.entry(event.kind).or_insert(0) += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zero_rates() -> MutationRates {
        MutationRates {
            point: 0.0,
            insertion: 0.0,
            deletion: 0.0,
            duplication: 0.0,
            inversion: 0.0,
        }
    }

    #[test]
    fn test_complementary_inverts_every_position() {
        let strand = DnaStrand::from_values(&[0, 1, 2, 3, 0, 1, 2, 3]);
        let complement = strand.complementary();
        assert_eq!(complement.values(), vec![3, 2, 1, 0, 3, 2, 1, 0]);
        // Complementing twice restores the original values.
        assert_eq!(complement.complementary().values(), strand.values());
    }

    #[test]
    fn test_replicate_without_mutation_copies_and_ages() {
        let mut rng = StdRng::seed_from_u64(1);
        let strand = DnaStrand::from_values(&[0, 1, 2, 3]);
        let child = strand.replicate(&zero_rates(), &mut rng);
        assert_eq!(child.values(), strand.values());
        assert_eq!(child.generation, 1);
        assert_eq!(strand.generation, 0);
    }

    #[test]
    fn test_replicate_insertion_grows_strand() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut rates = zero_rates();
        rates.insertion = 1.0;
        let strand = DnaStrand::from_values(&[0, 1, 2, 3]);
        let child = strand.replicate(&rates, &mut rng);
        assert_eq!(child.len(), 5);
    }

    #[test]
    fn test_replicate_deletion_shrinks_strand() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut rates = zero_rates();
        rates.deletion = 1.0;
        let strand = DnaStrand::from_values(&[0, 1, 2, 3]);
        let child = strand.replicate(&rates, &mut rng);
        assert_eq!(child.len(), 3);
    }

    #[test]
    fn test_replicate_duplication_repeats_a_segment() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut rates = zero_rates();
        rates.duplication = 1.0;
        let strand = DnaStrand::from_values(&[0, 1, 2, 3]);
        let child = strand.replicate(&rates, &mut rng);
        assert!(child.len() > strand.len());
    }

    #[test]
    fn test_replicate_point_mutations_record_history() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut rates = zero_rates();
        rates.point = 1.0;
        let strand = DnaStrand::from_values(&[0, 1, 2, 3, 0, 1, 2, 3]);
        let child = strand.replicate(&rates, &mut rng);

        assert_eq!(child.len(), strand.len());
        let stats = child.mutation_stats();
        assert_eq!(stats.total, strand.len());
        assert_eq!(stats.kinds.values().sum::<usize>(), stats.total);
        assert!(strand.mutation_stats().total == 0);
    }

    #[test]
    fn test_crossover_takes_positions_from_parents() {
        let mut rng = StdRng::seed_from_u64(6);
        let a = DnaStrand::from_values(&[0; 8]);
        let b = DnaStrand::from_values(&[3; 8]);
        let child = a.crossover(&b, &mut rng);

        assert_eq!(child.len(), 8);
        assert_eq!(child.generation, 1);
        for value in child.values() {
            assert!(value == 0 || value == 3);
        }
    }

    #[test]
    fn test_crossover_tracks_deeper_lineage() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = DnaStrand::from_values(&[0, 1, 2, 3]);
        let mut b = DnaStrand::from_values(&[3, 2, 1, 0]);
        b.generation = 4;
        let child = a.crossover(&b, &mut rng);
        assert_eq!(child.generation, 5);
    }

    #[test]
    fn test_entropy_bounds() {
        let uniform = DnaStrand::from_values(&[0, 1, 2, 3, 0, 1, 2, 3]);
        assert!((uniform.entropy() - 2.0).abs() < 1e-9);

        let constant = DnaStrand::from_values(&[2; 8]);
        assert_eq!(constant.entropy(), 0.0);
    }

    #[test]
    fn test_distance() {
        let ancestor = DnaStrand::from_values(&[0, 1, 2, 3]);
        assert_eq!(ancestor.distance(&ancestor), 0.0);

        let drifted = DnaStrand::from_values(&[0, 1, 2, 0]);
        assert_eq!(drifted.distance(&ancestor), 0.25);

        let shorter = DnaStrand::from_values(&[0, 1, 2]);
        assert_eq!(shorter.distance(&ancestor), 1.0);
    }

    #[test]
    fn test_replicate_deterministic_under_seed() {
        let strand = DnaStrand::from_values(&[0, 1, 2, 3, 0, 1, 2, 3]);
        let rates = MutationRates::default();
        let mut rng_a = StdRng::seed_from_u64(9);
        let mut rng_b = StdRng::seed_from_u64(9);
        assert_eq!(
            strand.replicate(&rates, &mut rng_a),
            strand.replicate(&rates, &mut rng_b)
        );
    }
}
