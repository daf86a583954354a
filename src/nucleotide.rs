use rand::Rng;
use serde::{Deserialize, Serialize};

/// Kinds of mutation a nucleotide can undergo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
    Point,
    BitFlip,
    Complement,
}

/// One entry in a nucleotide's mutation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEvent {
    pub generation: u32,
    pub from: u8,
    pub to: u8,
    pub kind: MutationKind,
}

/// A 2-bit symbolic genetic unit. Value is always in 0..=3.
///
/// Nucleotides are immutable values: `complement` and `mutate` return new
/// instances rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nucleotide {
    pub value: u8,
    pub generation: u32,
    #[serde(default)]
    pub history: Vec<MutationEvent>,
}

impl Nucleotide {
    pub fn new(value: u8) -> Self {
        debug_assert!(value <= 3, "nucleotide value out of 2-bit domain");
        Self {
            value: value & 0b11,
            generation: 0,
            history: Vec::new(),
        }
    }

    /// A fresh nucleotide with a uniformly random value.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(0..4))
    }

    /// Bitwise complement over the 2-bit domain. Pure: the source unit is
    /// untouched and the result starts a fresh history.
    pub fn complement(&self) -> Self {
        Self::new(self.value ^ 0b11)
    }

    /// Apply one weighted-random mutation and return the mutated unit:
    /// point mutation 70%, single bit-flip 15%, complement 15%. The
    /// returned nucleotide carries the full history plus the new event.
    pub fn mutate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let draw: f64 = rng.gen();
        let (new_value, kind) = if draw < 0.7 {
            (rng.gen_range(0..4), MutationKind::Point)
        } else if draw < 0.85 {
            let bit = if rng.gen_bool(0.5) { 0b01 } else { 0b10 };
            (self.value ^ bit, MutationKind::BitFlip)
        } else {
            (self.value ^ 0b11, MutationKind::Complement)
        };

        let mut history = self.history.clone();
        history.push(MutationEvent {
            generation: self.generation,
            from: self.value,
            to: new_value,
            kind,
        });

        Self {
            value: new_value,
            generation: self.generation + 1,
            history,
        }
    }
}
