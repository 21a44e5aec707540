//! Fixed-width circular fingerprints.
//!
//! Every atom environment up to [`DEFAULT_RADIUS`] bonds away is hashed and folded
//! into a [`FINGERPRINT_BITS`]-bit vector, in the spirit of ECFP. The word layout is
//! 32 little-endian `u32` words, bit `i` living in word `i / 32`.

use super::canonical::{initial_labels, refine};
use crate::core::models::structure::Structure;

pub const FINGERPRINT_BITS: usize = 1024;
pub const DEFAULT_RADIUS: usize = 2;

const WORD_BITS: usize = u32::BITS as usize;
const WORDS: usize = FINGERPRINT_BITS / WORD_BITS;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    words: [u32; WORDS],
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}

impl Fingerprint {
    pub fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    pub fn from_words(words: [u32; WORDS]) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[u32; WORDS] {
        &self.words
    }

    /// Sets bit `bit % FINGERPRINT_BITS`.
    pub fn set(&mut self, bit: usize) {
        let bit = bit % FINGERPRINT_BITS;
        self.words[bit / WORD_BITS] |= 1 << (bit % WORD_BITS);
    }

    pub fn get(&self, bit: usize) -> bool {
        bit < FINGERPRINT_BITS && self.words[bit / WORD_BITS] & (1 << (bit % WORD_BITS)) != 0
    }

    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..FINGERPRINT_BITS).filter(move |&bit| self.get(bit))
    }

    /// One `0.0`/`1.0` entry per bit, the layout numeric model runtimes expect.
    pub fn to_dense(&self) -> Vec<f64> {
        (0..FINGERPRINT_BITS)
            .map(|bit| if self.get(bit) { 1.0 } else { 0.0 })
            .collect()
    }

    /// Tanimoto similarity; two empty fingerprints are considered identical.
    pub fn tanimoto(&self, other: &Fingerprint) -> f64 {
        let (mut both, mut either) = (0u32, 0u32);
        for (a, b) in self.words.iter().zip(other.words.iter()) {
            both += (a & b).count_ones();
            either += (a | b).count_ones();
        }
        if either == 0 {
            1.0
        } else {
            both as f64 / either as f64
        }
    }
}

pub fn circular(structure: &Structure, radius: usize) -> Fingerprint {
    let adjacency = structure.adjacency();
    let mut fingerprint = Fingerprint::new();
    let mut labels = initial_labels(structure, &adjacency);

    for round in 0..=radius {
        if round > 0 {
            labels = refine(&labels, &adjacency);
        }
        for &label in &labels {
            fingerprint.set((label % FINGERPRINT_BITS as u64) as usize);
        }
    }

    fingerprint
}
