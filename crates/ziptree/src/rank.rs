use rand::RngCore;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// How a newly inserted node's rank is chosen (§4.3).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RankMode {
    /// Leading-zero-count of a uniform random word.
    Random,
    /// Leading-zero-count of `hash(key) * coefficient mod modulus`.
    /// Deterministic: identical keys always produce identical ranks.
    Hashed { coefficient: u64, modulus: u64 },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ZtParams {
    /// Width, in bits, of the rank domain. Ranks are capped to this width
    /// regardless of the word size used to derive them.
    pub rank_bits: u8,
    pub mode: RankMode,
}

impl ZtParams {
    pub fn random(rank_bits: u8) -> Self {
        ZtParams { rank_bits, mode: RankMode::Random }
    }

    pub fn hashed(coefficient: u64, modulus: u64, rank_bits: u8) -> Self {
        assert!(modulus > 0, "universalizing modulus must be nonzero");
        ZtParams { rank_bits, mode: RankMode::Hashed { coefficient, modulus } }
    }

    pub(crate) fn assign_rank<T: Hash>(&self, value: &T, rng: &mut impl RngCore) -> u32 {
        match self.mode {
            RankMode::Random => leading_zero_rank(rng.next_u64(), self.rank_bits),
            RankMode::Hashed { coefficient, modulus } => {
                let mut hasher = DefaultHasher::new();
                value.hash(&mut hasher);
                let h = hasher.finish();
                let universalized = h.wrapping_mul(coefficient) % modulus;
                leading_zero_rank(universalized, self.rank_bits)
            }
        }
    }
}

impl Default for ZtParams {
    fn default() -> Self {
        Self::random(8)
    }
}

fn leading_zero_rank(word: u64, rank_bits: u8) -> u32 {
    word.leading_zeros().min(rank_bits as u32)
}
