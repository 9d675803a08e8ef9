//! 对局专用的确定性RNG

use combat::CombatantId;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seedable RNG used for the opening coin flip.
#[derive(Debug, Clone)]
pub struct DuelRng {
    rng: Pcg32,
    seed: u64,
}

impl DuelRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeded from the thread RNG when no seed is configured.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(|| rand::rng().random()))
    }

    /// 获取当前种子值
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform pick over {1, 2}.
    pub fn pick_first(&mut self) -> CombatantId {
        if self.rng.random_range(1..=2u8) == 1 {
            CombatantId::One
        } else {
            CombatantId::Two
        }
    }
}
