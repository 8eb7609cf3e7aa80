//! Random number generation for level synthesis
//!
//! Uses a seeded ChaCha RNG so a (seed, catalog) pair always yields the same
//! sequence of levels.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::MAX_DEPTH;

/// World random number generator
///
/// Wraps ChaCha8Rng for reproducible generation.
/// Note: only the seed is serialized; a restored world restarts the stream.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `0..n`; 0 when `n` is 0
    pub fn randint0(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform value in `1..=n`; 0 when `n` is 0
    pub fn randint1(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(1..=n)
    }

    /// Uniform value in `lo..=hi`; `lo` when the range is empty
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Roll `n` dice with `m` sides
    pub fn dice(&mut self, n: u32, m: u32) -> u32 {
        (0..n).map(|_| self.randint1(m)).sum()
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        self.randint0(n) == 0
    }

    /// Returns true with probability percent/100
    pub fn percent(&mut self, percent: u32) -> bool {
        self.randint0(100) < percent
    }

    /// Depth-scaled bonus in `0..=max`, centred on `max * level / MAX_DEPTH`
    pub fn m_bonus(&mut self, max: i32, level: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        let level = level.clamp(0, MAX_DEPTH - 1);
        let centre = max * level / MAX_DEPTH;
        let spread = (max / 4).max(1);
        let value = centre + self.range(-spread, spread);
        value.clamp(0, max)
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.randint0(items.len() as u32) as usize])
        }
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.randint0(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// A catalog random quantity: `base + dice d sides + m_bonus(level)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RandomValue {
    #[serde(default)]
    pub base: i32,
    #[serde(default)]
    pub dice: u32,
    #[serde(default)]
    pub sides: u32,
    #[serde(default)]
    pub m_bonus: i32,
}

impl RandomValue {
    pub const fn fixed(base: i32) -> Self {
        Self {
            base,
            dice: 0,
            sides: 0,
            m_bonus: 0,
        }
    }

    pub const fn new(base: i32, dice: u32, sides: u32) -> Self {
        Self {
            base,
            dice,
            sides,
            m_bonus: 0,
        }
    }

    /// Roll the value at the given depth
    pub fn roll(&self, rng: &mut GameRng, level: i32) -> i32 {
        self.base + rng.dice(self.dice, self.sides) as i32 + rng.m_bonus(self.m_bonus, level)
    }

    /// Smallest value `roll` can return
    pub fn min(&self) -> i32 {
        self.base + self.dice as i32
    }
}
