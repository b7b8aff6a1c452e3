//! Xorshift64 PRNG wired into the `rand` traits.
//!
//! Engines draw every random decision (seeding, respawns, stochastic
//! activation) from one `Xorshift64`. Seeding it explicitly makes a whole
//! engine run reproducible; [`SeedableRng::from_entropy`] gives the usual
//! fresh-every-session behaviour.

use rand::{Error, RngCore, SeedableRng};

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses shifts (13, 7, 17). Seed 0 is a fixed point of the algorithm and is
/// replaced by a non-zero fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed (0 maps to the fallback seed).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Seeded when `seed` is given, otherwise drawn from OS entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new(s),
            None => Self::from_entropy(),
        }
    }

    fn advance(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RngCore for Xorshift64 {
    fn next_u32(&mut self) -> u32 {
        (self.advance() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.advance()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Xorshift64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    /// Uses the value directly as state, so `seed_from_u64(n)` and
    /// `new(n)` produce the same stream.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
