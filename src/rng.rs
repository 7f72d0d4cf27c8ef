use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seeded byte generator for CXNN. Two generators built from the same seed
/// produce the same bytes, so whole runs can be replayed.
#[derive(Clone, Debug)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Random {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// advance one step
    pub fn next_byte(&mut self) -> u8 {
        self.rng.gen()
    }
}
