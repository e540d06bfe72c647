//! Random number source for generation.
//!
//! Every draw the generator makes goes through one PCG32 stream, so a seed
//! reproduces a chart exactly.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates the generator RNG. `None` seeds from the operating system.
pub fn create_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    }
}
