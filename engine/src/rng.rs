// ═══════════════════════════════════════════════════════════════════════
// Match RNG — the one seeded stream a match draws from
// ═══════════════════════════════════════════════════════════════════════

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random stream keyed by a seed.
///
/// Every random decision of a match (map layout, starting deal, dice,
/// automated policy choices) is drawn from one of these, in a fixed order,
/// so a seed plus the same policies replays the same match. The stream
/// counts the raw draws it has served, which makes replays comparable.
#[derive(Debug, Clone)]
pub struct MatchRng {
    seed: u64,
    draws: u64,
    inner: ChaCha8Rng,
}

impl MatchRng {
    pub fn new(seed: u64) -> Self {
        MatchRng {
            seed,
            draws: 0,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Raw words drawn from the stream so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// One six-sided die.
    pub fn roll_die(&mut self) -> u8 {
        self.gen_range(1..=6)
    }

    /// Split off an independent stream, consuming one draw from this one.
    /// Used for throwaway simulations that must not perturb the match.
    pub fn fork(&mut self) -> MatchRng {
        let seed = self.next_u64();
        MatchRng::new(seed)
    }
}

impl RngCore for MatchRng {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws += 1;
        self.inner.try_fill_bytes(dest)
    }
}
