/* ------------------------------------------------------------------ */
/* Minimal xorshift PRNG                                             */
/* ------------------------------------------------------------------ */
//
// Every random draw in the crate goes through an explicit `Rng` that the
// caller seeds; nothing reads process-wide random state.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    // xorshift is stuck at zero for a zero state, so the seed is scrambled
    // with one splitmix64 round first. Seed 0 is a legal seed.
    pub fn new(seed: u64) -> Self {
        let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        Self { state: if z == 0 { 0x9E37_79B9_7F4A_7C15 } else { z } }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / 9007199254740992.0)
    }

    /// Box-Muller standard normal, scaled.
    pub fn gauss(&mut self, mean: f32, std: f32) -> f32 {
        let mut u1 = self.uniform();
        let u2 = self.uniform();
        if u1 < 1e-30 { u1 = 1e-30; }
        let mag = (-2.0 * u1.ln()).sqrt();
        mean + std * (mag * (2.0 * std::f64::consts::PI * u2).cos()) as f32
    }

    /// One draw from the (not necessarily normalised) weights in `probs`.
    /// Zero-weight entries are never returned. Returns `None` when the
    /// weights sum to zero or are not finite.
    pub fn categorical(&mut self, probs: &[f32]) -> Option<usize> {
        let total: f64 = probs.iter().map(|&p| p as f64).sum();
        if !(total > 0.0) || !total.is_finite() { return None; }

        let mut r = self.uniform() * total;
        let mut last_nonzero = None;
        for (i, &p) in probs.iter().enumerate() {
            if p <= 0.0 { continue; }
            last_nonzero = Some(i);
            r -= p as f64;
            if r < 0.0 { return Some(i); }
        }
        // rounding left a sliver of mass at the end
        last_nonzero
    }
}
