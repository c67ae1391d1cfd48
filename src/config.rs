/* ------------------------------------------------------------------ */
/* Hyperparameters and global constants                               */
/* ------------------------------------------------------------------ */
//
// Every default the CLI exposes lives here. The option structs below are
// what the library actually consumes; the binary fills them from flags.

use crate::error::{BigramError, Result};

// ── Vocabulary ────────────────────────────────────────────────────────────

pub const BOUNDARY_ID:   usize = 0;
pub const BOUNDARY_CHAR: char  = '.';   // display form of the boundary token

// ── Statistical model ─────────────────────────────────────────────────────

pub const SMOOTHING: f32 = 1.0;         // add-one (Laplace) smoothing

// ── Linear model ──────────────────────────────────────────────────────────

pub const ITERATIONS:    usize = 100;
pub const LEARNING_RATE: f32   = 50.0;  // full-batch, so a large step is fine
pub const L2_COEFF:      f32   = 1e-3;
pub const SEED:          u64   = 2147483647;
pub const LOG_INTERVAL:  usize = 10;

// ── Sampling ──────────────────────────────────────────────────────────────

pub const STAT_SAMPLE_COUNT:   usize = 20;
pub const LINEAR_SAMPLE_COUNT: usize = 10;
// No name in a realistic corpus comes close; only a degenerate table
// with a near-zero boundary column should ever hit this.
pub const MAX_LEN: usize = 64;

// ── Files / serving ───────────────────────────────────────────────────────

pub const CORPUS_PATH:  &str = "names.txt";
pub const WEIGHTS_PATH: &str = "model.bin";
pub const VOCAB_PATH:   &str = "vocab.json";
pub const SERVE_ADDR:   &str = "127.0.0.1:8080";

/// Settings for one run of full-batch gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearOptions {
    pub iterations:    usize,
    pub learning_rate: f32,
    pub l2:            f32,
    pub seed:          u64,
}

impl Default for LinearOptions {
    fn default() -> Self {
        Self {
            iterations:    ITERATIONS,
            learning_rate: LEARNING_RATE,
            l2:            L2_COEFF,
            seed:          SEED,
        }
    }
}

impl LinearOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(BigramError::InvalidOption {
                name: "learning_rate",
                reason: format!("must be finite and > 0, got {}", self.learning_rate),
            });
        }
        if !self.l2.is_finite() || self.l2 < 0.0 {
            return Err(BigramError::InvalidOption {
                name: "l2",
                reason: format!("must be finite and >= 0, got {}", self.l2),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    pub count:   usize,
    pub seed:    u64,
    pub max_len: usize,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self { count: STAT_SAMPLE_COUNT, seed: SEED, max_len: MAX_LEN }
    }
}

impl SampleOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_len == 0 {
            return Err(BigramError::InvalidOption {
                name: "max_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LinearOptions::default().validate().is_ok());
        assert!(SampleOptions::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_learning_rate_and_l2() {
        let opts = LinearOptions { learning_rate: 0.0, ..Default::default() };
        assert!(matches!(opts.validate(), Err(BigramError::InvalidOption { name: "learning_rate", .. })));

        let opts = LinearOptions { l2: f32::NAN, ..Default::default() };
        assert!(matches!(opts.validate(), Err(BigramError::InvalidOption { name: "l2", .. })));
    }

    #[test]
    fn rejects_zero_max_len() {
        let opts = SampleOptions { max_len: 0, ..Default::default() };
        assert!(opts.validate().is_err());
    }
}
