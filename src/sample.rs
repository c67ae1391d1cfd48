/* ------------------------------------------------------------------ */
/* Autoregressive sampling from a probability table                   */
/* ------------------------------------------------------------------ */
//
// Start at the boundary, draw the next code from row P[code], stop when
// the boundary comes back. Works for either estimator's table.

use crate::config::{SampleOptions, MAX_LEN};
use crate::error::{BigramError, Result};
use crate::rng::Rng;
use crate::table::ProbabilityTable;
use crate::vocab::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    max_len: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self { max_len: MAX_LEN }
    }
}

impl Sampler {
    pub fn new(max_len: usize) -> Result<Self> {
        SampleOptions { max_len, ..Default::default() }.validate()?;
        Ok(Self { max_len })
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// `count` sequences from a fresh generator seeded with `seed`.
    pub fn generate(
        &self,
        table: &ProbabilityTable,
        vocab: &Vocabulary,
        count: usize,
        seed: u64,
    ) -> Result<Vec<String>> {
        let mut rng = Rng::new(seed);
        self.generate_with(table, vocab, count, &mut rng)
    }

    pub fn generate_with(
        &self,
        table: &ProbabilityTable,
        vocab: &Vocabulary,
        count: usize,
        rng: &mut Rng,
    ) -> Result<Vec<String>> {
        if table.size() != vocab.len() {
            return Err(BigramError::ShapeMismatch {
                what: "probability table",
                expected: vocab.len(),
                actual: table.size(),
            });
        }
        (0..count).map(|_| self.sample_one(table, vocab, rng)).collect()
    }

    fn sample_one(&self, table: &ProbabilityTable, vocab: &Vocabulary, rng: &mut Rng) -> Result<String> {
        let boundary = vocab.boundary();
        let mut name = String::new();
        let mut len = 0usize;
        let mut code = boundary;

        loop {
            code = rng
                .categorical(table.row(code)?)
                .ok_or(BigramError::EmptyRow { code })?;
            if code == boundary {
                return Ok(name);
            }
            if len == self.max_len {
                return Err(BigramError::GenerationOverflow { max_len: self.max_len });
            }
            name.push(vocab.decode(code)?);
            len += 1;
        }
    }
}
