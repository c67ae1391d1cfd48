/* ------------------------------------------------------------------ */
/* Probability table: V × V row-stochastic matrix, row-major          */
/* ------------------------------------------------------------------ */
//
// P[i][j] = probability that code j follows code i. Both estimators produce
// one; the sampler and evaluator consume it read-only.

use crate::error::{BigramError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    size: usize,
    data: Vec<f32>,
}

impl ProbabilityTable {
    /// Wrap a row-major `size * size` buffer. Rows are not renormalised.
    pub fn from_rows(size: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != size * size {
            return Err(BigramError::ShapeMismatch {
                what: "probability table",
                expected: size * size,
                actual: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    /// Every transition equally likely: P[i][j] = 1 / size.
    pub fn uniform(size: usize) -> Self {
        let p = if size == 0 { 0.0 } else { 1.0 / size as f32 };
        Self { size, data: vec![p; size * size] }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Bounds-checked row P[i].
    pub fn row(&self, i: usize) -> Result<&[f32]> {
        self.check_code(i)?;
        Ok(&self.data[i * self.size..(i + 1) * self.size])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        // chunks_exact(0) panics; an empty table has no rows anyway
        self.data.chunks_exact(self.size.max(1))
    }

    /// Bounds-checked lookup.
    pub fn get(&self, i: usize, j: usize) -> Result<f32> {
        self.check_code(i)?;
        self.check_code(j)?;
        Ok(self.data[i * self.size + j])
    }

    fn check_code(&self, code: usize) -> Result<()> {
        if code >= self.size {
            return Err(BigramError::OutOfRange { code, size: self.size });
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Largest |sum(row) - 1| over all rows.
    pub fn max_row_error(&self) -> f32 {
        self.rows()
            .map(|r| (r.iter().map(|&p| p as f64).sum::<f64>() - 1.0).abs() as f32)
            .fold(0.0, f32::max)
    }

    pub fn is_row_stochastic(&self, tol: f32) -> bool {
        self.data.iter().all(|&p| p >= 0.0 && p.is_finite()) && self.max_row_error() <= tol
    }
}
