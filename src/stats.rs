/* ------------------------------------------------------------------ */
/* Statistical estimator: bigram counts + additive smoothing          */
/* ------------------------------------------------------------------ */
//
// N[i][j] = smoothing + #(i → j);  P[i] = N[i] / sum(N[i]).
// Closed form, one pass over the pairs, no randomness.

use rayon::prelude::*;

use crate::config::SMOOTHING;
use crate::error::{BigramError, Result};
use crate::ops::normalize_row;
use crate::pairs::TransitionPairs;
use crate::table::ProbabilityTable;

/// Raw transition counts plus the smoothing constant applied on top.
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable {
    size:      usize,
    counts:    Vec<u32>,
    smoothing: f32,
}

impl CountTable {
    pub fn accumulate(pairs: &TransitionPairs, size: usize, smoothing: f32) -> Result<Self> {
        check_smoothing(smoothing)?;
        pairs.check_codes(size)?;

        let mut counts = vec![0u32; size * size];
        for (i, j) in pairs.iter() {
            counts[i * size + j] += 1;
        }
        Ok(Self { size, counts, smoothing })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Observed count only, smoothing excluded.
    pub fn observed(&self, i: usize, j: usize) -> Result<u32> {
        self.check_code(i)?;
        self.check_code(j)?;
        Ok(self.counts[i * self.size + j])
    }

    /// Smoothed count N[i][j].
    pub fn get(&self, i: usize, j: usize) -> Result<f32> {
        Ok(self.observed(i, j)? as f32 + self.smoothing)
    }

    pub fn row_total(&self, i: usize) -> Result<f32> {
        self.check_code(i)?;
        Ok((0..self.size).map(|j| self.smoothed(i, j)).sum())
    }

    fn check_code(&self, code: usize) -> Result<()> {
        if code >= self.size {
            return Err(BigramError::OutOfRange { code, size: self.size });
        }
        Ok(())
    }

    // callers keep i, j < size
    fn smoothed(&self, i: usize, j: usize) -> f32 {
        self.counts[i * self.size + j] as f32 + self.smoothing
    }

    // A row that is zero after smoothing (smoothing 0, code never seen as
    // `prev`) carries no information and becomes uniform.
    pub fn probabilities(&self) -> Result<ProbabilityTable> {
        let n = self.size;
        let mut data = vec![0.0f32; n * n];
        if n > 0 {
            data.par_chunks_mut(n).enumerate().for_each(|(i, out)| {
                let row: Vec<f32> = (0..n).map(|j| self.smoothed(i, j)).collect();
                if normalize_row(&row, out) <= 0.0 {
                    out.fill(1.0 / n as f32);
                }
            });
        }
        ProbabilityTable::from_rows(n, data)
    }
}

fn check_smoothing(smoothing: f32) -> Result<()> {
    if smoothing.is_finite() && smoothing >= 0.0 {
        Ok(())
    } else {
        Err(BigramError::InvalidSmoothing(smoothing))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticalEstimator {
    smoothing: f32,
}

impl Default for StatisticalEstimator {
    fn default() -> Self {
        Self { smoothing: SMOOTHING }
    }
}

impl StatisticalEstimator {
    pub fn new(smoothing: f32) -> Result<Self> {
        check_smoothing(smoothing)?;
        Ok(Self { smoothing })
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    pub fn counts(&self, pairs: &TransitionPairs, size: usize) -> Result<CountTable> {
        CountTable::accumulate(pairs, size, self.smoothing)
    }

    pub fn fit(&self, pairs: &TransitionPairs, size: usize) -> Result<ProbabilityTable> {
        let counts = self.counts(pairs, size)?;
        log::debug!(
            "counted {} transitions over {}x{} codes (smoothing {})",
            pairs.len(), size, size, self.smoothing
        );
        counts.probabilities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Vocabulary;

    fn ann_mia() -> (Vocabulary, TransitionPairs) {
        let corpus = ["ann", "mia"];
        let vocab = Vocabulary::build(&corpus).unwrap();
        let pairs = TransitionPairs::extract(&corpus, &vocab).unwrap();
        (vocab, pairs)
    }

    #[test]
    fn counts_include_smoothing() {
        let (vocab, pairs) = ann_mia();
        let counts = StatisticalEstimator::default().counts(&pairs, vocab.len()).unwrap();
        assert_eq!(counts.observed(0, 1).unwrap(), 1);
        assert_eq!(counts.get(0, 1).unwrap(), 2.0);
        assert_eq!(counts.observed(4, 4).unwrap(), 1);
        assert_eq!(counts.row_total(0).unwrap(), 7.0);
    }

    #[test]
    fn count_lookups_are_bounds_checked() {
        let (vocab, pairs) = ann_mia();
        let counts = StatisticalEstimator::default().counts(&pairs, vocab.len()).unwrap();
        assert!(matches!(counts.observed(5, 0), Err(BigramError::OutOfRange { code: 5, size: 5 })));
        assert!(matches!(counts.get(0, 9), Err(BigramError::OutOfRange { code: 9, size: 5 })));
        assert!(matches!(counts.row_total(5), Err(BigramError::OutOfRange { code: 5, size: 5 })));
    }

    #[test]
    fn boundary_to_a_is_two_sevenths() {
        let (vocab, pairs) = ann_mia();
        let p = StatisticalEstimator::default().fit(&pairs, vocab.len()).unwrap();
        assert!((p.get(0, 1).unwrap() - 2.0 / 7.0).abs() < 1e-6);
        assert!(p.is_row_stochastic(1e-5));
    }

    #[test]
    fn positive_smoothing_leaves_no_zero_transitions() {
        let (vocab, pairs) = ann_mia();
        let p = StatisticalEstimator::new(0.1).unwrap().fit(&pairs, vocab.len()).unwrap();
        assert!(p.as_slice().iter().all(|&x| x > 0.0));
    }

    #[test]
    fn zero_smoothing_keeps_unseen_transitions_at_zero() {
        let (vocab, pairs) = ann_mia();
        let p = StatisticalEstimator::new(0.0).unwrap().fit(&pairs, vocab.len()).unwrap();
        assert_eq!(p.get(0, 2).unwrap(), 0.0);
        assert_eq!(p.get(0, 1).unwrap(), 0.5);
        assert!(p.is_row_stochastic(1e-5));
    }

    #[test]
    fn unobserved_row_without_smoothing_is_uniform() {
        let pairs = TransitionPairs::from(vec![(0, 1), (1, 0)]);
        let p = StatisticalEstimator::new(0.0).unwrap().fit(&pairs, 3).unwrap();
        assert_eq!(p.row(2).unwrap(), &[1.0 / 3.0; 3]);
    }

    #[test]
    fn negative_smoothing_is_rejected() {
        assert!(matches!(StatisticalEstimator::new(-1.0), Err(BigramError::InvalidSmoothing(_))));
        let pairs = TransitionPairs::from(vec![(0, 0)]);
        assert!(CountTable::accumulate(&pairs, 1, f32::NAN).is_err());
    }

    #[test]
    fn out_of_range_pair_is_rejected() {
        let pairs = TransitionPairs::from(vec![(0, 4)]);
        let err = StatisticalEstimator::default().fit(&pairs, 3).unwrap_err();
        assert!(matches!(err, BigramError::OutOfRange { code: 4, size: 3 }));
    }
}
