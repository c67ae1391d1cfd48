/* ------------------------------------------------------------------ */
/* Linear bigram model: one V × V weight matrix behind a softmax      */
/* ------------------------------------------------------------------ */
//
// logits = one_hot(prev) · W   (so the logits of a pair are just row W[prev])
// probs  = softmax(logits)
// loss   = mean_pairs(-ln probs[next]) + l2 · mean(W²)
//
// Pairs that share `prev` share a row of probabilities, so the forward
// and backward passes work per row over the (prev, next) count matrix
// instead of per pair. The result is the same full-batch gradient.

use rayon::prelude::*;

use crate::error::{BigramError, Result};
use crate::ops::{cross_entropy_loss, mean_square, softmax_fwd};
use crate::pairs::TransitionPairs;
use crate::rng::Rng;
use crate::table::ProbabilityTable;

/// Lifecycle of the weight matrix. A model that does not exist yet is the
/// uninitialised state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Initialized { seed: u64 },
    Training { step: usize },
    Trained { steps: usize },
}

/// Per-row target counts: how often each `next` follows each `prev`.
#[derive(Debug, Clone)]
pub struct TargetCounts {
    size:   usize,
    counts: Vec<f32>,   // [prev × next]
    totals: Vec<f32>,   // per prev
    pairs:  usize,
}

impl TargetCounts {
    pub fn from_pairs(pairs: &TransitionPairs, size: usize) -> Result<Self> {
        pairs.check_codes(size)?;
        let mut counts = vec![0.0f32; size * size];
        let mut totals = vec![0.0f32; size];
        for (i, j) in pairs.iter() {
            counts[i * size + j] += 1.0;
            totals[i] += 1.0;
        }
        Ok(Self { size, counts, totals, pairs: pairs.len() })
    }

    pub fn pairs(&self) -> usize {
        self.pairs
    }
}

pub struct LinearModel {
    pub size:    usize,
    pub weights: Vec<f32>,   // [size × size], row = prev code
    pub grads:   Vec<f32>,
    state:       ModelState,
}

impl LinearModel {
    /// W ~ N(0, 1), drawn row-major from `seed`.
    pub fn new(size: usize, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let weights = (0..size * size).map(|_| rng.gauss(0.0, 1.0)).collect();
        Self {
            size,
            weights,
            grads: vec![0.0; size * size],
            state: ModelState::Initialized { seed },
        }
    }

    /// Restore trained weights (e.g. from a checkpoint).
    pub fn from_weights(size: usize, weights: Vec<f32>, steps: usize) -> Result<Self> {
        if weights.len() != size * size {
            return Err(BigramError::ShapeMismatch {
                what: "weight matrix",
                expected: size * size,
                actual: weights.len(),
            });
        }
        Ok(Self {
            size,
            weights,
            grads: vec![0.0; size * size],
            state: ModelState::Trained { steps },
        })
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub(crate) fn mark_trained(&mut self) {
        let steps = match self.state {
            ModelState::Training { step } => step,
            ModelState::Trained { steps } => steps,
            ModelState::Initialized { .. } => 0,
        };
        self.state = ModelState::Trained { steps };
    }

    /// Literal forward pass: one probability row per input code.
    pub fn forward(&self, prev_codes: &[usize]) -> Result<Vec<Vec<f32>>> {
        let n = self.size;
        prev_codes
            .iter()
            .map(|&p| {
                if p >= n {
                    return Err(BigramError::OutOfRange { code: p, size: n });
                }
                let mut probs = vec![0.0f32; n];
                softmax_fwd(&self.weights[p * n..(p + 1) * n], &mut probs);
                Ok(probs)
            })
            .collect()
    }

    /// P = softmax(one_hot(all codes) · W), i.e. softmax of every row.
    pub fn probabilities(&self) -> Result<ProbabilityTable> {
        let n = self.size;
        let mut data = vec![0.0f32; n * n];
        if n > 0 {
            data.par_chunks_mut(n)
                .zip(self.weights.par_chunks(n))
                .for_each(|(probs, logits)| softmax_fwd(logits, probs));
        }
        ProbabilityTable::from_rows(n, data)
    }

    /// Loss only, no gradient.
    pub fn loss(&self, targets: &TargetCounts, l2: f32) -> Result<f32> {
        self.check_targets(targets)?;
        let n = self.size;
        let row_nll: Vec<f32> = self.weights
            .par_chunks(n)
            .enumerate()
            .map(|(p, logits)| {
                let mut probs = vec![0.0f32; n];
                softmax_fwd(logits, &mut probs);
                row_cross_entropy(&probs, &targets.counts[p * n..(p + 1) * n])
            })
            .collect();
        Ok(self.combine(&row_nll, targets, l2))
    }

    /// Forward + backward in one pass. Fills `self.grads` with dLoss/dW
    /// and returns the loss at the current weights.
    //
    //   d/dW[p][j] = (total[p] · probs[p][j] - count[p][j]) / n_pairs
    //              + 2 · l2 · W[p][j] / (V · V)
    pub fn loss_and_grad(&mut self, targets: &TargetCounts, l2: f32) -> Result<f32> {
        self.check_targets(targets)?;
        let n = self.size;
        let inv_pairs = 1.0 / targets.pairs as f32;
        let l2_scale = 2.0 * l2 / (n * n) as f32;

        // row-local work; collect keeps row order so the sum is reproducible
        let row_nll: Vec<f32> = self.grads
            .par_chunks_mut(n)
            .zip(self.weights.par_chunks(n))
            .enumerate()
            .map(|(p, (grad, logits))| {
                let counts = &targets.counts[p * n..(p + 1) * n];
                let total = targets.totals[p];
                let mut probs = vec![0.0f32; n];
                softmax_fwd(logits, &mut probs);
                for j in 0..n {
                    grad[j] = (total * probs[j] - counts[j]) * inv_pairs + l2_scale * logits[j];
                }
                row_cross_entropy(&probs, counts)
            })
            .collect();

        Ok(self.combine(&row_nll, targets, l2))
    }

    /// W ← W - lr · grad
    pub fn step(&mut self, lr: f32) {
        for (w, g) in self.weights.iter_mut().zip(self.grads.iter()) {
            *w -= lr * g;
        }
        let step = match self.state {
            ModelState::Training { step } => step + 1,
            ModelState::Trained { steps } => steps + 1,
            ModelState::Initialized { .. } => 1,
        };
        self.state = ModelState::Training { step };
    }

    fn combine(&self, row_nll: &[f32], targets: &TargetCounts, l2: f32) -> f32 {
        let nll: f32 = row_nll.iter().sum();
        nll / targets.pairs as f32 + l2 * mean_square(&self.weights)
    }

    fn check_targets(&self, targets: &TargetCounts) -> Result<()> {
        if targets.size != self.size {
            return Err(BigramError::ShapeMismatch {
                what: "target counts",
                expected: self.size,
                actual: targets.size,
            });
        }
        if targets.pairs == 0 {
            return Err(BigramError::EmptyCorpus);
        }
        Ok(())
    }
}

// Σ_j count[j] · -ln probs[j]
fn row_cross_entropy(probs: &[f32], counts: &[f32]) -> f32 {
    counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0.0)
        .map(|(j, &c)| c * cross_entropy_loss(probs, j))
        .sum()
}
