/* ------------------------------------------------------------------ */
/* Negative log-likelihood of sequences under a probability table     */
/* ------------------------------------------------------------------ */

use serde::Serialize;

use crate::error::{BigramError, Result};
use crate::table::ProbabilityTable;
use crate::vocab::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NllScore {
    pub total_nll:      f64,
    /// Mean per-transition surprise; 0 when there were no transitions.
    pub normalized_nll: f64,
    pub transitions:    usize,
}

/// One bracketed bigram of a sequence with its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionScore {
    pub prev:     char,
    pub next:     char,
    pub prob:     f32,
    pub log_prob: f64,
}

pub fn score<S: AsRef<str>>(
    sequences: &[S],
    table: &ProbabilityTable,
    vocab: &Vocabulary,
) -> Result<NllScore> {
    let mut total_nll = 0.0f64;
    let mut transitions = 0usize;

    for seq in sequences {
        for t in breakdown(seq.as_ref(), table, vocab)? {
            total_nll -= t.log_prob;
            transitions += 1;
        }
    }

    let normalized_nll = if transitions > 0 { total_nll / transitions as f64 } else { 0.0 };
    Ok(NllScore { total_nll, normalized_nll, transitions })
}

/// Per-transition probabilities for one sequence, boundaries included.
pub fn breakdown(
    sequence: &str,
    table: &ProbabilityTable,
    vocab: &Vocabulary,
) -> Result<Vec<TransitionScore>> {
    if table.size() != vocab.len() {
        return Err(BigramError::ShapeMismatch {
            what: "probability table",
            expected: vocab.len(),
            actual: table.size(),
        });
    }

    let codes = vocab.encode_bracketed(sequence)?;
    codes
        .windows(2)
        .map(|w| {
            let prob = table.get(w[0], w[1])?;
            let prev = vocab.decode(w[0])?;
            let next = vocab.decode(w[1])?;
            if prob <= 0.0 {
                return Err(BigramError::ZeroProbability { prev, next });
            }
            Ok(TransitionScore { prev, next, prob, log_prob: (prob as f64).ln() })
        })
        .collect()
}
