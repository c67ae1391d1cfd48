/* ------------------------------------------------------------------ */
/* Transition pairs: (prev, next) codes for every bracketed entry     */
/* ------------------------------------------------------------------ */

use crate::error::{BigramError, Result};
use crate::vocab::Vocabulary;

/// Ordered `(prev_code, next_code)` pairs, corpus order then entry order.
/// An entry of length L contributes L + 1 pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionPairs {
    pairs: Vec<(usize, usize)>,
}

impl TransitionPairs {
    pub fn extract<S: AsRef<str>>(corpus: &[S], vocab: &Vocabulary) -> Result<Self> {
        let total: usize = corpus.iter().map(|e| e.as_ref().chars().count() + 1).sum();
        let mut pairs = Vec::with_capacity(total);

        for entry in corpus {
            let codes = vocab.encode_bracketed(entry.as_ref())?;
            pairs.extend(codes.windows(2).map(|w| (w[0], w[1])));
        }

        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Fails if any code falls outside `[0, vocab_size)`.
    pub fn check_codes(&self, vocab_size: usize) -> Result<()> {
        match self.iter().find(|&(i, j)| i >= vocab_size || j >= vocab_size) {
            Some((i, j)) => Err(BigramError::OutOfRange { code: i.max(j), size: vocab_size }),
            None => Ok(()),
        }
    }
}

impl From<Vec<(usize, usize)>> for TransitionPairs {
    fn from(pairs: Vec<(usize, usize)>) -> Self {
        Self { pairs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_each_entry_in_order() {
        let corpus = ["ann", "mia"];
        let vocab = Vocabulary::build(&corpus).unwrap();
        let pairs = TransitionPairs::extract(&corpus, &vocab).unwrap();
        assert_eq!(
            pairs.as_slice(),
            &[(0, 1), (1, 4), (4, 4), (4, 0), (0, 3), (3, 2), (2, 1), (1, 0)]
        );
    }

    #[test]
    fn entry_of_length_l_gives_l_plus_one_pairs() {
        let corpus = ["abc", "", "z"];
        let vocab = Vocabulary::build(&corpus).unwrap();
        let pairs = TransitionPairs::extract(&corpus, &vocab).unwrap();
        assert_eq!(pairs.len(), 4 + 1 + 2);
        assert_eq!(pairs.as_slice()[4], (0, 0));
    }

    #[test]
    fn unknown_character_propagates() {
        let vocab = Vocabulary::build(&["ab"]).unwrap();
        let err = TransitionPairs::extract(&["abc"], &vocab).unwrap_err();
        assert!(matches!(err, BigramError::UnknownCharacter('c')));
    }

    #[test]
    fn code_range_check() {
        let pairs = TransitionPairs::from(vec![(0, 1), (2, 5)]);
        assert!(pairs.check_codes(6).is_ok());
        assert!(matches!(pairs.check_codes(5), Err(BigramError::OutOfRange { code: 5, size: 5 })));
    }
}
