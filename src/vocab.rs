/* ------------------------------------------------------------------ */
/* Vocabulary: character <-> code mapping with a reserved boundary    */
/* ------------------------------------------------------------------ */
//
//   Vocabulary::build(corpus)   → code 0 = boundary, 1.. = sorted chars
//   vocab.encode(c) / decode(i) → fallible lookups
//   vocab.save(path) / load     → JSON (serde_json)
//
// Shared by both estimators; the sampler and evaluator only borrow it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{BOUNDARY_CHAR, BOUNDARY_ID};
use crate::error::{BigramError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    idx_to_char: Vec<char>,
    char_to_idx: HashMap<char, usize>,
}

// On-disk form: just the non-boundary characters in code order.
#[derive(Serialize, Deserialize)]
struct VocabFile {
    boundary: char,
    chars:    Vec<char>,
}

impl Vocabulary {
    pub fn build<S: AsRef<str>>(corpus: &[S]) -> Result<Self> {
        if corpus.is_empty() {
            return Err(BigramError::EmptyCorpus);
        }
        if let Some(entry) = corpus.iter().find(|e| e.as_ref().contains(BOUNDARY_CHAR)) {
            return Err(BigramError::ReservedCharacter {
                entry: entry.as_ref().to_string(),
                boundary: BOUNDARY_CHAR,
            });
        }

        let mut chars: Vec<char> = corpus.iter().flat_map(|e| e.as_ref().chars()).collect();
        chars.sort_unstable();
        chars.dedup();

        Ok(Self::from_sorted(chars))
    }

    fn from_sorted(chars: Vec<char>) -> Self {
        let mut idx_to_char = Vec::with_capacity(chars.len() + 1);
        idx_to_char.push(BOUNDARY_CHAR);
        idx_to_char.extend(chars);

        let char_to_idx = idx_to_char
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();

        Self { idx_to_char, char_to_idx }
    }

    /// Number of codes, boundary included.
    pub fn len(&self) -> usize {
        self.idx_to_char.len()
    }

    /// True when the corpus contributed no characters (only the boundary).
    pub fn is_empty(&self) -> bool {
        self.idx_to_char.len() == 1
    }

    pub fn boundary(&self) -> usize {
        BOUNDARY_ID
    }

    pub fn encode(&self, c: char) -> Result<usize> {
        self.char_to_idx
            .get(&c)
            .copied()
            .ok_or(BigramError::UnknownCharacter(c))
    }

    pub fn decode(&self, code: usize) -> Result<char> {
        self.idx_to_char
            .get(code)
            .copied()
            .ok_or(BigramError::OutOfRange { code, size: self.len() })
    }

    /// `[boundary] + entry + [boundary]` as codes.
    pub fn encode_bracketed(&self, entry: &str) -> Result<Vec<usize>> {
        let mut codes = Vec::with_capacity(entry.len() + 2);
        codes.push(BOUNDARY_ID);
        for c in entry.chars() {
            codes.push(self.encode(c)?);
        }
        codes.push(BOUNDARY_ID);
        Ok(codes)
    }

    /// The corpus characters in code order, boundary excluded.
    pub fn chars(&self) -> &[char] {
        &self.idx_to_char[1..]
    }

    // ── Save / Load ───────────────────────────────────────────────────

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = VocabFile { boundary: BOUNDARY_CHAR, chars: self.chars().to_vec() };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|source| BigramError::Json { path: path.to_path_buf(), source })?;
        std::fs::write(path, json).map_err(|e| BigramError::io(path, e))?;
        log::debug!("wrote vocabulary ({} codes) to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| BigramError::io(path, e))?;
        let file: VocabFile = serde_json::from_str(&json)
            .map_err(|source| BigramError::Json { path: path.to_path_buf(), source })?;

        if file.boundary != BOUNDARY_CHAR || file.chars.contains(&BOUNDARY_CHAR) {
            return Err(BigramError::ReservedCharacter {
                entry: file.chars.iter().collect(),
                boundary: BOUNDARY_CHAR,
            });
        }
        // codes must be strictly ascending: no gaps to fill, no duplicates
        if let Some(w) = file.chars.windows(2).find(|w| w[0] >= w[1]) {
            return Err(BigramError::InvalidOption {
                name: "vocabulary",
                reason: format!("characters not strictly ascending at {:?}, {:?}", w[0], w[1]),
            });
        }

        Ok(Self::from_sorted(file.chars))
    }
}
