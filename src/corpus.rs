/* ------------------------------------------------------------------ */
/* Corpus loading and summary                                         */
/* ------------------------------------------------------------------ */

use std::path::Path;

use crate::error::{BigramError, Result};

/// One entry per non-blank line. The whole file is read before anything
/// else happens; a missing file is reported with its path.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| BigramError::io(path, e))?;
    let words = parse_corpus(&text);
    log::info!("loaded {} entries from {}", words.len(), path.display());
    Ok(words)
}

pub fn parse_corpus(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSummary {
    pub entries:  usize,
    pub shortest: usize,
    pub longest:  usize,
    pub preview:  Vec<String>,   // first few entries
    pub chars:    String,        // distinct characters, ascending
}

impl CorpusSummary {
    pub const PREVIEW: usize = 10;

    pub fn of<S: AsRef<str>>(corpus: &[S]) -> Self {
        let lens = corpus.iter().map(|e| e.as_ref().chars().count());
        let mut chars: Vec<char> = corpus.iter().flat_map(|e| e.as_ref().chars()).collect();
        chars.sort_unstable();
        chars.dedup();

        Self {
            entries:  corpus.len(),
            shortest: lens.clone().min().unwrap_or(0),
            longest:  lens.max().unwrap_or(0),
            preview:  corpus.iter().take(Self::PREVIEW).map(|e| e.as_ref().to_string()).collect(),
            chars:    chars.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blank_lines_and_carriage_returns() {
        let words = parse_corpus("emma\r\nolivia\n\n  \nava\n");
        assert_eq!(words, vec!["emma", "olivia", "ava"]);
    }

    #[test]
    fn summary_reports_lengths_and_chars() {
        let s = CorpusSummary::of(&["emma", "al", "olivia"]);
        assert_eq!(s.entries, 3);
        assert_eq!(s.shortest, 2);
        assert_eq!(s.longest, 6);
        assert_eq!(s.chars, "aeilmov");
        assert_eq!(s.preview.len(), 3);
    }

    #[test]
    fn summary_preview_is_capped() {
        let corpus: Vec<String> = (0..25).map(|i| format!("n{i}")).collect();
        assert_eq!(CorpusSummary::of(&corpus).preview.len(), CorpusSummary::PREVIEW);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("names.txt");
        std::fs::write(&path, "ann\nmia\n").unwrap();
        assert_eq!(load_corpus(&path).unwrap(), vec!["ann", "mia"]);
    }

    #[test]
    fn missing_file_is_an_io_error_with_path() {
        match load_corpus("/nope/names.txt") {
            Err(BigramError::Io { path, .. }) => assert!(path.ends_with("names.txt")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
