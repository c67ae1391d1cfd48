/* ------------------------------------------------------------------ */
/* Console rendering: corpus info, tables, names, likelihood          */
/* ------------------------------------------------------------------ */
//
// Pure formatting. Each function returns the text; main.rs prints it.

use std::fmt::Write;

use crate::corpus::CorpusSummary;
use crate::eval::{NllScore, TransitionScore};
use crate::stats::CountTable;
use crate::table::ProbabilityTable;
use crate::vocab::Vocabulary;

pub fn format_summary(summary: &CorpusSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Corpus ===");
    let more = if summary.entries > summary.preview.len() { ", ..." } else { "" };
    let _ = writeln!(out, "Contents: {}{}", summary.preview.join(", "), more);
    let _ = writeln!(out, "Entries:  {}", summary.entries);
    let _ = writeln!(out, "Longest:  {}", summary.longest);
    let _ = writeln!(out, "Shortest: {}", summary.shortest);
    let _ = writeln!(out, "Chars:    {}", summary.chars);
    out
}

// Two lines per row: the bigram labels, then the observed counts.
pub fn format_counts(counts: &CountTable, vocab: &Vocabulary) -> String {
    let n = counts.size();
    let mut out = String::new();
    let _ = writeln!(out, "=== Counts (smoothing {} not shown) ===", counts.smoothing());
    for i in 0..n {
        let prev = vocab.decode(i).unwrap_or('?');
        for j in 0..n {
            let next = vocab.decode(j).unwrap_or('?');
            let _ = write!(out, "{:>4}{}", prev, next);
        }
        out.push('\n');
        for j in 0..n {
            let _ = write!(out, "{:>5}", counts.observed(i, j).unwrap_or_default());
        }
        out.push('\n');
    }
    out
}

pub fn format_probs(table: &ProbabilityTable, vocab: &Vocabulary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Probabilities ===");
    let _ = write!(out, "   ");
    for j in 0..table.size() {
        let _ = write!(out, "{:>7}", vocab.decode(j).unwrap_or('?'));
    }
    out.push('\n');
    for (i, row) in table.rows().enumerate() {
        let _ = write!(out, "{:>3}", vocab.decode(i).unwrap_or('?'));
        for &p in row {
            let _ = write!(out, "{:>7.4}", p);
        }
        out.push('\n');
    }
    out
}

pub fn format_names<S: AsRef<str>>(names: &[S]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Generated names ===");
    for name in names {
        let _ = writeln!(out, "{}", name.as_ref());
    }
    out
}

pub fn format_score(score: &NllScore) -> String {
    format!(
        "Negative log likelihood: {:.4}\nNormalized NLL:          {:.4} ({} transitions)\n",
        score.total_nll, score.normalized_nll, score.transitions
    )
}

pub fn format_breakdown(name: &str, rows: &[TransitionScore]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- {} ---", name);
    for t in rows {
        let _ = writeln!(out, "{}{} : {:>10.6} {:>9.4}", t.prev, t.next, t.prob, t.log_prob);
    }
    out
}
