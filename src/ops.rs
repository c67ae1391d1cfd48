/* ------------------------------------------------------------------ */
/* Math primitives: softmax, normalisation, loss                      */
/* ------------------------------------------------------------------ */

// Softmax over one row. The max logit is subtracted before exp so large
// weights cannot overflow to inf.
pub fn softmax_fwd(logits: &[f32], probs: &mut [f32]) {
    let n = logits.len();
    let mx = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0f32;
    for i in 0..n {
        probs[i] = (logits[i] - mx).exp();
        sum += probs[i];
    }
    let inv = 1.0 / sum;
    for p in probs[..n].iter_mut() { *p *= inv; }
}

// Row normalisation: out[i] = row[i] / sum(row). Returns the sum; the
// caller decides what a zero sum means.
pub fn normalize_row(row: &[f32], out: &mut [f32]) -> f32 {
    let sum: f32 = row.iter().sum();
    if sum > 0.0 {
        let inv = 1.0 / sum;
        for (o, &r) in out.iter_mut().zip(row.iter()) { *o = r * inv; }
    }
    sum
}

pub fn cross_entropy_loss(probs: &[f32], target: usize) -> f32 {
    -probs[target].max(1e-10).ln()
}

// Mean of squared entries, the L2 penalty before its coefficient.
pub fn mean_square(w: &[f32]) -> f32 {
    if w.is_empty() { return 0.0; }
    w.iter().map(|&v| v * v).sum::<f32>() / w.len() as f32
}
