/* ------------------------------------------------------------------ */
/* Training loop for the linear model, and its estimator wrapper      */
/* ------------------------------------------------------------------ */
//
// Full batch: every pair contributes to every step. Plain gradient
// descent for exactly `iterations` steps; there is no convergence check.

use crate::config::{LinearOptions, LOG_INTERVAL};
use crate::error::Result;
use crate::model::{LinearModel, TargetCounts};
use crate::pairs::TransitionPairs;
use crate::table::ProbabilityTable;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// losses[k] is the loss at step k, measured before that step's update.
    pub losses:     Vec<f32>,
    /// Loss at the weights the run ended with.
    pub final_loss: f32,
}

impl TrainReport {
    pub fn initial_loss(&self) -> f32 {
        self.losses.first().copied().unwrap_or(self.final_loss)
    }
}

pub fn train(
    model: &mut LinearModel,
    pairs: &TransitionPairs,
    options: &LinearOptions,
) -> Result<TrainReport> {
    options.validate()?;
    let targets = TargetCounts::from_pairs(pairs, model.size)?;

    log::info!(
        "training linear bigram: {} iterations, lr {}, l2 {}, {} pairs, {} codes",
        options.iterations, options.learning_rate, options.l2, targets.pairs(), model.size
    );

    let mut losses = Vec::with_capacity(options.iterations);
    for iter in 0..options.iterations {
        let loss = model.loss_and_grad(&targets, options.l2)?;
        model.step(options.learning_rate);
        losses.push(loss);

        if iter % LOG_INTERVAL == 0 || iter + 1 == options.iterations {
            log::info!("iter {:4} | loss {:.4}", iter, loss);
        }
        if !loss.is_finite() {
            log::warn!("loss became {} at iteration {}; learning rate may be too high", loss, iter);
        }
    }

    let final_loss = model.loss(&targets, options.l2)?;
    model.mark_trained();
    log::info!(
        "training complete: loss {:.4} -> {:.4}",
        losses.first().copied().unwrap_or(final_loss), final_loss
    );

    Ok(TrainReport { losses, final_loss })
}

/// Seeds a fresh model, trains it, and hands back the probability table.
/// The trained model stays available for persistence.
#[derive(Default)]
pub struct LinearEstimator {
    options: LinearOptions,
    model:   Option<LinearModel>,
    report:  Option<TrainReport>,
}

impl LinearEstimator {
    pub fn new(options: LinearOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, model: None, report: None })
    }

    pub fn options(&self) -> &LinearOptions {
        &self.options
    }

    pub fn fit(&mut self, pairs: &TransitionPairs, size: usize) -> Result<ProbabilityTable> {
        let mut model = LinearModel::new(size, self.options.seed);
        let report = train(&mut model, pairs, &self.options)?;
        let table = model.probabilities()?;
        self.model = Some(model);
        self.report = Some(report);
        Ok(table)
    }

    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }

    pub fn report(&self) -> Option<&TrainReport> {
        self.report.as_ref()
    }

    pub fn into_model(self) -> Option<LinearModel> {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelState;
    use crate::vocab::Vocabulary;

    const CORPUS: [&str; 6] = ["ann", "mia", "nina", "emma", "ava", "noah"];

    fn pairs() -> (Vocabulary, TransitionPairs) {
        let vocab = Vocabulary::build(&CORPUS).unwrap();
        let pairs = TransitionPairs::extract(&CORPUS, &vocab).unwrap();
        (vocab, pairs)
    }

    fn opts(iterations: usize) -> LinearOptions {
        LinearOptions { iterations, learning_rate: 1.0, l2: 1e-3, seed: 2147483647 }
    }

    #[test]
    fn loss_trends_down_over_a_hundred_steps() {
        let (vocab, pairs) = pairs();
        let mut model = LinearModel::new(vocab.len(), 2147483647);
        let report = train(&mut model, &pairs, &opts(100)).unwrap();
        assert_eq!(report.losses.len(), 100);
        assert!(report.losses[99] < report.losses[0]);
        assert!(report.final_loss < report.losses[99]);
        assert_eq!(model.state(), ModelState::Trained { steps: 100 });
    }

    #[test]
    fn zero_iterations_leaves_weights_alone() {
        let (vocab, pairs) = pairs();
        let mut model = LinearModel::new(vocab.len(), 5);
        let before = model.weights().to_vec();
        let report = train(&mut model, &pairs, &opts(0)).unwrap();
        assert!(report.losses.is_empty());
        assert_eq!(model.weights(), before.as_slice());
        assert_eq!(report.initial_loss(), report.final_loss);
    }

    #[test]
    fn estimator_is_deterministic_and_row_stochastic() {
        let (vocab, pairs) = pairs();
        let mut a = LinearEstimator::new(opts(20)).unwrap();
        let mut b = LinearEstimator::new(opts(20)).unwrap();
        let pa = a.fit(&pairs, vocab.len()).unwrap();
        let pb = b.fit(&pairs, vocab.len()).unwrap();
        assert_eq!(pa, pb);
        assert!(pa.is_row_stochastic(1e-5));
        assert!(a.model().is_some());
        assert_eq!(a.report().unwrap().losses.len(), 20);
    }

    #[test]
    fn training_moves_towards_observed_transitions() {
        let (vocab, pairs) = pairs();
        let mut est = LinearEstimator::new(LinearOptions { learning_rate: 5.0, ..opts(300) }).unwrap();
        let p = est.fit(&pairs, vocab.len()).unwrap();
        let a = vocab.encode('a').unwrap();
        // 'a' ends four of the six names
        let row = p.row(a).unwrap();
        let best = (0..row.len()).max_by(|&x, &y| row[x].total_cmp(&row[y])).unwrap();
        assert_eq!(best, vocab.boundary());
    }

    #[test]
    fn bad_options_are_rejected() {
        let bad = LinearOptions { learning_rate: -1.0, ..opts(10) };
        assert!(LinearEstimator::new(bad).is_err());
    }
}
