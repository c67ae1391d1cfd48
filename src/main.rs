use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use name_bigram::checkpoint::{load_checkpoint, save_checkpoint};
use name_bigram::config::{self, LinearOptions};
use name_bigram::corpus::{load_corpus, CorpusSummary};
use name_bigram::eval::{breakdown, score};
use name_bigram::report;
use name_bigram::serve::run_server;
use name_bigram::{
    LinearEstimator, ProbabilityTable, Sampler, StatisticalEstimator, TransitionPairs, Vocabulary,
};

/// Character-level bigram name generator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of the corpus.
    Info {
        #[arg(default_value = config::CORPUS_PATH)]
        corpus: PathBuf,
    },
    /// Count bigrams, smooth, sample and score.
    Counts {
        #[arg(default_value = config::CORPUS_PATH)]
        corpus: PathBuf,
        /// Additive smoothing constant.
        #[arg(long, default_value_t = config::SMOOTHING)]
        smoothing: f32,
        #[command(flatten)]
        sample: SampleArgs,
        /// Print the raw count grid.
        #[arg(long)]
        print_counts: bool,
        /// Print the probability table.
        #[arg(long)]
        print_probs: bool,
        /// Print every generated bigram with its probability.
        #[arg(long)]
        breakdown: bool,
    },
    /// Train the softmax model and save weights + vocabulary.
    Train {
        #[arg(default_value = config::CORPUS_PATH)]
        corpus: PathBuf,
        #[arg(long, default_value_t = config::ITERATIONS)]
        iterations: usize,
        #[arg(long, default_value_t = config::LEARNING_RATE)]
        learning_rate: f32,
        /// L2 penalty coefficient on mean(W²).
        #[arg(long, default_value_t = config::L2_COEFF)]
        l2: f32,
        /// Weight initialisation seed.
        #[arg(long, default_value_t = config::SEED)]
        seed: u64,
        #[command(flatten)]
        files: ModelFiles,
    },
    /// Load a trained model, sample and score.
    Sample {
        #[command(flatten)]
        files: ModelFiles,
        #[command(flatten)]
        sample: SampleArgs,
        #[arg(long)]
        print_probs: bool,
    },
    /// Serve samples from a trained model over HTTP.
    Serve {
        #[command(flatten)]
        files: ModelFiles,
        #[arg(long, default_value = config::SERVE_ADDR)]
        addr: String,
    },
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Number of names to generate (default depends on the model).
    #[arg(long)]
    count: Option<usize>,
    /// Sampling seed.
    #[arg(long = "seed", default_value_t = config::SEED)]
    sample_seed: u64,
    /// Abort a name that grows past this many characters.
    #[arg(long, default_value_t = config::MAX_LEN)]
    max_len: usize,
}

#[derive(Args, Debug)]
struct ModelFiles {
    #[arg(long, default_value = config::WEIGHTS_PATH)]
    weights: PathBuf,
    #[arg(long, default_value = config::VOCAB_PATH)]
    vocab: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Info { corpus } => {
            let words = load_corpus(&corpus)?;
            print!("{}", report::format_summary(&CorpusSummary::of(&words)));
        }

        Command::Counts { corpus, smoothing, sample, print_counts, print_probs, breakdown: show } => {
            let words = load_corpus(&corpus)?;
            print!("{}", report::format_summary(&CorpusSummary::of(&words)));

            let vocab = Vocabulary::build(&words).context("building vocabulary")?;
            let pairs = TransitionPairs::extract(&words, &vocab)?;
            let estimator = StatisticalEstimator::new(smoothing)?;
            let counts = estimator.counts(&pairs, vocab.len())?;
            let table = counts.probabilities()?;

            if print_counts {
                print!("{}", report::format_counts(&counts, &vocab));
            }
            if print_probs {
                print!("{}", report::format_probs(&table, &vocab));
            }
            let names = sample_and_report(&table, &vocab, &sample, config::STAT_SAMPLE_COUNT)?;
            if show {
                for name in &names {
                    print!("{}", report::format_breakdown(name, &breakdown(name, &table, &vocab)?));
                }
            }
        }

        Command::Train { corpus, iterations, learning_rate, l2, seed, files } => {
            let words = load_corpus(&corpus)?;
            let vocab = Vocabulary::build(&words).context("building vocabulary")?;
            let pairs = TransitionPairs::extract(&words, &vocab)?;

            let options = LinearOptions { iterations, learning_rate, l2, seed };
            let mut estimator = LinearEstimator::new(options)?;
            estimator.fit(&pairs, vocab.len())?;

            let run = estimator.report().context("training produced no report")?;
            println!("Loss: {:.4} -> {:.4} over {} iterations",
                run.initial_loss(), run.final_loss, iterations);
            let final_loss = run.final_loss;

            let model = estimator.model().context("training produced no model")?;
            save_checkpoint(&files.weights, model, final_loss)?;
            vocab.save(&files.vocab)?;
            println!("✓ Saved {} and {}", files.weights.display(), files.vocab.display());
        }

        Command::Sample { files, sample, print_probs } => {
            let (vocab, table) = load_model(&files)?;
            if print_probs {
                print!("{}", report::format_probs(&table, &vocab));
            }
            sample_and_report(&table, &vocab, &sample, config::LINEAR_SAMPLE_COUNT)?;
        }

        Command::Serve { files, addr } => {
            let (vocab, table) = load_model(&files)?;
            run_server(&addr, &table, &vocab)?;
        }
    }

    Ok(())
}

fn load_model(files: &ModelFiles) -> Result<(Vocabulary, ProbabilityTable)> {
    let vocab = Vocabulary::load(&files.vocab)?;
    let ckpt = load_checkpoint(&files.weights, Some(vocab.len()))
        .with_context(|| format!("weights {} do not fit vocabulary {}",
            files.weights.display(), files.vocab.display()))?;
    let table = ckpt.model.probabilities()?;
    Ok((vocab, table))
}

fn sample_and_report(
    table: &ProbabilityTable,
    vocab: &Vocabulary,
    args: &SampleArgs,
    default_count: usize,
) -> Result<Vec<String>> {
    let sampler = Sampler::new(args.max_len)?;
    let count = args.count.unwrap_or(default_count);
    let names = sampler.generate(table, vocab, count, args.sample_seed)?;
    print!("{}", report::format_names(&names));
    print!("{}", report::format_score(&score(&names, table, vocab)?));
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_commands_take_seed_flag() {
        let cli = Cli::try_parse_from(["namegen", "sample", "--seed", "7", "--count", "3"]).unwrap();
        match cli.command {
            Command::Sample { sample, .. } => {
                assert_eq!(sample.sample_seed, 7);
                assert_eq!(sample.count, Some(3));
            }
            other => panic!("parsed {other:?}"),
        }

        let cli = Cli::try_parse_from(["namegen", "counts", "names.txt", "--seed", "9"]).unwrap();
        assert!(matches!(cli.command, Command::Counts { sample: SampleArgs { sample_seed: 9, .. }, .. }));
        assert!(Cli::try_parse_from(["namegen", "sample", "--sample-seed", "7"]).is_err());
    }
}
