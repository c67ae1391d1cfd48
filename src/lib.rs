//! Character-level bigram models of a word list.
//!
//! Two estimators answer "given the previous character, what comes next?":
//! a counted, smoothed table ([`stats::StatisticalEstimator`]) and a single
//! softmax layer trained by gradient descent ([`train::LinearEstimator`]).
//! Both produce a [`table::ProbabilityTable`] that the [`sample::Sampler`]
//! draws names from and [`eval::score`] measures.
//!
//! ```text
//! corpus → Vocabulary → TransitionPairs → {Statistical | Linear} → ProbabilityTable
//!                                                                   ├─ Sampler
//!                                                                   └─ score
//! ```

pub mod checkpoint;
pub mod config;
pub mod corpus;
pub mod error;
pub mod eval;
pub mod model;
pub mod ops;
pub mod pairs;
pub mod report;
pub mod rng;
pub mod sample;
pub mod serve;
pub mod stats;
pub mod table;
pub mod train;
pub mod vocab;

pub use error::{BigramError, Result};
pub use eval::{score, NllScore};
pub use pairs::TransitionPairs;
pub use sample::Sampler;
pub use stats::StatisticalEstimator;
pub use table::ProbabilityTable;
pub use train::LinearEstimator;
pub use vocab::Vocabulary;
