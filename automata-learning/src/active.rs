use automata::automaton::{AutomatonError, StateIndex};
use thiserror::Error;

mod lstar;
pub use lstar::*;

pub(crate) mod oracle;
pub use oracle::*;

mod cache;
pub use cache::QueryCache;

mod config;
pub use config::LStarConfig;

mod counterexample;
pub use counterexample::{check_agreement, max_length_for_budget};

mod observationtable;
pub use observationtable::{Experiment, ObservationTable, Row, RowSet};

/// Errors that may occur while learning. None of them is recoverable by retrying: they
/// point to an unusable configuration, an oracle that is not a function of its input,
/// or a bug in the learner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LearningError {
    /// Learning requires at least one symbol.
    #[error("cannot learn over an empty alphabet")]
    EmptyAlphabet,
    /// Two observed words that lead to the same state disagree on a successor.
    #[error(
        "observation table is not consistent: {state} has successors {existing} and {conflicting} on symbol {symbol}"
    )]
    InconsistentTable {
        state: StateIndex,
        symbol: String,
        existing: StateIndex,
        conflicting: StateIndex,
    },
    /// The extracted parts did not form a valid automaton.
    #[error("could not assemble hypothesis: {0}")]
    Automaton(#[from] AutomatonError),
}
