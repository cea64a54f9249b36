use thiserror::Error;

use crate::{DefaultIdType, Show};

mod dfa;
pub use dfa::DFA;

mod builder;
pub use builder::DFABuilder;

/// Identifies a state of an automaton. States of automata that are built by this crate are
/// numbered densely, starting from zero.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StateIndex(DefaultIdType);

impl StateIndex {
    /// Creates a new state index from the given number.
    ///
    /// # Panics
    /// If `index` does not fit into the underlying id type.
    pub fn new(index: usize) -> Self {
        Self(DefaultIdType::try_from(index).expect("state index out of range"))
    }

    /// Returns the number of the state as a `usize`.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<DefaultIdType> for StateIndex {
    fn from(value: DefaultIdType) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for StateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl Show for StateIndex {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// Errors that arise from using an automaton with states or symbols it does not know,
/// or from assembling one out of parts that do not describe a total, deterministic
/// transition function. They signal a violated contract on the side of the caller.
///
/// Symbols are stored in their [`Show`] representation so that the error type does not
/// depend on the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    /// The given state is not one of the declared states.
    #[error("unknown state {0}")]
    UnknownState(StateIndex),
    /// The given symbol does not belong to the alphabet.
    #[error("unknown symbol {0}")]
    UnknownSymbol(String),
    /// The transition function is not defined on the given state and symbol.
    #[error("state {state} has no transition on symbol {symbol}")]
    MissingTransition {
        /// The state that lacks an outgoing transition.
        state: StateIndex,
        /// The symbol on which the transition is missing.
        symbol: String,
    },
    /// More than one transition was given for the same state and symbol.
    #[error("state {state} has more than one transition on symbol {symbol}")]
    DuplicateTransition {
        /// The state with the conflicting transitions.
        state: StateIndex,
        /// The symbol on which the transitions conflict.
        symbol: String,
    },
}
