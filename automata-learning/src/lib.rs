//! A library for learning automata from a membership oracle.
#![allow(missing_docs)]

/// Deals with active learning algorithms such as L*.
pub mod active;

pub mod prelude {
    pub use super::active::{
        check_agreement, lstar, lstar_with, DFAOracle, FnOracle, LStar, LStarConfig, Learned,
        LearningError, LearningStats, ObservationTable, Oracle, QueryCache, RowSet,
    };
}
