//! Library for working with deterministic finite automata (DFA) in Rust.
//!
//! A [`DFA`](automaton::DFA) consists of a finite set of states, an [`Alphabet`] of input symbols, a total
//! transition function, a designated initial state and a set of accepting states. Automata are immutable
//! once they have been constructed: every part is validated on construction and afterwards the structure can
//! only be inspected, for example to run words through it or to export it for visualization.
//!
//! Words are finite sequences of symbols, the [`FiniteWord`](word::FiniteWord) trait abstracts over the
//! different ways of representing them (slices, vectors, string slices for `char` symbols and concatenations
//! of those). The [`KleeneStar`](word::KleeneStar) iterator enumerates all words over a given alphabet in
//! length-lexicographic order, which is what bounded exhaustive searches rely on.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, CharAlphabet, Symbol, SymbolOf},
        automaton::{AutomatonError, DFABuilder, StateIndex, DFA},
        dot::Dottable,
        math,
        show::{show_duration, Show},
        word::{words_of_length, Concat, FiniteWord, KleeneStar},
        DefaultIdType,
    };
}

/// Defines some mathematical objects such as sets, mappings and bijections which are used
/// throughout the crate.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;
pub use alphabet::{Alphabet, CharAlphabet};

/// Finite words and the enumeration of all words over an alphabet.
pub mod word;

/// Defines the deterministic finite automaton and everything needed to construct and run it.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::DFA;

/// Export of automata into the DOT format of graphviz.
pub mod dot;

mod show;
pub use show::Show;

/// The integer type that backs state indices.
pub type DefaultIdType = u32;
