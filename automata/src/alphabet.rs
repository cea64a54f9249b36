use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

use crate::Show;

/// A symbol of an alphabet, which is also the type of the symbols in a word. For a [`CharAlphabet`]
/// this is simply a `char`, but any small, copyable and totally ordered token type works.
pub trait Symbol: PartialEq + Eq + Debug + Copy + Ord + PartialOrd + Hash + Show {}
impl<S: PartialEq + Eq + Debug + Copy + Ord + PartialOrd + Hash + Show> Symbol for S {}

/// Shorthand for the symbol type of some [`Alphabet`].
pub type SymbolOf<A> = <A as Alphabet>::Symbol;

/// An alphabet abstracts a finite, ordered collection of [`Symbol`]s. The order in which
/// [`Alphabet::universe`] yields the symbols is the order in which words over the alphabet
/// are enumerated.
pub trait Alphabet: Clone + Debug {
    /// The type of symbols in this alphabet.
    type Symbol: Symbol;

    /// Type of the iterator over all symbols.
    type Universe<'this>: Iterator<Item = Self::Symbol>
    where
        Self: 'this;

    /// Returns an iterator over all symbols of the alphabet, each symbol is yielded exactly once.
    fn universe(&self) -> Self::Universe<'_>;

    /// Returns the number of symbols in the alphabet.
    fn size(&self) -> usize;

    /// Returns `true` if the alphabet has no symbols at all.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns `true` if the given symbol belongs to the alphabet.
    fn contains(&self, symbol: Self::Symbol) -> bool;

    /// Returns the position of `symbol` in the order given by [`Alphabet::universe`], if it is present.
    fn position(&self, symbol: Self::Symbol) -> Option<usize> {
        self.universe().position(|sym| sym == symbol)
    }
}

/// Represents an alphabet where a [`Symbol`] is just a single `char`. The symbols are kept
/// sorted and free of duplicates.
///
/// # Example
/// ```
/// use automata::prelude::*;
/// let alphabet = CharAlphabet::from("bab");
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.universe().collect::<Vec<_>>(), vec!['a', 'b']);
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct CharAlphabet(pub(crate) Vec<char>);

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] alphabet of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }

    /// Creates a new [`CharAlphabet`] from the given symbols, which are sorted and deduplicated.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        symbols.into_iter().collect()
    }

    /// Returns the symbols as a slice.
    pub fn symbols(&self) -> &[char] {
        &self.0
    }
}

impl std::ops::Index<usize> for CharAlphabet {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl FromIterator<char> for CharAlphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

impl From<&str> for CharAlphabet {
    fn from(value: &str) -> Self {
        value.chars().collect()
    }
}

impl From<Vec<char>> for CharAlphabet {
    fn from(value: Vec<char>) -> Self {
        value.into_iter().collect()
    }
}

impl std::fmt::Display for CharAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

impl Alphabet for CharAlphabet {
    type Symbol = char;

    type Universe<'this> = std::iter::Copied<std::slice::Iter<'this, char>>
    where
        Self: 'this;

    fn universe(&self) -> Self::Universe<'_> {
        self.0.iter().copied()
    }

    fn size(&self) -> usize {
        self.0.len()
    }

    fn contains(&self, symbol: char) -> bool {
        self.0.binary_search(&symbol).is_ok()
    }

    fn position(&self, symbol: char) -> Option<usize> {
        self.0.binary_search(&symbol).ok()
    }
}
