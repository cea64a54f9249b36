use crate::{alphabet::Symbol, Show};

use super::Concat;

/// A finite word is a finite sequence of symbols. The trait is implemented for slices,
/// vectors and (for `char` symbols) string slices, which allows most functions in this
/// crate to accept whichever representation is at hand.
pub trait FiniteWord<S: Symbol> {
    /// Type for an iterator over the symbols making up the word.
    type Symbols<'this>: Iterator<Item = S>
    where
        Self: 'this;

    /// Returns an iterator over the symbols of the word.
    fn symbols(&self) -> Self::Symbols<'_>;

    /// Gives the length of the word, i.e. the number of symbols.
    fn len(&self) -> usize {
        self.symbols().count()
    }

    /// Returns `true` if the word is empty, i.e. has no symbols.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the symbol at the given `position`, if it exists.
    fn nth(&self, position: usize) -> Option<S> {
        self.symbols().nth(position)
    }

    /// Collects the symbols making up `self` into a vector.
    fn collect_vec(&self) -> Vec<S> {
        self.symbols().collect()
    }

    /// Collects the first `length` symbols of `self` into a vector. If the word is shorter
    /// than `length`, the whole word is returned.
    fn prefix(&self, length: usize) -> Vec<S> {
        self.symbols().take(length).collect()
    }

    /// Appends the given finite word to the end of this word.
    fn append<W: FiniteWord<S>>(self, suffix: W) -> Concat<Self, W>
    where
        Self: Sized,
    {
        Concat(self, suffix)
    }

    /// Checks if the given word is equal to this word symbol by symbol.
    fn finite_word_equals<W: FiniteWord<S>>(&self, other: W) -> bool {
        self.len() == other.len() && self.symbols().zip(other.symbols()).all(|(a, b)| a == b)
    }

    /// Compares two words by their length first and lexicographically second.
    fn length_lexicographic_ord<W: FiniteWord<S>>(&self, other: W) -> std::cmp::Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.symbols().cmp(other.symbols()))
    }

    /// Converts the word to a string, the empty word is displayed as `ε`.
    fn as_string(&self) -> String {
        self.collect_vec().show()
    }
}

impl<S: Symbol, W: FiniteWord<S> + ?Sized> FiniteWord<S> for &W {
    type Symbols<'this> = W::Symbols<'this>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        W::symbols(self)
    }

    fn len(&self) -> usize {
        W::len(self)
    }
}

impl<S: Symbol> FiniteWord<S> for [S] {
    type Symbols<'this> = std::iter::Copied<std::slice::Iter<'this, S>>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        self.iter().copied()
    }

    fn len(&self) -> usize {
        <[S]>::len(self)
    }

    fn nth(&self, position: usize) -> Option<S> {
        self.get(position).copied()
    }

    fn collect_vec(&self) -> Vec<S> {
        self.to_vec()
    }
}

impl<S: Symbol, const N: usize> FiniteWord<S> for [S; N] {
    type Symbols<'this> = std::iter::Copied<std::slice::Iter<'this, S>>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        self.iter().copied()
    }

    fn len(&self) -> usize {
        N
    }
}

impl<S: Symbol> FiniteWord<S> for Vec<S> {
    type Symbols<'this> = std::iter::Copied<std::slice::Iter<'this, S>>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        self.iter().copied()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn nth(&self, position: usize) -> Option<S> {
        self.get(position).copied()
    }

    fn collect_vec(&self) -> Vec<S> {
        self.clone()
    }
}

impl FiniteWord<char> for str {
    type Symbols<'this> = std::str::Chars<'this>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        self.chars()
    }
}

impl FiniteWord<char> for String {
    type Symbols<'this> = std::str::Chars<'this>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        self.chars()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::FiniteWord;

    #[test]
    fn finite_word_basics() {
        let word = vec!['a', 'b', 'b'];
        assert_eq!(word.len(), 3);
        assert_eq!(word.prefix(2), vec!['a', 'b']);
        assert!(word.finite_word_equals("abb"));
        assert_eq!("".as_string(), "ε");
        assert_eq!("ba".length_lexicographic_ord("ab"), Ordering::Greater);
        assert_eq!("b".length_lexicographic_ord("ab"), Ordering::Less);
        assert_eq!("ab".append(['c']).collect_vec(), vec!['a', 'b', 'c']);
    }
}
