use crate::alphabet::Symbol;

use super::FiniteWord;

/// Concatenates two finite words without copying either of them.
///
/// # Example
/// ```
/// use automata::prelude::*;
/// let word = Concat("ab", "ba");
/// assert_eq!(word.len(), 4);
/// assert_eq!(word.as_string(), "abba");
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Concat<X, Y>(pub X, pub Y);

impl<S: Symbol, X: FiniteWord<S>, Y: FiniteWord<S>> FiniteWord<S> for Concat<X, Y> {
    type Symbols<'this> = std::iter::Chain<X::Symbols<'this>, Y::Symbols<'this>>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        self.0.symbols().chain(self.1.symbols())
    }

    fn collect_vec(&self) -> Vec<S> {
        let mut repr = self.0.collect_vec();
        repr.extend(self.1.symbols());
        repr
    }

    fn len(&self) -> usize {
        self.0.len() + self.1.len()
    }
}
