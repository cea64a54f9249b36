use crate::alphabet::{Alphabet, Symbol};

/// Iterator over all words that can be built from a given collection of symbols, in
/// length-lexicographic order. Words of the same length are produced in the lexicographic
/// order induced by the position of the symbols in the collection.
///
/// The iterator is infinite unless the collection of symbols is empty, in which case at
/// most the empty word is produced.
#[derive(Debug, Clone)]
pub struct KleeneStar<S> {
    symbols: Vec<S>,
    current: Vec<usize>,
}

impl<S: Symbol> Iterator for KleeneStar<S> {
    type Item = Vec<S>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.symbols.is_empty() && !self.current.is_empty() {
            return None;
        }
        let out = self.current.iter().map(|i| self.symbols[*i]).collect();

        let mut carry = true;
        let mut i = self.current.len();
        while carry && i > 0 {
            i -= 1;
            self.current[i] += 1;
            if self.current[i] >= self.symbols.len() {
                self.current[i] = 0;
                carry = true;
            } else {
                carry = false;
            }
        }

        if carry {
            self.current = vec![0; self.current.len() + 1];
        }

        Some(out)
    }
}

impl<S> KleeneStar<S> {
    /// Enumerates all words, starting with the empty word.
    pub fn new(symbols: Vec<S>) -> Self {
        Self::starting_at(symbols, 0)
    }

    /// Enumerates all non-empty words.
    pub fn non_empty(symbols: Vec<S>) -> Self {
        Self::starting_at(symbols, 1)
    }

    /// Enumerates all words that have at least the given `length`.
    pub fn starting_at(symbols: Vec<S>, length: usize) -> Self {
        Self {
            symbols,
            current: vec![0; length],
        }
    }
}

/// Returns an iterator over all words of exactly the given `length` over `alphabet`, in
/// lexicographic order with respect to the order of [`Alphabet::universe`].
///
/// # Example
/// ```
/// use automata::prelude::*;
/// let words: Vec<_> = words_of_length(&CharAlphabet::from("ab"), 2)
///     .map(|w| w.as_string())
///     .collect();
/// assert_eq!(words, vec!["aa", "ab", "ba", "bb"]);
/// ```
pub fn words_of_length<A: Alphabet>(
    alphabet: &A,
    length: usize,
) -> impl Iterator<Item = Vec<A::Symbol>> {
    KleeneStar::starting_at(alphabet.universe().collect(), length)
        .take_while(move |word| word.len() == length)
}

#[cfg(test)]
mod tests {
    use super::{words_of_length, KleeneStar};
    use crate::prelude::*;

    #[test]
    fn kleene_star() {
        assert_eq!(
            KleeneStar::new(vec!['a', 'b'])
                .take_while(|e| e.len() <= 2)
                .collect::<Vec<_>>(),
            vec![
                vec![],
                vec!['a'],
                vec!['b'],
                vec!['a', 'a'],
                vec!['a', 'b'],
                vec!['b', 'a'],
                vec!['b', 'b']
            ]
        );
        assert_eq!(KleeneStar::<char>::new(vec![]).count(), 1);
        assert_eq!(KleeneStar::<char>::non_empty(vec![]).count(), 0);
    }

    #[test]
    fn words_of_fixed_length() {
        let alphabet = CharAlphabet::from("abc");
        assert_eq!(words_of_length(&alphabet, 3).count(), 27);
        assert_eq!(words_of_length(&alphabet, 0).collect::<Vec<_>>(), vec![vec![]]);
        assert_eq!(
            words_of_length(&CharAlphabet::from("a"), 4).collect::<Vec<_>>(),
            vec![vec!['a'; 4]]
        );
        assert_eq!(words_of_length(&CharAlphabet::new([]), 2).count(), 0);
    }
}
