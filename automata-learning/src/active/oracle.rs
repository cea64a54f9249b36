use std::marker::PhantomData;

use automata::prelude::*;

/// A membership oracle, the only access the learner has to the language it is supposed to
/// learn. It answers whether a given finite word belongs to the language.
///
/// Implementations must be total over all finite words over the alphabet and must be pure,
/// i.e. the answer may only depend on the word. Answers are cached by the learner, so a
/// non-deterministic oracle has whatever it answered first frozen.
pub trait Oracle {
    type Symbol: Symbol;

    /// Decides whether `word` belongs to the target language.
    fn output(&self, word: &[Self::Symbol]) -> bool;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    type Symbol = O::Symbol;

    fn output(&self, word: &[Self::Symbol]) -> bool {
        O::output(self, word)
    }
}

/// An oracle that is backed by a function or closure over words.
///
/// # Example
/// ```
/// use automata_learning::prelude::*;
/// let ends_in_a = FnOracle::new(|w: &[char]| w.last() == Some(&'a'));
/// assert!(ends_in_a.output(&['b', 'a']));
/// assert!(!ends_in_a.output(&[]));
/// ```
#[derive(Clone)]
pub struct FnOracle<S, F> {
    predicate: F,
    _symbol: PhantomData<fn(&[S])>,
}

impl<S: Symbol, F> FnOracle<S, F>
where
    F: Fn(&[S]) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            _symbol: PhantomData,
        }
    }
}

impl<S: Symbol, F> Oracle for FnOracle<S, F>
where
    F: Fn(&[S]) -> bool,
{
    type Symbol = S;

    fn output(&self, word: &[S]) -> bool {
        (self.predicate)(word)
    }
}

impl<S, F> std::fmt::Debug for FnOracle<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnOracle")
    }
}

/// An oracle based on a [`DFA`] instance. It answers membership queries by running the word
/// through the automaton. Mostly useful to check that a known language is learned back.
#[derive(Debug, Clone)]
pub struct DFAOracle<A: Alphabet> {
    automaton: DFA<A>,
}

impl<A: Alphabet> DFAOracle<A> {
    /// Creates a new instance of a [`DFAOracle`] from the given automaton.
    pub fn new(automaton: DFA<A>) -> Self {
        Self { automaton }
    }

    pub fn automaton(&self) -> &DFA<A> {
        &self.automaton
    }
}

impl<A: Alphabet> Oracle for DFAOracle<A> {
    type Symbol = A::Symbol;

    fn output(&self, word: &[A::Symbol]) -> bool {
        self.automaton.accepts(word)
    }
}
