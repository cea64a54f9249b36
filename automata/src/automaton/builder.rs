use crate::{
    alphabet::{Alphabet, CharAlphabet, Symbol},
    math,
};

use super::{AutomatonError, StateIndex, DFA};

/// Helper struct for the construction of small automata, mostly used in tests and examples.
/// Transitions are given as triples `(source, symbol, target)` where states are plain numbers.
/// The set of states is made up of every number that appears as the source or target of a
/// transition, as an accepting state or as the initial state.
///
/// # Example
/// ```
/// use automata::prelude::*;
/// let dfa = DFA::builder()
///     .with_transitions([(0, 'a', 1), (1, 'a', 0)])
///     .with_accepting([1])
///     .into_dfa(0)
///     .unwrap();
/// assert!(dfa.accepts("aaa"));
/// ```
#[derive(Debug, Clone)]
pub struct DFABuilder<S = char> {
    transitions: Vec<(usize, S, usize)>,
    accepting: Vec<usize>,
}

impl<S> Default for DFABuilder<S> {
    fn default() -> Self {
        Self {
            transitions: vec![],
            accepting: vec![],
        }
    }
}

impl<S: Symbol> DFABuilder<S> {
    /// Adds the given transitions.
    pub fn with_transitions<I: IntoIterator<Item = (usize, S, usize)>>(mut self, iter: I) -> Self {
        self.transitions.extend(iter);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = usize>>(mut self, iter: I) -> Self {
        self.accepting.extend(iter);
        self
    }

    /// Builds the automaton over the given alphabet, starting in `initial`. Fails under the
    /// same conditions as [`DFA::new`].
    pub fn into_dfa_over<A: Alphabet<Symbol = S>>(
        self,
        alphabet: A,
        initial: usize,
    ) -> Result<DFA<A>, AutomatonError> {
        let states: math::OrderedSet<usize> = self
            .transitions
            .iter()
            .flat_map(|(p, _, q)| [*p, *q])
            .chain(self.accepting.iter().copied())
            .chain(std::iter::once(initial))
            .collect();

        DFA::new(
            alphabet,
            StateIndex::new(initial),
            self.accepting.into_iter().map(StateIndex::new),
            states.into_iter().map(StateIndex::new),
            self.transitions
                .into_iter()
                .map(|(p, a, q)| ((StateIndex::new(p), a), StateIndex::new(q))),
        )
    }
}

impl DFABuilder<char> {
    /// Builds the automaton over the alphabet made up of exactly the symbols that occur on
    /// some transition, starting in `initial`.
    pub fn into_dfa(self, initial: usize) -> Result<DFA<CharAlphabet>, AutomatonError> {
        let alphabet: CharAlphabet = self.transitions.iter().map(|(_, a, _)| *a).collect();
        self.into_dfa_over(alphabet, initial)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn builder_collects_states_and_alphabet() {
        let dfa = DFA::builder()
            .with_transitions([(0, 'b', 2), (2, 'b', 0)])
            .into_dfa(0)
            .unwrap();
        assert_eq!(dfa.size(), 2);
        assert_eq!(dfa.alphabet(), &CharAlphabet::from("b"));
        assert!(dfa.is_empty_language());

        let incomplete = DFA::builder()
            .with_transitions([(0, 'a', 0), (0, 'b', 1)])
            .into_dfa(0);
        assert!(matches!(
            incomplete,
            Err(AutomatonError::MissingTransition { .. })
        ));

        let over_larger = DFA::builder()
            .with_transitions([(0, 'a', 0)])
            .with_accepting([0])
            .into_dfa_over(CharAlphabet::from("ab"), 0);
        assert_eq!(
            over_larger.unwrap_err(),
            AutomatonError::MissingTransition {
                state: StateIndex::new(0),
                symbol: "b".to_string()
            }
        );
    }
}
