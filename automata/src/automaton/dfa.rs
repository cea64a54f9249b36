use std::collections::VecDeque;

use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};
use tracing::trace;

use crate::{
    alphabet::{Alphabet, CharAlphabet, SymbolOf},
    math,
    word::FiniteWord,
    Show,
};

use super::{AutomatonError, DFABuilder, StateIndex};

/// A deterministic finite automaton (DFA) over the alphabet `A`. It accepts a finite word if the
/// unique run on that word, starting in the initial state, ends in an accepting state.
///
/// A `DFA` is immutable. Its constructor [`DFA::new`] verifies that the transition function is
/// total and deterministic over the declared states and the alphabet, so that every word
/// over the alphabet has exactly one run. The structure can be inspected through read-only
/// views such as [`DFA::transitions`] and [`DFA::grouped_edges`], which is all a renderer needs.
///
/// # Example
/// ```
/// use automata::prelude::*;
/// // accepts all words with an even number of `a`s
/// let dfa = DFA::builder()
///     .with_transitions([(0, 'a', 1), (0, 'b', 0), (1, 'a', 0), (1, 'b', 1)])
///     .with_accepting([0])
///     .into_dfa(0)
///     .unwrap();
/// assert!(dfa.accepts("abba"));
/// assert!(!dfa.accepts("ab"));
/// assert!(dfa.accepts(""));
/// ```
#[derive(Clone, Debug)]
pub struct DFA<A: Alphabet = CharAlphabet> {
    alphabet: A,
    states: math::OrderedSet<StateIndex>,
    initial: StateIndex,
    accepting: math::OrderedSet<StateIndex>,
    transitions: math::OrderedMap<(StateIndex, SymbolOf<A>), StateIndex>,
    access_words: math::Bijection<StateIndex, Vec<SymbolOf<A>>>,
}

impl<A: Alphabet> DFA<A> {
    /// Assembles a new automaton from its parts. Fails if the initial state, an accepting state or a
    /// transition refers to an undeclared state or symbol, if two transitions with different targets
    /// are given for the same state and symbol, or if some state lacks a transition on some symbol.
    pub fn new<F, Q, T>(
        alphabet: A,
        initial: StateIndex,
        accepting: F,
        states: Q,
        transitions: T,
    ) -> Result<Self, AutomatonError>
    where
        F: IntoIterator<Item = StateIndex>,
        Q: IntoIterator<Item = StateIndex>,
        T: IntoIterator<Item = ((StateIndex, SymbolOf<A>), StateIndex)>,
    {
        let states: math::OrderedSet<_> = states.into_iter().collect();
        let known = |q: StateIndex| {
            if states.contains(&q) {
                Ok(q)
            } else {
                Err(AutomatonError::UnknownState(q))
            }
        };

        known(initial)?;
        let accepting = accepting
            .into_iter()
            .map(known)
            .collect::<Result<math::OrderedSet<_>, _>>()?;

        let mut map = math::OrderedMap::new();
        for ((source, symbol), target) in transitions {
            known(source)?;
            known(target)?;
            if !alphabet.contains(symbol) {
                return Err(AutomatonError::UnknownSymbol(symbol.show()));
            }
            match map.insert((source, symbol), target) {
                Some(previous) if previous != target => {
                    return Err(AutomatonError::DuplicateTransition {
                        state: source,
                        symbol: symbol.show(),
                    })
                }
                _ => {}
            }
        }

        for &state in &states {
            for symbol in alphabet.universe() {
                if !map.contains_key(&(state, symbol)) {
                    return Err(AutomatonError::MissingTransition {
                        state,
                        symbol: symbol.show(),
                    });
                }
            }
        }

        trace!(
            "assembled DFA with {} states and {} transitions",
            states.len(),
            map.len()
        );

        Ok(Self {
            alphabet,
            states,
            initial,
            accepting,
            transitions: map,
            access_words: math::Bijection::new(),
        })
    }

    /// Labels states with the words that reach them. These are purely informational and
    /// are for example displayed when rendering the automaton. Fails if a label refers to
    /// an unknown state.
    pub fn with_access_words<I>(mut self, words: I) -> Result<Self, AutomatonError>
    where
        I: IntoIterator<Item = (StateIndex, Vec<SymbolOf<A>>)>,
    {
        for (state, word) in words {
            if !self.states.contains(&state) {
                return Err(AutomatonError::UnknownState(state));
            }
            self.access_words.insert(state, word);
        }
        Ok(self)
    }

    /// Returns a reference to the alphabet.
    pub fn alphabet(&self) -> &A {
        &self.alphabet
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Iterates over all states in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.states.iter().copied()
    }

    /// Returns `true` if `state` is one of the declared states.
    pub fn contains_state(&self, state: StateIndex) -> bool {
        self.states.contains(&state)
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns whether the given state is accepting. Unknown states are never accepting.
    pub fn is_final(&self, state: StateIndex) -> bool {
        self.accepting.contains(&state)
    }

    /// Returns the indices of all states that are accepting.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.accepting.iter().copied()
    }

    /// Returns the indices of all states that are rejecting.
    pub fn rejecting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.states().filter(|q| !self.is_final(*q))
    }

    /// The word labelling `state`, if one was given through [`DFA::with_access_words`].
    pub fn access_word(&self, state: StateIndex) -> Option<&[SymbolOf<A>]> {
        self.access_words.get_by_left(&state).map(Vec::as_slice)
    }

    /// The state that is labelled with the given access word, if any.
    pub fn state_with_access_word(&self, word: &[SymbolOf<A>]) -> Option<StateIndex> {
        self.access_words.get_by_right(word).copied()
    }

    /// Computes the successor of `state` on `symbol`. Fails if either is not declared.
    pub fn transition(
        &self,
        state: StateIndex,
        symbol: SymbolOf<A>,
    ) -> Result<StateIndex, AutomatonError> {
        if !self.states.contains(&state) {
            return Err(AutomatonError::UnknownState(state));
        }
        self.transitions
            .get(&(state, symbol))
            .copied()
            .ok_or_else(|| AutomatonError::UnknownSymbol(symbol.show()))
    }

    /// Iterates over all transitions as triples `(source, symbol, target)`, sorted by source state
    /// and then by the order of the symbols in the alphabet.
    pub fn transitions(
        &self,
    ) -> impl Iterator<Item = (StateIndex, SymbolOf<A>, StateIndex)> + '_ {
        self.states().flat_map(move |q| {
            self.alphabet
                .universe()
                .map(move |a| (q, a, self.transitions[&(q, a)]))
        })
    }

    /// Groups the transitions by their source and target, collecting all symbols that lead from
    /// the same source to the same target. This is the shape in which edges are usually drawn.
    pub fn grouped_edges(&self) -> Vec<(StateIndex, StateIndex, Vec<SymbolOf<A>>)> {
        let mut groups: math::Map<(StateIndex, StateIndex), Vec<SymbolOf<A>>> = math::Map::new();
        for (source, symbol, target) in self.transitions() {
            groups.entry((source, target)).or_default().push(symbol);
        }
        groups
            .into_iter()
            .map(|((source, target), symbols)| (source, target, symbols))
            .collect()
    }

    /// Runs the given word from `origin`, returning the reached state.
    pub fn reached_state_from<W: FiniteWord<SymbolOf<A>>>(
        &self,
        origin: StateIndex,
        word: W,
    ) -> Result<StateIndex, AutomatonError> {
        if !self.states.contains(&origin) {
            return Err(AutomatonError::UnknownState(origin));
        }
        word.symbols()
            .try_fold(origin, |state, symbol| self.transition(state, symbol))
    }

    /// Runs the given word from the initial state, returning the reached state. The empty word
    /// reaches the initial state.
    pub fn reached_state<W: FiniteWord<SymbolOf<A>>>(
        &self,
        word: W,
    ) -> Result<StateIndex, AutomatonError> {
        self.reached_state_from(self.initial, word)
    }

    /// Decides membership of `word`, failing if it contains a symbol outside the alphabet.
    pub fn try_accepts<W: FiniteWord<SymbolOf<A>>>(&self, word: W) -> Result<bool, AutomatonError> {
        self.reached_state(word).map(|q| self.is_final(q))
    }

    /// Returns `true` if the automaton accepts `word`.
    ///
    /// # Panics
    /// If `word` contains a symbol that does not belong to the alphabet.
    pub fn accepts<W: FiniteWord<SymbolOf<A>>>(&self, word: W) -> bool {
        self.try_accepts(word)
            .unwrap_or_else(|e| panic!("cannot run word through DFA: {e}"))
    }

    /// Returns the length-lexicographically minimal accepted word, or `None` if the
    /// accepted language is empty.
    pub fn give_word(&self) -> Option<Vec<SymbolOf<A>>> {
        let mut seen = math::Set::new();
        let mut queue = VecDeque::from([(self.initial, vec![])]);
        seen.insert(self.initial);

        while let Some((state, word)) = queue.pop_front() {
            if self.is_final(state) {
                return Some(word);
            }
            for symbol in self.alphabet.universe() {
                let target = self.transitions[&(state, symbol)];
                if seen.insert(target) {
                    let mut extended = word.clone();
                    extended.push(symbol);
                    queue.push_back((target, extended));
                }
            }
        }
        None
    }

    /// Returns true if and only if the accepted language is empty.
    pub fn is_empty_language(&self) -> bool {
        self.give_word().is_none()
    }
}

impl DFA<CharAlphabet> {
    /// Returns a [`DFABuilder`] for automata over `char`s.
    pub fn builder() -> DFABuilder<char> {
        DFABuilder::default()
    }
}

impl<A: Alphabet> std::fmt::Display for DFA<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(
            std::iter::once("DFA".to_string()).chain(self.alphabet.universe().map(|a| a.show())),
        );

        for state in self.states() {
            let mut name = state.show();
            if state == self.initial {
                name = format!("→{name}");
            }
            if self.is_final(state) {
                name.push('*');
            }
            if let Some(word) = self.access_word(state) {
                name = format!("{name} [{}]", word.show());
            }
            builder.push_record(std::iter::once(name).chain(
                self.alphabet
                    .universe()
                    .map(|a| self.transitions[&(state, a)].show()),
            ));
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        write!(f, "{table}")
    }
}

impl<A: Alphabet> PartialEq for DFA<A>
where
    A: PartialEq,
{
    /// Two automata are equal if they are structurally identical, access words are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet
            && self.initial == other.initial
            && self.states == other.states
            && self.accepting == other.accepting
            && self.transitions == other.transitions
    }
}

impl<A: Alphabet> DFA<A> {
    /// Lists the states that are reachable from the initial state in breadth-first order.
    pub fn reachable_states(&self) -> Vec<StateIndex> {
        let mut seen = math::Set::new();
        let mut queue = VecDeque::from([self.initial]);
        seen.insert(self.initial);
        while let Some(state) = queue.pop_front() {
            for symbol in self.alphabet.universe() {
                let target = self.transitions[&(state, symbol)];
                if seen.insert(target) {
                    queue.push_back(target);
                }
            }
        }
        seen.into_iter().collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn even_as() -> DFA {
        DFA::builder()
            .with_transitions([(0, 'a', 1), (0, 'b', 0), (1, 'a', 0), (1, 'b', 1)])
            .with_accepting([0])
            .into_dfa(0)
            .unwrap()
    }

    #[test_log::test]
    fn dfa_acceptance() {
        let dfa = even_as();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("aa"));
        assert!(dfa.accepts(vec!['b', 'a', 'b', 'a']));
        assert!(!dfa.accepts("bab"));
        assert_eq!(dfa.give_word(), Some(vec![]));
        assert!(!dfa.is_empty_language());
    }

    #[test_log::test]
    fn dfa_contract_violations() {
        let dfa = even_as();
        let q0 = StateIndex::new(0);
        assert_eq!(
            dfa.transition(StateIndex::new(7), 'a'),
            Err(AutomatonError::UnknownState(StateIndex::new(7)))
        );
        assert_eq!(
            dfa.transition(q0, 'c'),
            Err(AutomatonError::UnknownSymbol("c".to_string()))
        );
        assert_eq!(
            dfa.try_accepts("abc"),
            Err(AutomatonError::UnknownSymbol("c".to_string()))
        );
    }

    #[test]
    #[should_panic(expected = "unknown symbol c")]
    fn accepting_foreign_symbol_panics() {
        even_as().accepts("ac");
    }

    #[test_log::test]
    fn dfa_construction_is_validated() {
        let q = StateIndex::new;
        let alphabet = CharAlphabet::from("ab");

        let missing = DFA::new(
            alphabet.clone(),
            q(0),
            [],
            [q(0)],
            [((q(0), 'a'), q(0))],
        );
        assert_eq!(
            missing,
            Err(AutomatonError::MissingTransition {
                state: q(0),
                symbol: "b".to_string()
            })
        );

        let unknown_target = DFA::new(
            alphabet.clone(),
            q(0),
            [],
            [q(0)],
            [((q(0), 'a'), q(1)), ((q(0), 'b'), q(0))],
        );
        assert_eq!(unknown_target, Err(AutomatonError::UnknownState(q(1))));

        let duplicate = DFA::new(
            alphabet.clone(),
            q(0),
            [],
            [q(0), q(1)],
            [((q(0), 'a'), q(0)), ((q(0), 'a'), q(1))],
        );
        assert_eq!(
            duplicate,
            Err(AutomatonError::DuplicateTransition {
                state: q(0),
                symbol: "a".to_string()
            })
        );

        let unknown_initial = DFA::new(alphabet, q(3), [], [q(0)], []);
        assert_eq!(unknown_initial, Err(AutomatonError::UnknownState(q(3))));
    }

    #[test_log::test]
    fn dfa_structure_views() {
        let dfa = DFA::builder()
            .with_transitions([(0, 'a', 1), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
            .with_accepting([1])
            .into_dfa(0)
            .unwrap()
            .with_access_words([(StateIndex::new(1), vec!['a'])])
            .unwrap();

        let q0 = StateIndex::new(0);
        let q1 = StateIndex::new(1);
        assert_eq!(dfa.accepting_states().collect::<Vec<_>>(), vec![q1]);
        assert_eq!(dfa.rejecting_states().collect::<Vec<_>>(), vec![q0]);
        assert_eq!(dfa.transitions().count(), 4);
        assert_eq!(
            dfa.grouped_edges(),
            vec![(q0, q1, vec!['a', 'b']), (q1, q1, vec!['a']), (q1, q0, vec!['b'])]
        );
        assert_eq!(dfa.access_word(q1), Some(&['a'][..]));
        assert_eq!(dfa.state_with_access_word(&['a']), Some(q1));
        assert_eq!(dfa.reachable_states(), vec![q0, q1]);
        assert_eq!(dfa.give_word(), Some(vec!['a']));

        let rendered = dfa.to_string();
        assert!(rendered.contains("→q0"));
        assert!(rendered.contains("q1* [a]"));
    }
}
