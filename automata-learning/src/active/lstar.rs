use std::{fmt::Display, time::Duration};

use automata::prelude::*;
use tracing::{debug, info, trace};

use super::{LStarConfig, LearningError, ObservationTable, Oracle};

/// The phase a run of [`LStar`] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The table is repaired until it is closed and consistent.
    Refining,
    /// A hypothesis is extracted and compared with the oracle.
    Testing,
    /// No counterexample was found, the last hypothesis is the result.
    Done,
}

/// Counters collected over one run of [`LStar`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearningStats {
    /// Number of hypotheses that were extracted and tested.
    pub rounds: usize,
    pub counterexamples: usize,
    pub consistency_repairs: usize,
    pub closedness_repairs: usize,
    /// Distinct words asked while filling the table.
    pub membership_queries: usize,
    /// Oracle calls made while searching for counterexamples.
    pub search_queries: usize,
    pub elapsed: Duration,
}

impl Display for LearningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rounds, {} counterexamples, {} consistency and {} closedness repairs, {} membership and {} search queries in {}",
            self.rounds,
            self.counterexamples,
            self.consistency_repairs,
            self.closedness_repairs,
            self.membership_queries,
            self.search_queries,
            show_duration(self.elapsed)
        )
    }
}

/// The outcome of a successful run of [`LStar`].
pub struct Learned<A: Alphabet, O: Oracle<Symbol = A::Symbol>> {
    automaton: DFA<A>,
    table: ObservationTable<A, O>,
    stats: LearningStats,
}

impl<A: Alphabet, O: Oracle<Symbol = A::Symbol>> Learned<A, O> {
    /// The learned automaton. It agrees with the oracle on all words up to the maximal length
    /// of the table, but may differ on longer words.
    pub fn automaton(&self) -> &DFA<A> {
        &self.automaton
    }

    pub fn into_automaton(self) -> DFA<A> {
        self.automaton
    }

    /// The final observation table, from which the automaton was extracted.
    pub fn table(&self) -> &ObservationTable<A, O> {
        &self.table
    }

    pub fn stats(&self) -> &LearningStats {
        &self.stats
    }
}

/// An implementation of Angluin's L* algorithm, which learns a minimal DFA using only a
/// membership oracle.
///
/// There is no equivalence oracle, instead each hypothesis is compared with the membership
/// oracle on all words up to a maximal length that is determined by the [`LStarConfig`]. The
/// learned automaton is therefore only guaranteed to be correct up to that length.
///
/// A run alternates between two phases. While [`Phase::Refining`], the observation table is
/// repeatedly made consistent and then closed. Once neither repair changes the table, the run
/// moves to [`Phase::Testing`], where a hypothesis is extracted and searched for a counterexample.
/// A counterexample is added to the table and refining starts over, otherwise the run is
/// [`Phase::Done`].
///
/// # Example
/// ```
/// use automata::prelude::*;
/// use automata_learning::prelude::*;
///
/// let even_length = FnOracle::new(|w: &[char]| w.len() % 2 == 0);
/// let learned = LStar::new(CharAlphabet::from("ab"), even_length)
///     .unwrap()
///     .infer()
///     .unwrap();
/// assert_eq!(learned.automaton().size(), 2);
/// assert!(learned.automaton().accepts("abba"));
/// ```
pub struct LStar<A: Alphabet, O: Oracle<Symbol = A::Symbol>> {
    table: ObservationTable<A, O>,
    phase: Phase,
    stats: LearningStats,
    hypothesis: Option<DFA<A>>,
}

impl<A: Alphabet, O: Oracle<Symbol = A::Symbol>> LStar<A, O> {
    /// Creates a learner with the default configuration.
    pub fn new(alphabet: A, oracle: O) -> Result<Self, LearningError> {
        Self::with_config(alphabet, oracle, LStarConfig::default())
    }

    pub fn with_config(alphabet: A, oracle: O, config: LStarConfig) -> Result<Self, LearningError> {
        Ok(Self {
            table: ObservationTable::new(alphabet, oracle, config)?,
            phase: Phase::Refining,
            stats: LearningStats::default(),
            hypothesis: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn table(&self) -> &ObservationTable<A, O> {
        &self.table
    }

    /// The hypothesis that passed the counterexample search, once the run is done.
    pub fn hypothesis(&self) -> Option<&DFA<A>> {
        self.hypothesis.as_ref()
    }

    fn enter(&mut self, phase: Phase) {
        debug!("moving from {:?} to {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Performs a single step and returns the phase the run is in afterwards. While refining,
    /// a step repairs one inconsistency, or if there is none, one violation of closedness. While
    /// testing, a step extracts and tests one hypothesis. Once done, steps have no effect.
    pub fn step(&mut self) -> Result<Phase, LearningError> {
        match self.phase {
            Phase::Refining => {
                if self.table.repair_consistency() {
                    self.stats.consistency_repairs += 1;
                } else if self.table.repair_closedness() {
                    self.stats.closedness_repairs += 1;
                } else {
                    self.enter(Phase::Testing);
                }
            }
            Phase::Testing => {
                self.stats.rounds += 1;
                let hypothesis = self.table.extract_automaton()?;
                trace!(
                    "round {} with table\n{:?}\nand hypothesis\n{}",
                    self.stats.rounds,
                    self.table,
                    hypothesis
                );

                match self.table.search_counterexample(&hypothesis) {
                    Some(counterexample) => {
                        debug!(
                            "hypothesis with {} states is refuted by {}",
                            hypothesis.size(),
                            counterexample.as_string()
                        );
                        self.stats.counterexamples += 1;
                        self.table.resolve_counterexample(&counterexample);
                        self.enter(Phase::Refining);
                    }
                    None => {
                        self.hypothesis = Some(hypothesis);
                        self.enter(Phase::Done);
                    }
                }
            }
            Phase::Done => {}
        }
        Ok(self.phase)
    }

    /// Runs the algorithm until no counterexample up to the maximal length can be found and
    /// returns the last hypothesis together with the final table and statistics.
    pub fn infer(mut self) -> Result<Learned<A, O>, LearningError> {
        let start = std::time::Instant::now();
        loop {
            self.step()?;
            if let Some(automaton) = self.hypothesis.take() {
                self.stats.membership_queries = self.table.query_count();
                self.stats.search_queries = self.table.search_query_count();
                self.stats.elapsed = start.elapsed();
                info!(
                    "learned DFA with {} states over {} symbols: {}",
                    automaton.size(),
                    self.table.alphabet().size(),
                    self.stats
                );
                return Ok(Learned {
                    automaton,
                    table: self.table,
                    stats: self.stats,
                });
            }
        }
    }
}

/// Learns a DFA for the language described by `oracle` with the default configuration.
pub fn lstar<A, O>(alphabet: A, oracle: O) -> Result<Learned<A, O>, LearningError>
where
    A: Alphabet,
    O: Oracle<Symbol = A::Symbol>,
{
    LStar::new(alphabet, oracle)?.infer()
}

/// Learns a DFA for the language described by `oracle`, testing hypotheses as given by `config`.
pub fn lstar_with<A, O>(
    alphabet: A,
    oracle: O,
    config: LStarConfig,
) -> Result<Learned<A, O>, LearningError>
where
    A: Alphabet,
    O: Oracle<Symbol = A::Symbol>,
{
    LStar::with_config(alphabet, oracle, config)?.infer()
}

#[cfg(test)]
mod tests {
    use automata::prelude::*;
    use itertools::Itertools;

    use super::{lstar, lstar_with, LStar, Phase};
    use crate::active::{check_agreement, DFAOracle, FnOracle, LStarConfig, LearningError};

    fn count(word: &[char], symbol: char) -> usize {
        word.iter().filter(|c| **c == symbol).count()
    }

    #[test_log::test]
    fn lstar_even_as_and_even_bs() {
        let oracle = FnOracle::new(|w: &[char]| count(w, 'a') % 2 == 0 && count(w, 'b') % 2 == 0);
        let learned = lstar(CharAlphabet::from("ab"), &oracle).unwrap();
        let dfa = learned.automaton();

        assert_eq!(dfa.size(), 4);
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("abab"));
        assert!(dfa.accepts("aabb"));
        assert!(!dfa.accepts("aab"));
        assert!(!dfa.accepts("a"));
        assert_eq!(check_agreement(dfa, &oracle, 10), Ok(()));

        let stats = learned.stats();
        assert!(stats.rounds >= 2);
        assert_eq!(stats.counterexamples + 1, stats.rounds);
        assert_eq!(stats.membership_queries, learned.table().query_count());
        assert!(stats.search_queries > 0);
    }

    #[test_log::test]
    fn lstar_ends_in_a() {
        let oracle = FnOracle::new(|w: &[char]| w.last() == Some(&'a'));
        let learned = lstar(CharAlphabet::from("ab"), oracle).unwrap();
        let dfa = learned.automaton();

        assert_eq!(dfa.size(), 2);
        assert!(dfa.accepts("a"));
        assert!(dfa.accepts("bba"));
        assert!(!dfa.accepts(""));
        assert!(!dfa.accepts("ab"));
        assert_eq!(learned.stats().counterexamples, 0);
    }

    #[test_log::test]
    fn lstar_unary_length_divisible_by_three() {
        let oracle = FnOracle::new(|w: &[char]| w.len() % 3 == 0);
        let learned = lstar(CharAlphabet::from("a"), &oracle).unwrap();
        assert_eq!(learned.table().max_length(), 100_001);

        let dfa = learned.automaton();
        assert_eq!(dfa.size(), 3);
        assert!(dfa.accepts("aaa"));
        assert!(dfa.accepts("aaaaaa"));
        assert!(!dfa.accepts("a"));
        assert!(!dfa.accepts("aa"));
        assert_eq!(check_agreement(dfa, &oracle, 100_001), Ok(()));
        assert!(learned.stats().search_queries > 99_000);

        let config = LStarConfig::default().with_query_budget(30);
        let learned = lstar_with(CharAlphabet::from("a"), &oracle, config).unwrap();
        assert_eq!(learned.table().max_length(), 31);
        assert_eq!(learned.automaton(), dfa);
    }

    #[test_log::test]
    fn lstar_learns_known_automaton_back() {
        // contains the infix abc
        let target = DFA::builder()
            .with_transitions([
                (0, 'a', 1),
                (0, 'b', 0),
                (0, 'c', 0),
                (1, 'a', 1),
                (1, 'b', 2),
                (1, 'c', 0),
                (2, 'a', 1),
                (2, 'b', 0),
                (2, 'c', 3),
                (3, 'a', 3),
                (3, 'b', 3),
                (3, 'c', 3),
            ])
            .with_accepting([3])
            .into_dfa(0)
            .unwrap();
        let oracle = DFAOracle::new(target.clone());
        let config = LStarConfig::default().with_max_length(7);

        let learned = lstar_with(target.alphabet().clone(), &oracle, config).unwrap();
        let dfa = learned.automaton();
        assert_eq!(dfa.size(), target.size());
        assert_eq!(check_agreement(dfa, &oracle, 7), Ok(()));
        assert!(dfa.accepts("bcabcab"));
        assert!(!dfa.accepts("abbc"));
        assert_eq!(dfa.access_word(dfa.initial()), Some(&[][..]));
    }

    #[test_log::test]
    fn learned_automaton_respects_table() {
        let oracle = FnOracle::new(|w: &[char]| count(w, 'a') % 2 == 0 && count(w, 'b') % 2 == 0);
        let learned = lstar(CharAlphabet::from("ab"), oracle).unwrap();
        let (dfa, table) = (learned.automaton(), learned.table());
        assert!(table.is_closed());
        assert!(table.is_consistent());
        assert_eq!(table.candidate(), Some(dfa));

        for state in dfa.states() {
            for symbol in dfa.alphabet().universe() {
                assert!(dfa.transition(state, symbol).is_ok());
            }
        }

        let observed = table.base().chain(table.boundary()).collect_vec();
        for (u, v) in observed.iter().tuple_combinations() {
            if table.row(u) == table.row(v) {
                assert_eq!(dfa.reached_state(*u), dfa.reached_state(*v));
            }
        }
        for prefix in table.base() {
            assert_eq!(
                dfa.accepts(prefix),
                table.cache().lookup(prefix) == Some(true)
            );
        }
    }

    #[test_log::test]
    fn stepping_through_phases() {
        let oracle = FnOracle::new(|w: &[char]| w.last() == Some(&'a'));
        let mut learner = LStar::new(CharAlphabet::from("ab"), oracle).unwrap();
        assert_eq!(learner.phase(), Phase::Refining);

        let mut queries = learner.table().query_count();
        let mut phases = vec![];
        while learner.phase() != Phase::Done {
            phases.push(learner.step().unwrap());
            assert!(learner.table().query_count() >= queries);
            queries = learner.table().query_count();
        }
        assert_eq!(phases, vec![Phase::Refining, Phase::Testing, Phase::Done]);
        assert_eq!(learner.hypothesis().map(|h| h.size()), Some(2));
        assert_eq!(learner.step(), Ok(Phase::Done));

        let learned = learner.infer().unwrap();
        assert_eq!(learned.stats().rounds, 1);
        assert_eq!(learned.stats().closedness_repairs, 1);
    }

    #[test_log::test]
    fn bounded_search_misses_long_counterexamples() {
        let oracle = FnOracle::new(|w: &[char]| w.len() == 10);
        let config = LStarConfig::default().with_max_length(4);
        let learned = lstar_with(CharAlphabet::from("a"), &oracle, config).unwrap();

        assert_eq!(learned.automaton().size(), 1);
        assert_eq!(check_agreement(learned.automaton(), &oracle, 4), Ok(()));
        assert_eq!(
            check_agreement(learned.automaton(), &oracle, 12),
            Err(vec!['a'; 10])
        );
    }

    #[test]
    fn empty_alphabet_fails() {
        let oracle = FnOracle::new(|_: &[char]| false);
        assert_eq!(
            lstar(CharAlphabet::new([]), oracle).err(),
            Some(LearningError::EmptyAlphabet)
        );
    }
}
