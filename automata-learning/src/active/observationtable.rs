use std::{fmt::Debug, time::Instant};

use automata::prelude::*;
use fixedbitset::FixedBitSet;
use itertools::Itertools;
use owo_colors::OwoColorize;
use tabled::{builder::Builder, settings::Style};
use tracing::{debug, trace};

use super::{counterexample, LStarConfig, LearningError, Oracle, QueryCache};

type Word<A> = Vec<SymbolOf<A>>;

/// A suffix that is appended to the prefixes of an [`ObservationTable`] to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Experiment<S>(pub(super) Vec<S>);

impl<S> Experiment<S> {
    pub fn epsilon() -> Self {
        Self(vec![])
    }

    pub fn as_slice(&self) -> &[S] {
        &self.0
    }
}

impl<S: Symbol> FiniteWord<S> for Experiment<S> {
    type Symbols<'this> = std::iter::Copied<std::slice::Iter<'this, S>>
    where
        Self: 'this;

    fn symbols(&self) -> Self::Symbols<'_> {
        self.0.iter().copied()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// The answers of the oracle for one prefix, where the `i`-th bit is the answer for the prefix
/// concatenated with the `i`-th experiment. A row only ever grows, it has to be refilled
/// whenever experiments are added. Rows of different length are never equal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Row(FixedBitSet);

impl Row {
    /// The number of experiments for which the row holds an answer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The answer for the `experiment`-th experiment, if it has been filled in.
    pub fn get(&self, experiment: usize) -> Option<bool> {
        (experiment < self.len()).then(|| self.0.contains(experiment))
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(|i| self.0.contains(i))
    }

    fn push(&mut self, answer: bool) {
        let position = self.0.len();
        self.0.grow(position + 1);
        self.0.set(position, answer);
    }
}

impl Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.iter().map(|b| b.show()).join(""))
    }
}

/// Selects one of the two sets of prefixes of an [`ObservationTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowSet {
    /// The prefixes that represent states, usually called `S`.
    Base,
    /// The one-symbol extensions of base prefixes that are not base prefixes themselves,
    /// usually called `S·A`.
    Boundary,
}

/// The observation table of Angluin's L* algorithm.
///
/// It stores a set of base prefixes, which act as representatives of states, their one-symbol
/// extensions (the boundary), and a list of experiments. For every prefix, the table keeps a
/// [`Row`] that records for each experiment whether the prefix followed by the experiment is
/// accepted by the target language. Two prefixes with the same row are presumed to lead to the
/// same state.
///
/// The table is *closed* if every boundary row also occurs as a base row, and *consistent* if
/// base prefixes with equal rows still have equal rows after appending any symbol. From a closed
/// and consistent table, a DFA can be extracted with [`ObservationTable::extract_automaton`].
///
/// All answers go through a [`QueryCache`] that is owned by the table.
pub struct ObservationTable<A: Alphabet, O: Oracle<Symbol = A::Symbol>> {
    alphabet: A,
    cache: QueryCache<O>,
    // the base prefixes (S) and their rows
    base: math::Map<Word<A>, Row>,
    // one letter extensions of base prefixes (S·A) and their rows
    boundary: math::Map<Word<A>, Row>,
    // always starts with the empty experiment
    experiments: Vec<Experiment<A::Symbol>>,
    max_length: usize,
    candidate: Option<DFA<A>>,
    search_queries: usize,
}

impl<A: Alphabet, O: Oracle<Symbol = A::Symbol>> ObservationTable<A, O> {
    /// Creates a new table containing the empty prefix as base, all symbols as boundary and the
    /// empty experiment, and fills all rows. The maximal length of words that are compared in
    /// [`ObservationTable::search_counterexample`] is derived from `config`.
    pub fn new(alphabet: A, oracle: O, config: LStarConfig) -> Result<Self, LearningError> {
        if alphabet.is_empty() {
            return Err(LearningError::EmptyAlphabet);
        }

        let bound = counterexample::max_length_for_budget(alphabet.size(), config.query_budget());
        let max_length = config.max_length().map_or(bound, |cap| cap.min(bound));
        debug!(
            "counterexample search covers lengths 2 to {max_length} (budget {}, derived bound {bound})",
            config.query_budget()
        );

        let mut table = Self {
            base: math::Map::from_iter([(vec![], Row::default())]),
            boundary: alphabet
                .universe()
                .map(|a| (vec![a], Row::default()))
                .collect(),
            alphabet,
            cache: QueryCache::new(oracle),
            experiments: vec![Experiment::epsilon()],
            max_length,
            candidate: None,
            search_queries: 0,
        };
        table.fill_all_rows();
        Ok(table)
    }

    /// Makes sure that the row of `prefix` in the given set has an answer for every
    /// experiment. Only the missing answers at the end of the row are queried. Returns `false`
    /// and leaves the table untouched if `prefix` is not part of the given set, prefixes only
    /// enter the table through closedness repairs and counterexamples.
    pub fn fill_row(&mut self, prefix: &[A::Symbol], which: RowSet) -> bool {
        let rows = match which {
            RowSet::Base => &mut self.base,
            RowSet::Boundary => &mut self.boundary,
        };
        let Some(row) = rows.get_mut(prefix) else {
            return false;
        };
        if row.len() >= self.experiments.len() {
            return true;
        }

        for experiment in &self.experiments[row.len()..] {
            let mut word = prefix.to_vec();
            word.extend(experiment.symbols());
            row.push(self.cache.query(&word));
        }
        trace!("filled {which:?} row of {} to {row:?}", prefix.as_string());
        true
    }

    fn insert_row(&mut self, prefix: Word<A>, row: Row, which: RowSet) {
        let rows = match which {
            RowSet::Base => &mut self.base,
            RowSet::Boundary => &mut self.boundary,
        };
        rows.entry(prefix.clone()).or_insert(row);
        self.fill_row(&prefix, which);
    }

    fn fill_all_rows(&mut self) {
        for prefix in self.base.keys().cloned().collect_vec() {
            self.fill_row(&prefix, RowSet::Base);
        }
        for prefix in self.boundary.keys().cloned().collect_vec() {
            self.fill_row(&prefix, RowSet::Boundary);
        }
    }

    /// Moves `word` into the base, filling its row, and adds its one-symbol extensions that are
    /// not base prefixes to the boundary.
    fn promote(&mut self, word: Word<A>) {
        let row = self.boundary.shift_remove(&word).unwrap_or_default();
        self.insert_row(word.clone(), row, RowSet::Base);

        for symbol in self.alphabet.universe().collect_vec() {
            let mut extension = word.clone();
            extension.push(symbol);
            if !self.base.contains_key(&extension) {
                self.insert_row(extension, Row::default(), RowSet::Boundary);
            }
        }
    }

    /// Looks for two base prefixes with equal rows whose extensions by some symbol have different
    /// rows. Returns the two prefixes together with the experiment that separates them, which is
    /// the symbol followed by the first experiment on which the extensions disagree.
    fn find_inconsistency(&self) -> Option<(&Word<A>, &Word<A>, Experiment<A::Symbol>)> {
        let base = self.base.iter().collect_vec();
        for (i, (left, left_row)) in base.iter().enumerate() {
            for (right, right_row) in &base[i + 1..] {
                if left_row != right_row {
                    continue;
                }

                for symbol in self.alphabet.universe() {
                    let l = self.extension_row(left, symbol);
                    let r = self.extension_row(right, symbol);
                    if l == r {
                        continue;
                    }
                    let Some(position) = (0..self.experiments.len()).find(|j| l.get(*j) != r.get(*j))
                    else {
                        continue;
                    };
                    let separating = std::iter::once(symbol)
                        .chain(self.experiments[position].symbols())
                        .collect();
                    return Some((*left, *right, Experiment(separating)));
                }
            }
        }
        None
    }

    fn extension_row(&self, prefix: &[A::Symbol], symbol: A::Symbol) -> &Row {
        let mut extension = prefix.to_vec();
        extension.push(symbol);
        self.row(&extension)
            .unwrap_or_else(|| panic!("no row for extension {}", extension.as_string()))
    }

    fn find_unclosed(&self) -> Option<&Word<A>> {
        let known: math::Set<&Row> = self.base.values().collect();
        self.boundary
            .iter()
            .find_map(|(word, row)| (!known.contains(row)).then_some(word))
    }

    /// Returns `true` if every boundary row also occurs as a base row.
    pub fn is_closed(&self) -> bool {
        self.find_unclosed().is_none()
    }

    /// Returns `true` if any two base prefixes with equal rows have equal rows after appending
    /// any symbol.
    pub fn is_consistent(&self) -> bool {
        self.find_inconsistency().is_none()
    }

    /// Fixes one inconsistency, if there is one, by adding an experiment that separates two base
    /// prefixes that currently have the same row. All rows are refilled afterwards. Returns `false`
    /// if the table is already consistent, so callers need to loop to make the table consistent.
    pub fn repair_consistency(&mut self) -> bool {
        let Some((left, right, experiment)) = self.find_inconsistency() else {
            return false;
        };
        debug!(
            "{} and {} are separated by new experiment {}",
            left.as_string(),
            right.as_string(),
            experiment.as_string()
        );
        debug_assert!(!self.experiments.contains(&experiment));

        self.experiments.push(experiment);
        self.fill_all_rows();
        true
    }

    /// Fixes one violation of closedness, if there is one, by promoting a boundary prefix whose row
    /// does not occur among the base rows. Returns `false` if the table is already closed.
    pub fn repair_closedness(&mut self) -> bool {
        let Some(word) = self.find_unclosed().cloned() else {
            return false;
        };
        debug!("promoting {} to the base", word.as_string());
        self.promote(word);
        true
    }

    /// Builds the DFA that corresponds to the table. States are the classes of base prefixes with
    /// equal rows, numbered in length-lexicographic order of their shortest representative, so the
    /// class of the empty prefix is always the initial state `q0`. Each representative also labels
    /// its state as access word.
    ///
    /// # Panics
    /// If the table is not closed and consistent.
    pub fn extract_automaton(&mut self) -> Result<DFA<A>, LearningError> {
        assert!(
            self.is_closed(),
            "can only extract an automaton from a closed table"
        );
        assert!(
            self.is_consistent(),
            "can only extract an automaton from a consistent table"
        );
        let start = Instant::now();

        let mut classes: math::Map<&Row, StateIndex> = math::Map::default();
        let mut representatives = vec![];
        for (prefix, row) in self
            .base
            .iter()
            .sorted_by(|(u, _), (v, _)| u.length_lexicographic_ord(v.as_slice()))
        {
            if !classes.contains_key(row) {
                let state = StateIndex::new(classes.len());
                classes.insert(row, state);
                representatives.push((state, prefix.clone()));
            }
        }

        let accepting = representatives
            .iter()
            .filter(|(_, rep)| self.cache.lookup(rep) == Some(true))
            .map(|(state, _)| *state)
            .collect_vec();

        let mut transitions = math::OrderedMap::new();
        for (word, row) in self
            .base
            .iter()
            .chain(self.boundary.iter())
            .sorted_by(|(u, _), (v, _)| u.length_lexicographic_ord(v.as_slice()))
        {
            let Some((&symbol, parent)) = word.split_last() else {
                continue;
            };
            let parent_row = self
                .base
                .get(parent)
                .unwrap_or_else(|| panic!("parent {} is not in the base", parent.as_string()));
            let source = classes[parent_row];
            let target = classes[row];

            match transitions.insert((source, symbol), target) {
                Some(existing) if existing != target => {
                    return Err(LearningError::InconsistentTable {
                        state: source,
                        symbol: symbol.show(),
                        existing,
                        conflicting: target,
                    })
                }
                _ => {}
            }
        }

        let states = representatives.iter().map(|(state, _)| *state).collect_vec();
        let automaton = DFA::new(
            self.alphabet.clone(),
            StateIndex::new(0),
            accepting,
            states,
            transitions,
        )?
        .with_access_words(representatives)?;

        debug!(
            "extracted hypothesis with {} states in {}",
            automaton.size(),
            show_duration(start.elapsed())
        );
        self.candidate = Some(automaton.clone());
        Ok(automaton)
    }

    /// Compares `candidate` with the oracle on all words of length two up to the maximal length,
    /// in length-lexicographic order, and returns the first word on which they disagree. Shorter
    /// words are always answered correctly by a hypothesis extracted from this table.
    ///
    /// Answers that are already cached are reused, but answers obtained during the search are not
    /// added to the cache.
    pub fn search_counterexample(&mut self, candidate: &DFA<A>) -> Option<Word<A>> {
        debug!(
            "searching counterexample of length at most {}",
            self.max_length
        );
        let Self {
            cache,
            search_queries,
            max_length,
            ..
        } = self;

        counterexample::first_disagreement(candidate, 2..=*max_length, |word| {
            cache.lookup(word).unwrap_or_else(|| {
                *search_queries += 1;
                cache.oracle().output(word)
            })
        })
    }

    /// Adds every non-empty prefix of `counterexample` to the base, starting with the longest one.
    pub fn resolve_counterexample(&mut self, counterexample: &[A::Symbol]) {
        debug!("resolving counterexample {}", counterexample.as_string());
        for length in (1..=counterexample.len()).rev() {
            let prefix = counterexample[..length].to_vec();
            if !self.base.contains_key(&prefix) {
                self.promote(prefix);
            }
        }
    }

    /// Returns the row of `prefix`, looking in the base first and in the boundary second.
    pub fn row(&self, prefix: &[A::Symbol]) -> Option<&Row> {
        self.base.get(prefix).or_else(|| self.boundary.get(prefix))
    }

    /// Returns the row of `prefix` in the given set of prefixes.
    pub fn row_in(&self, prefix: &[A::Symbol], which: RowSet) -> Option<&Row> {
        match which {
            RowSet::Base => self.base.get(prefix),
            RowSet::Boundary => self.boundary.get(prefix),
        }
    }

    /// Iterates over the base prefixes in the order in which they were added.
    pub fn base(&self) -> impl Iterator<Item = &[A::Symbol]> + '_ {
        self.base.keys().map(Vec::as_slice)
    }

    /// Iterates over the boundary prefixes in the order in which they were added.
    pub fn boundary(&self) -> impl Iterator<Item = &[A::Symbol]> + '_ {
        self.boundary.keys().map(Vec::as_slice)
    }

    pub fn experiments(&self) -> &[Experiment<A::Symbol>] {
        &self.experiments
    }

    pub fn alphabet(&self) -> &A {
        &self.alphabet
    }

    pub fn cache(&self) -> &QueryCache<O> {
        &self.cache
    }

    /// The most recently extracted automaton.
    pub fn candidate(&self) -> Option<&DFA<A>> {
        self.candidate.as_ref()
    }

    /// The maximal length of words compared when searching for a counterexample.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// The number of cells in the table, which is the number of prefixes times the number of
    /// experiments.
    pub fn table_size(&self) -> usize {
        (self.base.len() + self.boundary.len()) * self.experiments.len()
    }

    /// The number of distinct words the oracle was asked about while filling the table. Queries
    /// made during counterexample searches are not included.
    pub fn query_count(&self) -> usize {
        self.cache.distinct_query_count()
    }

    /// The number of oracle calls made during counterexample searches.
    pub fn search_query_count(&self) -> usize {
        self.search_queries
    }
}

impl<A: Alphabet, O: Oracle<Symbol = A::Symbol>> Debug for ObservationTable<A, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(
            std::iter::once(String::new()).chain(self.experiments.iter().map(|e| e.as_string())),
        );

        for (prefix, row) in &self.base {
            builder.push_record(
                std::iter::once(prefix.as_string().bold().to_string())
                    .chain(row.iter().map(|b| b.show())),
            );
        }
        for (prefix, row) in &self.boundary {
            builder.push_record(
                std::iter::once(prefix.as_string()).chain(row.iter().map(|b| b.show())),
            );
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use automata::prelude::*;

    use super::{Experiment, ObservationTable, RowSet};
    use crate::active::{FnOracle, LStarConfig, LearningError};

    fn length_multiple_of_three() -> FnOracle<char, impl Fn(&[char]) -> bool> {
        FnOracle::new(|w: &[char]| w.len() % 3 == 0)
    }

    #[test_log::test]
    fn table_initialization() {
        let oracle = FnOracle::new(|w: &[char]| w.last() == Some(&'a'));
        let table =
            ObservationTable::new(CharAlphabet::from("ab"), oracle, LStarConfig::default())
                .unwrap();

        assert_eq!(table.base().collect::<Vec<_>>(), vec![&[][..]]);
        assert_eq!(table.boundary().collect::<Vec<_>>(), vec![&['a'][..], &['b'][..]]);
        assert_eq!(table.experiments().len(), 1);
        assert_eq!(table.query_count(), 3);
        assert_eq!(table.table_size(), 3);
        assert_eq!(table.max_length(), 15);
        assert_eq!(table.row(&['a']).and_then(|r| r.get(0)), Some(true));
        assert_eq!(table.row_in(&['a'], RowSet::Base), None);
        assert!(!table.is_closed());
        assert!(table.is_consistent());
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        let oracle = FnOracle::new(|_: &[char]| true);
        assert_eq!(
            ObservationTable::new(CharAlphabet::new([]), oracle, LStarConfig::default()).err(),
            Some(LearningError::EmptyAlphabet)
        );
    }

    #[test_log::test]
    fn closing_promotes_boundary_rows() {
        let oracle = FnOracle::new(|w: &[char]| w.last() == Some(&'a'));
        let mut table =
            ObservationTable::new(CharAlphabet::from("ab"), oracle, LStarConfig::default())
                .unwrap();

        assert!(table.repair_closedness());
        assert_eq!(table.base().collect::<Vec<_>>(), vec![&[][..], &['a'][..]]);
        assert_eq!(
            table.boundary().collect::<Vec<_>>(),
            vec![&['b'][..], &['a', 'a'][..], &['a', 'b'][..]]
        );
        assert!(!table.repair_closedness());
        assert!(!table.repair_consistency());

        let dfa = table.extract_automaton().unwrap();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.accepts("bba"));
        assert!(!dfa.accepts("ab"));
        assert_eq!(dfa.access_word(StateIndex::new(1)), Some(&['a'][..]));
        assert!(table.candidate().is_some());
        assert_eq!(table.search_counterexample(&dfa), None);
    }

    #[test_log::test]
    fn counterexample_leads_to_new_experiment() {
        let config = LStarConfig::default().with_max_length(6);
        let mut table =
            ObservationTable::new(CharAlphabet::from("a"), length_multiple_of_three(), config)
                .unwrap();
        assert_eq!(table.max_length(), 6);

        assert!(table.repair_closedness());
        assert!(!table.repair_closedness());
        assert!(!table.repair_consistency());
        let first = table.extract_automaton().unwrap();
        assert_eq!(first.size(), 2);

        let queries = table.query_count();
        let counterexample = table.search_counterexample(&first);
        assert_eq!(counterexample, Some(vec!['a'; 3]));
        assert_eq!(table.query_count(), queries);
        assert_eq!(table.search_query_count(), 1);

        table.resolve_counterexample(&['a'; 3]);
        assert_eq!(
            table.base().collect::<Vec<_>>(),
            vec![&[][..], &['a'][..], &['a', 'a', 'a'][..], &['a', 'a'][..]]
        );
        assert_eq!(table.boundary().collect::<Vec<_>>(), vec![&['a'; 4][..]]);
        assert!(table.is_closed());
        assert!(!table.is_consistent());

        assert!(table.repair_consistency());
        assert_eq!(
            table
                .experiments()
                .iter()
                .map(|e| e.as_string())
                .collect::<Vec<_>>(),
            vec!["ε", "a"]
        );
        assert!(table.row(&['a', 'a']).is_some_and(|r| r.len() == 2));
        assert!(!table.repair_consistency());
        assert!(!table.repair_closedness());

        let second = table.extract_automaton().unwrap();
        assert_eq!(second.size(), 3);
        assert_eq!(table.search_counterexample(&second), None);
        for n in 0..10 {
            assert_eq!(second.accepts(vec!['a'; n]), n % 3 == 0);
        }
    }

    #[test]
    #[should_panic(expected = "closed table")]
    fn extraction_requires_closed_table() {
        let oracle = FnOracle::new(|w: &[char]| w.last() == Some(&'a'));
        let mut table =
            ObservationTable::new(CharAlphabet::from("ab"), oracle, LStarConfig::default())
                .unwrap();
        let _ = table.extract_automaton();
    }

    #[test_log::test]
    fn rows_are_only_filled_at_the_end() {
        let oracle = length_multiple_of_three();
        let mut table =
            ObservationTable::new(CharAlphabet::from("a"), oracle, LStarConfig::default())
                .unwrap();
        let queries = table.query_count();
        assert!(table.fill_row(&['a'], RowSet::Boundary));
        assert_eq!(table.query_count(), queries);

        table.experiments.push(Experiment(vec!['a']));
        // ε·a is already known from the boundary row of a
        assert!(table.fill_row(&[], RowSet::Base));
        assert_eq!(table.query_count(), queries);
        assert!(table.fill_row(&['a'], RowSet::Boundary));
        assert_eq!(table.query_count(), queries + 1);
        assert_eq!(table.row(&['a']).map(|r| r.len()), Some(2));
        assert_eq!(table.row(&[]).and_then(|r| r.get(1)), Some(false));
    }

    #[test_log::test]
    fn filling_unknown_rows_leaves_table_intact() {
        let oracle = FnOracle::new(|w: &[char]| w.last() == Some(&'a'));
        let mut table =
            ObservationTable::new(CharAlphabet::from("ab"), oracle, LStarConfig::default())
                .unwrap();
        let queries = table.query_count();

        assert!(!table.fill_row(&['b', 'b'], RowSet::Base));
        assert!(!table.fill_row(&['a'], RowSet::Base));
        assert!(!table.fill_row(&['a', 'b'], RowSet::Boundary));
        assert_eq!(table.base().collect::<Vec<_>>(), vec![&[][..]]);
        assert_eq!(table.boundary().count(), 2);
        assert_eq!(table.query_count(), queries);
        assert!(table.is_consistent());

        while table.repair_closedness() {}
        assert_eq!(table.extract_automaton().map(|dfa| dfa.size()), Ok(2));
    }
}
