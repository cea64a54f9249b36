use automata::prelude::*;
use tracing::trace;

use super::Oracle;

/// Memoizes the answers of an [`Oracle`], so that asking for the same word repeatedly costs
/// only a single call to the oracle. The cache is owned by exactly one observation table,
/// independent learning runs therefore never share answers.
///
/// The oracle must be a pure function of its input. If it is not, the first answer given
/// for a word is the one that sticks.
#[derive(Debug, Clone)]
pub struct QueryCache<O: Oracle> {
    oracle: O,
    answers: math::Map<Vec<O::Symbol>, bool>,
    // length of the longest word that has an answer
    longest: usize,
}

impl<O: Oracle> QueryCache<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            answers: math::Map::default(),
            longest: 0,
        }
    }

    /// Returns the answer for `word`, asking the oracle only if the word has not been
    /// asked before.
    pub fn query(&mut self, word: &[O::Symbol]) -> bool {
        if let Some(answer) = self.answers.get(word) {
            return *answer;
        }
        let answer = self.oracle.output(word);
        trace!("oracle answers {} for {}", answer, word.as_string());
        self.answers.insert(word.to_vec(), answer);
        self.longest = self.longest.max(word.len());
        answer
    }

    /// Returns the cached answer for `word` without consulting the oracle. Words that are longer
    /// than every word asked so far are rejected without hashing them.
    pub fn lookup(&self, word: &[O::Symbol]) -> Option<bool> {
        if word.len() > self.longest {
            return None;
        }
        self.answers.get(word).copied()
    }

    /// The number of distinct words the oracle has been asked about.
    pub fn distinct_query_count(&self) -> usize {
        self.answers.len()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Iterates over all words asked so far together with their answers, in the order in
    /// which they were first asked.
    pub fn answers(&self) -> impl Iterator<Item = (&[O::Symbol], bool)> + '_ {
        self.answers.iter().map(|(w, a)| (w.as_slice(), *a))
    }
}
