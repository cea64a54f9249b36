use automata::prelude::*;
use itertools::Itertools;
use tracing::{debug, trace};

use super::Oracle;

/// Computes the maximal length of words that are compared when testing a hypothesis over an
/// alphabet with `alphabet_size` symbols, given that at most `budget` words may be compared.
///
/// Words of length zero and one never need to be compared, so the result is the largest `n`
/// such that the number of words with a length in `2..=n`, which is the geometric sum of
/// `alphabet_size^x` for `x` in `2..=n`, does not exceed `budget`. A result below two means
/// that no word is compared at all.
///
/// The closed form `n = log_k((budget + 1 + k)(k - 1) + 1) - 1` gives the real solution and
/// is then corrected with exact integer arithmetic. Over a single symbol there is only one
/// word per length, so the bound becomes `budget + 1`.
///
/// # Panics
/// If `alphabet_size` is zero, since there is no bound that makes sense for an empty alphabet.
///
/// # Example
/// ```
/// use automata_learning::active::max_length_for_budget;
/// // 4 + 8 + ... + 2^15 = 65532 <= 100000 < 131068 = 4 + 8 + ... + 2^16
/// assert_eq!(max_length_for_budget(2, 100_000), 15);
/// assert_eq!(max_length_for_budget(1, 10), 11);
/// ```
pub fn max_length_for_budget(alphabet_size: usize, budget: usize) -> usize {
    assert!(alphabet_size > 0, "alphabet must not be empty");
    if alphabet_size == 1 {
        return budget.saturating_add(1);
    }

    let fits = |length: usize| {
        math::geometric_sum(alphabet_size, 2, length).is_some_and(|words| words <= budget)
    };

    let k = alphabet_size as f64;
    let estimate = (((budget as f64 + 1.0 + k) * (k - 1.0) + 1.0).log(k) - 1.0).floor();
    let mut length = if estimate.is_finite() && estimate >= 1.0 {
        estimate as usize
    } else {
        1
    };

    while length > 1 && !fits(length) {
        length -= 1;
    }
    while fits(length + 1) {
        length += 1;
    }
    length
}

/// Enumerates the words with a length in `lengths` in length-lexicographic order and returns the
/// first one on which `hypothesis` and `expected` disagree.
///
/// The current word is advanced like an odometer and the states reached on all of its prefixes
/// are kept, so moving to the next word only reruns the positions that changed. Over a single
/// symbol, every word extends the previous one and costs exactly one transition.
pub(crate) fn first_disagreement<A, F>(
    hypothesis: &DFA<A>,
    lengths: std::ops::RangeInclusive<usize>,
    mut expected: F,
) -> Option<Vec<A::Symbol>>
where
    A: Alphabet,
    F: FnMut(&[A::Symbol]) -> bool,
{
    let (shortest, longest) = lengths.into_inner();
    if shortest > longest {
        return None;
    }

    let symbols = hypothesis.alphabet().universe().collect_vec();
    let (Some(&first), Some(&last)) = (symbols.first(), symbols.last()) else {
        // only the empty word exists
        let disagrees = shortest == 0 && hypothesis.is_final(hypothesis.initial()) != expected(&[]);
        return disagrees.then(Vec::new);
    };

    let mut word = vec![first; shortest];
    let mut positions = vec![0usize; shortest];
    // reached[i] is the state reached on the first i symbols of word
    let mut reached = vec![hypothesis.initial()];
    trace!("comparing all words of length {shortest}");

    loop {
        while reached.len() <= word.len() {
            let i = reached.len() - 1;
            let next = hypothesis
                .transition(reached[i], word[i])
                .unwrap_or_else(|e| panic!("cannot run word through DFA: {e}"));
            reached.push(next);
        }
        if hypothesis.is_final(reached[word.len()]) != expected(word.as_slice()) {
            debug!("found disagreement on {}", word.as_string());
            return Some(word);
        }

        let mut position = word.len();
        loop {
            if position == 0 {
                if word.len() >= longest {
                    return None;
                }
                word.fill(first);
                positions.fill(0);
                word.push(first);
                positions.push(0);
                if first != last {
                    reached.truncate(1);
                }
                trace!("comparing all words of length {}", word.len());
                break;
            }
            position -= 1;
            if positions[position] + 1 < symbols.len() {
                positions[position] += 1;
                word[position] = symbols[positions[position]];
                reached.truncate(position + 1);
                break;
            }
            positions[position] = 0;
            word[position] = first;
        }
    }
}

/// Compares `hypothesis` with `oracle` on every word of length at most `max_length`, returning
/// the length-lexicographically smallest word on which they disagree. Unlike the search that
/// is performed during learning, short words are not skipped and no answers are cached.
///
/// # Example
/// ```
/// use automata::prelude::*;
/// use automata_learning::prelude::*;
///
/// let all = DFA::builder()
///     .with_transitions([(0, 'a', 0), (0, 'b', 0)])
///     .with_accepting([0])
///     .into_dfa(0)
///     .unwrap();
/// let no_b = FnOracle::new(|w: &[char]| !w.contains(&'b'));
/// assert_eq!(check_agreement(&all, &no_b, 3), Err(vec!['b']));
/// ```
pub fn check_agreement<A, O>(
    hypothesis: &DFA<A>,
    oracle: &O,
    max_length: usize,
) -> Result<(), Vec<A::Symbol>>
where
    A: Alphabet,
    O: Oracle<Symbol = A::Symbol>,
{
    match first_disagreement(hypothesis, 0..=max_length, |w| oracle.output(w)) {
        Some(word) => Err(word),
        None => Ok(()),
    }
}
