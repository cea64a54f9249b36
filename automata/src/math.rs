use std::collections::{BTreeMap, BTreeSet};

pub use indexmap::map;
pub use indexmap::set;

/// Type alias for sets that are iterated in insertion order. We use this to hide which type of
/// set we are actually using.
pub type Set<S> = indexmap::IndexSet<S>;
/// Type alias for maps that are iterated in insertion order.
pub type Map<K, V> = indexmap::IndexMap<K, V>;

/// Type alias for sets whose elements are kept sorted.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for maps whose keys are kept sorted.
pub type OrderedMap<K, V> = BTreeMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// Computes the sum of `base^x` for all exponents `x` in the (inclusive) range `from..=to`. Returns
/// `None` if the sum does not fit into a `usize`. An empty range sums to zero.
///
/// # Example
/// ```
/// use automata::math::geometric_sum;
/// assert_eq!(geometric_sum(2, 2, 4), Some(4 + 8 + 16));
/// assert_eq!(geometric_sum(3, 2, 1), Some(0));
/// ```
pub fn geometric_sum(base: usize, from: usize, to: usize) -> Option<usize> {
    (from..=to).try_fold(0usize, |acc, exponent| {
        let exponent = u32::try_from(exponent).ok()?;
        acc.checked_add(base.checked_pow(exponent)?)
    })
}

#[cfg(test)]
mod tests {
    use super::geometric_sum;

    #[test]
    fn geometric_sums() {
        assert_eq!(geometric_sum(2, 2, 15), Some((1 << 16) - 4));
        assert_eq!(geometric_sum(1, 2, 11), Some(10));
        assert_eq!(geometric_sum(5, 0, 0), Some(1));
        assert_eq!(geometric_sum(usize::MAX, 2, 2), None);
    }
}
