use tracing::warn;

/// Environment variable overriding [`LStarConfig::query_budget`].
pub const QUERY_BUDGET_VAR: &str = "LSTAR_QUERY_BUDGET";
/// Environment variable overriding [`LStarConfig::max_length`].
pub const MAX_LENGTH_VAR: &str = "LSTAR_MAX_LENGTH";

const DEFAULT_QUERY_BUDGET: usize = 100_000;

/// Configures how thoroughly a hypothesis is tested before it is accepted.
///
/// Since there is no equivalence oracle, a hypothesis is compared against the membership
/// oracle on all words up to some length. That length is derived from the query budget,
/// which bounds the number of words compared per hypothesis, and can be tightened further
/// by an explicit maximal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LStarConfig {
    query_budget: usize,
    max_length: Option<usize>,
}

impl Default for LStarConfig {
    fn default() -> Self {
        Self {
            query_budget: DEFAULT_QUERY_BUDGET,
            max_length: None,
        }
    }
}

impl LStarConfig {
    /// Starts from the default configuration and applies the overrides given in the
    /// environment variables `LSTAR_QUERY_BUDGET` and `LSTAR_MAX_LENGTH`. Values that
    /// cannot be parsed are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`LStarConfig::from_env`], but reads the variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(budget) = read_var(&lookup, QUERY_BUDGET_VAR) {
            config.query_budget = budget;
        }
        if let Some(length) = read_var(&lookup, MAX_LENGTH_VAR) {
            config.max_length = Some(length);
        }
        config
    }

    pub fn with_query_budget(mut self, budget: usize) -> Self {
        self.query_budget = budget;
        self
    }

    pub fn with_max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Upper bound on the number of words that are compared when testing one hypothesis.
    pub fn query_budget(&self) -> usize {
        self.query_budget
    }

    /// Explicit cap on the length of words compared when testing a hypothesis, if any.
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }
}

fn read_var<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<usize> {
    let value = lookup(name)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("ignoring value {value:?} of {name}: {e}");
            None
        }
    }
}
