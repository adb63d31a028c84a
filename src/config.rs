//! Search configuration.

use std::fmt;
use std::time::Duration;

/// Which best-first variant to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// A* with a generated-set and path relaxation.
    AStar,
    /// A* without duplicate detection: every successor is a new node.
    LazyAStar,
    /// Greedy best-first: ordered by `h` only, first path to a state is kept.
    Greedy,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::AStar => "A*",
            Algorithm::LazyAStar => "lazy A*",
            Algorithm::Greedy => "greedy best-first",
        };
        f.write_str(name)
    }
}

/// Optional cutoffs, checked between iterations of the search loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expansions: Option<u64>,
    pub time_limit: Option<Duration>,
}

/// Tunables shared by every algorithm.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Multiplier applied to `h` in `key = g + weight * h`. Ignored by greedy search.
    pub weight: f64,
    pub limits: SearchLimits,
    /// Keep the key of every extracted node in the run statistics.
    pub record_keys: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            weight: 1.0,
            limits: SearchLimits::default(),
            record_keys: false,
        }
    }
}

impl SearchConfig {
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: u64) -> Self {
        self.limits.max_expansions = Some(max_expansions);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.limits.time_limit = Some(time_limit);
        self
    }

    pub fn with_key_recording(mut self, record_keys: bool) -> Self {
        self.record_keys = record_keys;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_plain_astar() {
        let config = SearchConfig::default();
        assert_eq!(config.weight, 1.0);
        assert_eq!(config.limits, SearchLimits::default());
        assert!(!config.record_keys);
    }

    #[test]
    fn test_builder_sets_limits() {
        let config = SearchConfig::default()
            .with_weight(2.5)
            .with_max_expansions(100)
            .with_time_limit(Duration::from_secs(3))
            .with_key_recording(true);
        assert_eq!(config.weight, 2.5);
        assert_eq!(config.limits.max_expansions, Some(100));
        assert_eq!(config.limits.time_limit, Some(Duration::from_secs(3)));
        assert!(config.record_keys);
    }
}
