use serde::{Deserialize, Serialize};

use crate::rank::RankPolicy;
use crate::sort::SortStrategy;

/// Knobs chosen once per invocation. Neither changes the final suffix array,
/// only how the intermediate steps look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub rank_policy: RankPolicy,
    pub sort_strategy: SortStrategy,
}

impl Config {
    pub fn with_rank_policy(mut self, rank_policy: RankPolicy) -> Self {
        self.rank_policy = rank_policy;
        self
    }

    pub fn with_sort_strategy(mut self, sort_strategy: SortStrategy) -> Self {
        self.sort_strategy = sort_strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dense_comparison() {
        let config = Config::default();
        assert_eq!(config.rank_policy, RankPolicy::Dense);
        assert_eq!(config.sort_strategy, SortStrategy::Comparison);
    }

    #[test]
    fn builders_override_one_field() {
        let config = Config::default().with_sort_strategy(SortStrategy::Bucket);
        assert_eq!(config.rank_policy, RankPolicy::Dense);
        assert_eq!(config.sort_strategy, SortStrategy::Bucket);

        let config = config.with_rank_policy(RankPolicy::CodePoint);
        assert_eq!(config.rank_policy, RankPolicy::CodePoint);
        assert_eq!(config.sort_strategy, SortStrategy::Bucket);
    }
}
