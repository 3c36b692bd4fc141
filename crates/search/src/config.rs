//! Search and heuristic configuration, loadable from JSON.

use std::fs;
use std::path::Path;

use dropline_eval::EvalWeights;
use serde::{Deserialize, Serialize};

use crate::SearchError;

/// Depth-local acceptance window. At each depth only candidates costing at most
/// `max(best + minimum_diff, best + (worst - best) * maximum_percentage)` survive,
/// where best/worst are the extremes seen at that depth so far in the window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthWindow {
    pub minimum_diff: f64,
    pub maximum_percentage: f64,
}

impl DepthWindow {
    /// Highest accepted cost for the given extremes.
    #[inline]
    pub fn upper_bound(&self, best: f64, worst: f64) -> f64 {
        (best + self.minimum_diff).max(best + (worst - best) * self.maximum_percentage)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// pieces considered per tree build
    pub lookahead_distance: usize,
    /// moves committed per window, unless the window reaches the end of the queue
    pub step_distance: usize,
    /// cheapest candidates expanded per node
    pub max_num_branches: usize,
    /// `None` disables depth-local pruning
    pub depth_window: Option<DepthWindow>,
    /// worker threads for sibling expansion; 1 builds sequentially
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lookahead_distance: 3,
            step_distance: 1,
            max_num_branches: 4,
            depth_window: Some(DepthWindow {
                minimum_diff: 25.0,
                maximum_percentage: 0.5,
            }),
            threads: 1,
        }
    }
}

impl SearchConfig {
    /// Whole queue in one window, no pruning except branch-and-bound.
    pub fn exhaustive() -> Self {
        Self {
            lookahead_distance: usize::MAX,
            step_distance: usize::MAX,
            max_num_branches: usize::MAX,
            depth_window: None,
            threads: 1,
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.lookahead_distance == 0 {
            return Err(SearchError::InvalidConfig("lookahead_distance must be at least 1"));
        }
        if self.step_distance == 0 {
            return Err(SearchError::InvalidConfig("step_distance must be at least 1"));
        }
        if self.max_num_branches == 0 {
            return Err(SearchError::InvalidConfig("max_num_branches must be at least 1"));
        }
        if self.threads == 0 {
            return Err(SearchError::InvalidConfig("threads must be at least 1"));
        }
        if let Some(window) = &self.depth_window {
            if window.minimum_diff < 0.0 || window.maximum_percentage < 0.0 {
                return Err(SearchError::InvalidConfig(
                    "depth_window bounds must be non-negative",
                ));
            }
        }
        Ok(())
    }
}

/// Everything the planner needs besides the board and the queue.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub weights: EvalWeights,
    pub search: SearchConfig,
}

impl HeuristicConfig {
    pub fn exhaustive() -> Self {
        Self {
            weights: EvalWeights::default(),
            search: SearchConfig::exhaustive(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SearchError> {
        let config: Self = serde_json::from_str(json)?;
        config.search.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
