//! dropline search crate - windowed branch-and-bound planning over the piece queue.

mod config;
mod context;
mod error;
mod planner;
mod tree;

pub use config::{DepthWindow, HeuristicConfig, SearchConfig};
pub use context::{SearchContext, WindowStats};
pub use error::SearchError;
pub use planner::{solve, Planner, Solution, SolveStats};
pub use tree::{SearchNode, TreeBuilder, DEAD_END};
