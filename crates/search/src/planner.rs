//! Windowed planning: build a tree over the next few pieces, commit the first
//! moves of its best path, slide the window and repeat.

use dropline_engine::{apply_placement, Board, PieceQueue};
use dropline_eval::Move;
use log::{debug, info, trace, warn};
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::{HeuristicConfig, SearchContext, SearchError, TreeBuilder, WindowStats};

/// Totals over a whole solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SolveStats {
    pub windows: u64,
    #[serde(flatten)]
    pub search: WindowStats,
    pub rows_cleared: u64,
    pub total_cost: f64,
}

/// Committed moves in queue order and the board they produce.
#[derive(Clone, Debug)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub board: Board,
    pub stats: SolveStats,
}

pub struct Planner {
    config: HeuristicConfig,
}

impl Planner {
    pub fn new(config: HeuristicConfig) -> Result<Self, SearchError> {
        config.search.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Place every remaining piece of `queue` on `board`.
    pub fn solve(&self, board: Board, queue: &PieceQueue) -> Result<Solution, SearchError> {
        let threads = self.config.search.threads;
        if threads > 1 {
            let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
            debug!("searching on {} threads", threads);
            pool.install(|| self.run(board, queue.clone()))
        } else {
            self.run(board, queue.clone())
        }
    }

    fn run(&self, mut board: Board, mut queue: PieceQueue) -> Result<Solution, SearchError> {
        let search = &self.config.search;
        let mut moves = Vec::with_capacity(queue.remaining().len());
        let mut stats = SolveStats::default();

        while !queue.remaining().is_empty() {
            let finishing = queue.remaining().len() <= search.lookahead_distance;
            let window = queue.window(search.lookahead_distance);
            let step = if finishing {
                window.len()
            } else {
                search.step_distance.min(window.len())
            };

            let context = SearchContext::new(window.len());
            let root = TreeBuilder::new(&self.config.weights, search, window, &context)
                .starting_at(moves.len())
                .build_root(&board);
            let window_stats = context.stats();
            stats.windows += 1;
            stats.search += window_stats;
            debug!(
                "window of {} at piece {}: {} nodes, {} leaves, best {:.3}{}",
                window.len(),
                window[0].id(),
                window_stats.nodes,
                window_stats.leaves,
                root.best_cost,
                if finishing { " (final)" } else { "" }
            );

            for depth in 0..window.len() {
                let (best, worst) = context.depth_extremes(depth);
                trace!("depth {} candidate costs {:.3}..{:.3}", depth, best, worst);
            }

            if root.is_dead_end() {
                warn!("no complete path from piece {}", window[0].id());
                return Err(SearchError::NoPlacement {
                    piece: window[0].id(),
                });
            }
            let line = root.best_line(step);
            let path: Vec<Move> = line.iter().filter_map(|node| node.mv).collect();

            for (mv, piece) in path.iter().zip(window) {
                let cleared = apply_placement(&mut board, piece, &mv.placement)?;
                stats.rows_cleared += cleared as u64;
                stats.total_cost += mv.cost;
                info!(
                    "piece {} -> shape {} rotation {} column {} (cost {:.3}, cleared {})",
                    piece.id(),
                    mv.placement.shape,
                    mv.placement.rotation.index(),
                    mv.placement.column,
                    mv.cost,
                    cleared
                );
            }
            debug_assert_eq!(line.last().map(|node| &node.board), Some(&board));
            trace!("board after window:\n{}", board);

            moves.extend_from_slice(&path);
            queue.advance(path.len());
        }

        info!(
            "placed {} pieces in {} windows, final height {}",
            moves.len(),
            stats.windows,
            board.height()
        );
        Ok(Solution {
            moves,
            board,
            stats,
        })
    }
}

/// One-shot [`Planner::solve`].
pub fn solve(
    board: Board,
    queue: &PieceQueue,
    config: HeuristicConfig,
) -> Result<Solution, SearchError> {
    Planner::new(config)?.solve(board, queue)
}
