//! Pruned branch-and-bound tree over one lookahead window.

use dropline_core::Piece;
use dropline_engine::Board;
use dropline_eval::{evaluate_all, EvalWeights, Evaluation, Move};
use log::trace;
use rayon::prelude::*;

use crate::{SearchConfig, SearchContext};

/// Best-achievable cost of a node with no complete path below it.
pub const DEAD_END: f64 = f64::INFINITY;

#[derive(Clone, Debug)]
pub struct SearchNode {
    /// move that led here; `None` at the root
    pub mv: Option<Move>,
    /// board after `mv`
    pub board: Board,
    /// pieces committed before the window plus pieces assumed down to here
    pub depth: usize,
    pub cumulative_cost: f64,
    /// cheapest leaf cost reachable through this node, or [`DEAD_END`]
    pub best_cost: f64,
    pub children: Vec<SearchNode>,
    /// index into `children` of the first child with minimal finite `best_cost`
    pub best_child: Option<usize>,
}

impl SearchNode {
    pub fn is_dead_end(&self) -> bool {
        self.best_cost == DEAD_END
    }

    /// Nodes along the `best_child` chain below this one, at most `max_len`.
    pub fn best_line(&self, max_len: usize) -> Vec<&SearchNode> {
        let mut line = Vec::new();
        let mut node = self;
        while line.len() < max_len {
            let Some(index) = node.best_child else {
                break;
            };
            node = &node.children[index];
            line.push(node);
        }
        line
    }

    /// Moves along the `best_child` chain, at most `max_len` of them.
    pub fn best_path(&self, max_len: usize) -> Vec<Move> {
        self.best_line(max_len)
            .into_iter()
            .filter_map(|node| node.mv)
            .collect()
    }
}

pub struct TreeBuilder<'a> {
    weights: &'a EvalWeights,
    config: &'a SearchConfig,
    window: &'a [Piece],
    context: &'a SearchContext,
    committed: usize,
    parallel: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        weights: &'a EvalWeights,
        config: &'a SearchConfig,
        window: &'a [Piece],
        context: &'a SearchContext,
    ) -> Self {
        Self {
            weights,
            config,
            window,
            context,
            committed: 0,
            parallel: config.threads > 1,
        }
    }

    /// Count node depths from `committed` pieces placed before this window.
    pub fn starting_at(mut self, committed: usize) -> Self {
        self.committed = committed;
        self
    }

    pub fn build_root(&self, board: &Board) -> SearchNode {
        self.build(board.clone(), 0, 0.0, None)
    }

    /// `level` indexes the window; the node's `depth` adds the committed offset.
    fn build(
        &self,
        board: Board,
        level: usize,
        cumulative_cost: f64,
        mv: Option<Move>,
    ) -> SearchNode {
        self.context.count_node();
        let depth = self.committed + level;

        let Some(piece) = self.window.get(level) else {
            self.context.offer_leaf(cumulative_cost);
            return SearchNode {
                mv,
                board,
                depth,
                cumulative_cost,
                best_cost: cumulative_cost,
                children: Vec::new(),
                best_child: None,
            };
        };

        let candidates = self.candidates(&board, piece, level);
        trace!(
            "depth {} piece {} at cost {:.3}: {} candidates",
            depth,
            piece.id(),
            cumulative_cost,
            candidates.len()
        );

        let expand = |eval: Evaluation| {
            let total = cumulative_cost + eval.mv.cost;
            if total >= self.context.best_leaf() {
                self.context.count_bound_prune();
                return None;
            }
            Some(self.build(eval.board, level + 1, total, Some(eval.mv)))
        };
        let children: Vec<SearchNode> = if self.parallel {
            candidates.into_par_iter().filter_map(&expand).collect()
        } else {
            candidates.into_iter().filter_map(&expand).collect()
        };

        let mut best_child = None;
        let mut best_cost = DEAD_END;
        for (index, child) in children.iter().enumerate() {
            if child.best_cost < best_cost {
                best_cost = child.best_cost;
                best_child = Some(index);
            }
        }

        SearchNode {
            mv,
            board,
            depth,
            cumulative_cost,
            best_cost,
            children,
            best_child,
        }
    }

    /// Scored placements of `piece` that survive depth-window and branch-limit
    /// pruning, cheapest first.
    fn candidates(&self, board: &Board, piece: &Piece, level: usize) -> Vec<Evaluation> {
        let mut evaluations = evaluate_all(board, piece, self.weights);
        if evaluations.is_empty() {
            return evaluations;
        }

        if let Some(window) = &self.config.depth_window {
            let cheapest = evaluations[0].mv.cost;
            let dearest = evaluations[evaluations.len() - 1].mv.cost;
            let (best, worst) = self.context.record_depth(level, cheapest, dearest);
            let upper = window.upper_bound(best, worst);
            let before = evaluations.len();
            evaluations.retain(|e| e.mv.cost >= best && e.mv.cost <= upper);
            self.context
                .count_depth_window_prunes(before - evaluations.len());
        }

        if evaluations.len() > self.config.max_num_branches {
            self.context
                .count_branch_limit_prunes(evaluations.len() - self.config.max_num_branches);
            evaluations.truncate(self.config.max_num_branches);
        }
        evaluations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepthWindow;
    use dropline_core::{PieceId, ShapeCatalog, ShapeId};
    use dropline_engine::apply_placement;

    fn pieces(shapes: &[u16]) -> Vec<Piece> {
        let catalog = ShapeCatalog::standard();
        shapes
            .iter()
            .enumerate()
            .map(|(i, &s)| catalog.spawn(ShapeId(s), PieceId(i as u32)).expect("standard"))
            .collect()
    }

    fn subtree_size(node: &SearchNode) -> usize {
        1 + node.children.iter().map(subtree_size).sum::<usize>()
    }

    fn build(
        board: &Board,
        window: &[Piece],
        config: &SearchConfig,
    ) -> (SearchNode, SearchContext) {
        let weights = EvalWeights::default();
        let context = SearchContext::new(window.len());
        let root = TreeBuilder::new(&weights, config, window, &context).build_root(board);
        (root, context)
    }

    #[test]
    fn test_single_piece_tree_picks_cheapest() {
        let board = Board::new(4).expect("width");
        let window = pieces(&[1]);
        let config = SearchConfig {
            depth_window: None,
            max_num_branches: usize::MAX,
            ..SearchConfig::default()
        };
        let (root, ctx) = build(&board, &window, &config);
        let cheapest = evaluate_all(&board, &window[0], &EvalWeights::default())[0].mv;
        assert_eq!(root.best_cost, cheapest.cost);
        assert_eq!(root.best_path(5), vec![cheapest]);
        assert_eq!(ctx.best_leaf(), cheapest.cost);
        // the flat bar clears the row, every other placement is pruned by the bound
        assert_eq!(cheapest.stats.rows_removed, 1);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_branch_limit_caps_children() {
        let board = Board::new(6).expect("width");
        let window = pieces(&[3, 5]);
        let config = SearchConfig {
            depth_window: None,
            max_num_branches: 2,
            ..SearchConfig::default()
        };
        let (root, ctx) = build(&board, &window, &config);
        assert!(root.children.len() <= 2);
        assert!(root.children.iter().all(|c| c.children.len() <= 2));
        assert!(ctx.stats().pruned_by_branch_limit > 0);
        assert_eq!(ctx.stats().nodes as usize, subtree_size(&root));
    }

    #[test]
    fn test_leaf_costs_are_cumulative() {
        let board = Board::new(6).expect("width");
        let window = pieces(&[2, 2]);
        let (root, _) = build(&board, &window, &SearchConfig::default());
        let path = root.best_path(2);
        assert_eq!(path.len(), 2);
        let total: f64 = path.iter().map(|m| m.cost).sum();
        assert!((total - root.best_cost).abs() < 1e-9);
        assert!(!root.is_dead_end());
    }

    #[test]
    fn test_unplaceable_piece_is_dead_end() {
        // the plus is three wide in every rotation
        let board = Board::new(2).expect("width");
        let catalog = ShapeCatalog::extended();
        let window = vec![catalog.spawn(ShapeId(8), PieceId(0)).expect("plus")];
        let (root, ctx) = build(&board, &window, &SearchConfig::default());
        assert!(root.is_dead_end());
        assert!(root.best_child.is_none());
        assert!(root.best_path(1).is_empty());
        assert_eq!(ctx.stats().leaves, 0);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let board = Board::new(6).expect("width");
        let window = pieces(&[5, 4, 2]);
        // depth-window extremes depend on visit order, so compare without them
        let sequential = SearchConfig {
            depth_window: None,
            ..SearchConfig::default()
        };
        let parallel = SearchConfig {
            threads: 4,
            ..sequential.clone()
        };
        let (a, _) = build(&board, &window, &sequential);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .expect("thread pool");
        let (b, _) = pool.install(|| build(&board, &window, &parallel));
        assert_eq!(a.best_cost, b.best_cost);
    }

    #[test]
    fn test_depth_window_shares_extremes_between_siblings() {
        let window = pieces(&[3]);
        let depth_window = DepthWindow {
            minimum_diff: 2.0,
            maximum_percentage: 0.25,
        };
        let config = SearchConfig {
            depth_window: Some(depth_window),
            max_num_branches: usize::MAX,
            ..SearchConfig::default()
        };
        let weights = EvalWeights::default();
        let narrow = Board::new(3).expect("width");
        let wide = Board::new(6).expect("width");

        let context = SearchContext::new(1);
        let builder = TreeBuilder::new(&weights, &config, &window, &context);

        // a flat T clears the narrow board's row, upright ones stand three high
        let all = evaluate_all(&narrow, &window[0], &weights);
        let kept = builder.candidates(&narrow, &window[0], 0);
        let (best, worst) = context.depth_extremes(0);
        assert_eq!(best, all[0].mv.cost);
        assert_eq!(worst, all[all.len() - 1].mv.cost);
        let upper = depth_window.upper_bound(best, worst);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.mv.cost >= best && e.mv.cost <= upper));
        assert_eq!(context.stats().pruned_by_depth_window, 4);

        // on the wide board every placement is dearer than the narrow board's
        // window allows
        let wide_all = evaluate_all(&wide, &window[0], &weights);
        assert!(wide_all[0].mv.cost > upper);
        assert!(builder.candidates(&wide, &window[0], 0).is_empty());
        assert_eq!(context.depth_extremes(0), (best, worst));
        assert_eq!(
            context.stats().pruned_by_depth_window,
            4 + wide_all.len() as u64
        );

        // alone, the wide board keeps its cheapest flat placements
        let fresh = SearchContext::new(1);
        let alone = TreeBuilder::new(&weights, &config, &window, &fresh)
            .candidates(&wide, &window[0], 0);
        assert_eq!(alone.len(), 4);
        let (wide_best, wide_worst) = fresh.depth_extremes(0);
        let wide_upper = depth_window.upper_bound(wide_best, wide_worst);
        assert!(alone
            .iter()
            .all(|e| e.mv.cost >= wide_best && e.mv.cost <= wide_upper));
    }

    #[test]
    fn test_nodes_carry_board_and_queue_depth() {
        let board = Board::new(6).expect("width");
        let window = pieces(&[5, 4]);
        let weights = EvalWeights::default();
        let config = SearchConfig::default();
        let context = SearchContext::new(window.len());
        let root = TreeBuilder::new(&weights, &config, &window, &context)
            .starting_at(7)
            .build_root(&board);
        assert_eq!(root.depth, 7);
        assert_eq!(root.board, board);

        let line = root.best_line(2);
        assert_eq!(line.len(), 2);
        let mut replay = board.clone();
        for (offset, (node, piece)) in line.iter().zip(&window).enumerate() {
            assert_eq!(node.depth, 8 + offset);
            let mv = node.mv.expect("child has a move");
            apply_placement(&mut replay, piece, &mv.placement).expect("fits");
            assert_eq!(node.board, replay);
        }
        assert_eq!(root.best_path(2).len(), 2);
    }
}
