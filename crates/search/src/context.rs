//! Pruning state shared by every node of one window's tree.
//!
//! Costs are kept as `f64` bit patterns in atomics. Every update is a monotonic
//! min or max, so concurrent builders can only see a bound late, never wrong.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[inline]
fn load(cell: &AtomicU64) -> f64 {
    f64::from_bits(cell.load(Ordering::Acquire))
}

/// Lower `cell` to `value` if smaller. Returns the value now stored.
#[inline]
fn fetch_min(cell: &AtomicU64, value: f64) -> f64 {
    match cell.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
        (value < f64::from_bits(bits)).then_some(value.to_bits())
    }) {
        Ok(_) => value,
        Err(bits) => f64::from_bits(bits),
    }
}

/// Raise `cell` to `value` if larger. Returns the value now stored.
#[inline]
fn fetch_max(cell: &AtomicU64, value: f64) -> f64 {
    match cell.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
        (value > f64::from_bits(bits)).then_some(value.to_bits())
    }) {
        Ok(_) => value,
        Err(bits) => f64::from_bits(bits),
    }
}

/// Counters for one window, summed into the solve totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WindowStats {
    pub nodes: u64,
    pub leaves: u64,
    pub pruned_by_depth_window: u64,
    pub pruned_by_branch_limit: u64,
    pub pruned_by_bound: u64,
}

impl std::ops::AddAssign for WindowStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.pruned_by_depth_window += other.pruned_by_depth_window;
        self.pruned_by_branch_limit += other.pruned_by_branch_limit;
        self.pruned_by_bound += other.pruned_by_bound;
    }
}

pub struct SearchContext {
    best_leaf: AtomicU64,
    depth_best: Vec<AtomicU64>,
    depth_worst: Vec<AtomicU64>,
    nodes: AtomicU64,
    leaves: AtomicU64,
    pruned_by_depth_window: AtomicU64,
    pruned_by_branch_limit: AtomicU64,
    pruned_by_bound: AtomicU64,
}

impl SearchContext {
    /// Fresh bounds for a window of `depths` pieces.
    pub fn new(depths: usize) -> Self {
        Self {
            best_leaf: AtomicU64::new(f64::INFINITY.to_bits()),
            depth_best: (0..depths)
                .map(|_| AtomicU64::new(f64::INFINITY.to_bits()))
                .collect(),
            depth_worst: (0..depths)
                .map(|_| AtomicU64::new(f64::NEG_INFINITY.to_bits()))
                .collect(),
            nodes: AtomicU64::new(0),
            leaves: AtomicU64::new(0),
            pruned_by_depth_window: AtomicU64::new(0),
            pruned_by_branch_limit: AtomicU64::new(0),
            pruned_by_bound: AtomicU64::new(0),
        }
    }

    /// Cheapest complete path seen so far in this window.
    #[inline]
    pub fn best_leaf(&self) -> f64 {
        load(&self.best_leaf)
    }

    pub fn offer_leaf(&self, cumulative_cost: f64) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
        fetch_min(&self.best_leaf, cumulative_cost);
    }

    /// Fold one node's cheapest and dearest candidate into the trackers for
    /// `depth` and return the resulting `(best, worst)` at that depth.
    pub fn record_depth(&self, depth: usize, best: f64, worst: f64) -> (f64, f64) {
        match (self.depth_best.get(depth), self.depth_worst.get(depth)) {
            (Some(best_cell), Some(worst_cell)) => {
                (fetch_min(best_cell, best), fetch_max(worst_cell, worst))
            }
            _ => (best, worst),
        }
    }

    /// `(best, worst)` recorded at `depth`, infinite while nothing was seen.
    pub fn depth_extremes(&self, depth: usize) -> (f64, f64) {
        match (self.depth_best.get(depth), self.depth_worst.get(depth)) {
            (Some(best), Some(worst)) => (load(best), load(worst)),
            _ => (f64::INFINITY, f64::NEG_INFINITY),
        }
    }

    #[inline]
    pub fn count_node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_depth_window_prunes(&self, count: usize) {
        self.pruned_by_depth_window
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn count_branch_limit_prunes(&self, count: usize) {
        self.pruned_by_branch_limit
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn count_bound_prune(&self) {
        self.pruned_by_bound.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats {
            nodes: self.nodes.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            pruned_by_depth_window: self.pruned_by_depth_window.load(Ordering::Relaxed),
            pruned_by_branch_limit: self.pruned_by_branch_limit.load(Ordering::Relaxed),
            pruned_by_bound: self.pruned_by_bound.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_leaf_only_decreases() {
        let ctx = SearchContext::new(2);
        assert_eq!(ctx.best_leaf(), f64::INFINITY);
        ctx.offer_leaf(300.0);
        ctx.offer_leaf(320.0);
        assert_eq!(ctx.best_leaf(), 300.0);
        ctx.offer_leaf(-5.0);
        assert_eq!(ctx.best_leaf(), -5.0);
        assert_eq!(ctx.stats().leaves, 3);
    }

    #[test]
    fn test_depth_trackers_are_monotonic() {
        let ctx = SearchContext::new(2);
        assert_eq!(ctx.record_depth(0, 110.0, 150.0), (110.0, 150.0));
        assert_eq!(ctx.record_depth(0, 120.0, 140.0), (110.0, 150.0));
        assert_eq!(ctx.record_depth(0, 100.0, 190.0), (100.0, 190.0));
        assert_eq!(ctx.depth_extremes(1), (f64::INFINITY, f64::NEG_INFINITY));
        assert_eq!(ctx.depth_extremes(0), (100.0, 190.0));
    }

    #[test]
    fn test_out_of_range_depth_passes_through() {
        let ctx = SearchContext::new(1);
        assert_eq!(ctx.record_depth(4, 1.0, 2.0), (1.0, 2.0));
    }

    #[test]
    fn test_parallel_updates_keep_extremes() {
        use rayon::prelude::*;

        let ctx = SearchContext::new(1);
        (0..1000).into_par_iter().for_each(|i| {
            let cost = i as f64;
            ctx.record_depth(0, cost, cost);
            ctx.offer_leaf(cost + 10.0);
            ctx.count_node();
        });
        assert_eq!(ctx.depth_extremes(0), (0.0, 999.0));
        assert_eq!(ctx.best_leaf(), 10.0);
        assert_eq!(ctx.stats().nodes, 1000);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut total = WindowStats::default();
        total += WindowStats {
            nodes: 3,
            leaves: 1,
            pruned_by_depth_window: 2,
            pruned_by_branch_limit: 0,
            pruned_by_bound: 4,
        };
        total += WindowStats {
            nodes: 1,
            ..WindowStats::default()
        };
        assert_eq!(total.nodes, 4);
        assert_eq!(total.pruned_by_bound, 4);
    }
}
