//! Solution output: one `shape orientation column` line per committed move.

use std::io::{self, Write};

use dropline_eval::Move;
use dropline_search::Solution;

pub fn write_moves<W: Write>(out: &mut W, moves: &[Move]) -> io::Result<()> {
    for mv in moves {
        writeln!(out, "{}", mv.placement)?;
    }
    Ok(())
}

/// Human-readable summary printed by `--stats`.
pub fn format_stats(solution: &Solution) -> String {
    let board = &solution.board;
    let stats = &solution.stats;
    let search = &stats.search;
    format!(
        "pieces placed:          {}\n\
         final height:           {}\n\
         rows cleared:           {}\n\
         filled area:            {:.2}\n\
         gap area:               {:.2}\n\
         pieces on board:        {}\n\
         total cost:             {:.3}\n\
         windows searched:       {}\n\
         nodes built:            {}\n\
         leaves reached:         {}\n\
         pruned by depth window: {}\n\
         pruned by branch limit: {}\n\
         pruned by bound:        {}\n",
        solution.moves.len(),
        board.height(),
        stats.rows_cleared,
        board.filled_area(),
        board.count_gaps(),
        board.pieces().len(),
        stats.total_cost,
        stats.windows,
        search.nodes,
        search.leaves,
        search.pruned_by_depth_window,
        search.pruned_by_branch_limit,
        search.pruned_by_bound,
    )
}
