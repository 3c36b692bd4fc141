mod input;
mod output;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dropline_core::{ShapeCatalog, ShapeSpec};
use dropline_engine::{Board, PieceQueue};
use dropline_search::{HeuristicConfig, Planner};
use log::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "dropline", version, about = "Plan where each queued piece should drop")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a queue file and print one `shape orientation column` line per piece
    Solve(SolveArgs),
    /// Print a shape catalog as JSON
    Shapes {
        #[arg(long, help = "Include the plus and ship shapes")]
        extended: bool,
    },
}

#[derive(Debug, Args)]
struct SolveArgs {
    #[arg(help = "Queue file; every digit is one shape id")]
    input: PathBuf,

    #[arg(help = "Where to write the moves (stdout if omitted)")]
    output: Option<PathBuf>,

    #[arg(long, help = "Print search and board statistics to stderr")]
    stats: bool,

    #[arg(long, help = "Worker threads for the tree search")]
    threads: Option<usize>,

    #[arg(long, default_value_t = 10, help = "Board width in columns (1..=32)")]
    width: u32,

    #[arg(long, help = "JSON file with weights and search settings")]
    config: Option<PathBuf>,

    #[arg(long, help = "JSON shape catalog replacing the built-in one")]
    shapes: Option<PathBuf>,

    #[arg(long, help = "Use the built-in catalog with the plus and ship shapes")]
    extended: bool,

    #[arg(long, help = "Pieces per search window")]
    lookahead: Option<usize>,

    #[arg(long, help = "Candidates expanded per node")]
    branches: Option<usize>,

    #[arg(long, help = "Moves committed per window")]
    step: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Solve(args) => solve(&args),
        Command::Shapes { extended } => {
            let catalog = builtin_catalog(extended);
            let json = serde_json::to_string_pretty(&catalog.specs())?;
            println!("{json}");
            Ok(())
        }
    }
}

fn builtin_catalog(extended: bool) -> ShapeCatalog {
    if extended {
        ShapeCatalog::extended()
    } else {
        ShapeCatalog::standard()
    }
}

fn load_catalog(path: &Path) -> Result<ShapeCatalog> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let specs: Vec<ShapeSpec> = serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("parsing shapes from {}", path.display()))?;
    let catalog = ShapeCatalog::from_specs(&specs)
        .with_context(|| format!("invalid shape in {}", path.display()))?;
    for id in catalog.ids() {
        if !catalog.is_valid(id) {
            warn!("shape {} has no colour; queued pieces of it will be skipped", id);
        }
    }
    Ok(catalog)
}

fn load_config(args: &SolveArgs) -> Result<HeuristicConfig> {
    let mut config = match &args.config {
        Some(path) => HeuristicConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => HeuristicConfig::default(),
    };
    if let Some(threads) = args.threads {
        config.search.threads = threads;
    }
    if let Some(lookahead) = args.lookahead {
        config.search.lookahead_distance = lookahead;
    }
    if let Some(branches) = args.branches {
        config.search.max_num_branches = branches;
    }
    if let Some(step) = args.step {
        config.search.step_distance = step;
    }
    Ok(config)
}

fn solve(args: &SolveArgs) -> Result<()> {
    let catalog = match &args.shapes {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog(args.extended),
    };
    let shapes = input::read_queue(&args.input, &catalog)?;
    let queue = PieceQueue::from_shapes(&catalog, &shapes)?;
    let board = Board::new(args.width)?;
    let planner = Planner::new(load_config(args)?)?;
    info!(
        "solving {} pieces on a board {} wide",
        queue.len(),
        board.width()
    );

    let solution = planner.solve(board, &queue)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            output::write_moves(&mut out, &solution.moves)
                .and_then(|_| out.flush())
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let mut out = io::stdout().lock();
            output::write_moves(&mut out, &solution.moves)?;
        }
    }

    if args.stats {
        eprint!("{}", output::format_stats(&solution));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_solve() {
        let cli = Cli::try_parse_from([
            "dropline", "solve", "queue.txt", "out.txt", "--stats", "--threads", "4", "--width",
            "6",
        ])
        .expect("valid arguments");
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.input, PathBuf::from("queue.txt"));
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
        assert!(args.stats);
        assert_eq!(args.threads, Some(4));
        assert_eq!(args.width, 6);
    }

    #[test]
    fn test_overrides_apply_to_default_config() {
        let cli = Cli::try_parse_from([
            "dropline",
            "solve",
            "queue.txt",
            "--lookahead",
            "2",
            "--branches",
            "8",
            "--step",
            "2",
        ])
        .expect("valid arguments");
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.width, 10);
        let config = load_config(&args).expect("no file to read");
        assert_eq!(config.search.lookahead_distance, 2);
        assert_eq!(config.search.max_num_branches, 8);
        assert_eq!(config.search.step_distance, 2);
        assert_eq!(config.search.threads, 1);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
