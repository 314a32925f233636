use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    time::Instant,
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use slider_puzzle::{input::resolve_target, report, Move, Position, Puzzle, PuzzleInput};

#[derive(Parser, Debug)]
#[command(
    name = "slider-puzzle",
    version,
    about = "Find a shortest solution for a sliding-tile puzzle"
)]
struct Cli {
    /// Puzzle file (tile count, blank target or -1, then the board); stdin if omitted
    #[arg(value_name = "FILE", conflicts_with = "random")]
    input: Option<PathBuf>,
    /// Solve a random solvable K×K board instead of reading one
    #[arg(long, value_name = "K")]
    random: Option<usize>,
    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,
    /// Goal cell of the blank for --random (-1 for the last cell, the default)
    #[arg(long, value_name = "IDX", allow_hyphen_values = true, requires = "random")]
    target: Option<i64>,
    /// Print every intermediate board after the move list
    #[arg(long)]
    show: bool,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load(cli: &Cli) -> Result<Puzzle> {
    if let Some(size) = cli.random {
        ensure!(size > 0, "board size must be positive");
        let target = resolve_target(cli.target.unwrap_or(-1), size * size)?;
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut puzzle = Puzzle::solved(size, target);
        puzzle.shuffle(&mut rng);
        return Ok(puzzle);
    }

    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };
    let input: PuzzleInput = text.parse().context("malformed puzzle")?;
    Ok(input.into_puzzle())
}

/// Board with `highlight` drawn in bold.
fn render(puzzle: &Puzzle, highlight: Position) -> String {
    let width = (puzzle.size() * puzzle.size() - 1).to_string().len();
    let mut out = String::new();
    for (row, cells) in puzzle.board().iter().enumerate() {
        for (col, &val) in cells.iter().enumerate() {
            let cell = if val == 0 {
                format!("{:>width$}", "")
            } else {
                format!("{:>width$}", val)
            };
            if (Position { row, col }) == highlight {
                out.push_str(&cell.as_str().bold().yellow().to_string());
            } else {
                out.push_str(&cell);
            }
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn replay(mut puzzle: Puzzle, moves: &[Move]) {
    for &item in moves {
        let moved = puzzle.blank();
        puzzle.apply_move(item);
        println!("{}\n{}", item, render(&puzzle, moved));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let puzzle = load(&cli)?;
    debug!(size = puzzle.size(), target = puzzle.target(), "initial board:\n{}", puzzle);

    let start = Instant::now();
    let solution = puzzle.try_solve();
    info!(elapsed_s = start.elapsed().as_secs_f64(), "search finished");

    print!("{}", report(solution.as_ref()));

    if let Some(solution) = solution.filter(|_| cli.show) {
        println!();
        replay(puzzle, &solution.moves);
    }
    Ok(())
}
