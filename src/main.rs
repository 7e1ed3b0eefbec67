//! # csp-solver
//!
//! `csp-solver` is a configurable command-line Sudoku solver. It models each
//! puzzle as a constraint-satisfaction problem and completes it with a
//! backtracking search over per-cell candidate domains.
//!
//! ## Features
//!
//! -   **Line-per-puzzle input**: puzzle files and inline text hold one grid
//!     per line as 81 digit characters, 0 for an unknown cell.
//! -   **Configurable search**: variable selection (`first-unbound` or
//!     `min-remaining`) and propagation (`forward-checking` or `none`) are
//!     chosen per run.
//! -   **Verification**: each reported solution can be checked against the
//!     all-different rules and the original givens.
//! -   **Statistics**: parse and solve timings, decision / propagation /
//!     backtrack counts, and memory usage via `tikv-jemallocator`.
//!
//! ## Usage
//!
//! ```sh
//! # Solve every puzzle in a file
//! csp-solver puzzles.txt
//!
//! # The same, spelled out
//! csp-solver file --path puzzles.txt
//!
//! # Solve a puzzle given inline
//! csp-solver text --input "530070000600195000098000060800060003400803001700020006060000280000419005000080079"
//!
//! # Try the narrowest-domain heuristic
//! csp-solver file --path puzzles.txt --selection min-remaining
//!
//! # Generate shell completion scripts
//! csp-solver completions bash
//! ```
//!
//! Each solved grid is printed as `side` lines of digits followed by a blank
//! line. A puzzle with no completion is reported and echoed back unchanged.

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use csp_solver::csp::propagation::NoPropagation;
use csp_solver::csp::search::Backtracker;
use csp_solver::csp::selection::MinimumRemaining;
use csp_solver::csp::solver::{DefaultConfig, SearchStats, Solver, SolverConfig};
use csp_solver::csp::state::PuzzleState;
use csp_solver::sudoku::solver::{Board, Sudoku, parse_sudoku_file, parse_sudokus};
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use tikv_jemalloc_ctl::{epoch, stats};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Defines the command-line interface for the solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "csp-solver", version, about = "A CSP-based Sudoku solver")]
struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle file to solve.
    #[arg(global = true)]
    path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`).
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    common: CommonOptions,
}

/// Enumerates the available subcommands for the solver.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve puzzles from a file, one per line.
    File {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve puzzles provided as plain text, one per line.
    Text {
        /// Literal puzzle input: digit characters, 0 for an unknown cell.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
struct CommonOptions {
    /// Enable verification of each solution against the all-different rules
    /// and the original givens.
    #[arg(short, long, default_value_t = true)]
    verify: bool,

    /// Enable printing of performance and search statistics after solving.
    #[arg(short, long, default_value_t = true)]
    stats: bool,

    /// Variable selection heuristic.
    #[arg(long, value_enum, default_value_t = SelectionType::FirstUnbound)]
    selection: SelectionType,

    /// Propagation strategy.
    #[arg(long, value_enum, default_value_t = PropagationType::ForwardChecking)]
    propagation: PropagationType,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SelectionType {
    /// First not-yet-fixed cell in index order.
    #[default]
    FirstUnbound,
    /// Unfixed cell with the fewest remaining candidates.
    MinRemaining,
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstUnbound => write!(f, "first-unbound"),
            Self::MinRemaining => write!(f, "min-remaining"),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum PropagationType {
    /// Remove each assigned value from the domains of its peers.
    #[default]
    ForwardChecking,
    /// No pruning; the search relies on the consistency check alone.
    None,
}

impl fmt::Display for PropagationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForwardChecking => write!(f, "forward-checking"),
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MinRemainingConfig;

impl SolverConfig for MinRemainingConfig {
    type Selector = MinimumRemaining;
    type Propagator = csp_solver::csp::propagation::ForwardChecking;
}

#[derive(Debug, Clone, Copy)]
struct UncheckedConfig;

impl SolverConfig for UncheckedConfig {
    type Selector = csp_solver::csp::selection::FirstUnbound;
    type Propagator = NoPropagation;
}

#[derive(Debug, Clone, Copy)]
struct MinRemainingUncheckedConfig;

impl SolverConfig for MinRemainingUncheckedConfig {
    type Selector = MinimumRemaining;
    type Propagator = NoPropagation;
}

/// Main entry point of the solver application.
///
/// Parses command-line arguments, dispatches to the appropriate command
/// handler, and manages the overall execution flow.
fn main() {
    let cli = Cli::parse();

    // A path without a subcommand defaults to solving a puzzle file.
    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            let time = std::time::Instant::now();
            let sudokus = parse_sudoku_file(&path)
                .unwrap_or_else(|e| panic!("Failed to parse file {}: {e}", path.display()));
            solve_and_report(&sudokus, &cli.common, time.elapsed());
            return;
        }
    }

    match cli.command {
        Some(Commands::File { path, common }) => {
            let time = std::time::Instant::now();
            let sudokus = parse_sudoku_file(&path)
                .unwrap_or_else(|e| panic!("Failed to parse file {}: {e}", path.display()));
            solve_and_report(&sudokus, &common, time.elapsed());
        }

        Some(Commands::Text { input, common }) => {
            let time = std::time::Instant::now();
            let sudokus = parse_sudokus(Cursor::new(input))
                .unwrap_or_else(|e| panic!("Failed to parse input: {e}"));
            solve_and_report(&sudokus, &common, time.elapsed());
        }

        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "csp-solver", &mut std::io::stdout());
        }

        None => {
            // Reached if no subcommand was provided and `cli.path` was also None.
            if cli.path.is_none() {
                eprintln!("No command provided. Use --help for more information.");
                std::process::exit(1);
            }
        }
    }
}

/// Solves each puzzle, prints the resulting grids, and reports verification
/// and statistics according to `common`.
fn solve_and_report(sudokus: &[Sudoku], common: &CommonOptions, parse_time: Duration) {
    for sudoku in sudokus {
        let (solved, elapsed, search_stats) = solve_with_options(sudoku, common);

        // Advance epoch so the memory stats reflect the solving phase.
        epoch::advance().unwrap();
        let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
        let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
        #[allow(clippy::cast_precision_loss)]
        let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
        #[allow(clippy::cast_precision_loss)]
        let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

        match &solved {
            Some(solution) => {
                if common.verify {
                    let ok = solution.is_solved_grid() && keeps_givens(sudoku, solution);
                    println!("Verified: {ok}");
                    assert!(ok, "Solution failed verification!");
                }
                println!("{solution}");
            }
            None => {
                println!("No solution found");
                println!("{sudoku}");
            }
        }
        println!();

        if common.stats {
            print_stats(
                parse_time,
                elapsed,
                &search_stats,
                allocated_mib,
                resident_mib,
            );
        }
    }
}

/// Dispatches to the solver configuration selected on the command line.
fn solve_with_options(
    sudoku: &Sudoku,
    common: &CommonOptions,
) -> (Option<Sudoku>, Duration, SearchStats) {
    match (common.selection, common.propagation) {
        (SelectionType::FirstUnbound, PropagationType::ForwardChecking) => {
            solve_puzzle::<DefaultConfig>(sudoku)
        }
        (SelectionType::FirstUnbound, PropagationType::None) => {
            solve_puzzle::<UncheckedConfig>(sudoku)
        }
        (SelectionType::MinRemaining, PropagationType::ForwardChecking) => {
            solve_puzzle::<MinRemainingConfig>(sudoku)
        }
        (SelectionType::MinRemaining, PropagationType::None) => {
            solve_puzzle::<MinRemainingUncheckedConfig>(sudoku)
        }
    }
}

/// Solves one puzzle under `Config`, reporting the elapsed time and search
/// statistics alongside the result.
fn solve_puzzle<Config: SolverConfig>(
    sudoku: &Sudoku,
) -> (Option<Sudoku>, Duration, SearchStats) {
    epoch::advance().unwrap();

    let time = std::time::Instant::now();

    let state = PuzzleState::from_digits(sudoku.size.block_size(), sudoku.board.digits())
        .expect("parsed boards are validated");
    let mut solver: Backtracker<Config> = Solver::new(state);
    let solution = solver.solve();

    let elapsed = time.elapsed();

    let solved = solution.map(|digits| Sudoku {
        board: Board::new(digits),
        size: sudoku.size,
    });

    (solved, elapsed, solver.stats())
}

/// True iff every nonzero cell of `puzzle` kept its digit in `solution`.
fn keeps_givens(puzzle: &Sudoku, solution: &Sudoku) -> bool {
    puzzle
        .board
        .digits()
        .iter()
        .zip(solution.board.digits())
        .all(|(&given, &digit)| given == 0 || given == digit)
}

/// Prints the per-puzzle report: timings, search counters, and memory usage.
fn print_stats(
    parse_time: Duration,
    solve_time: Duration,
    search: &SearchStats,
    allocated_mib: f64,
    resident_mib: f64,
) {
    println!("Parse time: {parse_time:?}");
    println!("Solve time: {solve_time:?}");
    println!("Decisions: {}", search.decisions);
    println!("Propagations: {}", search.propagations);
    println!("Backtracks: {}", search.backtracks);
    println!("Allocated: {allocated_mib:.2} MiB");
    println!("Resident: {resident_mib:.2} MiB");
    println!();
}
