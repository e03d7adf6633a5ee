//! CLI entry point for the edge-matching puzzle solver.
//!
//! Usage:
//!   edge-puzzle solve [tiles.json] [options]
//!   edge-puzzle solve --stdin [options]
//!   edge-puzzle catalog
//!
//! Options:
//!   --scramble              Shuffle and randomly turn the tiles before solving
//!   --seed <n>              Seed for --scramble (default: 0)
//!   --all                   Enumerate every solution instead of stopping at the first
//!   --max-solutions <n>     Cap for --all
//!
//! Without a file or --stdin the built-in nine-tile catalog is solved.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use edge_puzzle::{
    find_solutions, Board, Direction, PuzzleConfig, Side, SolverConfig, SolverResult, TileId, COLS,
    ROWS,
};

#[derive(Parser)]
#[command(name = "edge-puzzle")]
#[command(about = "Solver for 3x3 edge-matching tile puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a tile set and print the arrangement as JSON
    Solve {
        /// Path to a tile-set JSON file
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the tile set from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Shuffle and randomly turn the tiles before solving
        #[arg(long)]
        scramble: bool,

        /// Seed for --scramble
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Enumerate every solution
        #[arg(long)]
        all: bool,

        /// Maximum number of solutions to enumerate with --all
        #[arg(long)]
        max_solutions: Option<usize>,
    },
    /// Print the built-in tile catalog as JSON
    Catalog,
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    search_exhausted: bool,
    nodes_visited: usize,
    solutions_found: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<Vec<Vec<CellOutput>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solutions: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CellOutput {
    tile: TileId,
    orientation: u8,
    north: Side,
    east: Side,
    south: Side,
    west: Side,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            scramble,
            seed,
            all,
            max_solutions,
        } => {
            let config = load_config(file, stdin)?;
            info!("Solving tile set '{}' ({} tiles)", config.id, config.tiles.len());

            let mut board = Board::from_config(&config).context("Invalid tile set")?;
            if scramble {
                info!("Scrambling tiles with seed {seed}");
                board
                    .pool_mut()
                    .scramble(&mut ChaCha8Rng::seed_from_u64(seed));
            }

            let solver_config = if all {
                SolverConfig { max_solutions }
            } else {
                SolverConfig::first()
            };
            let result = find_solutions(board.pool(), &solver_config)?;

            if let Some(solution) = result.first() {
                board.commit(solution)?;
            } else {
                warn!("No arrangement found for tile set '{}'", config.id);
            }

            let output = format_result(&board, &result, all)?;
            println!("{}", serde_json::to_string_pretty(&output)?);

            if !output.solved {
                std::process::exit(1);
            }
        }
        Commands::Catalog => {
            println!(
                "{}",
                serde_json::to_string_pretty(&PuzzleConfig::standard())?
            );
        }
    }

    Ok(())
}

fn load_config(file: Option<PathBuf>, stdin: bool) -> Result<PuzzleConfig> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read tile set from stdin")?;
        return PuzzleConfig::from_json(&buffer).context("Failed to parse tile set from stdin");
    }

    match file {
        Some(path) => PuzzleConfig::from_path(&path)
            .with_context(|| format!("Failed to load tile set {}", path.display())),
        None => Ok(PuzzleConfig::standard()),
    }
}

fn format_result(board: &Board, result: &SolverResult, all: bool) -> Result<SolveOutput> {
    let solved = board.is_solved();

    let grid = if solved {
        let mut rows = Vec::with_capacity(ROWS);
        for row in 0..ROWS {
            let mut cells = Vec::with_capacity(COLS);
            for col in 0..COLS {
                if let Some(tile) = board.tile_at(row as i32, col as i32) {
                    cells.push(CellOutput {
                        tile: tile.id(),
                        orientation: tile.orientation(),
                        north: tile.side(Direction::North),
                        east: tile.side(Direction::East),
                        south: tile.side(Direction::South),
                        west: tile.side(Direction::West),
                    });
                }
            }
            rows.push(cells);
        }
        Some(rows)
    } else {
        None
    };

    let solutions = if all {
        Some(serde_json::to_value(&result.solutions)?)
    } else {
        None
    };

    Ok(SolveOutput {
        solved,
        reason: (!solved).then(|| "no_arrangement".to_string()),
        search_exhausted: result.search_exhausted,
        nodes_visited: result.nodes_visited,
        solutions_found: result.solutions.len(),
        time_elapsed_ms: result.time_elapsed_ms,
        grid,
        solutions,
    })
}

