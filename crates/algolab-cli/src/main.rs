//! Command-line traversal runner.
//!
//! Provides the `algolab` binary. `run` loads a graph description from a JSON
//! file and prints the traversal as one JSON step per line, the same objects
//! the HTTP step endpoint returns.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use algolab_core::{CoreError, GraphInput, NodeId};
use algolab_engine::{Advance, Runner, Stepper};

/// Step-by-step graph traversals.
#[derive(Parser)]
#[command(name = "algolab", about = "Step-by-step graph traversals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run a traversal and print every step as JSON.
    Run {
        /// Path to the graph description (JSON).
        #[arg(short, long)]
        graph: PathBuf,

        /// Algorithm name.
        #[arg(short, long, default_value = "bfs")]
        algo: String,

        /// Start node (default: first declared node).
        #[arg(short, long)]
        start: Option<String>,

        /// Stop after this many steps even if the traversal is not finished.
        #[arg(long, default_value_t = 100_000)]
        max_steps: usize,

        /// Pretty-print each step.
        #[arg(long)]
        pretty: bool,
    },
    /// List the available algorithms.
    Algorithms,
}

fn main() {
    let cli = Cli::parse();
    let runner = Runner::new();

    let exit_code = match cli.command {
        Commands::Run {
            graph,
            algo,
            start,
            max_steps,
            pretty,
        } => run_traversal(&runner, &graph, &algo, start, max_steps, pretty),
        Commands::Algorithms => {
            for name in runner.algorithms() {
                println!("{}", name);
            }
            0
        }
    };
    process::exit(exit_code);
}

/// Execute the run subcommand.
///
/// Returns exit code: 0 = success, 1 = engine error,
/// 2 = malformed graph input, 3 = I/O or parse error.
fn run_traversal(
    runner: &Runner,
    path: &Path,
    algo: &str,
    start: Option<String>,
    max_steps: usize,
    pretty: bool,
) -> i32 {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {}", path.display(), e);
            return 3;
        }
    };
    let input: GraphInput = match serde_json::from_str(&raw) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: '{}' is not a graph description: {}", path.display(), e);
            return 3;
        }
    };

    let graph = match input.build() {
        Ok(graph) => Arc::new(graph),
        Err(CoreError::MalformedGraphInput { issues }) => {
            eprintln!("Malformed graph with {} issue(s):", issues.len());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
            return 2;
        }
    };

    let Some(start) = start.map(NodeId::from).or_else(|| input.default_start()) else {
        eprintln!("Error: the graph has no nodes; pass --start");
        return 1;
    };

    let mut stepper = match runner.create(algo, graph, start) {
        Ok(stepper) => stepper,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match write_steps(&mut stepper, max_steps, pretty, &mut out) {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("I/O error: {}", e);
            3
        }
    }
}

/// Writes up to `limit` advances, one JSON document per line, stopping after
/// the end marker. Returns how many were written.
fn write_steps(
    stepper: &mut Stepper,
    limit: usize,
    pretty: bool,
    out: &mut impl Write,
) -> io::Result<usize> {
    let mut written = 0;
    while written < limit {
        let advance = Runner::advance(stepper);
        let json = if pretty {
            serde_json::to_string_pretty(&advance)
        } else {
            serde_json::to_string(&advance)
        }
        .map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
        written += 1;
        if matches!(advance, Advance::End) {
            break;
        }
    }
    out.flush()?;
    Ok(written)
}
