/*!
A command-line entry point over the bare CDCL solver: reads a DIMACS CNF
file, solves it, and prints the result (SPEC_FULL.md §4's "bare CNF is a
first-class input to the solver core"). Driving the relational translator
from the command line needs a textual-model parser, which is out of scope
here (spec.md §6: the AST/SymbolTable interface is consumed, not defined).
*/

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use boundsat::config::Config;
use boundsat::sat::dimacs;
use boundsat::sat::report::Report;
use boundsat::sat::solver::Solver;

#[derive(Parser)]
#[command(name = "boundsat", about = "Solve a DIMACS CNF file with the embedded CDCL solver")]
struct Cli {
    /// Path to a DIMACS CNF file.
    path: PathBuf,

    /// Print the satisfying model's literals, one per line, on SAT.
    #[arg(short, long)]
    model: bool,

    /// log4rs YAML config controlling structured file logging (requires the
    /// `log_file` feature).
    #[cfg(feature = "log_file")]
    #[arg(long)]
    log_config: Option<PathBuf>,
}

#[cfg(feature = "log_file")]
fn init_logging(cli: &Cli) {
    if let Some(path) = &cli.log_config {
        if let Err(e) = log4rs::init_file(path, Default::default()) {
            eprintln!("failed to load log4rs config {}: {e}", path.display());
        }
    }
}

#[cfg(not(feature = "log_file"))]
fn init_logging(_cli: &Cli) {}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let contents = match std::fs::read_to_string(&cli.path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error reading {}: {e}", cli.path.display());
            return ExitCode::FAILURE;
        }
    };

    let formula = match dimacs::parse(&contents) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error parsing {}: {e:?}", cli.path.display());
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "read {} with {} variables and {} clauses",
        cli.path.display(),
        formula.num_variables,
        formula.clauses.len()
    );

    let mut solver = Solver::new(formula.num_variables.max(1), Config::default());
    for clause in formula.clauses {
        solver.add_clause(clause);
    }

    match solver.solve() {
        Report::Satisfiable(model) => {
            println!("SATISFIABLE");
            if cli.model {
                for (i, &value) in model.iter().enumerate() {
                    println!("{}{}", if value { "" } else { "-" }, i + 1);
                }
            }
            ExitCode::SUCCESS
        }
        Report::Unsatisfiable => {
            println!("UNSATISFIABLE");
            ExitCode::SUCCESS
        }
        Report::Unknown(reason) => {
            println!("UNKNOWN {reason}");
            ExitCode::FAILURE
        }
    }
}
