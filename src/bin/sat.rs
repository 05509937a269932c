use anyhow::{bail, Context, Result};
use cdclsat::*;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const MAX_FORMULA_WIDTH: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "sat")]
#[command(about = "Decides the satisfiability of CNF formulas")]
struct Cli {
    /// DIMACS CNF file; a small demo formula is solved without one
    path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Algorithm::Cdcl)]
    solver: Algorithm,

    /// Gives up on a CDCL search which takes more steps than this
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Prints every step of a CDCL search
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Cdcl,
    Dpll,
    BruteForce,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let formula = match &cli.path {
        Some(path) => dimacs::load_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => demo(),
    };
    println!("formula = {}", truncated(&formula.to_string(), MAX_FORMULA_WIDTH));

    let (result, iterations) = match cli.solver {
        Algorithm::Cdcl => run_cdcl(&formula, &cli)?,
        Algorithm::Dpll => run(&mut DpllSolver::new(), &formula),
        Algorithm::BruteForce => run(&mut BruteForceSolver::new(), &formula),
    };

    match &result {
        Some(assignment) => {
            if formula.evaluate(assignment) != Some(true) {
                bail!("{} does not satisfy the formula", assignment);
            }
            println!("... result = {}", assignment);
        }
        None => println!("... not satisfiable"),
    }
    println!("... solved in {} iterations", iterations);
    Ok(())
}

/// (¬x0 ∨ ¬x1 ∨ ¬x2) ∧ (x0 ∨ x1 ∨ x2)
fn demo() -> Formula {
    let x = Literal::positive;
    Formula::new(vec![
        Clause::new(vec![!x(0), !x(1), !x(2)]),
        Clause::new(vec![x(0), x(1), x(2)]),
    ])
}

fn run(solver: &mut dyn Solve, formula: &Formula) -> (Option<Assignment>, usize) {
    println!("solving with {}", solver.name());
    let result = solver.solve(formula);
    (result, solver.iterations())
}

fn run_cdcl(formula: &Formula, cli: &Cli) -> Result<(Option<Assignment>, usize)> {
    let solver = CdclSolver::new();
    println!("solving with {}", solver.name());

    let mut steps = solver.steps(formula);
    while let Some(step) = steps.next() {
        let state = match step {
            Step::Result(result) => return Ok((result, steps.iterations())),
            Step::Intermediate(state) => state,
        };
        if cli.trace {
            match state {
                IntermediateState::TrivialUnits(units) => println!("... units {}", units),
                IntermediateState::Decision(decision) => println!("... decided {}", decision),
                IntermediateState::Learned {
                    clause, backjump, ..
                } => println!("... learned {}, back to level {}", clause, backjump),
            }
        }
        if let Some(max) = cli.max_iterations {
            if steps.iterations() > max {
                bail!("no result within {} iterations", max);
            }
        }
    }
    bail!("search ended without a result")
}

fn truncated(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
