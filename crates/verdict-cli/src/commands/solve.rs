//! Solve command: run one instance and print a JSON result line.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use serde::Serialize;
use verdict_kit::{race, SatResult, SolverKind};

#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Input CNF file (DIMACS)
    #[arg(required = true)]
    pub input: Option<PathBuf>,

    /// Solver configuration; repeat to name several
    #[arg(long = "solver", value_name = "NAME")]
    pub solvers: Vec<SolverKind>,

    /// Race all named configurations, first verdict wins
    #[arg(long)]
    pub race: bool,

    /// Timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// One result line, printed as a single JSON object.
#[derive(Serialize, Debug)]
pub struct Report {
    #[serde(rename = "Instance")]
    pub instance: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Solution", skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(rename = "Solver", skip_serializing_if = "Option::is_none")]
    pub solver: Option<String>,
}

impl Report {
    /// The `--` placeholder row used for timeouts and unreadable inputs.
    pub fn placeholder(instance: String) -> Self {
        Self {
            instance,
            time: "--".to_string(),
            result: "--".to_string(),
            solution: None,
            solver: None,
        }
    }
}

/// Renders a model as `var true|false` pairs over every variable.
pub fn format_solution(model: &[bool]) -> String {
    model
        .iter()
        .enumerate()
        .map(|(i, &value)| format!("{} {}", i + 1, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the file name used as the instance label.
pub fn instance_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Solves one file and builds its report row.
///
/// A parse failure is returned as an error; a timeout yields the
/// placeholder row.
pub fn solve_file(
    path: &Path,
    solvers: &[SolverKind],
    racing: bool,
    timeout: Option<Duration>,
) -> verdict_kit::Result<Report> {
    let label = instance_label(path);
    let start = Instant::now();
    let instance = verdict_kit::parse(path)?;
    tracing::info!(
        instance = %label,
        vars = instance.num_vars(),
        clauses = instance.clauses().len(),
        "loaded DIMACS"
    );

    // Without --race only the first named configuration runs; the racing
    // harness doubles as the timeout mechanism for a single solver.
    let field: Vec<SolverKind> = if racing {
        solvers.to_vec()
    } else {
        vec![solvers[0]]
    };
    let outcome = race(&instance, &field, timeout);
    let elapsed = start.elapsed();

    let Some(outcome) = outcome else {
        tracing::info!(instance = %label, "timed out");
        return Ok(Report::placeholder(label));
    };

    let (result, solution) = match outcome.result {
        SatResult::Sat(model) => ("SAT".to_string(), format_solution(&model)),
        SatResult::Unsat => ("UNSAT".to_string(), "--".to_string()),
        // The winner is never an interrupted racer.
        SatResult::Interrupted => return Ok(Report::placeholder(label)),
    };
    tracing::info!(instance = %label, result = %result, solver = %outcome.winner, ?elapsed, "solved");

    Ok(Report {
        instance: label,
        time: format!("{:.2}", elapsed.as_secs_f64()),
        result,
        solution: Some(solution),
        solver: racing.then(|| outcome.winner.name().to_string()),
    })
}

/// Returns the configurations to run, defaulting to the strongest one.
pub fn chosen_solvers(named: &[SolverKind]) -> Vec<SolverKind> {
    if named.is_empty() {
        vec![SolverKind::CdclVsidsLuby]
    } else {
        named.to_vec()
    }
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    let Some(input) = args.input else {
        anyhow::bail!("no input file given");
    };
    let solvers = chosen_solvers(&args.solvers);
    let timeout = args.timeout.map(Duration::from_secs);

    let report = solve_file(&input, &solvers, args.race, timeout)?;
    let timed_out = report.result == "--";
    println!("{}", serde_json::to_string(&report)?);

    if timed_out {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_lists_every_variable() {
        assert_eq!(format_solution(&[true, false, true]), "1 true 2 false 3 true");
    }

    #[test]
    fn placeholder_row_has_no_solution_or_solver() {
        let json = serde_json::to_string(&Report::placeholder("x.cnf".into())).unwrap();
        assert_eq!(json, r#"{"Instance":"x.cnf","Time":"--","Result":"--"}"#);
    }

    #[test]
    fn default_solver_is_the_strongest() {
        assert_eq!(chosen_solvers(&[]), vec![SolverKind::CdclVsidsLuby]);
        assert_eq!(chosen_solvers(&[SolverKind::Dpll]), vec![SolverKind::Dpll]);
    }
}
