//! Batch command: run every CNF file under a directory, one JSON result
//! line per instance appended to a log file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use verdict_kit::SolverKind;
use walkdir::WalkDir;

use super::solve::{chosen_solvers, instance_label, solve_file, Report};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing the CNF files
    #[arg(required = true)]
    pub dir: PathBuf,

    /// Log file to append result lines to; must not exist yet
    #[arg(long)]
    pub log: PathBuf,

    /// Solver configuration; repeat to name several
    #[arg(long = "solver", value_name = "NAME")]
    pub solvers: Vec<SolverKind>,

    /// Race all named configurations per instance
    #[arg(long)]
    pub race: bool,

    /// Timeout in seconds per instance
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

pub fn run(args: BatchArgs) -> anyhow::Result<()> {
    // Never clobber results of an earlier run.
    let mut log = OpenOptions::new()
        .create_new(true)
        .append(true)
        .open(&args.log)
        .map_err(|e| anyhow::anyhow!("refusing to open log {}: {e}", args.log.display()))?;

    let solvers = chosen_solvers(&args.solvers);
    let timeout = args.timeout.map(Duration::from_secs);

    let mut files: Vec<PathBuf> = WalkDir::new(&args.dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "cnf")
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    tracing::info!(count = files.len(), dir = %args.dir.display(), "batch start");

    for path in files {
        let report = match solve_file(&path, &solvers, args.race, timeout) {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "skipping instance");
                Report::placeholder(instance_label(&path))
            }
        };
        writeln!(log, "{}", serde_json::to_string(&report)?)?;
    }

    tracing::info!("batch complete");
    Ok(())
}
