//! Solver configurations and single-configuration entry points.

use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use verdict_base::{Error, Result};
use verdict_cdcl::{CdclConfig, CdclSolver, DpllSolver, SatResult};
use verdict_format::Instance;

/// The solver configurations exposed to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Chronological DPLL without learning.
    Dpll,
    /// CDCL without VSIDS or restarts.
    CdclBasic,
    /// CDCL with VSIDS branching, no restarts.
    CdclVsids,
    /// CDCL with VSIDS, Luby restarts, and clause-database reduction.
    CdclVsidsLuby,
}

impl SolverKind {
    /// Every configuration, in racing order.
    pub const ALL: [SolverKind; 4] = [
        SolverKind::Dpll,
        SolverKind::CdclBasic,
        SolverKind::CdclVsids,
        SolverKind::CdclVsidsLuby,
    ];

    /// The stable name used on the command line and in result output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SolverKind::Dpll => "dpll",
            SolverKind::CdclBasic => "cdcl_basic",
            SolverKind::CdclVsids => "cdcl_vsids",
            SolverKind::CdclVsidsLuby => "cdcl_vsids_luby",
        }
    }
}

impl FromStr for SolverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dpll" => Ok(SolverKind::Dpll),
            "cdcl_basic" => Ok(SolverKind::CdclBasic),
            "cdcl_vsids" => Ok(SolverKind::CdclVsids),
            "cdcl_vsids_luby" => Ok(SolverKind::CdclVsidsLuby),
            other => Err(Error::UnknownSolver(other.to_string())),
        }
    }
}

impl std::fmt::Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a DIMACS CNF file into an [`Instance`].
pub fn parse(path: impl AsRef<Path>) -> Result<Instance> {
    Instance::from_path(path)
}

/// Solves `instance` with the given configuration.
#[must_use]
pub fn solve(instance: &Instance, kind: SolverKind) -> SatResult {
    solve_with_stop(instance, kind, Arc::new(AtomicBool::new(false)))
}

/// Solves `instance` with a cooperative stop flag.
///
/// The solver checks the flag between conflicts; raising it makes the call
/// return [`SatResult::Interrupted`] at the next check.
#[must_use]
pub fn solve_with_stop(instance: &Instance, kind: SolverKind, stop: Arc<AtomicBool>) -> SatResult {
    let (result, stats) = match kind {
        SolverKind::Dpll => {
            let mut solver = DpllSolver::new(instance);
            solver.set_stop_flag(stop);
            let result = solver.solve();
            (result, *solver.stats())
        }
        SolverKind::CdclBasic | SolverKind::CdclVsids | SolverKind::CdclVsidsLuby => {
            let config = match kind {
                SolverKind::CdclBasic => CdclConfig::basic(),
                SolverKind::CdclVsids => CdclConfig::vsids(),
                _ => CdclConfig::vsids_luby(),
            };
            let mut solver = CdclSolver::with_config(instance, config);
            solver.set_stop_flag(stop);
            let result = solver.solve();
            (result, *solver.stats())
        }
    };
    tracing::debug!(
        solver = %kind,
        decisions = stats.decisions,
        propagations = stats.propagations,
        conflicts = stats.conflicts,
        restarts = stats.restarts,
        learned = stats.learned,
        "search finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in SolverKind::ALL {
            assert_eq!(kind.name().parse::<SolverKind>().unwrap(), kind);
        }
        assert!("minisat".parse::<SolverKind>().is_err());
    }
}
