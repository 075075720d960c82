//! Racing harness: several configurations, first verdict wins.
//!
//! Each racer runs in its own thread on its own deep copy of the instance;
//! no solver state is shared. The first Sat/Unsat result wins the race, the
//! remaining racers are cancelled through their stop flags and joined.
//! Cancellation is cooperative and lands between conflicts, so losers exit
//! promptly without leaving anything to clean up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::solver::{solve_with_stop, SolverKind};
use verdict_cdcl::SatResult;
use verdict_format::Instance;

/// The winning configuration and its verdict.
#[derive(Debug, Clone)]
pub struct RaceOutcome {
    pub winner: SolverKind,
    pub result: SatResult,
}

/// Races the given configurations on `instance`.
///
/// Returns `None` when the timeout expires (or every racer was interrupted)
/// before any configuration reached a verdict. Which configuration wins is
/// nondeterministic.
pub fn race(
    instance: &Instance,
    kinds: &[SolverKind],
    timeout: Option<Duration>,
) -> Option<RaceOutcome> {
    let stop = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();

    let mut handles = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let instance = instance.clone();
        let stop = Arc::clone(&stop);
        let tx = tx.clone();
        let handle = thread::Builder::new()
            .name(format!("verdict-race-{}", kind.name()))
            .spawn(move || {
                let result = solve_with_stop(&instance, kind, stop);
                let _ = tx.send((kind, result));
            })
            .expect("failed to spawn racer thread");
        handles.push(handle);
    }
    drop(tx);

    let deadline = timeout.map(|t| Instant::now() + t);
    let outcome = loop {
        let received = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                rx.recv_timeout(remaining)
            }
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            // A racer that observed the stop flag is not a verdict.
            Ok((_, SatResult::Interrupted)) => continue,
            Ok((winner, result)) => {
                debug!(winner = %winner, "race decided");
                break Some(RaceOutcome { winner, result });
            }
            Err(_) => break None,
        }
    };

    stop.store(true, Ordering::Relaxed);
    for handle in handles {
        let _ = handle.join();
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_base::Lit;

    fn instance(num_vars: usize, clauses: &[&[i64]]) -> Instance {
        let mut inst = Instance::new(num_vars);
        for raw in clauses {
            inst.push_clause(raw.iter().map(|&l| Lit::from_dimacs(l)).collect());
        }
        inst
    }

    #[test]
    fn race_reports_a_listed_winner() {
        let inst = instance(3, &[&[1, 2], &[-1, 3], &[-2, -3]]);
        let outcome = race(&inst, &SolverKind::ALL, None).expect("trivial instance must finish");
        assert!(SolverKind::ALL.contains(&outcome.winner));
        match outcome.result {
            SatResult::Sat(model) => assert_eq!(model.len(), 3),
            other => panic!("expected SAT, got {other:?}"),
        }
    }

    #[test]
    fn racers_agree_on_unsat() {
        let inst = instance(2, &[&[1, 2], &[-1, 2], &[1, -2], &[-1, -2]]);
        let outcome = race(&inst, &SolverKind::ALL, None).expect("must finish");
        assert_eq!(outcome.result, SatResult::Unsat);
    }

    #[test]
    fn timeout_cancels_all_racers() {
        // Pigeonhole 12-into-11 is far beyond a few milliseconds.
        let pigeons = 12usize;
        let holes = 11usize;
        let var = |p: usize, h: usize| (p * holes + h) as i64 + 1;
        let mut inst = Instance::new(pigeons * holes);
        for p in 0..pigeons {
            inst.push_clause((0..holes).map(|h| Lit::from_dimacs(var(p, h))).collect());
        }
        for h in 0..holes {
            for p1 in 0..pigeons {
                for p2 in p1 + 1..pigeons {
                    inst.push_clause(vec![
                        Lit::from_dimacs(-var(p1, h)),
                        Lit::from_dimacs(-var(p2, h)),
                    ]);
                }
            }
        }

        let started = Instant::now();
        let outcome = race(
            &inst,
            &[SolverKind::CdclVsidsLuby, SolverKind::Dpll],
            Some(Duration::from_millis(20)),
        );
        assert!(outcome.is_none());
        // Losers must have been cancelled cooperatively, not run to the end.
        assert!(started.elapsed() < Duration::from_secs(30));
    }
}
