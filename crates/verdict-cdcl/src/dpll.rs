//! Chronological DPLL solver.
//!
//! Shares the clause store, watch lists, trail, and propagation engine with
//! the CDCL solver, but learns nothing: a conflict flips the deepest
//! decision not yet tried both ways, and the search fails once every
//! decision on the stack has been flipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

use crate::assignment::Assignment;
use crate::bcp;
use crate::clause_db::ClauseDb;
use crate::solver::{ingest_clause, SatResult, SolverStats};
use crate::watches::Watches;
use verdict_base::{Lit, Var};
use verdict_format::Instance;

/// A decision on the DPLL stack.
#[derive(Debug, Clone, Copy)]
struct Decision {
    lit: Lit,
    /// Whether the opposite phase has already been tried.
    flipped: bool,
}

/// Chronological backtracking solver.
pub struct DpllSolver {
    db: ClauseDb,
    watches: Watches,
    assignment: Assignment,
    /// One entry per open decision level.
    decisions: Vec<Decision>,
    stats: SolverStats,
    root_unsat: bool,
    stop: Option<Arc<AtomicBool>>,
}

impl DpllSolver {
    /// Creates a solver for `instance`.
    #[must_use]
    pub fn new(instance: &Instance) -> Self {
        let num_vars = instance.num_vars();
        let mut solver = Self {
            db: ClauseDb::new(0.999),
            watches: Watches::new(num_vars),
            assignment: Assignment::new(num_vars),
            decisions: Vec::new(),
            stats: SolverStats::default(),
            root_unsat: false,
            stop: None,
        };
        for clause in instance.clauses() {
            if !ingest_clause(&mut solver.db, &mut solver.watches, &mut solver.assignment, clause) {
                solver.root_unsat = true;
                break;
            }
        }
        if !solver.root_unsat {
            solver.assign_pure_literals(instance);
        }
        solver
    }

    /// Installs a cooperative stop flag, checked once per search iteration.
    pub fn set_stop_flag(&mut self, stop: Arc<AtomicBool>) {
        self.stop = Some(stop);
    }

    /// Returns solver statistics.
    #[must_use]
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    /// One-time pure-literal pass: a variable occurring with a single
    /// polarity can be fixed to that polarity at level 0 without losing any
    /// model.
    fn assign_pure_literals(&mut self, instance: &Instance) {
        let num_vars = self.assignment.num_vars();
        let mut occurs_pos = vec![false; num_vars];
        let mut occurs_neg = vec![false; num_vars];
        for clause in instance.clauses() {
            for lit in clause {
                if lit.is_positive() {
                    occurs_pos[lit.var().index()] = true;
                } else {
                    occurs_neg[lit.var().index()] = true;
                }
            }
        }
        for i in 0..num_vars {
            let var = Var::new(i as u32);
            if !self.assignment.value_of_var(var).is_unassigned() {
                continue;
            }
            if occurs_pos[i] != occurs_neg[i] {
                trace!(var = i + 1, positive = occurs_pos[i], "pure literal");
                self.assignment.enqueue(Lit::new(var, occurs_pos[i]), None);
            }
        }
    }

    /// Runs the DPLL search to a verdict.
    pub fn solve(&mut self) -> SatResult {
        if self.root_unsat {
            return SatResult::Unsat;
        }
        loop {
            if let Some(stop) = &self.stop {
                if stop.load(Ordering::Relaxed) {
                    return SatResult::Interrupted;
                }
            }

            let conflict = bcp::propagate(
                &mut self.db,
                &mut self.watches,
                &mut self.assignment,
                &mut self.stats,
            );
            if conflict.is_some() {
                self.stats.conflicts += 1;
                if !self.backtrack_and_flip() {
                    return SatResult::Unsat;
                }
            } else {
                match self.first_unassigned() {
                    Some(var) => {
                        self.stats.decisions += 1;
                        let lit = Lit::positive(var);
                        self.assignment.new_decision_level();
                        self.decisions.push(Decision { lit, flipped: false });
                        let enqueued = self.assignment.enqueue(lit, None);
                        debug_assert!(enqueued);
                    }
                    None => return SatResult::Sat(self.assignment.model()),
                }
            }
        }
    }

    /// Finds the deepest decision not yet flipped, backtracks below it, and
    /// asserts its opposite phase. Returns `false` when no such decision
    /// remains.
    fn backtrack_and_flip(&mut self) -> bool {
        let mut level = self.decisions.len();
        while level > 0 && self.decisions[level - 1].flipped {
            level -= 1;
        }
        if level == 0 {
            return false;
        }

        let retry = !self.decisions[level - 1].lit;
        self.assignment.cancel_until(level as u32 - 1, |_| {});
        self.decisions.truncate(level - 1);

        trace!(retry = %retry, level, "flipping decision");
        self.assignment.new_decision_level();
        self.decisions.push(Decision { lit: retry, flipped: true });
        let enqueued = self.assignment.enqueue(retry, None);
        debug_assert!(enqueued);
        true
    }

    fn first_unassigned(&self) -> Option<Var> {
        (0..self.assignment.num_vars() as u32)
            .map(Var::new)
            .find(|&v| self.assignment.value_of_var(v).is_unassigned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_base::utils::XorShift64;
    use verdict_base::Value;

    fn instance(num_vars: usize, clauses: &[&[i64]]) -> Instance {
        let mut inst = Instance::new(num_vars);
        for raw in clauses {
            inst.push_clause(raw.iter().map(|&l| Lit::from_dimacs(l)).collect());
        }
        inst
    }

    fn model_satisfies(inst: &Instance, model: &[bool]) -> bool {
        inst.clauses().iter().all(|clause| {
            clause
                .iter()
                .any(|lit| model[lit.var().index()] == lit.is_positive())
        })
    }

    #[test]
    fn simple_sat_instance() {
        let inst = instance(3, &[&[1, 2], &[-1, 3], &[-2, -3]]);
        match DpllSolver::new(&inst).solve() {
            SatResult::Sat(model) => assert!(model_satisfies(&inst, &model)),
            other => panic!("expected SAT, got {other:?}"),
        }
    }

    #[test]
    fn simple_unsat_instance() {
        let inst = instance(2, &[&[1, 2], &[-1], &[-2]]);
        assert_eq!(DpllSolver::new(&inst).solve(), SatResult::Unsat);
    }

    #[test]
    fn flips_exhaust_the_tree() {
        let mut clauses: Vec<Vec<i64>> = Vec::new();
        for mask in 0..8u32 {
            clauses.push(
                (1..=3)
                    .map(|v| if mask >> (v - 1) & 1 == 1 { -(v as i64) } else { v as i64 })
                    .collect(),
            );
        }
        let refs: Vec<&[i64]> = clauses.iter().map(Vec::as_slice).collect();
        assert_eq!(DpllSolver::new(&instance(3, &refs)).solve(), SatResult::Unsat);
    }

    #[test]
    fn pure_literals_are_fixed_before_search() {
        // 2 occurs only positively, 3 only negatively.
        let inst = instance(3, &[&[1, 2], &[-1, 2], &[-3, 1]]);
        let solver = DpllSolver::new(&inst);
        assert_eq!(solver.assignment.value_of(Lit::from_dimacs(2)), Value::True);
        assert_eq!(solver.assignment.value_of(Lit::from_dimacs(-3)), Value::True);
    }

    #[test]
    fn pigeonhole_is_unsat() {
        let var = |p: usize, h: usize| (p * 2 + h) as i64 + 1;
        let mut inst = Instance::new(6);
        for p in 0..3 {
            inst.push_clause((0..2).map(|h| Lit::from_dimacs(var(p, h))).collect());
        }
        for h in 0..2 {
            for p1 in 0..3 {
                for p2 in p1 + 1..3 {
                    inst.push_clause(vec![
                        Lit::from_dimacs(-var(p1, h)),
                        Lit::from_dimacs(-var(p2, h)),
                    ]);
                }
            }
        }
        assert_eq!(DpllSolver::new(&inst).solve(), SatResult::Unsat);
    }

    #[test]
    fn agrees_with_brute_force_on_random_instances() {
        let mut rng = XorShift64::new(0xfeed);
        for round in 0..40 {
            let num_vars = 3 + (round % 6);
            let mut inst = Instance::new(num_vars);
            for _ in 0..num_vars * 4 {
                let len = 1 + rng.next_below(3) as usize;
                inst.push_clause(
                    (0..len)
                        .map(|_| {
                            let var = Var::new(rng.next_below(num_vars as u64) as u32);
                            Lit::new(var, rng.next_bool())
                        })
                        .collect(),
                );
            }

            let n = inst.num_vars();
            let sat_by_enumeration = (0..1u32 << n).any(|bits| {
                let model: Vec<bool> = (0..n).map(|i| bits >> i & 1 == 1).collect();
                model_satisfies(&inst, &model)
            });

            match DpllSolver::new(&inst).solve() {
                SatResult::Sat(model) => {
                    assert!(sat_by_enumeration);
                    assert!(model_satisfies(&inst, &model));
                }
                SatResult::Unsat => assert!(!sat_by_enumeration),
                SatResult::Interrupted => panic!("no stop flag was set"),
            }
        }
    }
}
