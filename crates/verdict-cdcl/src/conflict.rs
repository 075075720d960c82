//! 1-UIP conflict analysis.
//!
//! Starting from the conflicting clause, the analyzer resolves backward
//! along the trail against the antecedents of current-level literals until
//! exactly one current-level literal remains: the first unique implication
//! point. The negation of that pivot becomes the asserting literal of the
//! learned clause.

use crate::assignment::Assignment;
use crate::clause_db::{ClauseDb, ClauseId};
use crate::heuristics::VsidsHeap;
use verdict_base::{Lit, Var};

/// Result of analyzing one conflict.
#[derive(Debug)]
pub struct Analysis {
    /// The learned clause. Position 0 holds the asserting literal; position
    /// 1, when present, holds a literal of the backjump level.
    pub learned: Vec<Lit>,
    /// The level to backtrack to before asserting `learned[0]`.
    pub backjump_level: u32,
}

/// Conflict analyzer with reusable scratch storage.
///
/// The `seen` array is solver-local scratch; every entry marked during
/// `analyze` is cleared again before it returns.
#[derive(Debug)]
pub struct ConflictAnalyzer {
    seen: Vec<bool>,
    to_clear: Vec<Var>,
}

impl ConflictAnalyzer {
    /// Creates an analyzer for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            seen: vec![false; num_vars],
            to_clear: Vec::new(),
        }
    }

    /// Derives the 1-UIP learned clause and backjump level for `conflict`.
    ///
    /// Bumps the activity of every variable resolved over and of every
    /// learned antecedent visited, then applies the per-conflict variable
    /// and clause decays.
    pub fn analyze(
        &mut self,
        conflict: ClauseId,
        db: &mut ClauseDb,
        assignment: &Assignment,
        heap: &mut VsidsHeap,
    ) -> Analysis {
        debug_assert!(assignment.decision_level() > 0);

        let current_level = assignment.decision_level();
        let mut learned: Vec<Lit> = Vec::new();
        let mut reason = conflict;
        let mut index = assignment.trail_len();
        let mut unresolved = 0u32;

        let uip = loop {
            db.bump(reason);

            // The pivot resolved in the previous step stays marked seen, so
            // its occurrence in the antecedent is skipped here.
            for &lit in db.get(reason).lits() {
                let var = lit.var();
                // Level-0 assignments are permanent; they drop out of the
                // resolvent.
                if self.seen[var.index()] || assignment.level(var) == 0 {
                    continue;
                }
                self.seen[var.index()] = true;
                self.to_clear.push(var);
                heap.bump(var);
                if assignment.level(var) >= current_level {
                    unresolved += 1;
                } else {
                    learned.push(lit);
                }
            }

            loop {
                index -= 1;
                if self.seen[assignment.trail_lit(index).var().index()] {
                    break;
                }
            }
            let q = assignment.trail_lit(index);
            unresolved -= 1;
            if unresolved == 0 {
                break q;
            }
            reason = match assignment.reason(q.var()) {
                Some(r) => r,
                // A decision has no antecedent; it is always a UIP.
                None => break q,
            };
        };

        learned.push(!uip);
        let last = learned.len() - 1;
        learned.swap(0, last);

        // The second slot holds a literal of the highest remaining level;
        // that level is where the clause becomes asserting.
        let mut backjump_level = 0;
        if learned.len() > 1 {
            let mut max_i = 1;
            for i in 2..learned.len() {
                if assignment.level(learned[i].var()) > assignment.level(learned[max_i].var()) {
                    max_i = i;
                }
            }
            learned.swap(1, max_i);
            backjump_level = assignment.level(learned[1].var());
        }

        for var in self.to_clear.drain(..) {
            self.seen[var.index()] = false;
        }
        heap.decay();
        db.decay();

        Analysis {
            learned,
            backjump_level,
        }
    }
}
