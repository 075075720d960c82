//! Core CDCL solver implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::assignment::Assignment;
use crate::bcp;
use crate::clause_db::{ClauseDb, ClauseId, ClauseOrigin};
use crate::conflict::ConflictAnalyzer;
use crate::heuristics::VsidsHeap;
use crate::restart::LubySchedule;
use crate::watches::Watches;
use verdict_base::{Lit, Value, Var};
use verdict_format::Instance;

/// The result of a SAT solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// Satisfiable, with a total assignment indexed by variable.
    Sat(Vec<bool>),
    /// Unsatisfiable.
    Unsat,
    /// The cooperative stop flag was raised before a verdict was reached.
    Interrupted,
}

/// Configuration for the CDCL solver.
#[derive(Debug, Clone)]
pub struct CdclConfig {
    /// Branch on VSIDS activity instead of the first unassigned variable.
    pub use_vsids: bool,
    /// Enable Luby-scheduled restarts.
    pub use_restarts: bool,
    /// Enable periodic learned-clause database reduction.
    pub use_reduction: bool,
    /// Variable activity decay factor.
    pub var_decay: f64,
    /// Clause activity decay factor.
    pub clause_decay: f64,
    /// Base restart interval in conflicts.
    pub restart_base: u64,
    /// Conflicts before the first database reduction.
    pub reduce_first: u64,
    /// Growth of the reduction interval after each reduction.
    pub reduce_growth: u64,
}

impl Default for CdclConfig {
    fn default() -> Self {
        Self::vsids_luby()
    }
}

impl CdclConfig {
    /// Plain CDCL: learning and backjumping only.
    #[must_use]
    pub fn basic() -> Self {
        Self {
            use_vsids: false,
            use_restarts: false,
            use_reduction: false,
            var_decay: 0.95,
            clause_decay: 0.999,
            restart_base: 100,
            reduce_first: 2000,
            reduce_growth: 500,
        }
    }

    /// CDCL with VSIDS branching.
    #[must_use]
    pub fn vsids() -> Self {
        Self {
            use_vsids: true,
            ..Self::basic()
        }
    }

    /// CDCL with VSIDS, Luby restarts, and learned-clause reduction.
    #[must_use]
    pub fn vsids_luby() -> Self {
        Self {
            use_vsids: true,
            use_restarts: true,
            use_reduction: true,
            ..Self::basic()
        }
    }
}

/// Solver statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverStats {
    /// Number of decisions made.
    pub decisions: u64,
    /// Number of trail literals propagated.
    pub propagations: u64,
    /// Number of conflicts encountered.
    pub conflicts: u64,
    /// Number of restarts.
    pub restarts: u64,
    /// Number of learned clauses.
    pub learned: u64,
    /// Number of learned clauses soft-deleted by reduction.
    pub deleted: u64,
}

/// The main CDCL solver.
pub struct CdclSolver {
    db: ClauseDb,
    watches: Watches,
    assignment: Assignment,
    heap: VsidsHeap,
    analyzer: ConflictAnalyzer,
    restarts: Option<LubySchedule>,
    config: CdclConfig,
    stats: SolverStats,
    /// Conflict count at which the next reduction fires.
    next_reduce: u64,
    reduce_interval: u64,
    /// Set when construction already derived a root-level contradiction.
    root_unsat: bool,
    stop: Option<Arc<AtomicBool>>,
}

impl CdclSolver {
    /// Creates a solver for `instance` with the default configuration.
    #[must_use]
    pub fn new(instance: &Instance) -> Self {
        Self::with_config(instance, CdclConfig::default())
    }

    /// Creates a solver for `instance` with a custom configuration.
    #[must_use]
    pub fn with_config(instance: &Instance, config: CdclConfig) -> Self {
        let num_vars = instance.num_vars();
        let mut solver = Self {
            db: ClauseDb::new(config.clause_decay),
            watches: Watches::new(num_vars),
            assignment: Assignment::new(num_vars),
            heap: VsidsHeap::new(num_vars, config.var_decay),
            analyzer: ConflictAnalyzer::new(num_vars),
            restarts: config.use_restarts.then(|| LubySchedule::new(config.restart_base)),
            next_reduce: config.reduce_first,
            reduce_interval: config.reduce_first,
            config,
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

    /// Runs the CDCL search to a verdict.
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
            match conflict {
                Some(conflict) => {
                    self.stats.conflicts += 1;
                    if self.assignment.decision_level() == 0 {
                        return SatResult::Unsat;
                    }
                    self.learn_from(conflict);

                    if let Some(schedule) = &mut self.restarts {
                        if schedule.on_conflict() {
                            self.stats.restarts += 1;
                            debug!(
                                restarts = self.stats.restarts,
                                conflicts = self.stats.conflicts,
                                "restarting search"
                            );
                            let heap = &mut self.heap;
                            self.assignment.cancel_until(0, |var| heap.insert(var));
                        }
                    }
                    if self.config.use_reduction && self.stats.conflicts >= self.next_reduce {
                        self.reduce_db();
                    }
                }
                None => match self.pick_branching_var() {
                    Some(var) => {
                        self.stats.decisions += 1;
                        let lit = Lit::new(var, self.assignment.saved_phase(var));
                        trace!(decision = %lit, level = self.assignment.decision_level() + 1, "branching");
                        self.assignment.new_decision_level();
                        let enqueued = self.assignment.enqueue(lit, None);
                        debug_assert!(enqueued);
                    }
                    None => return SatResult::Sat(self.assignment.model()),
                },
            }
        }
    }

    /// Analyzes `conflict`, backjumps, and asserts the learned clause.
    fn learn_from(&mut self, conflict: ClauseId) {
        let analysis = self.analyzer.analyze(
            conflict,
            &mut self.db,
            &self.assignment,
            &mut self.heap,
        );
        trace!(
            len = analysis.learned.len(),
            backjump = analysis.backjump_level,
            "learned clause"
        );
        let heap = &mut self.heap;
        self.assignment
            .cancel_until(analysis.backjump_level, |var| heap.insert(var));
        self.stats.learned += 1;

        let enqueued = if analysis.learned.len() == 1 {
            self.assignment.enqueue(analysis.learned[0], None)
        } else {
            let asserting = analysis.learned[0];
            let second = analysis.learned[1];
            let id = self.db.add(analysis.learned, ClauseOrigin::Learned);
            self.watches.watch_clause(id, asserting, second);
            self.db.bump(id);
            self.assignment.enqueue(asserting, Some(id))
        };
        debug_assert!(enqueued);
    }

    /// Picks the next branching variable, or `None` when every variable is
    /// assigned.
    fn pick_branching_var(&mut self) -> Option<Var> {
        if self.config.use_vsids {
            // Lazy deletion: entries assigned since their insertion are
            // skipped here.
            while let Some(var) = self.heap.pop_max() {
                if self.assignment.value_of_var(var).is_unassigned() {
                    return Some(var);
                }
            }
            None
        } else {
            (0..self.assignment.num_vars() as u32)
                .map(Var::new)
                .find(|&v| self.assignment.value_of_var(v).is_unassigned())
        }
    }

    /// Soft-deletes the less active half of the long learned clauses.
    ///
    /// A clause serving as the reason of an assigned variable is locked and
    /// survives.
    fn reduce_db(&mut self) {
        let mut candidates: Vec<(ClauseId, f64)> = self
            .db
            .ids()
            .filter(|&id| {
                let clause = self.db.get(id);
                clause.is_learned() && !clause.is_deleted() && clause.len() > 2 && !self.is_locked(id)
            })
            .map(|id| (id, self.db.get(id).activity()))
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let victims = candidates.len() / 2;
        for &(id, _) in &candidates[..victims] {
            self.db.mark_deleted(id);
        }
        self.stats.deleted += victims as u64;
        self.reduce_interval += self.config.reduce_growth;
        self.next_reduce = self.stats.conflicts + self.reduce_interval;
        debug!(
            removed = victims,
            learned = self.db.num_learned(),
            next_reduce = self.next_reduce,
            "reduced learned clause database"
        );
    }

    /// A clause is locked while it is the antecedent of its first literal.
    fn is_locked(&self, id: ClauseId) -> bool {
        let first = self.db.get(id).lits()[0];
        !self.assignment.value_of_var(first.var()).is_unassigned()
            && self.assignment.reason(first.var()) == Some(id)
    }
}

/// Feeds one instance clause into the solver state at level 0.
///
/// The clause is sorted and deduplicated; tautologies and clauses already
/// satisfied at level 0 are skipped, false literals are dropped, units are
/// enqueued. Returns `false` when the clause (or a unit contradiction)
/// makes the instance unsatisfiable outright.
pub(crate) fn ingest_clause(
    db: &mut ClauseDb,
    watches: &mut Watches,
    assignment: &mut Assignment,
    clause: &[Lit],
) -> bool {
    debug_assert_eq!(assignment.decision_level(), 0);

    let mut lits = clause.to_vec();
    lits.sort();
    lits.dedup();

    let mut kept = Vec::with_capacity(lits.len());
    let mut previous: Option<Lit> = None;
    for lit in lits {
        if previous == Some(!lit) {
            // Tautology: the clause is always true.
            return true;
        }
        previous = Some(lit);
        match assignment.value_of(lit) {
            Value::True => return true,
            Value::False => continue,
            Value::Unassigned => kept.push(lit),
        }
    }

    match kept.len() {
        0 => false,
        1 => assignment.enqueue(kept[0], None),
        _ => {
            let (first, second) = (kept[0], kept[1]);
            let id = db.add(kept, ClauseOrigin::Original);
            watches.watch_clause(id, first, second);
            true
        }
    }
}
