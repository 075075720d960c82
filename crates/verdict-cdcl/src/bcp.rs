//! Boolean Constraint Propagation with two watched literals.
//!
//! When a literal `p` is assigned, only the clauses watching `!p` can have
//! become unit or conflicting. Each such watch list is rewritten in place
//! with a read and a write index: satisfied and still-watching entries are
//! kept, entries whose clause found a replacement watch are dropped, and
//! entries of deleted clauses are discarded. Unassigning variables never
//! invalidates the watch invariant, so backtracking leaves the lists alone.

use crate::assignment::Assignment;
use crate::clause_db::{ClauseDb, ClauseId};
use crate::solver::SolverStats;
use crate::watches::{Watcher, Watches};
use verdict_base::Value;

/// Propagates every pending trail literal.
///
/// Returns the identifier of a conflicting clause, or `None` once the
/// propagation queue is drained. On conflict the propagation head is left
/// pointing at the literal that exposed the conflict, so a repeated call
/// without an intervening enqueue reports the same clause again.
pub fn propagate(
    db: &mut ClauseDb,
    watches: &mut Watches,
    assignment: &mut Assignment,
    stats: &mut SolverStats,
) -> Option<ClauseId> {
    while assignment.qhead() < assignment.trail_len() {
        let p = assignment.trail_lit(assignment.qhead());
        stats.propagations += 1;

        let false_lit = !p;
        let mut list = watches.take_list(false_lit);
        let mut conflict = None;
        let mut i = 0;
        let mut j = 0;

        'watchers: while i < list.len() {
            let watcher = list[i];
            i += 1;

            if db.get(watcher.clause).is_deleted() {
                continue;
            }

            // Blocker already true: the clause is satisfied, keep as-is.
            if assignment.value_of(watcher.blocker) == Value::True {
                list[j] = watcher;
                j += 1;
                continue;
            }

            let clause = db.get_mut(watcher.clause);
            let lits = clause.lits_mut();

            // Normalize so the falsified watch sits at position 1.
            if lits[0] == false_lit {
                lits.swap(0, 1);
            }
            debug_assert_eq!(lits[1], false_lit);
            let first = lits[0];

            if first != watcher.blocker && assignment.value_of(first) == Value::True {
                list[j] = Watcher { clause: watcher.clause, blocker: first };
                j += 1;
                continue;
            }

            // Look for a non-false replacement watch.
            for k in 2..lits.len() {
                if assignment.value_of(lits[k]) != Value::False {
                    lits[1] = lits[k];
                    lits[k] = false_lit;
                    let new_watch = lits[1];
                    watches.add(new_watch, Watcher { clause: watcher.clause, blocker: first });
                    continue 'watchers;
                }
            }

            // No replacement: the clause is unit or conflicting.
            list[j] = Watcher { clause: watcher.clause, blocker: first };
            j += 1;
            if assignment.value_of(first) == Value::False {
                conflict = Some(watcher.clause);
                while i < list.len() {
                    list[j] = list[i];
                    i += 1;
                    j += 1;
                }
            } else {
                let enqueued = assignment.enqueue(first, Some(watcher.clause));
                debug_assert!(enqueued);
            }
        }

        list.truncate(j);
        watches.restore_list(false_lit, list);

        if conflict.is_some() {
            return conflict;
        }
        assignment.advance_qhead();
    }
    None
}
