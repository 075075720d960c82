//! Per-literal watcher lists.
//!
//! A clause of length >= 2 is filed in the watch lists of its first two
//! literals. Each entry carries a blocker literal from the same clause; when
//! the blocker is already true the clause is satisfied and propagation can
//! skip it without touching clause memory.

use crate::clause_db::ClauseId;
use verdict_base::Lit;

/// A watched-clause entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watcher {
    /// The clause being watched.
    pub clause: ClauseId,
    /// A literal of the clause other than the one this entry is filed under.
    pub blocker: Lit,
}

/// Watcher lists indexed by literal slot.
#[derive(Debug)]
pub struct Watches {
    lists: Vec<Vec<Watcher>>,
}

impl Watches {
    /// Creates empty watch lists for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            lists: vec![Vec::new(); num_vars * 2],
        }
    }

    /// Files the two watchers of a clause whose first literals are
    /// `first` and `second`, each blocking on the other.
    pub fn watch_clause(&mut self, clause: ClauseId, first: Lit, second: Lit) {
        debug_assert_ne!(first, second);
        self.add(first, Watcher { clause, blocker: second });
        self.add(second, Watcher { clause, blocker: first });
    }

    /// Appends a watcher to the list of `lit`.
    pub fn add(&mut self, lit: Lit, watcher: Watcher) {
        self.lists[lit.index()].push(watcher);
    }

    /// Returns the watcher list of `lit`.
    #[must_use]
    pub fn list(&self, lit: Lit) -> &[Watcher] {
        &self.lists[lit.index()]
    }

    /// Detaches the watcher list of `lit` for in-place compaction.
    pub(crate) fn take_list(&mut self, lit: Lit) -> Vec<Watcher> {
        std::mem::take(&mut self.lists[lit.index()])
    }

    /// Restores a previously taken list.
    pub(crate) fn restore_list(&mut self, lit: Lit, list: Vec<Watcher>) {
        debug_assert!(self.lists[lit.index()].is_empty());
        self.lists[lit.index()] = list;
    }
}
