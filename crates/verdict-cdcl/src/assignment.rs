//! Assignment state: values, levels, reasons, and the trail.
//!
//! The trail records assigned literals in assignment order; `trail_lim[d]`
//! is the trail length at the start of decision level `d + 1`, so level-0
//! assignments occupy `[0, trail_lim[0])`. `qhead` points at the next trail
//! entry whose watch list has not been processed yet.

use crate::clause_db::ClauseId;
use verdict_base::{Lit, Value, Var};

/// The partial assignment and its trail.
#[derive(Debug)]
pub struct Assignment {
    values: Vec<Value>,
    levels: Vec<u32>,
    reasons: Vec<Option<ClauseId>>,
    /// Saved phase per variable; decisions reuse the last assigned polarity.
    polarity: Vec<bool>,
    trail: Vec<Lit>,
    trail_lim: Vec<usize>,
    qhead: usize,
}

impl Assignment {
    /// Creates an all-unassigned state over `num_vars` variables.
    ///
    /// The initial saved phase is `true` for every variable.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            values: vec![Value::Unassigned; num_vars],
            levels: vec![0; num_vars],
            reasons: vec![None; num_vars],
            polarity: vec![true; num_vars],
            trail: Vec::with_capacity(num_vars),
            trail_lim: Vec::new(),
            qhead: 0,
        }
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.values.len()
    }

    /// Returns the value of a variable.
    #[must_use]
    pub fn value_of_var(&self, var: Var) -> Value {
        self.values[var.index()]
    }

    /// Returns the value of a literal under the current assignment.
    #[must_use]
    pub fn value_of(&self, lit: Lit) -> Value {
        let value = self.values[lit.var().index()];
        if lit.is_positive() {
            value
        } else {
            !value
        }
    }

    /// Returns the decision level a variable was assigned at. Meaningful
    /// only while the variable is assigned.
    #[must_use]
    pub fn level(&self, var: Var) -> u32 {
        self.levels[var.index()]
    }

    /// Returns the antecedent clause of a variable, or `None` for decisions
    /// and level-0 units.
    #[must_use]
    pub fn reason(&self, var: Var) -> Option<ClauseId> {
        self.reasons[var.index()]
    }

    /// Returns the saved phase of a variable.
    #[must_use]
    pub fn saved_phase(&self, var: Var) -> bool {
        self.polarity[var.index()]
    }

    /// Returns the current decision level.
    #[must_use]
    pub fn decision_level(&self) -> u32 {
        self.trail_lim.len() as u32
    }

    /// Opens a new decision level.
    pub fn new_decision_level(&mut self) {
        self.trail_lim.push(self.trail.len());
    }

    /// Enqueues a literal with the given antecedent.
    ///
    /// Returns `false` when the literal is already false (a contradiction at
    /// the current level); an already-true literal is a no-op.
    pub fn enqueue(&mut self, lit: Lit, reason: Option<ClauseId>) -> bool {
        match self.value_of(lit) {
            Value::True => true,
            Value::False => false,
            Value::Unassigned => {
                let var = lit.var();
                self.values[var.index()] = Value::from_bool(lit.is_positive());
                self.levels[var.index()] = self.decision_level();
                self.reasons[var.index()] = reason;
                self.trail.push(lit);
                true
            }
        }
    }

    /// Returns the trail length.
    #[must_use]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Returns the trail literal at `index`.
    #[must_use]
    pub fn trail_lit(&self, index: usize) -> Lit {
        self.trail[index]
    }

    /// Returns the whole trail, in assignment order.
    #[must_use]
    pub fn trail(&self) -> &[Lit] {
        &self.trail
    }

    pub(crate) fn qhead(&self) -> usize {
        self.qhead
    }

    pub(crate) fn advance_qhead(&mut self) {
        self.qhead += 1;
    }

    /// Undoes all assignments above `level`, saving phases and reporting
    /// each unassigned variable through `on_unassign`.
    pub fn cancel_until(&mut self, level: u32, mut on_unassign: impl FnMut(Var)) {
        if self.decision_level() <= level {
            return;
        }
        let target = self.trail_lim[level as usize];
        while self.trail.len() > target {
            let Some(lit) = self.trail.pop() else { break };
            let var = lit.var();
            self.polarity[var.index()] = lit.is_positive();
            self.values[var.index()] = Value::Unassigned;
            self.reasons[var.index()] = None;
            on_unassign(var);
        }
        self.qhead = self.trail.len();
        self.trail_lim.truncate(level as usize);
    }

    /// Extracts a total model. Variables never assigned default to `true`.
    #[must_use]
    pub fn model(&self) -> Vec<bool> {
        self.values
            .iter()
            .map(|v| !matches!(v, Value::False))
            .collect()
    }
}
