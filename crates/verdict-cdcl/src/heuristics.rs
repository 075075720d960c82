//! VSIDS decision heuristic.
//!
//! Variable activities decay geometrically and are bumped whenever a
//! variable participates in conflict analysis. Branching picks the
//! highest-activity unassigned variable from a binary max-heap. Deletion is
//! lazy: assigned variables may linger in the heap and are filtered out when
//! popped; backtracking reinserts whatever it unassigns.

use verdict_base::Var;

const VAR_ACTIVITY_LIMIT: f64 = 1e100;
const VAR_ACTIVITY_RESCALE: f64 = 1e-100;

/// Activity-ordered max-heap over variables.
///
/// A position index per variable gives O(log n) key updates and an O(1)
/// membership test.
#[derive(Debug)]
pub struct VsidsHeap {
    heap: Vec<Var>,
    /// Heap position per variable, or -1 when absent.
    indices: Vec<i32>,
    activity: Vec<f64>,
    var_inc: f64,
    var_decay: f64,
}

impl VsidsHeap {
    /// Creates a heap containing every one of the `num_vars` variables,
    /// all at activity zero.
    #[must_use]
    pub fn new(num_vars: usize, var_decay: f64) -> Self {
        let mut heap = Self {
            heap: Vec::with_capacity(num_vars),
            indices: vec![-1; num_vars],
            activity: vec![0.0; num_vars],
            var_inc: 1.0,
            var_decay,
        };
        for i in 0..num_vars {
            heap.insert(Var::new(i as u32));
        }
        heap
    }

    /// Returns whether `var` is currently in the heap.
    #[must_use]
    pub fn contains(&self, var: Var) -> bool {
        self.indices[var.index()] >= 0
    }

    /// Returns the activity of `var`.
    #[must_use]
    pub fn activity(&self, var: Var) -> f64 {
        self.activity[var.index()]
    }

    /// Returns the number of entries currently in the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Bumps the activity of `var`, rescaling all activities when they grow
    /// too large, and restores heap order if `var` is present.
    pub fn bump(&mut self, var: Var) {
        self.activity[var.index()] += self.var_inc;
        if self.activity[var.index()] > VAR_ACTIVITY_LIMIT {
            for activity in &mut self.activity {
                *activity *= VAR_ACTIVITY_RESCALE;
            }
            self.var_inc *= VAR_ACTIVITY_RESCALE;
        }
        if self.contains(var) {
            self.sift_up(self.indices[var.index()] as usize);
        }
    }

    /// Applies the activity decay, once per conflict.
    pub fn decay(&mut self) {
        self.var_inc /= self.var_decay;
    }

    /// Inserts `var` if absent.
    pub fn insert(&mut self, var: Var) {
        if self.contains(var) {
            return;
        }
        self.indices[var.index()] = self.heap.len() as i32;
        self.heap.push(var);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the variable with maximal activity.
    pub fn pop_max(&mut self) -> Option<Var> {
        let top = *self.heap.first()?;
        self.indices[top.index()] = -1;
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        self.heap.pop();
        if !self.heap.is_empty() {
            self.indices[self.heap[0].index()] = 0;
            self.sift_down(0);
        }
        Some(top)
    }

    fn sift_up(&mut self, mut i: usize) {
        let var = self.heap[i];
        while i > 0 {
            let parent = (i - 1) >> 1;
            if self.activity[var.index()] <= self.activity[self.heap[parent].index()] {
                break;
            }
            self.heap[i] = self.heap[parent];
            self.indices[self.heap[i].index()] = i as i32;
            i = parent;
        }
        self.heap[i] = var;
        self.indices[var.index()] = i as i32;
    }

    fn sift_down(&mut self, mut i: usize) {
        let var = self.heap[i];
        loop {
            let left = i * 2 + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let child = if right < self.heap.len()
                && self.activity[self.heap[right].index()] > self.activity[self.heap[left].index()]
            {
                right
            } else {
                left
            };
            if self.activity[self.heap[child].index()] <= self.activity[var.index()] {
                break;
            }
            self.heap[i] = self.heap[child];
            self.indices[self.heap[i].index()] = i as i32;
            i = child;
        }
        self.heap[i] = var;
        self.indices[var.index()] = i as i32;
    }
}
