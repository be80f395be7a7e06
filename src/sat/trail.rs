/*!
The assignment trail.

Records, in chronological order, every variable assignment made during a
solve — whether by decision or by propagation — together with O(1) lookup
tables so the rest of the solver can ask "what is this variable's value /
decision level / reason clause / trail position" without a scan.
*/

use crate::sat::clause::ClauseRef;
use crate::sat::literal::{Literal, Variable};

/// A single entry on the trail: `reason == None` iff this assignment was a
/// decision (spec §3 invariant).
#[derive(Clone, Copy, Debug)]
pub struct Assignment {
    pub variable: Variable,
    pub value: bool,
    pub level: u32,
    pub reason: Option<ClauseRef>,
    pub trail_index: usize,
}

impl Assignment {
    pub fn is_decision(&self) -> bool {
        self.reason.is_none()
    }
}

/// The chronological assignment trail plus per-variable lookup tables.
#[derive(Default)]
pub struct AssignmentTrail {
    /// Assignments in the order they were made.
    entries: Vec<Assignment>,

    /// `value_of[v - 1]`: the current value of variable `v`, if assigned.
    value_of: Vec<Option<bool>>,

    /// `level_of[v - 1]`: the decision level at which `v` was assigned.
    level_of: Vec<u32>,

    /// `reason_of[v - 1]`: the reason clause for `v`'s assignment, if any.
    reason_of: Vec<Option<ClauseRef>>,

    /// `trail_index_of[v - 1]`: the position of `v`'s assignment on `entries`.
    trail_index_of: Vec<usize>,

    /// `level_starts[d]`: the trail index at which decision level `d` began.
    /// `current_level() == level_starts.len() - 1`.
    level_starts: Vec<usize>,
}

impl AssignmentTrail {
    /// Build a trail sized for `num_variables` variables, starting at level 0.
    pub fn new(num_variables: usize) -> Self {
        AssignmentTrail {
            entries: Vec::new(),
            value_of: vec![None; num_variables],
            level_of: vec![0; num_variables],
            reason_of: vec![None; num_variables],
            trail_index_of: vec![0; num_variables],
            level_starts: vec![0],
        }
    }

    /// Grow the per-variable tables to accommodate a newly allocated variable.
    pub fn grow_to(&mut self, num_variables: usize) {
        self.value_of.resize(num_variables, None);
        self.level_of.resize(num_variables, 0);
        self.reason_of.resize(num_variables, None);
        self.trail_index_of.resize(num_variables, 0);
    }

    /// The current decision level (`0` at the root).
    pub fn current_level(&self) -> u32 {
        (self.level_starts.len() - 1) as u32
    }

    /// Number of assignments on the trail.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in chronological order.
    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    /// The entry at a given trail index.
    pub fn entry_at(&self, trail_index: usize) -> &Assignment {
        &self.entries[trail_index]
    }

    /// The value of `variable`, if assigned.
    pub fn value_of(&self, variable: Variable) -> Option<bool> {
        self.value_of[(variable - 1) as usize]
    }

    /// Whether `literal` is satisfied (`Some(true)`), falsified (`Some(false)`),
    /// or unassigned (`None`) on the current trail.
    pub fn value_of_literal(&self, literal: Literal) -> Option<bool> {
        self.value_of(literal.variable())
            .map(|v| v == literal.polarity())
    }

    /// The decision level at which `variable` was assigned. Meaningless if unassigned.
    pub fn level_of(&self, variable: Variable) -> u32 {
        self.level_of[(variable - 1) as usize]
    }

    /// The reason clause for `variable`'s assignment, if it was a propagation.
    pub fn reason_of(&self, variable: Variable) -> Option<ClauseRef> {
        self.reason_of[(variable - 1) as usize]
    }

    /// The trail index of `variable`'s assignment.
    pub fn trail_index_of(&self, variable: Variable) -> usize {
        self.trail_index_of[(variable - 1) as usize]
    }

    /// Push a new assignment onto the trail, recording it in the lookup tables.
    pub fn assign(&mut self, literal: Literal, reason: Option<ClauseRef>) {
        let variable = literal.variable();
        let level = self.current_level();
        let trail_index = self.entries.len();

        self.value_of[(variable - 1) as usize] = Some(literal.polarity());
        self.level_of[(variable - 1) as usize] = level;
        self.reason_of[(variable - 1) as usize] = reason;
        self.trail_index_of[(variable - 1) as usize] = trail_index;

        self.entries.push(Assignment {
            variable,
            value: literal.polarity(),
            level,
            reason,
            trail_index,
        });
    }

    /// Open a new decision level starting at the current trail length.
    pub fn push_level(&mut self) {
        self.level_starts.push(self.entries.len());
    }

    /// `level_starts[d]`, the trail index at which decision level `d` began.
    pub fn level_starts(&self, level: u32) -> usize {
        self.level_starts[level as usize]
    }

    /// Undo every assignment made at a level strictly greater than `level`,
    /// returning the unassigned variables in reverse-chronological order (so
    /// callers can update phase-saving / VSIDS heap membership).
    pub fn backtrack_to(&mut self, level: u32) -> Vec<Variable> {
        let cut = self.level_starts[(level + 1) as usize..]
            .first()
            .copied()
            .unwrap_or(self.entries.len());

        let mut undone = Vec::with_capacity(self.entries.len() - cut);
        while self.entries.len() > cut {
            let entry = self.entries.pop().unwrap();
            self.value_of[(entry.variable - 1) as usize] = None;
            self.reason_of[(entry.variable - 1) as usize] = None;
            undone.push(entry.variable);
        }
        self.level_starts.truncate((level + 1) as usize);
        undone
    }

    /// True once every variable has a value (the trail is a complete model).
    pub fn is_complete(&self) -> bool {
        self.value_of.iter().all(Option::is_some)
    }

    /// Extract a dense model, indexed `variable - 1`. Unassigned variables
    /// (possible only if called before completion) default to `false`.
    pub fn model(&self) -> Vec<bool> {
        self.value_of.iter().map(|v| v.unwrap_or(false)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtrack_to_zero_leaves_one_level_start() {
        let mut trail = AssignmentTrail::new(4);
        trail.assign(Literal::new(1, true), None);
        trail.push_level();
        trail.assign(Literal::new(2, true), None);
        trail.push_level();
        trail.assign(Literal::new(3, false), None);

        assert_eq!(trail.current_level(), 2);
        trail.backtrack_to(0);
        assert_eq!(trail.current_level(), 0);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail.value_of(1), Some(true));
        assert_eq!(trail.value_of(2), None);
    }

    #[test]
    fn reason_none_iff_decision() {
        let mut trail = AssignmentTrail::new(2);
        trail.assign(Literal::new(1, true), None);
        trail.push_level();
        trail.assign(Literal::new(2, false), Some(ClauseRef(0)));

        assert!(trail.entry_at(0).is_decision());
        assert!(!trail.entry_at(1).is_decision());
    }
}
