/*!
VSIDS branching: an activity heap over variables, plus phase saving.

Activities decay implicitly: rather than scaling every variable's activity
down each conflict, the *bump increment* is scaled up (`activity_increment /=
decay`), so a later bump outweighs an earlier one by the same ratio a
uniform decay would have produced. Periodic rescaling keeps the increment
and activities from overflowing (spec §4.6).
*/

use rand::seq::IteratorRandom;

use crate::config::Activity;
use crate::generic::index_heap::IndexHeap;
use crate::sat::literal::{Literal, Variable};

/// The VSIDS heap: a max-heap over variables keyed by activity, with phase
/// saving for the polarity to branch on next.
pub struct Vsids {
    heap: IndexHeap<Activity>,
    activity_increment: Activity,
    decay: Activity,
    rescale_threshold: Activity,

    /// `saved_phase[v - 1]`: the polarity `v` last held before being unassigned.
    saved_phase: Vec<bool>,
}

impl Vsids {
    pub fn new(decay: Activity, rescale_threshold: Activity) -> Self {
        Vsids {
            heap: IndexHeap::default(),
            activity_increment: 1.0,
            decay,
            rescale_threshold,
            saved_phase: Vec::new(),
        }
    }

    /// Register a fresh variable, active on the heap with zero activity and
    /// an initial saved phase of `true` (spec §4.6).
    pub fn add_variable(&mut self, variable: Variable) {
        let idx = (variable - 1) as usize;
        self.heap.add(idx, 0.0);
        self.heap.activate(idx);
        if self.saved_phase.len() <= idx {
            self.saved_phase.resize(idx + 1, true);
        }
    }

    /// Bump the activity of `variable` by the current increment.
    pub fn bump(&mut self, variable: Variable) {
        let idx = (variable - 1) as usize;
        self.heap
            .apply_to_value_at_value_index(idx, |old| old + self.activity_increment);
        self.heap.heapify_if_active(idx);
    }

    /// Scale the bump increment up for the next conflict, rescaling
    /// everything down if it would otherwise overflow.
    pub fn decay_increment(&mut self) {
        self.activity_increment /= self.decay;
        if self.activity_increment > self.rescale_threshold {
            let scale = 1e-100;
            self.heap.apply_to_all(|v| v * scale);
            self.activity_increment *= scale;
        }
    }

    /// Remove a variable from the heap when it is assigned (so it is not a
    /// decision candidate), recording its phase for future phase saving.
    pub fn assign(&mut self, variable: Variable) {
        self.heap.remove((variable - 1) as usize);
    }

    /// Return a variable to the heap when it is unassigned by backtracking,
    /// saving the phase it held.
    pub fn unassign(&mut self, variable: Variable, last_value: bool) {
        let idx = (variable - 1) as usize;
        if idx < self.saved_phase.len() {
            self.saved_phase[idx] = last_value;
        }
        self.heap.activate(idx);
    }

    /// Pop the highest-activity variable still on the heap (i.e. unassigned).
    /// `None` if every variable has a value.
    pub fn pop_highest_active(&mut self) -> Option<Variable> {
        let idx = self.heap.pop_max()?;
        Some((idx + 1) as Variable)
    }

    /// Pop a uniformly random variable from among those still unassigned,
    /// rather than the highest-activity one — the random-decision branch of
    /// VSIDS (spec §4.6), gated by `Config::random_decision_bias`.
    pub fn pop_random_active(&mut self, rng: &mut impl rand::Rng) -> Option<Variable> {
        let idx = *self.heap.active_indices().iter().choose(rng)?;
        self.heap.remove(idx);
        Some((idx + 1) as Variable)
    }

    /// The phase `variable` last held before being unassigned (`true` if it
    /// has never been assigned).
    pub fn saved_phase(&self, variable: Variable) -> bool {
        let idx = (variable - 1) as usize;
        self.saved_phase.get(idx).copied().unwrap_or(true)
    }

    /// Pop the highest-activity variable still on the heap, returning a
    /// literal at its saved phase. `None` if every variable has a value.
    pub fn pick_branch(&mut self) -> Option<Literal> {
        let variable = self.pop_highest_active()?;
        Some(Literal::new(variable, self.saved_phase(variable)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_highest_activity_first() {
        let mut v = Vsids::new(0.95, 1e100);
        v.add_variable(1);
        v.add_variable(2);
        v.add_variable(3);
        v.bump(2);
        v.bump(2);
        v.bump(3);

        assert_eq!(v.pick_branch().map(|l| l.variable()), Some(2));
        assert_eq!(v.pick_branch().map(|l| l.variable()), Some(3));
        assert_eq!(v.pick_branch().map(|l| l.variable()), Some(1));
        assert_eq!(v.pick_branch(), None);
    }

    #[test]
    fn phase_saving_remembers_last_polarity() {
        let mut v = Vsids::new(0.95, 1e100);
        v.add_variable(1);
        v.assign(1);
        v.unassign(1, false);
        assert_eq!(v.pick_branch(), Some(Literal::new(1, false)));
    }
}
