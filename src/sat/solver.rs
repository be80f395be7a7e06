/*!
The CDCL search procedure: watched-literal propagation, first-UIP conflict
analysis, VSIDS branching with phase saving, Luby restarts, and activity-based
clause database reduction (spec §4.6).

# Main loop

```text
loop:
    conflict = propagate()
    if conflict:
        if level == 0: return UNSAT
        (learnt, btLevel) = analyze(conflict)
        backtrack(btLevel)
        enqueue the asserted literal, with the learnt clause (or None, if unit) as reason
        decay heuristics; maybe restart; maybe reduce
    else:
        if trail complete: return SAT
        decide()
```
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::generic::luby::Luby;
use crate::log_targets as targets;
use crate::sat::clause::{Clause, ClauseRef};
use crate::sat::clause_db::ClauseDatabase;
use crate::sat::literal::{Literal, Variable};
use crate::sat::report::Report;
use crate::sat::trail::AssignmentTrail;
use crate::sat::vsids::Vsids;

/// A single search, over a growable pool of propositional variables.
pub struct Solver {
    config: Config,
    db: ClauseDatabase,
    trail: AssignmentTrail,
    vsids: Vsids,
    rng: StdRng,
    num_variables: usize,

    /// Index of the next trail entry to propagate (the BCP queue head).
    q_head: usize,

    /// Whether an empty clause has been added — an unconditional conflict.
    fundamental_conflict: bool,

    luby: Luby,
    conflicts_since_restart: u32,
    restart_threshold: u32,
    reduction_budget: u32,

    /// A cooperative cancellation flag, checked at restart boundaries (spec §5).
    cancel: Arc<AtomicBool>,
}

enum WatchOutcome {
    /// The other watched literal is already satisfied; no change needed.
    Satisfied,
    /// `neg_p` was replaced as a watch by the returned literal.
    Moved(Literal),
    /// No replacement literal exists and the other watch is unassigned: propagate it.
    Unit(Literal),
    /// No replacement literal exists and the other watch is falsified: conflict.
    Conflict,
}

/// Re-examine a clause watching `neg_p` after `neg_p` was falsified, looking
/// for a new literal to watch in its place.
fn rewatch(clause: &mut Clause, neg_p: Literal, trail: &AssignmentTrail) -> WatchOutcome {
    let neg_pos = if clause.literals[0] == neg_p { 0 } else { 1 };
    let other_pos = 1 - neg_pos;
    let other = clause.literals[other_pos];

    if trail.value_of_literal(other) == Some(true) {
        return WatchOutcome::Satisfied;
    }

    for idx in 2..clause.literals.len() {
        if trail.value_of_literal(clause.literals[idx]) != Some(false) {
            clause.literals.swap(neg_pos, idx);
            return WatchOutcome::Moved(clause.literals[neg_pos]);
        }
    }

    match trail.value_of_literal(other) {
        None => WatchOutcome::Unit(other),
        Some(false) => WatchOutcome::Conflict,
        Some(true) => unreachable!("handled above"),
    }
}

impl Solver {
    /// Build a solver with `num_variables` pre-allocated variables and the given configuration.
    pub fn new(num_variables: usize, config: Config) -> Self {
        Self::with_cancel_handle(num_variables, config, Arc::new(AtomicBool::new(false)))
    }

    /// As [Self::new], but sharing a caller-owned cancellation flag rather
    /// than allocating a fresh one — used by
    /// [EnumerationSession](crate::instance::session::EnumerationSession),
    /// which rebuilds a solver per enumeration step but wants one flag a
    /// caller can set before any of those steps start (spec §5).
    pub fn with_cancel_handle(num_variables: usize, config: Config, cancel: Arc<AtomicBool>) -> Self {
        let mut db = ClauseDatabase::new();
        db.grow_to(num_variables);
        let mut vsids = Vsids::new(config.atom_db.decay.value, config.atom_db.rescale_threshold.value);
        for v in 1..=num_variables as Variable {
            vsids.add_variable(v);
        }

        let rng = StdRng::seed_from_u64(config.seed.value);

        Solver {
            reduction_budget: config.clause_db.reduction_budget.value,
            luby: Luby::default(),
            restart_threshold: config.luby_base.value,
            conflicts_since_restart: 0,
            trail: AssignmentTrail::new(num_variables),
            db,
            vsids,
            rng,
            num_variables,
            q_head: 0,
            fundamental_conflict: false,
            config,
            cancel,
        }
    }

    /// A shared handle that can be used to cooperatively cancel an in-progress solve (spec §5).
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Allocate a fresh variable, growing every structure that is indexed by variable.
    pub fn fresh_variable(&mut self) -> Variable {
        self.num_variables += 1;
        let v = self.num_variables as Variable;
        self.db.grow_to(self.num_variables);
        self.trail.grow_to(self.num_variables);
        self.vsids.add_variable(v);
        v
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Add a clause to the formula. An empty clause is permitted and marks the
    /// formula unconditionally unsatisfiable (spec §4.1); a unit clause is
    /// asserted immediately as a level-0 propagation.
    pub fn add_clause(&mut self, literals: Vec<Literal>) {
        if literals.is_empty() {
            self.fundamental_conflict = true;
            return;
        }
        if literals.len() == 1 {
            let lit = literals[0];
            match self.trail.value_of_literal(lit) {
                Some(true) => {}
                Some(false) => self.fundamental_conflict = true,
                None => {
                    self.vsids.assign(lit.variable());
                    self.trail.assign(lit, None);
                }
            }
            self.db.add_original(literals);
            return;
        }
        self.db.add_original(literals);
    }

    /// Run the main CDCL loop to completion (or until cancelled).
    pub fn solve(&mut self) -> Report {
        if self.fundamental_conflict {
            return Report::Unsatisfiable;
        }

        loop {
            match self.propagate() {
                Some(conflict) => {
                    if self.trail.current_level() == 0 {
                        return Report::Unsatisfiable;
                    }

                    let (learned, backtrack_level, lbd) = self.analyze_conflict(conflict);
                    self.backtrack(backtrack_level);

                    let asserted = learned[0];
                    if learned.len() == 1 {
                        self.db.add_learned(learned, lbd);
                        self.vsids.assign(asserted.variable());
                        self.trail.assign(asserted, None);
                    } else {
                        let cref = self.db.add_learned(learned, lbd);
                        self.vsids.assign(asserted.variable());
                        self.trail.assign(asserted, Some(cref));
                    }

                    self.vsids.decay_increment();
                    self.conflicts_since_restart += 1;

                    if self.config.restart.value
                        && self.conflicts_since_restart >= self.restart_threshold
                    {
                        log::trace!(target: targets::RESTART, "restart after {} conflicts", self.conflicts_since_restart);
                        self.backtrack(0);
                        self.conflicts_since_restart = 0;
                        self.restart_threshold =
                            self.luby.next().unwrap_or(1) * self.config.luby_base.value;

                        if self.cancel.load(Ordering::Relaxed) {
                            return Report::Unknown("cancelled".to_string());
                        }
                    }

                    if self.db.learned_count() as u32 > self.reduction_budget {
                        log::trace!(target: targets::REDUCTION, "reducing clause database");
                        self.db.reduce(0.5, self.config.clause_db.lbd_bound.value);
                        self.reduction_budget = ((self.reduction_budget as f64)
                            * self.config.clause_db.budget_growth.value)
                            as u32;
                    }
                }

                None => {
                    if self.trail.is_complete() {
                        return Report::Satisfiable(self.trail.model());
                    }
                    match self.decide() {
                        Some(lit) => {
                            self.trail.push_level();
                            self.vsids.assign(lit.variable());
                            self.trail.assign(lit, None);
                        }
                        None => return Report::Satisfiable(self.trail.model()),
                    }
                }
            }
        }
    }

    /// Propagate every literal currently queued on the trail, returning the
    /// first conflicting clause encountered, if any.
    fn propagate(&mut self) -> Option<ClauseRef> {
        while self.q_head < self.trail.len() {
            let entry = *self.trail.entry_at(self.q_head);
            self.q_head += 1;
            let p = Literal::new(entry.variable, entry.value);
            log::trace!(target: targets::PROPAGATION, "propagating {p}");
            if let Some(conflict) = self.propagate_literal(p) {
                return Some(conflict);
            }
        }
        None
    }

    fn propagate_literal(&mut self, p: Literal) -> Option<ClauseRef> {
        let neg_p = p.negate();
        let watch_list = std::mem::take(self.db.watches_of_mut(neg_p));
        let mut keep = Vec::with_capacity(watch_list.len());
        let mut moved: Vec<(Literal, ClauseRef)> = Vec::new();
        let mut conflict = None;

        for cref in watch_list {
            if conflict.is_some() {
                keep.push(cref);
                continue;
            }

            let outcome = {
                let clause = self
                    .db
                    .get_mut(cref)
                    .expect("watch list only references live clauses");
                rewatch(clause, neg_p, &self.trail)
            };

            match outcome {
                WatchOutcome::Satisfied => keep.push(cref),
                WatchOutcome::Moved(new_watch) => moved.push((new_watch, cref)),
                WatchOutcome::Unit(lit) => {
                    keep.push(cref);
                    self.vsids.assign(lit.variable());
                    self.trail.assign(lit, Some(cref));
                }
                WatchOutcome::Conflict => {
                    keep.push(cref);
                    conflict = Some(cref);
                }
            }
        }

        *self.db.watches_of_mut(neg_p) = keep;
        for (lit, cref) in moved {
            self.db.watches_of_mut(lit).push(cref);
        }
        conflict
    }

    /// First-UIP conflict analysis (spec §4.6). Returns the learned clause
    /// (asserted literal at index `0`, backtrack-level literal at index `1`),
    /// the backtrack level, and the clause's LBD.
    fn analyze_conflict(&mut self, conflict: ClauseRef) -> (Vec<Literal>, u32, crate::config::LBD) {
        let current_level = self.trail.current_level();
        let mut seen = vec![false; self.num_variables];
        let mut learned: Vec<Literal> = Vec::new();
        let mut path_count: i64 = 0;
        let mut trail_idx = self.trail.len();
        let mut reason: Option<ClauseRef> = Some(conflict);
        let mut pivot: Option<Literal> = None;

        loop {
            let reason_literals: Vec<Literal> = match reason {
                Some(r) => self.db.get(r).expect("reason clause is live").literals.clone(),
                None => Vec::new(),
            };

            for lit in reason_literals {
                if Some(lit) == pivot {
                    continue;
                }
                let var = lit.variable();
                let idx = (var - 1) as usize;
                if seen[idx] {
                    continue;
                }
                seen[idx] = true;
                self.vsids.bump(var);

                let level = self.trail.level_of(var);
                if level == current_level {
                    path_count += 1;
                } else if level > 0 {
                    learned.push(lit);
                }
                // level-0 literals are permanently implied; they contribute
                // nothing to the learned clause.
            }

            loop {
                trail_idx -= 1;
                let entry = self.trail.entry_at(trail_idx);
                if seen[(entry.variable - 1) as usize] {
                    break;
                }
            }

            let entry = *self.trail.entry_at(trail_idx);
            seen[(entry.variable - 1) as usize] = false;
            path_count -= 1;
            pivot = Some(Literal::new(entry.variable, entry.value));

            if path_count == 0 {
                break;
            }
            reason = entry.reason;
        }

        let uip = pivot.expect("first-UIP analysis always identifies a pivot").negate();
        learned.insert(0, uip);

        let backtrack_level = if learned.len() == 1 {
            0
        } else {
            let mut best_idx = 1;
            let mut best_level = self.trail.level_of(learned[1].variable());
            for (idx, lit) in learned.iter().enumerate().skip(2) {
                let level = self.trail.level_of(lit.variable());
                if level > best_level {
                    best_level = level;
                    best_idx = idx;
                }
            }
            learned.swap(1, best_idx);
            best_level
        };

        let lbd = self.compute_lbd(&learned);
        log::trace!(target: targets::ANALYSIS, "learned {learned:?} (lbd {lbd}, backtrack to {backtrack_level})");
        (learned, backtrack_level, lbd)
    }

    fn compute_lbd(&self, literals: &[Literal]) -> crate::config::LBD {
        let mut levels: Vec<u32> = literals.iter().map(|l| self.trail.level_of(l.variable())).collect();
        levels.sort_unstable();
        levels.dedup();
        levels.len().min(crate::config::LBD::MAX as usize) as crate::config::LBD
    }

    /// Undo the trail back to `level`, restoring heap membership and phase
    /// saving for every unassigned variable, and rewinding the BCP queue.
    fn backtrack(&mut self, level: u32) {
        let current = self.trail.current_level();
        if level >= current {
            return;
        }
        let cut = self.trail.level_starts(level + 1);
        let phases: Vec<(Variable, bool)> = self.trail.entries()[cut..]
            .iter()
            .map(|entry| (entry.variable, entry.value))
            .collect();
        self.trail.backtrack_to(level);
        for (var, phase) in phases {
            self.vsids.unassign(var, phase);
        }
        self.q_head = self.trail.len();
    }

    /// Choose a branching variable and polarity. With probability
    /// `random_decision_bias` a uniformly random unassigned variable is
    /// chosen instead of the highest-activity one; the polarity then follows
    /// the saved phase unless `phase_saving` is off, in which case it's drawn
    /// from `polarity_lean` (spec §4.6).
    fn decide(&mut self) -> Option<Literal> {
        let random_decision = self.rng.random_bool(self.config.random_decision_bias.value);
        let variable = if random_decision {
            self.vsids.pop_random_active(&mut self.rng)
        } else {
            self.vsids.pop_highest_active()
        }?;

        let phase = match self.config.phase_saving.value {
            true => self.vsids.saved_phase(variable),
            false => self.rng.random_bool(self.config.polarity_lean.value),
        };

        let lit = Literal::new(variable, phase);
        log::trace!(target: targets::DECISION, "deciding {lit}");
        Some(lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: Variable, pol: bool) -> Literal {
        Literal::new(v, pol)
    }

    #[test]
    fn unsat_two_variable_contradiction() {
        // {(1 2),(-1 2),(1 -2),(-1 -2)} over 2 variables -> UNSAT (spec §8 scenario 5).
        let mut solver = Solver::new(2, Config::default());
        solver.add_clause(vec![lit(1, true), lit(2, true)]);
        solver.add_clause(vec![lit(1, false), lit(2, true)]);
        solver.add_clause(vec![lit(1, true), lit(2, false)]);
        solver.add_clause(vec![lit(1, false), lit(2, false)]);
        assert!(solver.solve().is_unsatisfiable());
    }

    #[test]
    fn sat_forces_unit_then_blocks_other_model() {
        // {(1 2 3),(-1),(-2)} -> SAT with 3=true; blocking (-3) -> UNSAT (spec §8 scenario 6).
        let mut solver = Solver::new(3, Config::default());
        solver.add_clause(vec![lit(1, true), lit(2, true), lit(3, true)]);
        solver.add_clause(vec![lit(1, false)]);
        solver.add_clause(vec![lit(2, false)]);

        match solver.solve() {
            Report::Satisfiable(model) => {
                assert!(model[2], "variable 3 must be forced true");
            }
            other => panic!("expected SAT, got {other}"),
        }

        solver.add_clause(vec![lit(3, false)]);
        assert!(solver.solve().is_unsatisfiable());
    }

    #[test]
    fn single_variable_clause_is_a_level_zero_unit() {
        let mut solver = Solver::new(1, Config::default());
        solver.add_clause(vec![lit(1, true)]);
        match solver.solve() {
            Report::Satisfiable(model) => assert!(model[0]),
            other => panic!("expected SAT, got {other}"),
        }
    }

    #[test]
    fn empty_clause_is_unconditionally_unsat() {
        let mut solver = Solver::new(1, Config::default());
        solver.add_clause(vec![]);
        assert!(solver.solve().is_unsatisfiable());
    }

    #[test]
    fn pigeonhole_three_into_two_is_unsat() {
        // 3 pigeons, 2 holes: var(p, h) = p*2 + h + 1 for p in 0..3, h in 0..2.
        let var = |p: usize, h: usize| -> Variable { (p * 2 + h + 1) as Variable };
        let mut solver = Solver::new(6, Config::default());
        for p in 0..3 {
            solver.add_clause(vec![lit(var(p, 0), true), lit(var(p, 1), true)]);
        }
        for h in 0..2 {
            for p1 in 0..3 {
                for p2 in (p1 + 1)..3 {
                    solver.add_clause(vec![lit(var(p1, h), false), lit(var(p2, h), false)]);
                }
            }
        }
        assert!(solver.solve().is_unsatisfiable());
    }
}
