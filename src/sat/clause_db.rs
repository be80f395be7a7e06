/*!
The clause database: storage for all clauses plus per-literal watch lists.

Clauses are stored in one arena, original clauses first, learned clauses
appended afterwards (`num_original` records the split point, spec §3).
Deleted clauses are tombstoned in place — their slot is marked `is_deleted`
rather than removed — so that [ClauseRef]s recorded elsewhere (e.g. as a
trail entry's reason) never dangle.

A clause is watched by exactly its first two literals once it has two or
more literals (spec §3's watch invariant); unit clauses aren't watched at
all, since spec §4.6 handles them by immediate level-0 propagation instead.
*/

use crate::error::ClauseDbError;
use crate::sat::clause::{Clause, ClauseRef};
use crate::sat::literal::Literal;

/// All clauses of a solve, plus their watch lists.
#[derive(Default)]
pub struct ClauseDatabase {
    clauses: Vec<Clause>,

    /// The number of original (non-learned) clauses; `clauses[..num_original]`
    /// are the original formula, the rest are learned.
    num_original: usize,

    /// `watches[literal.index()]`: clauses currently watching `literal`.
    watches: Vec<Vec<ClauseRef>>,
}

impl ClauseDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the watch-list vector can index literals over `num_variables` variables.
    pub fn grow_to(&mut self, num_variables: usize) {
        self.watches.resize_with(num_variables * 2, Vec::new);
    }

    /// Number of original clauses.
    pub fn num_original(&self) -> usize {
        self.num_original
    }

    /// Number of non-deleted learned clauses.
    pub fn learned_count(&self) -> usize {
        self.clauses[self.num_original..]
            .iter()
            .filter(|c| !c.is_deleted)
            .count()
    }

    /// Borrow a clause by reference.
    pub fn get(&self, r: ClauseRef) -> Result<&Clause, ClauseDbError> {
        self.clauses.get(r.0).ok_or(ClauseDbError::InvalidRef)
    }

    /// Mutably borrow a clause by reference.
    pub fn get_mut(&mut self, r: ClauseRef) -> Result<&mut Clause, ClauseDbError> {
        self.clauses.get_mut(r.0).ok_or(ClauseDbError::InvalidRef)
    }

    /// Watch list for a literal (clauses falsified by this literal's negation
    /// trigger inspection of this list — spec §4.6).
    pub fn watches_of(&self, literal: Literal) -> &[ClauseRef] {
        &self.watches[literal.index()]
    }

    pub fn watches_of_mut(&mut self, literal: Literal) -> &mut Vec<ClauseRef> {
        &mut self.watches[literal.index()]
    }

    fn watch(&mut self, literal: Literal, r: ClauseRef) {
        self.watches[literal.index()].push(r);
    }

    /// Add an original clause, registering its watches if it has two or more
    /// literals. Empty clauses are permitted (§4.1) and signal unconditional
    /// unsatisfiability to the caller; unit clauses are stored but unwatched.
    pub fn add_original(&mut self, literals: Vec<Literal>) -> ClauseRef {
        self.add(Clause::original(literals), false)
    }

    /// Add a learned clause, registering its watches.
    pub fn add_learned(&mut self, literals: Vec<Literal>, lbd: crate::config::LBD) -> ClauseRef {
        self.add(Clause::learned(literals, lbd), true)
    }

    fn add(&mut self, clause: Clause, learned: bool) -> ClauseRef {
        if !learned {
            debug_assert_eq!(
                self.clauses.len(),
                self.num_original,
                "original clauses must be added before any learned clause"
            );
        }

        let watched = clause.watched_pair();
        let r = ClauseRef(self.clauses.len());
        self.clauses.push(clause);
        if !learned {
            self.num_original += 1;
        }
        if let Some((a, b)) = watched {
            self.watch(a, r);
            self.watch(b, r);
        }
        r
    }

    /// Remove `r`'s watches for literals `a` and `b` (its watched pair prior
    /// to a watch update or deletion).
    pub fn unwatch(&mut self, literal: Literal, r: ClauseRef) {
        if let Some(pos) = self.watches[literal.index()].iter().position(|x| *x == r) {
            self.watches[literal.index()].swap_remove(pos);
        }
    }

    /// Clause database reduction (spec §4.6): sort non-deleted learned clauses
    /// by activity descending, tombstone the bottom `keep_ratio` fraction
    /// (rounded down), and drop their watches. Clauses at or below
    /// `lbd_bound` are protected from removal.
    pub fn reduce(&mut self, keep_ratio: f64, lbd_bound: crate::config::LBD) {
        let mut learned_refs: Vec<ClauseRef> = (self.num_original..self.clauses.len())
            .map(ClauseRef)
            .filter(|r| !self.clauses[r.0].is_deleted && self.clauses[r.0].lbd > lbd_bound)
            .collect();

        learned_refs.sort_by(|a, b| {
            self.clauses[b.0]
                .activity
                .partial_cmp(&self.clauses[a.0].activity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let keep = (learned_refs.len() as f64 * keep_ratio).floor() as usize;
        for r in learned_refs.into_iter().skip(keep) {
            self.delete(r);
        }
    }

    fn delete(&mut self, r: ClauseRef) {
        if let Some((a, b)) = self.clauses[r.0].watched_pair() {
            self.unwatch(a, r);
            self.unwatch(b, r);
        }
        self.clauses[r.0].is_deleted = true;
    }

    /// Iterate over all non-deleted original clauses.
    pub fn original_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses[..self.num_original].iter().filter(|c| !c.is_deleted)
    }

    /// Iterate over every non-deleted clause (original and learned).
    pub fn all_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| !c.is_deleted)
    }
}
