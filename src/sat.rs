//! Watched-literal DPLL enumerator: a lazy, deterministic sequence of
//! satisfying models over signed package-id literals (spec.md §4.4).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::pool::{Literal, PackageId};

/// A clause: a non-empty disjunction of literals.
pub type Clause = Vec<Literal>;

fn variable_of(literal: Literal) -> PackageId {
    literal.unsigned_abs() as PackageId
}

fn value_of(assignment: &BTreeMap<PackageId, bool>, literal: Literal) -> Option<bool> {
    assignment.get(&variable_of(literal)).map(|&v| if literal > 0 { v } else { !v })
}

fn is_false(assignment: &BTreeMap<PackageId, bool>, literal: Literal) -> bool {
    value_of(assignment, literal) == Some(false)
}

/// A single-watched-literal index over a clause set.
///
/// Every clause watches exactly one literal at a time; the watchlist stores,
/// per literal, the ids of clauses currently watching it. This is the
/// simplified scheme (not Chaff's two-watch) — spec.md §4.4/§9 explicitly
/// permits but doesn't require the two-watch speedup, and single-watch is
/// the simpler correct structure.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    queues: HashMap<Literal, Vec<usize>>,
}

impl Watchlist {
    /// An empty watchlist.
    pub fn new() -> Self {
        Self { queues: HashMap::new() }
    }

    /// Start watching `clause` (by id) on its first literal.
    pub fn add_clause(&mut self, clause_id: usize, clause: &[Literal]) {
        let literal = clause[0];
        self.queues.entry(literal).or_default().push(clause_id);
    }

    /// Clauses currently watching `literal`.
    pub fn watchers(&self, literal: Literal) -> &[usize] {
        self.queues.get(&literal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `false_literal` was just assigned false; rewatch every clause
    /// currently watching it onto some other literal that isn't false.
    ///
    /// Rewatch moves are accumulated on a scratch list and only applied
    /// once every clause in the queue has found a new home — so a failed
    /// update never touches `self`, satisfying the rollback requirement by
    /// construction rather than by explicit undo.
    pub fn update(&mut self, false_literal: Literal, assignment: &BTreeMap<PackageId, bool>, clauses: &[Clause]) -> bool {
        let Some(clause_ids) = self.queues.get(&false_literal) else {
            return true;
        };
        let clause_ids = clause_ids.clone();

        let mut moves = Vec::with_capacity(clause_ids.len());
        for clause_id in clause_ids {
            let clause = &clauses[clause_id];
            match clause.iter().copied().find(|&literal| !is_false(assignment, literal)) {
                Some(alternative) => moves.push((clause_id, alternative)),
                None => return false,
            }
        }

        self.queues.remove(&false_literal);
        for (clause_id, alternative) in moves {
            self.queues.entry(alternative).or_default().push(clause_id);
        }
        true
    }
}

/// A complete satisfying assignment: every variable mentioned in the clause
/// set mapped to a boolean.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Assignment(BTreeMap<PackageId, bool>);

impl Assignment {
    /// The value assigned to `var`, if any.
    pub fn get(&self, var: PackageId) -> Option<bool> {
        self.0.get(&var).copied()
    }

    /// Iterate `(variable, value)` pairs in ascending variable order.
    pub fn iter(&self) -> impl Iterator<Item = (PackageId, bool)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` iff no variable is assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PackageId, bool)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (PackageId, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

struct TrailFrame {
    var: PackageId,
    tried_both: bool,
}

/// Enumerates every satisfying assignment of a clause set, built once via
/// [`SatSolver::solve`] and consumed as a plain [`Iterator`].
pub struct SatIter {
    clauses: Vec<Clause>,
    variables: Vec<PackageId>,
    watchlist: Watchlist,
    assignment: BTreeMap<PackageId, bool>,
    trail: Vec<TrailFrame>,
    yielded_once: bool,
    exhausted: bool,
}

impl SatIter {
    fn new(clauses: Vec<Clause>, variables: Vec<PackageId>) -> Self {
        let mut watchlist = Watchlist::new();
        let mut exhausted = false;
        for (id, clause) in clauses.iter().enumerate() {
            if clause.is_empty() {
                exhausted = true;
                continue;
            }
            watchlist.add_clause(id, clause);
        }
        Self {
            clauses,
            variables,
            watchlist,
            assignment: BTreeMap::new(),
            trail: Vec::new(),
            yielded_once: false,
            exhausted,
        }
    }

    fn try_assign(&mut self, var: PackageId, value: bool) -> bool {
        self.assignment.insert(var, value);
        let false_literal = if value { -(var as Literal) } else { var as Literal };
        self.watchlist.update(false_literal, &self.assignment, &self.clauses)
    }

    fn unassign(&mut self, var: PackageId) {
        self.assignment.remove(&var);
    }

    /// Try both values for a freshly reached variable at the current trail
    /// depth, true-first. Pushes a trail frame and returns `true` on
    /// success; leaves `self` unchanged and returns `false` if both fail.
    fn attempt_fresh(&mut self, var: PackageId) -> bool {
        if self.try_assign(var, true) {
            self.trail.push(TrailFrame { var, tried_both: false });
            return true;
        }
        self.unassign(var);

        if self.try_assign(var, false) {
            self.trail.push(TrailFrame { var, tried_both: true });
            return true;
        }
        self.unassign(var);
        false
    }

    /// Pop trail frames until one that has only tried `True` is found, then
    /// try `False` there. Returns `false` once the trail is exhausted.
    fn backtrack(&mut self) -> bool {
        while let Some(frame) = self.trail.pop() {
            self.unassign(frame.var);
            if frame.tried_both {
                continue;
            }
            if self.try_assign(frame.var, false) {
                self.trail.push(TrailFrame { var: frame.var, tried_both: true });
                return true;
            }
            self.unassign(frame.var);
        }
        false
    }

    /// Advance the search until every variable is consistently assigned, or
    /// the search space is exhausted.
    fn search(&mut self) -> Option<Assignment> {
        loop {
            if self.trail.len() == self.variables.len() {
                return Some(self.assignment.iter().map(|(&k, &v)| (k, v)).collect());
            }
            let var = self.variables[self.trail.len()];
            if self.attempt_fresh(var) {
                continue;
            }
            if !self.backtrack() {
                return None;
            }
        }
    }
}

impl Iterator for SatIter {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if self.yielded_once && !self.backtrack() {
            self.exhausted = true;
            return None;
        }
        self.yielded_once = true;

        match self.search() {
            Some(model) => Some(model),
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

/// Owns a clause set and produces fresh [`SatIter`] enumerations over it.
#[derive(Debug, Clone)]
pub struct SatSolver {
    clauses: Vec<Clause>,
    variables: Vec<PackageId>,
}

impl SatSolver {
    /// Build a solver over `clauses`. Variables are every distinct id
    /// mentioned by any literal, in ascending order.
    pub fn new(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let clauses: Vec<Clause> = clauses.into_iter().collect();
        let mut variable_set = BTreeSet::new();
        for clause in &clauses {
            for &literal in clause {
                variable_set.insert(variable_of(literal));
            }
        }
        Self {
            clauses,
            variables: variable_set.into_iter().collect(),
        }
    }

    /// The number of clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Produce a fresh lazy enumeration of every satisfying model.
    pub fn solve(&self) -> SatIter {
        SatIter::new(self.clauses.clone(), self.variables.clone())
    }
}
