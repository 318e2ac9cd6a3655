//! DPLL search over a set of nogoods
//!
//! The solver enumerates every total assignment to its variables that
//! violates none of its nogoods. Variables are ground atom handles; a model
//! is returned as the [`Interpretation`] of the variables assigned true.
//!
//! # Algorithm
//!
//! 1. Unit propagation: a nogood with all literals but one holding forces
//!    the remaining literal to fail. Nogoods are queued for inspection when
//!    one of their variables is assigned.
//! 2. Decisions assign the lowest unassigned variable false first
//! 3. On a conflict, or after a model was returned, the latest decision
//!    not yet flipped is undone together with everything assigned after it
//!    and retried with the opposite value. When no such decision remains
//!    the search space is exhausted.
//!
//! Nogoods may be added between calls to [`NogoodSolver::next_model`]; they
//! take effect from the next call on.

use crate::nogood::{Nogood, NogoodSet};
use asp_core::{Handle, Interpretation, Literal};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    variable: usize,
    /// `Some(flipped)` for decisions, `None` for propagated values
    decision: Option<bool>,
}

enum Status {
    /// Some literal fails
    Satisfied,
    /// Every literal holds
    Violated,
    /// All literals but this one hold and it is unassigned
    Unit(Literal),
    Open,
}

#[derive(Debug, Default)]
pub struct NogoodSolver {
    nogoods: NogoodSet,
    variables: Vec<Handle>,
    index_of: HashMap<Handle, usize>,
    assignment: Vec<Option<bool>>,
    occurrences: Vec<Vec<usize>>,
    trail: Vec<TrailEntry>,
    queue: VecDeque<usize>,
    models: usize,
    exhausted: bool,
    decisions: usize,
    conflicts: usize,
    propagations: usize,
}

impl NogoodSolver {
    /// Solver over the variables occurring in `nogoods`
    pub fn new(nogoods: NogoodSet) -> Self {
        Self::with_variables(std::iter::empty(), nogoods)
    }

    /// Solver over `variables` and the variables occurring in `nogoods`
    ///
    /// Variables that occur in no nogood take both values.
    pub fn with_variables(variables: impl IntoIterator<Item = Handle>, nogoods: NogoodSet) -> Self {
        let mut solver = NogoodSolver::default();
        for variable in variables {
            solver.variable(variable);
        }
        let indices: Vec<usize> = nogoods.iter().map(|(index, _)| index).collect();
        solver.nogoods = nogoods;
        for index in indices {
            solver.watch(index);
        }
        solver
    }

    fn variable(&mut self, atom: Handle) -> usize {
        if let Some(&index) = self.index_of.get(&atom) {
            return index;
        }
        let index = self.variables.len();
        self.variables.push(atom);
        self.index_of.insert(atom, index);
        self.assignment.push(None);
        self.occurrences.push(Vec::new());
        index
    }

    /// Register the occurrences of a stored nogood and queue it
    fn watch(&mut self, index: usize) {
        let atoms: Vec<Handle> = match self.nogoods.get(index) {
            Some(nogood) => nogood.iter().map(|literal| literal.atom).collect(),
            None => return,
        };
        for atom in atoms {
            let variable = self.variable(atom);
            if !self.occurrences[variable].contains(&index) {
                self.occurrences[variable].push(index);
            }
        }
        self.queue.push_back(index);
    }

    /// Add a nogood to the running search
    pub fn add_nogood(&mut self, nogood: Nogood) -> usize {
        let before = self.nogoods.len();
        let index = self.nogoods.add(nogood);
        if self.nogoods.len() != before {
            self.watch(index);
        }
        index
    }

    pub fn nogoods(&self) -> &NogoodSet {
        &self.nogoods
    }

    pub fn variables(&self) -> &[Handle] {
        &self.variables
    }

    /// Current value of an atom, if assigned
    pub fn value(&self, atom: Handle) -> Option<bool> {
        self.index_of
            .get(&atom)
            .and_then(|&index| self.assignment[index])
    }

    /// Whether the current assignment makes a literal hold
    pub fn holds(&self, literal: Literal) -> bool {
        self.value(literal.atom) == Some(!literal.naf)
    }

    /// Number of decisions on the trail
    pub fn decision_level(&self) -> usize {
        self.trail
            .iter()
            .filter(|entry| entry.decision.is_some())
            .count()
    }

    /// Number of decisions preceding the assignment of `atom`
    pub fn decision_level_of(&self, atom: Handle) -> Option<usize> {
        let variable = *self.index_of.get(&atom)?;
        let mut level = 0;
        for entry in &self.trail {
            if entry.decision.is_some() {
                level += 1;
            }
            if entry.variable == variable {
                return Some(level);
            }
        }
        None
    }

    /// Next model, or `None` once every model has been returned
    pub fn next_model(&mut self) -> Option<Interpretation> {
        if self.exhausted {
            return None;
        }
        if self.models > 0 && !self.backtrack() {
            self.exhausted = true;
            return None;
        }

        loop {
            if !self.propagate() {
                self.conflicts += 1;
                if !self.backtrack() {
                    self.exhausted = true;
                    return None;
                }
                continue;
            }
            match self.assignment.iter().position(Option::is_none) {
                Some(variable) => {
                    self.decisions += 1;
                    self.assign(variable, false, Some(false));
                }
                None => {
                    self.models += 1;
                    return Some(self.model());
                }
            }
        }
    }

    fn model(&self) -> Interpretation {
        self.variables
            .iter()
            .zip(&self.assignment)
            .filter(|(_, value)| **value == Some(true))
            .map(|(atom, _)| *atom)
            .collect()
    }

    fn assign(&mut self, variable: usize, value: bool, decision: Option<bool>) {
        self.assignment[variable] = Some(value);
        self.trail.push(TrailEntry { variable, decision });
        self.queue.extend(self.occurrences[variable].iter().copied());
    }

    /// Flip the latest unflipped decision; false if there is none
    fn backtrack(&mut self) -> bool {
        self.queue.clear();
        while let Some(entry) = self.trail.pop() {
            let previous = self.assignment[entry.variable].take();
            if entry.decision == Some(false) {
                let flipped = previous.map_or(true, |value| !value);
                self.assign(entry.variable, flipped, Some(true));
                let all: Vec<usize> = self.nogoods.iter().map(|(index, _)| index).collect();
                self.queue.extend(all);
                return true;
            }
        }
        false
    }

    fn status(&self, nogood: &Nogood) -> Status {
        let mut unassigned = None;
        let mut open = 0;
        for literal in nogood.iter() {
            let value = self
                .index_of
                .get(&literal.atom)
                .and_then(|&index| self.assignment[index]);
            match value {
                Some(value) if value == !literal.naf => {}
                Some(_) => return Status::Satisfied,
                None => {
                    open += 1;
                    unassigned = Some(*literal);
                }
            }
        }
        match (open, unassigned) {
            (0, _) => Status::Violated,
            (1, Some(literal)) => Status::Unit(literal),
            _ => Status::Open,
        }
    }

    /// Unit propagation; false on conflict
    fn propagate(&mut self) -> bool {
        while let Some(index) = self.queue.pop_front() {
            let status = match self.nogoods.get(index) {
                Some(nogood) => self.status(nogood),
                None => continue,
            };
            match status {
                Status::Violated => {
                    self.queue.clear();
                    return false;
                }
                Status::Unit(literal) => {
                    if let Some(&variable) = self.index_of.get(&literal.atom) {
                        self.propagations += 1;
                        self.assign(variable, literal.naf, None);
                    }
                }
                Status::Satisfied | Status::Open => {}
            }
        }
        true
    }

    pub fn statistics(&self) -> String {
        format!(
            "variables: {}, nogoods: {}, decisions: {}, conflicts: {}, propagations: {}, models: {}",
            self.variables.len(),
            self.nogoods.len(),
            self.decisions,
            self.conflicts,
            self.propagations,
            self.models
        )
    }
}
