use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::term::store::{Lit, Term};

use super::trail::{Trail, TrailKind};

const RESCALE_LIMIT: f64 = 1e100;
const RESCALE_FACTOR: f64 = 1e-100;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    pub pos: f64,
    pub neg: f64,
}

impl Score {
    pub fn total(&self) -> f64 {
        self.pos + self.neg
    }
}

// "these literals imply then"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LearnedRule {
    pub when: Vec<Lit>,
    pub then: Lit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignSlot {
    pub level: u32,
    pub sign: bool,
}

// handle for a table entry; deleting a handle that did not create the
// entry is a no-op, so re-asserting an already-fixed atom stays balanced
#[derive(Debug, Clone, Copy)]
pub struct AssignHandle {
    term: Term,
    owned: bool,
}

// per-proof-attempt learned state. deliberately survives restarts: scores
// decay but are never reset, and the rule store only grows.
#[derive(Debug)]
pub struct LearnInfo {
    scores: IndexMap<Term, Score>,
    bump: f64,
    rules: IndexSet<LearnedRule>,
    assignments: IndexMap<Term, AssignSlot>,
    rejects: IndexMap<Term, usize>,
    pub learn_count: usize,
    pub generalized_count: usize,
}

impl Default for LearnInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl LearnInfo {
    pub fn new() -> Self {
        Self {
            scores: IndexMap::new(),
            bump: 1.0,
            rules: IndexSet::new(),
            assignments: IndexMap::new(),
            rejects: IndexMap::new(),
            learn_count: 0,
            generalized_count: 0,
        }
    }

    pub fn add_assignment(&mut self, term: Term, sign: bool, level: u32) -> (AssignHandle, bool) {
        match self.assignments.get(&term) {
            Some(slot) => (
                AssignHandle { term, owned: false },
                slot.sign != sign,
            ),
            None => {
                self.assignments.insert(term, AssignSlot { level, sign });
                (AssignHandle { term, owned: true }, false)
            }
        }
    }

    pub fn delete_assignment(&mut self, handle: AssignHandle) {
        if handle.owned {
            self.assignments.swap_remove(&handle.term);
        }
    }

    pub fn assignment(&self, term: Term) -> Option<AssignSlot> {
        self.assignments.get(&term).copied()
    }

    pub fn num_assignments(&self) -> usize {
        self.assignments.len()
    }

    // conflict learning. marks trail entries whose atom participates in
    // the conflict, bumps their scores, records a generalized implication
    // over the marked decisions, and reports a backjump target when the
    // deepest decision turns out to be non-essential.
    pub fn learn(
        &mut self,
        trail: &Trail,
        conflict_atoms: &HashSet<Term>,
        generalize: bool,
    ) -> Option<u32> {
        self.learn_count += 1;

        let mut on_trail = HashSet::new();
        for entry in trail.iter() {
            on_trail.insert(entry.lit.term);
            if conflict_atoms.contains(&entry.lit.term) {
                entry.used_in_learn.set(true);
                self.bump_lit(entry.lit);
            }
        }
        // conflicting atoms the trail never carried still deserve credit
        for &atom in conflict_atoms {
            if !on_trail.contains(&atom) {
                self.bump_lit(Lit::pos(atom));
            }
        }

        // decisions oldest-first
        let mut decisions = trail
            .iter()
            .filter(|e| e.kind == TrailKind::Decision)
            .collect::<Vec<_>>();
        decisions.reverse();
        if decisions.is_empty() {
            return None;
        }

        let marked = decisions
            .iter()
            .filter(|e| e.used_in_learn.get())
            .copied()
            .collect::<Vec<_>>();

        let basis = if generalize && !marked.is_empty() {
            if marked.len() < decisions.len() {
                self.generalized_count += 1;
            }
            &marked
        } else {
            &decisions
        };

        if let Some((rejected, earlier)) = basis.split_last() {
            let rule = LearnedRule {
                when: earlier.iter().map(|e| e.lit).collect(),
                then: rejected.lit.neg(),
            };
            self.rules.insert(rule);
            *self.rejects.entry(rejected.lit.term).or_insert(0) += 1;
        }

        // the deepest decision is non-essential when the conflict never
        // touched it; resume at the deepest decision that was touched
        let deepest = decisions[decisions.len() - 1];
        if !deepest.used_in_learn.get() {
            if let Some(target) = marked.last() {
                return Some(target.level);
            }
        }
        None
    }

    // terminal bookkeeping for non-conflict exits: credit the decisions
    // that shaped the branch, record nothing
    pub fn learn_terminal(&mut self, trail: &Trail) {
        let lits = trail
            .iter()
            .filter(|e| e.kind == TrailKind::Decision)
            .map(|e| e.lit)
            .collect::<Vec<_>>();
        for lit in lits {
            self.bump_lit(lit);
        }
    }

    // newest rule whose antecedents all hold on the trail and whose
    // conclusion is still open
    pub fn learned_unate_case(&self, trail: &Trail) -> Option<Lit> {
        for rule in self.rules.iter().rev() {
            if trail.value_of(rule.then.term).is_some() {
                continue;
            }
            if rule.when.iter().all(|&w| trail.contains(w)) {
                return Some(rule.then);
            }
        }
        None
    }

    pub fn learn_score(&self, term: Term, _trail: &Trail) -> f64 {
        self.scores.get(&term).map(Score::total).unwrap_or(0.0)
    }

    pub fn score(&self, term: Term) -> Score {
        self.scores.get(&term).copied().unwrap_or_default()
    }

    pub fn reject_count(&self, term: Term) -> usize {
        self.rejects.get(&term).copied().unwrap_or(0)
    }

    // VSIDS-style aging: newer conflicts weigh more because the increment
    // grows; rescale everything when the increment overflows
    pub fn increase_bump(&mut self, decay_factor: f64) {
        self.bump *= decay_factor;
        if self.bump > RESCALE_LIMIT {
            for score in self.scores.values_mut() {
                score.pos *= RESCALE_FACTOR;
                score.neg *= RESCALE_FACTOR;
            }
            self.bump *= RESCALE_FACTOR;
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &LearnedRule> {
        self.rules.iter()
    }

    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }

    pub fn num_scored(&self) -> usize {
        self.scores.len()
    }

    fn bump_lit(&mut self, lit: Lit) {
        let slot = self.scores.entry(lit.term).or_default();
        if lit.sign {
            slot.pos += self.bump;
        } else {
            slot.neg += self.bump;
        }
    }
}
