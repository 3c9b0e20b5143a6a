use std::collections::HashSet;

use crate::term::rewrite::simplify;
use crate::term::store::{Lit, Term, TermStore};
use crate::theory::Theory;

use super::choose::CaseChooser;
use super::deps::dependency_list;
use super::learn::{AssignHandle, LearnInfo};
use super::preprocess::saturate;
use super::trail::{Trail, TrailKind};
use super::unate::unate_literals;
use super::{FailEntry, FailList, Params, ProveReport, SearchStats, StopFlag};

// outcome of one recursive node; Done covers solved, failed and
// vacuously closed branches alike, the FailList carries the difference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Walk {
    Done,
    Restart,
    Interrupted,
}

pub(crate) enum Asserted {
    Ok,
    Conflict,
}

pub struct SearchContext<'a, T: Theory> {
    pub store: &'a mut TermStore,
    pub theory: &'a mut T,
    pub params: Params,
    pub learn: LearnInfo,
    pub(crate) chooser: CaseChooser,
    pub fails: FailList,
    pub stats: SearchStats,
    pub(crate) stop: StopFlag,
    pub(crate) conflict_count: f64,
    pub(crate) conflict_limit: f64,
    pub(crate) restart_pending: bool,
    pub(crate) backjump_to: Option<u32>,
    pub(crate) interrupted: bool,
}

// primary entry: prove the formula by exhausting the case tree. an empty
// FailList means every consistent branch drove the goal to true.
pub fn prove<T: Theory>(
    store: &mut TermStore,
    theory: &mut T,
    formula: Term,
    params: Params,
    stop: StopFlag,
) -> ProveReport {
    let mut ctx = SearchContext::new(store, theory, params, stop);
    ctx.execute(formula);
    ctx.into_report()
}

impl<'a, T: Theory> SearchContext<'a, T> {
    pub fn new(store: &'a mut TermStore, theory: &'a mut T, params: Params, stop: StopFlag) -> Self {
        let chooser = CaseChooser::new(params.score_mode, params.random_probability, params.seed);
        let conflict_limit = params.initial_conflict_limit;
        Self {
            store,
            theory,
            params,
            learn: LearnInfo::new(),
            chooser,
            fails: Vec::new(),
            stats: SearchStats::default(),
            stop,
            conflict_count: 0.0,
            conflict_limit,
            restart_pending: false,
            backjump_to: None,
            interrupted: false,
        }
    }

    pub fn conflict_limit(&self) -> f64 {
        self.conflict_limit
    }

    pub fn into_report(self) -> ProveReport {
        ProveReport {
            fails: self.fails,
            stats: self.stats,
            interrupted: self.interrupted,
        }
    }

    // restart scheduler: retry with a multiplicatively grown conflict
    // limit until an attempt runs to completion. learned state carries
    // over; the fail list is rebuilt by each attempt.
    pub fn execute(&mut self, formula: Term) {
        loop {
            self.restart_pending = false;
            self.backjump_to = None;
            self.conflict_count = 0.0;
            self.fails.clear();
            let base = self.theory.mark();

            let walk = self.attempt(formula);

            self.theory.release(base);
            match walk {
                Walk::Restart => {
                    self.stats.restarts += 1;
                    self.conflict_limit *= self.params.conflict_factor;
                }
                Walk::Done | Walk::Interrupted => return,
            }
        }
    }

    fn attempt(&mut self, formula: Term) -> Walk {
        // forward unate saturation seeds the trail before full search
        let mut seed = saturate(
            self.store,
            self.theory,
            &mut self.learn,
            formula,
            self.params.do_unate,
        );
        let walk = if let Some(lit) = seed.contradiction {
            let atoms = self.conflict_atoms(seed.residual, lit);
            self.on_conflict(&seed.trail, &atoms);
            Walk::Done
        } else if self.store.is_true(seed.residual) {
            self.learn.learn_terminal(&seed.trail);
            Walk::Done
        } else {
            self.search(seed.residual, &seed.trail, 0)
        };
        for handle in seed.handles.drain(..) {
            self.learn.delete_assignment(handle);
        }
        walk
    }

    pub(crate) fn search(&mut self, formula: Term, trail: &Trail, level: u32) -> Walk {
        if let Some(walk) = self.poll() {
            return walk;
        }
        let mark = self.theory.mark();
        let mut handles = Vec::new();
        let walk = self.node(formula, trail.clone(), level, &mut handles);
        for handle in handles.drain(..) {
            self.learn.delete_assignment(handle);
        }
        self.theory.release(mark);
        walk
    }

    fn node(
        &mut self,
        mut formula: Term,
        mut trail: Trail,
        level: u32,
        handles: &mut Vec<AssignHandle>,
    ) -> Walk {
        'node: loop {
            // Propagate: learned units first, then unate probes; every
            // pending propagation lands before any fresh decision
            loop {
                if self.store.is_true(formula) {
                    self.learn.learn_terminal(&trail);
                    return Walk::Done;
                }
                let mut forced = Vec::new();
                if let Some(lit) = self.learn.learned_unate_case(&trail) {
                    forced.push((lit, TrailKind::LearnedUnit));
                }
                if forced.is_empty() && self.params.do_unate {
                    let deps = dependency_list(self.store, formula);
                    forced.extend(
                        unate_literals(self.store, formula, &deps, &trail)
                            .into_iter()
                            .map(|lit| (lit, TrailKind::Unate)),
                    );
                }
                if forced.is_empty() {
                    break;
                }
                let mut progressed = false;
                for (lit, kind) in forced {
                    if trail.contains(lit) {
                        continue;
                    }
                    match self.assert_forced(lit, formula, &mut trail, level, kind, handles) {
                        Asserted::Ok => {
                            progressed = true;
                            self.stats.propagations += 1;
                            let asg = trail.assignment();
                            formula = simplify(self.store, formula, &asg);
                            if self.store.is_true(formula) {
                                self.learn.learn_terminal(&trail);
                                return Walk::Done;
                            }
                        }
                        Asserted::Conflict => {
                            let atoms = self.conflict_atoms(formula, lit);
                            self.on_conflict(&trail, &atoms);
                            return Walk::Done;
                        }
                    }
                }
                if !progressed {
                    break;
                }
            }

            // Decide
            let deps = dependency_list(self.store, formula);
            let picked = self.chooser.choose(
                self.store,
                formula,
                &deps,
                &self.learn,
                &trail,
                self.theory,
            );
            let Some(term) = picked else {
                self.fails.push(FailEntry {
                    trail: trail.clone(),
                    residual: formula,
                });
                self.learn.learn_terminal(&trail);
                return Walk::Done;
            };
            self.stats.decisions += 1;

            // Branch: true child first, then false unless suppressed
            for sign in [true, false] {
                if !sign && !self.params.find_all_fails && !self.fails.is_empty() {
                    break;
                }
                if let Some(walk) = self.poll() {
                    return walk;
                }
                let lit = Lit::new(term, sign);
                let mark = self.theory.mark();
                let (handle, clash) = self.learn.add_assignment(term, sign, level + 1);
                if clash || self.theory.assert_lit(lit) {
                    self.learn.delete_assignment(handle);
                    self.theory.release(mark);
                    let atoms = self.conflict_atoms(formula, lit);
                    self.on_conflict(&trail, &atoms);
                    if self.restart_pending {
                        return Walk::Restart;
                    }
                    match self.take_backjump(level) {
                        Backjump::Unwind => return Walk::Done,
                        Backjump::Here => continue 'node,
                        Backjump::None => continue,
                    }
                }
                let child_trail = trail.push(lit, formula, TrailKind::Decision, level + 1);
                let asg = child_trail.assignment();
                let child_formula = simplify(self.store, formula, &asg);

                let walk = self.search(child_formula, &child_trail, level + 1);

                self.learn.delete_assignment(handle);
                self.theory.release(mark);
                match walk {
                    Walk::Done => {}
                    other => return other,
                }
                if self.restart_pending {
                    return Walk::Restart;
                }
                match self.take_backjump(level) {
                    Backjump::Unwind => return Walk::Done,
                    Backjump::Here => continue 'node,
                    Backjump::None => {}
                }
            }
            return Walk::Done;
        }
    }

    pub(crate) fn assert_forced(
        &mut self,
        lit: Lit,
        origin: Term,
        trail: &mut Trail,
        level: u32,
        kind: TrailKind,
        handles: &mut Vec<AssignHandle>,
    ) -> Asserted {
        let (handle, clash) = self.learn.add_assignment(lit.term, lit.sign, level);
        if clash || self.theory.assert_lit(lit) {
            self.learn.delete_assignment(handle);
            return Asserted::Conflict;
        }
        handles.push(handle);
        *trail = trail.push(lit, origin, kind, level);
        Asserted::Ok
    }

    pub(crate) fn conflict_atoms(&self, formula: Term, lit: Lit) -> HashSet<Term> {
        let mut atoms: HashSet<Term> = self.store.atoms(formula).into_iter().collect();
        atoms.insert(lit.term);
        atoms
    }

    pub(crate) fn on_conflict(&mut self, trail: &Trail, conflict_atoms: &HashSet<Term>) {
        self.stats.conflicts += 1;
        self.conflict_count += 1.0;
        if self.params.do_learn > 0 {
            let target = self
                .learn
                .learn(trail, conflict_atoms, self.params.do_learn >= 2);
            if let Some(level) = target {
                self.backjump_to = Some(level);
            }
            self.stats.learned_rules = self.learn.num_rules();
            self.learn.increase_bump(self.params.bump_decay);
        }
        if self.conflict_count >= self.conflict_limit {
            self.restart_pending = true;
        }
    }

    pub(crate) fn take_backjump(&mut self, level: u32) -> Backjump {
        match self.backjump_to {
            Some(target) if target == level + 1 => {
                self.backjump_to = None;
                self.stats.backjumps += 1;
                Backjump::Here
            }
            Some(_) => Backjump::Unwind,
            None => Backjump::None,
        }
    }

    // restart and interrupt flags, polled at recursion entry and at every
    // branch boundary
    pub(crate) fn poll(&mut self) -> Option<Walk> {
        self.stats.steps += 1;
        if self.stop.is_set()
            || (self.params.max_steps > 0 && self.stats.steps > self.params.max_steps)
        {
            self.interrupted = true;
            return Some(Walk::Interrupted);
        }
        if self.restart_pending {
            return Some(Walk::Restart);
        }
        None
    }
}

pub(crate) enum Backjump {
    Unwind,
    Here,
    None,
}
