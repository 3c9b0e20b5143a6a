use std::collections::HashSet;

use crate::term::rewrite::simplify;
use crate::term::store::{Term, TermStore};
use crate::theory::Theory;

use super::deps::dependency_list;
use super::driver::{Asserted, Backjump, SearchContext, Walk};
use super::learn::AssignHandle;
use super::preprocess::saturate;
use super::trail::{Trail, TrailKind};
use super::{FailEntry, Params, ProveReport, StopFlag};

// literal-tree variant for clause-like problems: the chooser hands back a
// signed literal, propagation is restricted to learned units, and every
// node has exactly two children. a true residual records the satisfying
// trail; a false residual is a conflict.
pub fn sat_prove_front<T: Theory>(
    store: &mut TermStore,
    theory: &mut T,
    formula: Term,
    params: Params,
    stop: StopFlag,
) -> ProveReport {
    let mut ctx = SearchContext::new(store, theory, params, stop);
    sat_execute(&mut ctx, formula);
    ctx.into_report()
}

// restart loop shared with callers that want to keep the context around
pub fn sat_execute<T: Theory>(ctx: &mut SearchContext<'_, T>, formula: Term) {
    loop {
        ctx.restart_pending = false;
        ctx.backjump_to = None;
        ctx.conflict_count = 0.0;
        ctx.fails.clear();
        let base = ctx.theory.mark();

        let walk = sat_attempt(ctx, formula);

        ctx.theory.release(base);
        match walk {
            Walk::Restart => {
                ctx.stats.restarts += 1;
                ctx.conflict_limit *= ctx.params.conflict_factor;
            }
            Walk::Done | Walk::Interrupted => break,
        }
    }
}

fn sat_attempt<T: Theory>(ctx: &mut SearchContext<'_, T>, formula: Term) -> Walk {
    let mut seed = saturate(
        ctx.store,
        ctx.theory,
        &mut ctx.learn,
        formula,
        ctx.params.do_unate,
    );
    let walk = if let Some(lit) = seed.contradiction {
        let atoms = ctx.conflict_atoms(seed.residual, lit);
        ctx.on_conflict(&seed.trail, &atoms);
        Walk::Done
    } else if ctx.store.is_true(seed.residual) {
        ctx.fails.push(FailEntry {
            trail: seed.trail.clone(),
            residual: seed.residual,
        });
        Walk::Done
    } else if ctx.store.is_false(seed.residual) {
        let atoms = false_conflict_atoms(ctx, &seed.trail, formula);
        ctx.on_conflict(&seed.trail, &atoms);
        Walk::Done
    } else {
        sat_search(ctx, seed.residual, &seed.trail, 0)
    };
    for handle in seed.handles.drain(..) {
        ctx.learn.delete_assignment(handle);
    }
    walk
}

fn sat_search<T: Theory>(
    ctx: &mut SearchContext<'_, T>,
    formula: Term,
    trail: &Trail,
    level: u32,
) -> Walk {
    if let Some(walk) = ctx.poll() {
        return walk;
    }
    let mark = ctx.theory.mark();
    let mut handles = Vec::new();
    let walk = sat_node(ctx, formula, trail.clone(), level, &mut handles);
    for handle in handles.drain(..) {
        ctx.learn.delete_assignment(handle);
    }
    ctx.theory.release(mark);
    walk
}

fn sat_node<T: Theory>(
    ctx: &mut SearchContext<'_, T>,
    mut formula: Term,
    mut trail: Trail,
    level: u32,
    handles: &mut Vec<AssignHandle>,
) -> Walk {
    'node: loop {
        // propagate learned units only
        loop {
            if ctx.store.is_true(formula) {
                ctx.fails.push(FailEntry {
                    trail: trail.clone(),
                    residual: formula,
                });
                ctx.learn.learn_terminal(&trail);
                return Walk::Done;
            }
            if ctx.store.is_false(formula) {
                let atoms = false_conflict_atoms(ctx, &trail, formula);
                ctx.on_conflict(&trail, &atoms);
                return Walk::Done;
            }
            let Some(lit) = ctx.learn.learned_unate_case(&trail) else {
                break;
            };
            match ctx.assert_forced(lit, formula, &mut trail, level, TrailKind::LearnedUnit, handles)
            {
                Asserted::Ok => {
                    ctx.stats.propagations += 1;
                    let asg = trail.assignment();
                    formula = simplify(ctx.store, formula, &asg);
                }
                Asserted::Conflict => {
                    let atoms = ctx.conflict_atoms(formula, lit);
                    ctx.on_conflict(&trail, &atoms);
                    return Walk::Done;
                }
            }
        }

        // decide: signed pick, two children, preferred polarity first
        let deps = dependency_list(ctx.store, formula);
        let picked = ctx.chooser.choose_signed(
            ctx.store,
            formula,
            &deps,
            &ctx.learn,
            &trail,
            ctx.theory,
        );
        let Some(first) = picked else {
            ctx.fails.push(FailEntry {
                trail: trail.clone(),
                residual: formula,
            });
            ctx.learn.learn_terminal(&trail);
            return Walk::Done;
        };
        ctx.stats.decisions += 1;

        for (which, lit) in [first, first.neg()].into_iter().enumerate() {
            if which == 1 && !ctx.params.find_all_fails && !ctx.fails.is_empty() {
                break;
            }
            if let Some(walk) = ctx.poll() {
                return walk;
            }
            let mark = ctx.theory.mark();
            let (handle, clash) = ctx.learn.add_assignment(lit.term, lit.sign, level + 1);
            if clash || ctx.theory.assert_lit(lit) {
                ctx.learn.delete_assignment(handle);
                ctx.theory.release(mark);
                let atoms = ctx.conflict_atoms(formula, lit);
                ctx.on_conflict(&trail, &atoms);
                if ctx.restart_pending {
                    return Walk::Restart;
                }
                match ctx.take_backjump(level) {
                    Backjump::Unwind => return Walk::Done,
                    Backjump::Here => continue 'node,
                    Backjump::None => continue,
                }
            }
            let child_trail = trail.push(lit, formula, TrailKind::Decision, level + 1);
            let asg = child_trail.assignment();
            let child_formula = simplify(ctx.store, formula, &asg);

            let walk = sat_search(ctx, child_formula, &child_trail, level + 1);

            ctx.learn.delete_assignment(handle);
            ctx.theory.release(mark);
            match walk {
                Walk::Done => {}
                other => return other,
            }
            if ctx.restart_pending {
                return Walk::Restart;
            }
            match ctx.take_backjump(level) {
                Backjump::Unwind => return Walk::Done,
                Backjump::Here => continue 'node,
                Backjump::None => {}
            }
        }
        return Walk::Done;
    }
}

fn false_conflict_atoms<T: Theory>(
    ctx: &SearchContext<'_, T>,
    trail: &Trail,
    formula: Term,
) -> HashSet<Term> {
    match trail.head() {
        Some(head) => {
            let mut atoms: HashSet<Term> = ctx.store.atoms(head.origin).into_iter().collect();
            atoms.insert(head.lit.term);
            atoms
        }
        None => ctx.store.atoms(formula).into_iter().collect(),
    }
}
