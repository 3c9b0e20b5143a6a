use crate::cnf::extract::formula_to_cnf;
use crate::term::rewrite::simplify;
use crate::term::store::{Lit, Term, TermStore};
use crate::theory::Theory;

use super::deps::dependency_list;
use super::learn::{AssignHandle, LearnInfo};
use super::trail::{Trail, TrailKind};
use super::unate::unate_literals;
use super::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessClass {
    Default,
    Cnf,
    Unsat,
    Norun,
}

#[derive(Debug)]
pub struct Preprocessed {
    pub class: PreprocessClass,
    pub residual: Term,
    pub trail: Trail,
}

pub struct Saturation {
    pub residual: Term,
    pub trail: Trail,
    pub contradiction: Option<Lit>,
    pub handles: Vec<AssignHandle>,
}

// forward unate saturation at level zero: repeatedly assert forced
// literals against the top-level formula until a fixpoint, a collapse or
// a contradiction. seeds the trail both driver variants start from.
pub fn saturate<T: Theory>(
    store: &mut TermStore,
    theory: &mut T,
    learn: &mut LearnInfo,
    formula: Term,
    do_unate: bool,
) -> Saturation {
    let mut trail = Trail::new();
    let mut residual = formula;
    let mut handles = Vec::new();
    if !do_unate {
        return Saturation {
            residual,
            trail,
            contradiction: None,
            handles,
        };
    }
    loop {
        if store.is_constant(residual) {
            break;
        }
        let deps = dependency_list(store, residual);
        let forced = unate_literals(store, residual, &deps, &trail);
        if forced.is_empty() {
            break;
        }
        let mut progressed = false;
        for lit in forced {
            if trail.contains(lit) {
                continue;
            }
            let (handle, clash) = learn.add_assignment(lit.term, lit.sign, 0);
            if clash || theory.assert_lit(lit) {
                learn.delete_assignment(handle);
                return Saturation {
                    residual,
                    trail,
                    contradiction: Some(lit),
                    handles,
                };
            }
            handles.push(handle);
            trail = trail.push(lit, residual, TrailKind::Unate, 0);
            progressed = true;
            let asg = trail.assignment();
            residual = simplify(store, residual, &asg);
            // only the trivial-true terminal short-circuits: a false
            // residual keeps going so a dead atom's second polarity can
            // surface the contradiction at the theory
            if store.is_true(residual) {
                break;
            }
        }
        if !progressed {
            break;
        }
    }
    Saturation {
        residual,
        trail,
        contradiction: None,
        handles,
    }
}

// one shot classification for the optional hand-off to an external
// boolean SAT backend. the caller keeps the theory seeding.
pub fn preprocess<T: Theory>(
    store: &mut TermStore,
    theory: &mut T,
    formula: Term,
    params: &Params,
) -> Preprocessed {
    if !params.do_unate {
        return Preprocessed {
            class: PreprocessClass::Norun,
            residual: formula,
            trail: Trail::new(),
        };
    }
    let mut learn = LearnInfo::new();
    let sat = saturate(store, theory, &mut learn, formula, true);
    let class = if sat.contradiction.is_some() || store.is_false(sat.residual) {
        PreprocessClass::Unsat
    } else if formula_to_cnf(store, sat.residual).is_some() {
        PreprocessClass::Cnf
    } else {
        PreprocessClass::Default
    };
    Preprocessed {
        class,
        residual: sat.residual,
        trail: sat.trail,
    }
}
