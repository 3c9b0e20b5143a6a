use std::collections::HashSet;

use termprove::search::driver::SearchContext;
use termprove::search::satprove::{sat_execute, sat_prove_front};
use termprove::search::trail::{Trail, TrailKind};
use termprove::search::{Params, StopFlag};
use termprove::term::parse::parse_formula;
use termprove::term::store::{Lit, TermStore};
use termprove::theory::boolean::BoolTheory;

fn unsat_pair_params() -> Params {
    Params {
        do_unate: false,
        random_probability: 0.0,
        ..Params::default()
    }
}

#[test]
fn restart_fires_after_the_first_conflict() {
    let mut store = TermStore::new();
    let formula =
        parse_formula(&mut store, "(a | b) & (a | !b) & (!a | b) & (!a | !b)").expect("parse");
    let a = store.atom("a");

    let mut theory = BoolTheory::new();
    let mut ctx = SearchContext::new(
        &mut store,
        &mut theory,
        Params {
            initial_conflict_limit: 1.0,
            ..unsat_pair_params()
        },
        StopFlag::new(),
    );
    sat_execute(&mut ctx, formula);

    assert!(ctx.stats.restarts >= 1);
    assert!(ctx.conflict_limit() > 1.0);
    // learned state survived the restart
    assert!(ctx.learn.num_rules() >= 1);
    assert!(ctx.learn.learn_score(a, &Trail::new()) > 0.0);

    let report = ctx.into_report();
    assert!(report.fails.is_empty(), "unsatisfiable clause set");
}

#[test]
fn generous_limit_finishes_without_restart() {
    let mut store = TermStore::new();
    let formula =
        parse_formula(&mut store, "(a | b) & (a | !b) & (!a | b) & (!a | !b)").expect("parse");

    let mut theory = BoolTheory::new();
    let report = sat_prove_front(
        &mut store,
        &mut theory,
        formula,
        unsat_pair_params(),
        StopFlag::new(),
    );
    assert!(report.fails.is_empty());
    assert_eq!(report.stats.restarts, 0);
    assert!(report.stats.conflicts >= 1);
}

#[test]
fn satisfiable_clauses_yield_a_model_trail() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a | b) & (!a | b)").expect("parse");
    let b = store.atom("b");

    let mut theory = BoolTheory::new();
    let report = sat_prove_front(
        &mut store,
        &mut theory,
        formula,
        Params {
            find_all_fails: false,
            ..unsat_pair_params()
        },
        StopFlag::new(),
    );
    let entry = report.fails.first().expect("model");
    assert!(store.is_true(entry.residual));
    assert_eq!(entry.trail.value_of(b), Some(true));
}

#[test]
fn learn_requests_backjump_when_deepest_decision_is_untouched() {
    let mut store = TermStore::new();
    let origin = parse_formula(&mut store, "(a | b) & c").expect("parse");
    let a = store.atom("a");
    let b = store.atom("b");
    let c = store.atom("c");

    let trail = Trail::new()
        .push(Lit::pos(a), origin, TrailKind::Decision, 1)
        .push(Lit::pos(c), origin, TrailKind::Decision, 2)
        .push(Lit::pos(b), origin, TrailKind::Unate, 2);

    let mut learn = termprove::search::learn::LearnInfo::new();
    let conflict: HashSet<_> = [a, b].into_iter().collect();
    let target = learn.learn(&trail, &conflict, true);

    // decision on c never participated, so control may resume at level 1
    assert_eq!(target, Some(1));
    assert_eq!(learn.reject_count(a), 1);
    assert!(learn.num_rules() >= 1);

    // with the rejected decision retracted, the rule propagates its flip
    let fresh = Trail::new();
    let forced = learn.learned_unate_case(&fresh).expect("learned unit");
    assert_eq!(forced, Lit::new(a, false));
}

#[test]
fn learn_with_no_eligible_ancestor_is_ignored() {
    let mut store = TermStore::new();
    let origin = parse_formula(&mut store, "a & b").expect("parse");
    let a = store.atom("a");
    let b = store.atom("b");

    // only the deepest decision participates: nothing to jump back to
    let trail = Trail::new().push(Lit::pos(a), origin, TrailKind::Decision, 1);
    let mut learn = termprove::search::learn::LearnInfo::new();
    let conflict: HashSet<_> = [a, b].into_iter().collect();
    assert_eq!(learn.learn(&trail, &conflict, true), None);
}

#[test]
fn assignment_table_is_unique_and_handle_balanced() {
    let mut store = TermStore::new();
    let a = store.atom("a");

    let mut learn = termprove::search::learn::LearnInfo::new();
    let (h1, clash1) = learn.add_assignment(a, true, 1);
    assert!(!clash1);
    assert_eq!(learn.num_assignments(), 1);

    // opposite polarity clashes, same polarity is a no-op
    let (h2, clash2) = learn.add_assignment(a, false, 2);
    assert!(clash2);
    let (h3, clash3) = learn.add_assignment(a, true, 3);
    assert!(!clash3);

    learn.delete_assignment(h2);
    learn.delete_assignment(h3);
    assert_eq!(learn.num_assignments(), 1, "foreign handles are no-ops");
    learn.delete_assignment(h1);
    assert_eq!(learn.num_assignments(), 0);
}

#[test]
fn aging_rescale_keeps_scores_positive() {
    let mut store = TermStore::new();
    let origin = parse_formula(&mut store, "a & b").expect("parse");
    let a = store.atom("a");

    let mut learn = termprove::search::learn::LearnInfo::new();
    let trail = Trail::new().push(Lit::pos(a), origin, TrailKind::Unate, 0);
    let conflict: HashSet<_> = [a].into_iter().collect();
    learn.learn(&trail, &conflict, true);
    let before = learn.learn_score(a, &trail);
    assert!(before > 0.0);

    for _ in 0..64 {
        learn.increase_bump(1.05);
    }
    // aging never resets what was already earned
    assert!(learn.learn_score(a, &trail) >= before);
}
