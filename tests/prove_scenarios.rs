use termprove::search::driver::prove;
use termprove::search::{Params, StopFlag};
use termprove::term::parse::parse_formula;
use termprove::term::store::TermStore;
use termprove::theory::boolean::BoolTheory;

fn quiet(params: Params) -> Params {
    Params {
        random_probability: 0.0,
        ..params
    }
}

#[test]
fn proving_true_needs_no_work() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "true").expect("parse");
    let mut theory = BoolTheory::new();

    let report = prove(
        &mut store,
        &mut theory,
        formula,
        quiet(Params::default()),
        StopFlag::new(),
    );
    assert!(report.proved());
    assert_eq!(report.stats.decisions, 0);
    assert_eq!(report.stats.conflicts, 0);
    // every theory checkpoint was released on the way out
    assert_eq!(theory.num_fixed(), 0);
}

#[test]
fn direct_contradiction_closes_without_branching() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "x & !x").expect("parse");
    let mut theory = BoolTheory::new();

    let report = prove(
        &mut store,
        &mut theory,
        formula,
        quiet(Params::default()),
        StopFlag::new(),
    );
    // the forced pair clashes at the theory before any decision
    assert!(report.fails.is_empty());
    assert_eq!(report.stats.decisions, 0);
    assert!(report.stats.conflicts >= 1);
    assert_eq!(theory.num_fixed(), 0);
}

#[test]
fn forced_literals_close_the_goal_without_decisions() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a | b) & (!a | b) & (a | !b)").expect("parse");
    let mut theory = BoolTheory::new();

    let report = prove(
        &mut store,
        &mut theory,
        formula,
        quiet(Params::default()),
        StopFlag::new(),
    );
    assert!(report.proved());
    assert_eq!(report.stats.decisions, 0);
}

#[test]
fn find_all_fails_controls_branch_exploration() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "a & !a").expect("parse");
    // keep the unate pass off so the search actually branches on a
    let base = Params {
        do_unate: false,
        random_probability: 0.0,
        ..Params::default()
    };

    let mut theory = BoolTheory::new();
    let first_only = prove(
        &mut store,
        &mut theory,
        formula,
        Params {
            find_all_fails: false,
            ..base.clone()
        },
        StopFlag::new(),
    );
    assert_eq!(first_only.fails.len(), 1);
    assert_eq!(first_only.stats.decisions, 1);

    let mut theory = BoolTheory::new();
    let all = prove(&mut store, &mut theory, formula, base, StopFlag::new());
    // both branches fail with equivalent residuals
    assert_eq!(all.fails.len(), 2);
    for fail in &all.fails {
        assert!(store.is_false(fail.residual));
    }
}

#[test]
fn fail_trails_never_carry_both_polarities() {
    let mut store = TermStore::new();
    let formula =
        parse_formula(&mut store, "(a | b) & (c | d) & (!a | !c)").expect("parse");
    let mut theory = BoolTheory::new();

    let report = prove(
        &mut store,
        &mut theory,
        formula,
        Params {
            do_unate: false,
            random_probability: 0.0,
            ..Params::default()
        },
        StopFlag::new(),
    );
    for fail in &report.fails {
        let lits = fail.trail.iter().map(|e| e.lit).collect::<Vec<_>>();
        for lit in &lits {
            assert!(!lits.contains(&lit.neg()), "double polarity on trail");
        }
    }
}

#[test]
fn step_budget_interrupts_the_search() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a | b) & (c | d) & (!a | !d)").expect("parse");
    let mut theory = BoolTheory::new();

    let report = prove(
        &mut store,
        &mut theory,
        formula,
        Params {
            do_unate: false,
            max_steps: 1,
            random_probability: 0.0,
            ..Params::default()
        },
        StopFlag::new(),
    );
    assert!(report.interrupted);
    assert!(!report.proved());
}

#[test]
fn stop_flag_interrupts_before_any_work() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a | b) & (!a | b)").expect("parse");
    let mut theory = BoolTheory::new();

    let stop = StopFlag::new();
    stop.set();
    let report = prove(
        &mut store,
        &mut theory,
        formula,
        Params {
            do_unate: false,
            ..Params::default()
        },
        stop.clone(),
    );
    assert!(report.interrupted);
    assert_eq!(report.stats.decisions, 0);
}
