use termprove::search::preprocess::{preprocess, PreprocessClass};
use termprove::search::Params;
use termprove::term::parse::parse_formula;
use termprove::term::store::TermStore;
use termprove::theory::boolean::BoolTheory;
use termprove::theory::Theory;

fn run(expr: &str, params: &Params) -> (TermStore, BoolTheory, termprove::search::preprocess::Preprocessed) {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, expr).expect("parse");
    let mut theory = BoolTheory::new();
    let pre = preprocess(&mut store, &mut theory, formula, params);
    (store, theory, pre)
}

#[test]
fn disabled_unate_pass_is_norun() {
    let params = Params {
        do_unate: false,
        ..Params::default()
    };
    let (store, _, pre) = run("(a | b) & (!a | b)", &params);
    assert_eq!(pre.class, PreprocessClass::Norun);
    assert_eq!(pre.trail.len(), 0);
    assert!(!store.is_constant(pre.residual));
}

#[test]
fn contradiction_classifies_unsat() {
    let params = Params::default();
    let (_, _, pre) = run("x & !x", &params);
    assert_eq!(pre.class, PreprocessClass::Unsat);
}

#[test]
fn clausal_residual_classifies_cnf() {
    let params = Params::default();
    let (store, theory, pre) = run("(a | b) & (!a | b) & (c | d) & (!c | !d)", &params);
    assert_eq!(pre.class, PreprocessClass::Cnf);

    // the forced unate seeded both the trail and the theory
    let b = pre
        .trail
        .iter()
        .find(|e| e.lit.sign)
        .map(|e| e.lit.term)
        .expect("seeded literal");
    assert_eq!(store.display(b), "b");
    assert_eq!(theory.value(b), Some(true));

    // the residual is the untouched clausal part
    assert_eq!(store.display(pre.residual), "(c | d) & (!c | !d)");
}

#[test]
fn forced_solution_classifies_cnf_with_empty_residual() {
    let params = Params::default();
    let (store, _, pre) = run("(a | b) & (!a | b) & (a | !b)", &params);
    assert!(store.is_true(pre.residual));
    assert_eq!(pre.class, PreprocessClass::Cnf);
    assert!(pre.trail.len() >= 2);
}

#[test]
fn non_clausal_residual_classifies_default() {
    let params = Params::default();
    let (store, _, pre) = run("a & b | !a & !b", &params);
    assert_eq!(pre.class, PreprocessClass::Default);
    assert!(!store.is_constant(pre.residual));
    assert_eq!(pre.trail.len(), 0);
}
