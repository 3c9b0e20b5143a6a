use termprove::term::parse::parse_formula;
use termprove::term::store::TermStore;

#[test]
fn free_vars_are_sorted_and_deduped() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(b | a) & (a | c) & !b").expect("parse");

    let names = store
        .free_vars(formula)
        .into_iter()
        .map(|sym| store.symbol_name(sym).to_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["b", "a", "c"].into_iter().map(String::from).collect::<Vec<_>>());
}

#[test]
fn constants_have_no_free_vars() {
    let mut store = TermStore::new();
    let t = parse_formula(&mut store, "true").expect("parse");
    assert!(store.free_vars(t).is_empty());
    assert!(store.is_constant(t));
}

#[test]
fn term_size_counts_distinct_nodes() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a & b) | (a & b)").expect("parse");
    // both disjuncts intern to the same node, so the or collapses
    let a = store.atom("a");
    let b = store.atom("b");
    let ab = store.and(vec![a, b]);
    assert_eq!(formula, ab);
    assert_eq!(store.term_size(formula), 3);
}

#[test]
fn occurs_in_walks_the_dag() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a & b) | c").expect("parse");
    let a = store.atom("a");
    let b = store.atom("b");
    let ab = store.and(vec![a, b]);
    let d = store.atom("d");

    assert!(store.occurs_in(a, formula));
    assert!(store.occurs_in(ab, formula));
    assert!(!store.occurs_in(d, formula));
}

#[test]
fn interning_is_shared_across_formulas() {
    let mut store = TermStore::new();
    let before = store.num_terms();
    parse_formula(&mut store, "p & q").expect("parse");
    let between = store.num_terms();
    parse_formula(&mut store, "p & q").expect("parse");
    assert_eq!(store.num_terms(), between);
    assert!(between > before);
}

#[test]
fn display_round_trips_through_the_parser() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a | !b) & c").expect("parse");
    let printed = store.display(formula);
    let reparsed = parse_formula(&mut store, &printed).expect("reparse");
    assert_eq!(reparsed, formula);
}
