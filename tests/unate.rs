use termprove::search::deps::dependency_list;
use termprove::search::trail::Trail;
use termprove::search::unate::unate_literals;
use termprove::term::parse::parse_formula;
use termprove::term::store::{Lit, TermStore};

#[test]
fn unit_atom_is_forced_positive() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "a").expect("parse");
    let a = store.atom("a");

    let deps = dependency_list(&store, formula);
    let forced = unate_literals(&mut store, formula, &deps, &Trail::new());
    assert_eq!(forced, vec![Lit::pos(a)]);
}

#[test]
fn negated_unit_is_forced_negative() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "!a").expect("parse");
    let a = store.atom("a");

    let deps = dependency_list(&store, formula);
    let forced = unate_literals(&mut store, formula, &deps, &Trail::new());
    assert_eq!(forced, vec![Lit::new(a, false)]);
}

#[test]
fn pure_polarity_atoms_are_forced_monotonically() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a | b) & (a | c)").expect("parse");
    let a = store.atom("a");

    let deps = dependency_list(&store, formula);
    let entry = deps.iter().find(|d| d.term == a).expect("dep entry");
    assert_eq!((entry.pos, entry.neg), (2, 0));

    let forced = unate_literals(&mut store, formula, &deps, &Trail::new());
    assert!(forced.contains(&Lit::pos(a)));
}

#[test]
fn mixed_polarity_atom_with_open_branches_is_not_forced() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "(a | b) & (!a | c)").expect("parse");
    let a = store.atom("a");

    let deps = dependency_list(&store, formula);
    let forced = unate_literals(&mut store, formula, &deps, &Trail::new());
    assert!(forced.iter().all(|lit| lit.term != a));
}

#[test]
fn collapse_to_false_forces_the_opposite_polarity() {
    let mut store = TermStore::new();
    // b = false leaves a & !a, which the rewriter collapses
    let formula = parse_formula(&mut store, "(a | b) & (!a | b) & (a | !b)").expect("parse");
    let a = store.atom("a");
    let b = store.atom("b");

    let deps = dependency_list(&store, formula);
    let forced = unate_literals(&mut store, formula, &deps, &Trail::new());
    assert!(forced.contains(&Lit::pos(a)));
    assert!(forced.contains(&Lit::pos(b)));
}

#[test]
fn trailed_atoms_are_skipped() {
    let mut store = TermStore::new();
    let formula = parse_formula(&mut store, "a & b").expect("parse");
    let a = store.atom("a");
    let b = store.atom("b");

    let trail = Trail::new().push(
        Lit::pos(a),
        formula,
        termprove::search::trail::TrailKind::Unate,
        0,
    );
    let deps = dependency_list(&store, formula);
    let forced = unate_literals(&mut store, formula, &deps, &trail);
    assert!(forced.iter().all(|lit| lit.term != a));
    assert!(forced.contains(&Lit::pos(b)));
}

#[test]
fn dead_both_ways_yields_both_polarities_in_order() {
    let mut store = TermStore::new();
    let formula =
        parse_formula(&mut store, "(t | s) & (t | !s) & (!t | s) & (!t | !s)").expect("parse");
    let t = store.atom("t");

    let deps = dependency_list(&store, formula);
    let forced = unate_literals(&mut store, formula, &deps, &Trail::new());
    let t_lits = forced
        .iter()
        .filter(|lit| lit.term == t)
        .collect::<Vec<_>>();
    assert_eq!(t_lits.len(), 2);
    assert_eq!(*t_lits[0], Lit::pos(t));
    assert_eq!(*t_lits[1], Lit::new(t, false));
}
