use proptest::prelude::*;

use termprove::cnf::extract::cnf_to_formula;
use termprove::cnf::{Cnf, Lit};
use termprove::search::driver::prove;
use termprove::search::satprove::sat_prove_front;
use termprove::search::{Params, StopFlag};
use termprove::term::store::TermStore;
use termprove::theory::boolean::BoolTheory;

const VARS: u32 = 4;

fn build(clauses: &[Vec<(u32, bool)>]) -> Cnf {
    let mut cnf = Cnf::new(VARS);
    for clause in clauses {
        cnf.add_clause(
            clause
                .iter()
                .map(|&(var, sign)| Lit::new(var, sign))
                .collect(),
        );
    }
    cnf
}

fn full_assignment(bits: u32) -> Vec<Option<bool>> {
    let mut assignment = vec![None; VARS as usize + 1];
    for var in 1..=VARS {
        assignment[var as usize] = Some(bits & (1 << (var - 1)) != 0);
    }
    assignment
}

fn brute_force_satisfiable(cnf: &Cnf) -> bool {
    (0..1u32 << VARS).any(|bits| cnf.value(&full_assignment(bits)) == Some(true))
}

fn brute_force_tautology(cnf: &Cnf) -> bool {
    (0..1u32 << VARS).all(|bits| cnf.value(&full_assignment(bits)) == Some(true))
}

fn deterministic(params: Params) -> Params {
    Params {
        random_probability: 0.0,
        find_all_fails: false,
        ..params
    }
}

proptest! {
    // the literal-tree driver agrees with brute force on satisfiability
    #[test]
    fn sat_prove_matches_brute_force(
        clauses in prop::collection::vec(
            prop::collection::vec((1..=VARS, any::<bool>()), 1..4),
            1..8,
        )
    ) {
        let cnf = build(&clauses);
        let expected = brute_force_satisfiable(&cnf);

        let mut store = TermStore::new();
        let (formula, _) = cnf_to_formula(&mut store, &cnf);
        let mut theory = BoolTheory::new();
        let report = sat_prove_front(
            &mut store,
            &mut theory,
            formula,
            deterministic(Params::default()),
            StopFlag::new(),
        );
        prop_assert!(!report.interrupted);
        prop_assert_eq!(!report.fails.is_empty(), expected);
    }

    // with unate propagation off the term-tree driver is a pure case
    // splitter: it proves exactly the tautologies
    #[test]
    fn prove_without_unates_recognizes_tautologies(
        clauses in prop::collection::vec(
            prop::collection::vec((1..=VARS, any::<bool>()), 1..4),
            1..6,
        )
    ) {
        let cnf = build(&clauses);
        let expected = brute_force_tautology(&cnf);

        let mut store = TermStore::new();
        let (formula, _) = cnf_to_formula(&mut store, &cnf);
        let mut theory = BoolTheory::new();
        let report = prove(
            &mut store,
            &mut theory,
            formula,
            Params {
                do_unate: false,
                ..deterministic(Params::default())
            },
            StopFlag::new(),
        );
        prop_assert!(!report.interrupted);
        prop_assert_eq!(report.proved(), expected);
    }

    // asserting a classified unate literal never changes satisfiability
    #[test]
    fn unate_assertions_preserve_satisfiability(
        clauses in prop::collection::vec(
            prop::collection::vec((1..=VARS, any::<bool>()), 1..4),
            1..6,
        )
    ) {
        use termprove::search::deps::dependency_list;
        use termprove::search::trail::Trail;
        use termprove::search::unate::unate_literals;

        let cnf = build(&clauses);
        let mut store = TermStore::new();
        let (formula, map) = cnf_to_formula(&mut store, &cnf);

        let deps = dependency_list(&store, formula);
        let forced = unate_literals(&mut store, formula, &deps, &Trail::new());
        // both-polarity emissions flag a dead atom, not a usable literal
        let mut usable = Vec::new();
        for lit in &forced {
            if forced.iter().all(|other| *other != lit.neg()) {
                usable.push(*lit);
            }
        }

        for lit in usable {
            let var = map
                .atoms()
                .find(|&(term, _)| term == lit.term)
                .map(|(_, var)| var)
                .expect("forced atom maps to a variable");
            let mut pinned = cnf.clone();
            pinned.add_clause(vec![Lit::new(var, lit.sign)]);
            prop_assert_eq!(
                brute_force_satisfiable(&pinned),
                brute_force_satisfiable(&cnf),
            );
        }
    }
}
