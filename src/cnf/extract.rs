use indexmap::IndexMap;

use crate::term::store::{Term, TermData, TermStore};

use super::{Cnf, Lit};

// two-way table between atom terms and 1-based cnf variables
#[derive(Debug, Clone, Default)]
pub struct AtomMap {
    vars: IndexMap<Term, u32>,
}

impl AtomMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var_for(&mut self, atom: Term) -> u32 {
        match self.vars.get(&atom) {
            Some(&var) => var,
            None => {
                let var = self.vars.len() as u32 + 1;
                self.vars.insert(atom, var);
                var
            }
        }
    }

    pub fn term_for(&self, var: u32) -> Option<Term> {
        self.vars
            .get_index(var.checked_sub(1)? as usize)
            .map(|(&term, _)| term)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn atoms(&self) -> impl Iterator<Item = (Term, u32)> + '_ {
        self.vars.iter().map(|(&term, &var)| (term, var))
    }
}

// strict clausal extraction, no encoding: Some only when the formula
// already is a conjunction of disjunctions of atom literals. this is the
// shape the preprocessor classifies as CNF for the backend hand-off.
pub fn formula_to_cnf(store: &TermStore, formula: Term) -> Option<(Cnf, AtomMap)> {
    let mut map = AtomMap::new();
    let mut clauses = Vec::new();
    match store.data(formula) {
        TermData::True => {}
        TermData::False => clauses.push(Vec::new()),
        TermData::And(parts) => {
            for &part in parts {
                clauses.push(clause_lits(store, part, &mut map)?);
            }
        }
        _ => clauses.push(clause_lits(store, formula, &mut map)?),
    }
    let mut cnf = Cnf::new(map.len() as u32);
    for clause in clauses {
        cnf.add_clause(clause);
    }
    Some((cnf, map))
}

fn clause_lits(store: &TermStore, clause: Term, map: &mut AtomMap) -> Option<Vec<Lit>> {
    match store.data(clause) {
        TermData::Or(parts) => {
            let mut lits = Vec::with_capacity(parts.len());
            for &part in parts {
                lits.push(term_lit(store, part, map)?);
            }
            Some(lits)
        }
        _ => Some(vec![term_lit(store, clause, map)?]),
    }
}

fn term_lit(store: &TermStore, term: Term, map: &mut AtomMap) -> Option<Lit> {
    match store.data(term) {
        TermData::Atom(_) => Some(Lit::new(map.var_for(term), true)),
        TermData::Not(inner) => match store.data(*inner) {
            TermData::Atom(_) => Some(Lit::new(map.var_for(*inner), false)),
            _ => None,
        },
        _ => None,
    }
}

// rebuild a clause set as a term formula, naming variables v1..vn
pub fn cnf_to_formula(store: &mut TermStore, cnf: &Cnf) -> (Term, AtomMap) {
    let mut map = AtomMap::new();
    let mut atom_for = Vec::with_capacity(cnf.num_vars as usize + 1);
    atom_for.push(store.falsity()); // slot 0 unused
    for var in 1..=cnf.num_vars {
        let atom = store.atom(&format!("v{}", var));
        let mapped = map.var_for(atom);
        debug_assert_eq!(mapped, var);
        atom_for.push(atom);
    }
    let mut clause_terms = Vec::with_capacity(cnf.clauses.len());
    for clause in &cnf.clauses {
        let mut lit_terms = Vec::with_capacity(clause.len());
        for &lit in clause {
            let atom = atom_for[lit.var as usize];
            let term = if lit.sign { atom } else { store.not(atom) };
            lit_terms.push(term);
        }
        clause_terms.push(store.or(lit_terms));
    }
    (store.and(clause_terms), map)
}
