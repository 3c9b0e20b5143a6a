use std::collections::HashMap;

use indexmap::IndexMap;

use super::store::{Term, TermData, TermStore};

// atom term -> assumed truth value
pub type Assignment = IndexMap<Term, bool>;

pub fn simplify(store: &mut TermStore, term: Term, asg: &Assignment) -> Term {
    let mut memo = HashMap::new();
    walk(store, term, asg, &mut memo)
}

fn walk(
    store: &mut TermStore,
    term: Term,
    asg: &Assignment,
    memo: &mut HashMap<Term, Term>,
) -> Term {
    if let Some(&done) = memo.get(&term) {
        return done;
    }
    let out = match store.data(term).clone() {
        TermData::True | TermData::False => term,
        TermData::Atom(_) => match asg.get(&term) {
            Some(true) => store.truth(),
            Some(false) => store.falsity(),
            None => term,
        },
        TermData::Not(x) => {
            let inner = walk(store, x, asg, memo);
            store.not(inner)
        }
        TermData::And(xs) => {
            let parts = xs
                .into_iter()
                .map(|x| walk(store, x, asg, memo))
                .collect::<Vec<_>>();
            store.and(parts)
        }
        TermData::Or(xs) => {
            let parts = xs
                .into_iter()
                .map(|x| walk(store, x, asg, memo))
                .collect::<Vec<_>>();
            store.or(parts)
        }
    };
    memo.insert(term, out);
    out
}

// probe both polarities of one atom under an existing assignment
pub fn probe(store: &mut TermStore, formula: Term, asg: &Assignment, atom: Term) -> (Term, Term) {
    let mut with_true = asg.clone();
    with_true.insert(atom, true);
    let mut with_false = asg.clone();
    with_false.insert(atom, false);
    let pos = simplify(store, formula, &with_true);
    let neg = simplify(store, formula, &with_false);
    (pos, neg)
}
