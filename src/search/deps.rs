use indexmap::IndexMap;

use crate::term::store::{Term, TermData, TermStore};

// candidate boolean atom with polarity-split occurrence counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepEntry {
    pub term: Term,
    pub count: usize,
    pub pos: usize,
    pub neg: usize,
}

// candidate atoms of the working formula in first-occurrence order;
// recomputed whenever the working formula changes
pub fn dependency_list(store: &TermStore, formula: Term) -> Vec<DepEntry> {
    let mut counts = IndexMap::<Term, (usize, usize)>::new();
    visit(store, formula, true, &mut counts);
    counts
        .into_iter()
        .map(|(term, (pos, neg))| DepEntry {
            term,
            count: pos + neg,
            pos,
            neg,
        })
        .collect()
}

fn visit(store: &TermStore, term: Term, polarity: bool, counts: &mut IndexMap<Term, (usize, usize)>) {
    match store.data(term) {
        TermData::True | TermData::False => {}
        TermData::Atom(_) => {
            let slot = counts.entry(term).or_insert((0, 0));
            if polarity {
                slot.0 += 1;
            } else {
                slot.1 += 1;
            }
        }
        TermData::Not(x) => visit(store, *x, !polarity, counts),
        TermData::And(xs) | TermData::Or(xs) => {
            for &x in xs {
                visit(store, x, polarity, counts);
            }
        }
    }
}
