use crate::term::rewrite::{probe, Assignment};
use crate::term::store::{Lit, Term, TermStore};

use super::deps::DepEntry;
use super::trail::Trail;

// unate-literal detection generalized to theory atoms: a polarity whose
// opposite collapses the working formula to false is forced, and a
// single-polarity (monotone) atom is forced to its occurring polarity.
// ordered by dependency-list order. the caller asserts each literal in
// turn and re-simplifies; a both-ways-dead atom yields both polarities so
// the second assert surfaces the contradiction at the theory.
pub fn unate_literals(
    store: &mut TermStore,
    formula: Term,
    deps: &[DepEntry],
    trail: &Trail,
) -> Vec<Lit> {
    let asg: Assignment = trail.assignment();
    let mut out = Vec::new();
    for dep in deps {
        if trail.value_of(dep.term).is_some() {
            continue;
        }
        let (under_true, under_false) = probe(store, formula, &asg, dep.term);
        let true_dead = store.is_false(under_true);
        let false_dead = store.is_false(under_false);
        if true_dead && false_dead {
            out.push(Lit::pos(dep.term));
            out.push(Lit::new(dep.term, false));
        } else if false_dead {
            out.push(Lit::pos(dep.term));
        } else if true_dead {
            out.push(Lit::new(dep.term, false));
        } else if dep.neg == 0 && dep.pos > 0 {
            out.push(Lit::pos(dep.term));
        } else if dep.pos == 0 && dep.neg > 0 {
            out.push(Lit::new(dep.term, false));
        }
    }
    out
}
