pub mod boolean;

use crate::term::store::{Lit, Term};

// checkpoint into a theory's undo stack; release pops back to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TheoryMark(pub usize);

// seam to the external theory solvers (congruence closure, arithmetic).
// assert_lit/deny push a fact and report whether the theory state became
// jointly unsatisfiable; the caller recovers locally and must pair every
// successful push with a release of the enclosing mark.
pub trait Theory {
    fn assert_lit(&mut self, lit: Lit) -> bool;

    fn deny(&mut self, lit: Lit) -> bool {
        self.assert_lit(lit.neg())
    }

    fn value(&self, term: Term) -> Option<bool>;

    fn mark(&self) -> TheoryMark;

    fn release(&mut self, mark: TheoryMark);

    // finite-domain hooks for numeric branch-variable selection; a purely
    // boolean theory leaves them inert
    fn int_min(&self, _term: Term) -> Option<i64> {
        None
    }

    fn int_max(&self, _term: Term) -> Option<i64> {
        None
    }

    fn value_count(&self, term: Term) -> Option<u64> {
        match (self.int_min(term), self.int_max(term)) {
            (Some(lo), Some(hi)) if hi >= lo => Some((hi - lo) as u64 + 1),
            _ => None,
        }
    }
}
