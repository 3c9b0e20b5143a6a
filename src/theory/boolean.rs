use indexmap::IndexMap;

use crate::term::store::{Lit, Term};

use super::{Theory, TheoryMark};

// reference theory: a polarity map over atom terms with a LIFO undo log.
// asserting an atom twice with the same polarity is a no-op; the opposite
// polarity is a contradiction.
#[derive(Debug, Default)]
pub struct BoolTheory {
    values: IndexMap<Term, bool>,
    log: Vec<Term>,
}

impl BoolTheory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_fixed(&self) -> usize {
        self.values.len()
    }
}

impl Theory for BoolTheory {
    fn assert_lit(&mut self, lit: Lit) -> bool {
        match self.values.get(&lit.term) {
            Some(&prev) => prev != lit.sign,
            None => {
                self.values.insert(lit.term, lit.sign);
                self.log.push(lit.term);
                false
            }
        }
    }

    fn value(&self, term: Term) -> Option<bool> {
        self.values.get(&term).copied()
    }

    fn mark(&self) -> TheoryMark {
        TheoryMark(self.log.len())
    }

    fn release(&mut self, mark: TheoryMark) {
        while self.log.len() > mark.0 {
            if let Some(term) = self.log.pop() {
                self.values.swap_remove(&term);
            }
        }
    }
}
