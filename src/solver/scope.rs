use crate::cnf::Lit;

use super::IncrementalSolver;

// activation-literal scope: clauses tagged with the scope are live only
// while its literal is assumed, so retracting a scope is just dropping
// the assumption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    act: Lit,
}

impl Scope {
    pub fn open<S: IncrementalSolver + ?Sized>(solver: &mut S) -> Self {
        let var = solver.new_var();
        Self {
            act: Lit::new(var, true),
        }
    }

    pub fn assumption(&self) -> Lit {
        self.act
    }

    pub fn add_clause<S: IncrementalSolver + ?Sized>(&self, solver: &mut S, clause: Vec<Lit>) {
        let mut scoped = Vec::with_capacity(clause.len() + 1);
        scoped.push(self.act.neg());
        scoped.extend(clause);
        solver.add_clause(scoped);
    }
}
