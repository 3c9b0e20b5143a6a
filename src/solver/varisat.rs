use varisat::ExtendFormula;

use crate::cnf::Lit;

use super::{IncrementalSolver, SolveResult, SolverStats};

// external boolean sat backend for cnf-classified residuals
pub struct VarisatSolver {
    inner: varisat::Solver<'static>,
    vars: Vec<varisat::Var>,
    model: Vec<Option<bool>>,
    stats: SolverStats,
}

impl VarisatSolver {
    pub fn new() -> Self {
        Self {
            inner: varisat::Solver::new(),
            vars: Vec::new(),
            model: Vec::new(),
            stats: SolverStats::default(),
        }
    }

    fn lift(&self, lit: Lit) -> Option<varisat::Lit> {
        if lit.var == 0 {
            return None;
        }
        let var = self.vars.get(lit.var as usize - 1)?;
        Some(var.lit(lit.sign))
    }
}

impl Default for VarisatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalSolver for VarisatSolver {
    fn new_var(&mut self) -> u32 {
        let var = self.inner.new_var();
        self.vars.push(var);
        self.vars.len() as u32
    }

    fn add_clause(&mut self, clause: Vec<Lit>) {
        let lits = clause
            .into_iter()
            .filter_map(|lit| self.lift(lit))
            .collect::<Vec<_>>();
        self.inner.add_clause(&lits);
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.stats.solve_calls += 1;
        let assumed = assumptions
            .iter()
            .filter_map(|&lit| self.lift(lit))
            .collect::<Vec<_>>();
        self.inner.assume(&assumed);
        self.model = vec![None; self.vars.len() + 1];
        match self.inner.solve() {
            Ok(true) => {
                if let Some(model) = self.inner.model() {
                    for lit in model {
                        let idx = lit.var().index() + 1;
                        if idx < self.model.len() {
                            self.model[idx] = Some(lit.is_positive());
                        }
                    }
                }
                SolveResult::Sat
            }
            Ok(false) | Err(_) => SolveResult::Unsat,
        }
    }

    fn model_value(&self, var: u32) -> Option<bool> {
        self.model.get(var as usize).copied().flatten()
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "varisat"
    }
}
