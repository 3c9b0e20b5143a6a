use crate::cnf::extract::cnf_to_formula;
use crate::cnf::{Cnf, Lit};
use crate::search::satprove::sat_prove_front;
use crate::search::{Params, StopFlag};
use crate::term::store::TermStore;
use crate::theory::boolean::BoolTheory;

use super::{IncrementalSolver, SolveResult, SolverStats};

// backend running the crate's own literal-tree driver. each solve call
// replays the clause set as a term formula and searches for one model.
#[derive(Debug)]
pub struct SatProveBackend {
    cnf: Cnf,
    params: Params,
    last_model: Option<Vec<Option<bool>>>,
    stats: SolverStats,
}

impl SatProveBackend {
    pub fn new() -> Self {
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Self {
        // model search wants the first satisfying branch, not all of them
        let params = Params {
            find_all_fails: false,
            ..params
        };
        Self {
            cnf: Cnf::new(0),
            params,
            last_model: None,
            stats: SolverStats::default(),
        }
    }
}

impl Default for SatProveBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalSolver for SatProveBackend {
    fn new_var(&mut self) -> u32 {
        self.cnf.fresh_var()
    }

    fn add_clause(&mut self, clause: Vec<Lit>) {
        self.cnf.add_clause(clause);
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult {
        self.stats.solve_calls += 1;
        let mut work = self.cnf.clone();
        for &assumed in assumptions {
            work.add_clause(vec![assumed]);
        }

        let mut store = TermStore::new();
        let (formula, map) = cnf_to_formula(&mut store, &work);
        let mut theory = BoolTheory::new();
        let report = sat_prove_front(
            &mut store,
            &mut theory,
            formula,
            self.params.clone(),
            StopFlag::new(),
        );
        self.stats.decisions += report.stats.decisions;
        self.stats.conflicts += report.stats.conflicts;
        self.stats.restarts += report.stats.restarts;

        match report.fails.first() {
            Some(entry) => {
                let mut model = vec![None; self.cnf.num_vars as usize + 1];
                for var in 1..=self.cnf.num_vars {
                    model[var as usize] = map
                        .term_for(var)
                        .and_then(|term| entry.trail.value_of(term));
                }
                // variables the satisfying trail never touched are free
                for slot in model.iter_mut().skip(1) {
                    if slot.is_none() {
                        *slot = Some(false);
                    }
                }
                self.last_model = Some(model);
                SolveResult::Sat
            }
            None => {
                self.last_model = None;
                SolveResult::Unsat
            }
        }
    }

    fn model_value(&self, var: u32) -> Option<bool> {
        self.last_model
            .as_ref()
            .and_then(|model| model.get(var as usize).copied().flatten())
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "sat_prove"
    }
}
