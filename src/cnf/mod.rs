pub mod dimacs;
pub mod extract;
pub mod gen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub var: u32,
    pub sign: bool,
}

impl Lit {
    pub fn new(var: u32, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }
}

// plain clause set over 1-based variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: u32,
    pub clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    pub fn fresh_var(&mut self) -> u32 {
        self.num_vars = self.num_vars.saturating_add(1);
        self.num_vars
    }

    pub fn max_clause_width(&self) -> usize {
        self.clauses.iter().map(Vec::len).max().unwrap_or(0)
    }

    // assignment is indexed by variable, slot 0 unused
    pub fn lit_value(&self, lit: Lit, assignment: &[Option<bool>]) -> Option<bool> {
        let slot = assignment.get(lit.var as usize).copied().flatten()?;
        Some(if lit.sign { slot } else { !slot })
    }

    pub fn clause_value(&self, clause: &[Lit], assignment: &[Option<bool>]) -> Option<bool> {
        let mut open = false;
        for &lit in clause {
            match self.lit_value(lit, assignment) {
                Some(true) => return Some(true),
                Some(false) => {}
                None => open = true,
            }
        }
        if open {
            None
        } else {
            Some(false)
        }
    }

    pub fn value(&self, assignment: &[Option<bool>]) -> Option<bool> {
        let mut open = false;
        for clause in &self.clauses {
            match self.clause_value(clause, assignment) {
                Some(true) => {}
                Some(false) => return Some(false),
                None => open = true,
            }
        }
        if open {
            None
        } else {
            Some(true)
        }
    }

    pub fn satisfied_by(&self, witness: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|&lit| {
                witness
                    .get(lit.var as usize)
                    .map(|&v| v == lit.sign)
                    .unwrap_or(false)
            })
        })
    }
}
