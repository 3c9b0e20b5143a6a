use anyhow::{bail, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Cnf, Lit};

// planted k-sat: every clause is satisfied by the hidden witness, so the
// instance is satisfiable by construction. make_unsat pins a contradictory
// unit pair on top for unsat fixtures.
pub fn gen_planted_ksat(
    vars: usize,
    clauses: usize,
    width: usize,
    seed: u64,
    make_unsat: bool,
) -> Result<(Cnf, Vec<bool>)> {
    if vars == 0 {
        bail!("vars must be >= 1");
    }
    if width == 0 || width > vars {
        bail!("clause width {} out of range for {} vars", width, vars);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // witness is indexed by variable, slot 0 unused
    let mut witness = vec![false; vars + 1];
    for slot in witness.iter_mut().skip(1) {
        *slot = rng.random::<bool>();
    }

    let mut cnf = Cnf::new(vars as u32);
    for _ in 0..clauses {
        let mut picked = Vec::<u32>::with_capacity(width);
        while picked.len() < width {
            let var = rng.random_range(1..=vars) as u32;
            if !picked.contains(&var) {
                picked.push(var);
            }
        }
        let mut clause = picked
            .iter()
            .map(|&var| Lit::new(var, rng.random::<bool>()))
            .collect::<Vec<_>>();
        // force at least one literal true under the witness
        if !clause.iter().any(|lit| witness[lit.var as usize] == lit.sign) {
            let fix = rng.random_range(0..clause.len());
            clause[fix] = Lit::new(clause[fix].var, witness[clause[fix].var as usize]);
        }
        cnf.add_clause(clause);
    }

    if make_unsat {
        cnf.add_clause(vec![Lit::new(1, true)]);
        cnf.add_clause(vec![Lit::new(1, false)]);
    }

    Ok((cnf, witness))
}
