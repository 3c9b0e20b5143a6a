use std::io::BufRead;

use anyhow::{bail, Context, Result};

use super::{Cnf, Lit};

pub fn to_dimacs(cnf: &Cnf) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cnf.num_vars, cnf.clauses.len()));
    for clause in &cnf.clauses {
        for &lit in clause {
            let v = lit.var as i64;
            out.push_str(&format!("{} ", if lit.sign { v } else { -v }));
        }
        out.push_str("0\n");
    }
    out
}

pub fn parse_dimacs_str(s: &str) -> Result<Cnf> {
    parse_dimacs_reader(std::io::Cursor::new(s.as_bytes()))
}

pub fn parse_dimacs_reader<R: BufRead>(r: R) -> Result<Cnf> {
    let mut cnf = None::<Cnf>;
    let mut clause = Vec::<Lit>::new();
    let mut expected_clauses = 0usize;

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.context("failed to read dimacs line")?;
        let clean = line.trim();
        if clean.is_empty() || clean.starts_with('c') {
            continue;
        }

        if let Some(rest) = clean.strip_prefix('p') {
            if cnf.is_some() {
                bail!("line {}: duplicate problem line", line_no);
            }
            let mut fields = rest.split_whitespace();
            if fields.next() != Some("cnf") {
                bail!("line {}: expected 'p cnf'", line_no);
            }
            let vars: u32 = fields
                .next()
                .and_then(|f| f.parse().ok())
                .with_context(|| format!("line {}: bad variable count", line_no))?;
            expected_clauses = fields
                .next()
                .and_then(|f| f.parse().ok())
                .with_context(|| format!("line {}: bad clause count", line_no))?;
            if fields.next().is_some() {
                bail!("line {}: trailing fields on problem line", line_no);
            }
            cnf = Some(Cnf::new(vars));
            continue;
        }

        let Some(current) = cnf.as_mut() else {
            bail!("line {}: clause before problem line", line_no);
        };
        for field in clean.split_whitespace() {
            let value: i64 = field
                .parse()
                .with_context(|| format!("line {}: bad literal '{}'", line_no, field))?;
            if value == 0 {
                current.add_clause(std::mem::take(&mut clause));
                continue;
            }
            let var = value.unsigned_abs() as u32;
            if var > current.num_vars {
                bail!(
                    "line {}: literal {} exceeds declared variable count {}",
                    line_no,
                    value,
                    current.num_vars
                );
            }
            clause.push(Lit::new(var, value > 0));
        }
    }

    let Some(cnf) = cnf else {
        bail!("missing problem line");
    };
    if !clause.is_empty() {
        bail!("unterminated final clause");
    }
    if cnf.clauses.len() != expected_clauses {
        bail!(
            "clause count mismatch: header says {}, found {}",
            expected_clauses,
            cnf.clauses.len()
        );
    }
    Ok(cnf)
}
