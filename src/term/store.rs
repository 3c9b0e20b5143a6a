use std::collections::HashSet;
use std::fmt::Write as _;

use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term(u32);

impl Term {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub term: Term,
    pub sign: bool,
}

impl Lit {
    pub fn new(term: Term, sign: bool) -> Self {
        Self { term, sign }
    }

    pub fn pos(term: Term) -> Self {
        Self { term, sign: true }
    }

    pub fn neg(self) -> Self {
        Self {
            term: self.term,
            sign: !self.sign,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermData {
    True,
    False,
    Atom(Symbol),
    Not(Term),
    And(Vec<Term>),
    Or(Vec<Term>),
}

#[derive(Debug, Default)]
pub struct TermStore {
    nodes: IndexSet<TermData>,
    symbols: IndexSet<String>,
}

impl TermStore {
    pub fn new() -> Self {
        let mut store = Self {
            nodes: IndexSet::new(),
            symbols: IndexSet::new(),
        };
        // constants live at fixed slots so truth()/falsity() stay cheap
        store.intern(TermData::True);
        store.intern(TermData::False);
        store
    }

    fn intern(&mut self, data: TermData) -> Term {
        let (idx, _) = self.nodes.insert_full(data);
        Term(idx as u32)
    }

    pub fn truth(&self) -> Term {
        Term(0)
    }

    pub fn falsity(&self) -> Term {
        Term(1)
    }

    pub fn data(&self, term: Term) -> &TermData {
        &self.nodes[term.index()]
    }

    pub fn num_terms(&self) -> usize {
        self.nodes.len()
    }

    pub fn symbol(&mut self, name: &str) -> Symbol {
        let (idx, _) = self.symbols.insert_full(name.to_owned());
        Symbol(idx as u32)
    }

    pub fn symbol_name(&self, sym: Symbol) -> &str {
        &self.symbols[sym.index()]
    }

    pub fn atom(&mut self, name: &str) -> Term {
        let sym = self.symbol(name);
        self.intern(TermData::Atom(sym))
    }

    pub fn not(&mut self, t: Term) -> Term {
        match self.data(t) {
            TermData::True => self.falsity(),
            TermData::False => self.truth(),
            TermData::Not(inner) => *inner,
            _ => self.intern(TermData::Not(t)),
        }
    }

    pub fn and(&mut self, parts: Vec<Term>) -> Term {
        let mut flat = Vec::with_capacity(parts.len());
        let mut seen = HashSet::new();
        for p in parts {
            // flatten nested conjunctions so clause shape stays visible
            match self.data(p) {
                TermData::True => continue,
                TermData::False => return self.falsity(),
                TermData::And(inner) => {
                    for &q in inner {
                        if seen.insert(q) {
                            flat.push(q);
                        }
                    }
                }
                _ => {
                    if seen.insert(p) {
                        flat.push(p);
                    }
                }
            }
        }
        // x and not(x) collapse
        for &p in &flat {
            if let TermData::Not(inner) = self.data(p) {
                if seen.contains(inner) {
                    return self.falsity();
                }
            }
        }
        match flat.len() {
            0 => self.truth(),
            1 => flat[0],
            _ => self.intern(TermData::And(flat)),
        }
    }

    pub fn or(&mut self, parts: Vec<Term>) -> Term {
        let mut flat = Vec::with_capacity(parts.len());
        let mut seen = HashSet::new();
        for p in parts {
            match self.data(p) {
                TermData::False => continue,
                TermData::True => return self.truth(),
                TermData::Or(inner) => {
                    for &q in inner {
                        if seen.insert(q) {
                            flat.push(q);
                        }
                    }
                }
                _ => {
                    if seen.insert(p) {
                        flat.push(p);
                    }
                }
            }
        }
        for &p in &flat {
            if let TermData::Not(inner) = self.data(p) {
                if seen.contains(inner) {
                    return self.truth();
                }
            }
        }
        match flat.len() {
            0 => self.falsity(),
            1 => flat[0],
            _ => self.intern(TermData::Or(flat)),
        }
    }

    pub fn implies(&mut self, lhs: Term, rhs: Term) -> Term {
        let nl = self.not(lhs);
        self.or(vec![nl, rhs])
    }

    pub fn iff(&mut self, lhs: Term, rhs: Term) -> Term {
        let fwd = self.implies(lhs, rhs);
        let bwd = self.implies(rhs, lhs);
        self.and(vec![fwd, bwd])
    }

    pub fn is_constant(&self, term: Term) -> bool {
        matches!(self.data(term), TermData::True | TermData::False)
    }

    pub fn is_true(&self, term: Term) -> bool {
        term == self.truth()
    }

    pub fn is_false(&self, term: Term) -> bool {
        term == self.falsity()
    }

    pub fn free_vars(&self, term: Term) -> Vec<Symbol> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![term];
        while let Some(t) = stack.pop() {
            if !visited.insert(t) {
                continue;
            }
            match self.data(t) {
                TermData::True | TermData::False => {}
                TermData::Atom(sym) => out.push(*sym),
                TermData::Not(x) => stack.push(*x),
                TermData::And(xs) | TermData::Or(xs) => stack.extend(xs.iter().copied()),
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn atoms(&self, term: Term) -> Vec<Term> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![term];
        while let Some(t) = stack.pop() {
            if !visited.insert(t) {
                continue;
            }
            match self.data(t) {
                TermData::True | TermData::False => {}
                TermData::Atom(_) => out.push(t),
                TermData::Not(x) => stack.push(*x),
                TermData::And(xs) | TermData::Or(xs) => stack.extend(xs.iter().copied()),
            }
        }
        out
    }

    // distinct node count of the term dag
    pub fn term_size(&self, term: Term) -> usize {
        let mut visited = HashSet::new();
        let mut stack = vec![term];
        while let Some(t) = stack.pop() {
            if !visited.insert(t) {
                continue;
            }
            match self.data(t) {
                TermData::True | TermData::False | TermData::Atom(_) => {}
                TermData::Not(x) => stack.push(*x),
                TermData::And(xs) | TermData::Or(xs) => stack.extend(xs.iter().copied()),
            }
        }
        visited.len()
    }

    pub fn occurs_in(&self, needle: Term, hay: Term) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![hay];
        while let Some(t) = stack.pop() {
            if t == needle {
                return true;
            }
            if !visited.insert(t) {
                continue;
            }
            match self.data(t) {
                TermData::True | TermData::False | TermData::Atom(_) => {}
                TermData::Not(x) => stack.push(*x),
                TermData::And(xs) | TermData::Or(xs) => stack.extend(xs.iter().copied()),
            }
        }
        false
    }

    pub fn display(&self, term: Term) -> String {
        let mut out = String::new();
        self.write_term(term, &mut out, false);
        out
    }

    fn write_term(&self, term: Term, out: &mut String, parens: bool) {
        match self.data(term) {
            TermData::True => out.push_str("true"),
            TermData::False => out.push_str("false"),
            TermData::Atom(sym) => out.push_str(self.symbol_name(*sym)),
            TermData::Not(x) => {
                out.push('!');
                self.write_term(*x, out, true);
            }
            TermData::And(xs) => {
                if parens {
                    out.push('(');
                }
                for (i, &x) in xs.iter().enumerate() {
                    if i > 0 {
                        let _ = write!(out, " & ");
                    }
                    self.write_term(x, out, true);
                }
                if parens {
                    out.push(')');
                }
            }
            TermData::Or(xs) => {
                if parens {
                    out.push('(');
                }
                for (i, &x) in xs.iter().enumerate() {
                    if i > 0 {
                        let _ = write!(out, " | ");
                    }
                    self.write_term(x, out, true);
                }
                if parens {
                    out.push(')');
                }
            }
        }
    }
}
