use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::term::rewrite::probe;
use crate::term::store::{Lit, Term, TermStore};
use crate::theory::Theory;

use super::deps::DepEntry;
use super::learn::LearnInfo;
use super::trail::Trail;

// next branch atom. four interchangeable strategies:
//   mode 0  first candidate that is no subterm of another candidate
//   mode 1  minimal combined residual after trying both polarities
//   mode 2  learned score desc, then reject count asc, then residual desc
// plus the signed epsilon-greedy variant used by the literal-tree driver.
#[derive(Debug)]
pub struct CaseChooser {
    mode: u8,
    epsilon: f64,
    rng: ChaCha8Rng,
}

struct Ranked {
    term: Term,
    sign_hint: bool,
    score: f64,
    rejects: usize,
    residual: usize,
    domain: u64,
}

impl CaseChooser {
    pub fn new(mode: u8, epsilon: f64, seed: u64) -> Self {
        Self {
            mode,
            epsilon,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn choose<T: Theory>(
        &mut self,
        store: &mut TermStore,
        formula: Term,
        deps: &[DepEntry],
        learn: &LearnInfo,
        trail: &Trail,
        theory: &T,
    ) -> Option<Term> {
        let cands = open_candidates(deps, trail);
        if cands.is_empty() {
            return None;
        }
        let pick = match self.mode {
            0 => self.choose_first(store, &cands),
            1 => self.choose_min_residual(store, formula, trail, &cands),
            _ => {
                self.choose_scored(store, formula, trail, &cands, learn, theory)
                    .map(|r| r.term)
            }
        };
        debug_assert!(pick.map_or(true, |t| trail.value_of(t).is_none()));
        pick
    }

    // signed variant: picks the polarity too, with an epsilon-greedy
    // random kick to diversify restarts
    pub fn choose_signed<T: Theory>(
        &mut self,
        store: &mut TermStore,
        formula: Term,
        deps: &[DepEntry],
        learn: &LearnInfo,
        trail: &Trail,
        theory: &T,
    ) -> Option<Lit> {
        let cands = open_candidates(deps, trail);
        if cands.is_empty() {
            return None;
        }
        if self.rng.random::<f64>() < self.epsilon {
            let dep = cands[self.rng.random_range(0..cands.len())];
            return Some(Lit::new(dep.term, self.rng.random::<bool>()));
        }
        self.choose_scored(store, formula, trail, &cands, learn, theory)
            .map(|r| Lit::new(r.term, r.sign_hint))
    }

    fn choose_first(&self, store: &TermStore, cands: &[&DepEntry]) -> Option<Term> {
        cands
            .iter()
            .find(|dep| {
                !cands
                    .iter()
                    .any(|other| other.term != dep.term && store.occurs_in(dep.term, other.term))
            })
            .map(|dep| dep.term)
    }

    fn choose_min_residual(
        &self,
        store: &mut TermStore,
        formula: Term,
        trail: &Trail,
        cands: &[&DepEntry],
    ) -> Option<Term> {
        let asg = trail.assignment();
        let mut best: Option<(usize, Term)> = None;
        for dep in cands {
            let (under_true, under_false) = probe(store, formula, &asg, dep.term);
            // a collapsed branch costs nothing, which is the bonus
            let cost = branch_cost(store, under_true) + branch_cost(store, under_false);
            if best.map_or(true, |(b, _)| cost < b) {
                best = Some((cost, dep.term));
            }
        }
        best.map(|(_, t)| t)
    }

    fn choose_scored<T: Theory>(
        &self,
        store: &mut TermStore,
        formula: Term,
        trail: &Trail,
        cands: &[&DepEntry],
        learn: &LearnInfo,
        theory: &T,
    ) -> Option<Ranked> {
        let asg = trail.assignment();
        let mut best: Option<Ranked> = None;
        for dep in cands {
            let (under_true, under_false) = probe(store, formula, &asg, dep.term);
            let residual = branch_cost(store, under_true) + branch_cost(store, under_false);
            let score = learn.score(dep.term);
            let sign_hint = if score.pos != score.neg {
                score.pos > score.neg
            } else {
                dep.pos >= dep.neg
            };
            let ranked = Ranked {
                term: dep.term,
                sign_hint,
                score: score.total(),
                rejects: learn.reject_count(dep.term),
                residual,
                domain: theory.value_count(dep.term).unwrap_or(u64::MAX),
            };
            if best.as_ref().map_or(true, |b| ranks_higher(&ranked, b)) {
                best = Some(ranked);
            }
        }
        best
    }
}

fn open_candidates<'d>(deps: &'d [DepEntry], trail: &Trail) -> Vec<&'d DepEntry> {
    deps.iter()
        .filter(|dep| trail.value_of(dep.term).is_none())
        .collect()
}

fn branch_cost(store: &TermStore, residual: Term) -> usize {
    if store.is_constant(residual) {
        0
    } else {
        store.term_size(residual)
    }
}

// documented precedence: learn score desc, reject count asc, residual
// size desc; smaller numeric domains break remaining ties
fn ranks_higher(a: &Ranked, b: &Ranked) -> bool {
    match a.score.total_cmp(&b.score) {
        std::cmp::Ordering::Greater => return true,
        std::cmp::Ordering::Less => return false,
        std::cmp::Ordering::Equal => {}
    }
    if a.rejects != b.rejects {
        return a.rejects < b.rejects;
    }
    if a.residual != b.residual {
        return a.residual > b.residual;
    }
    a.domain < b.domain
}
