pub mod choose;
pub mod deps;
pub mod driver;
pub mod learn;
pub mod preprocess;
pub mod satprove;
pub mod trail;
pub mod unate;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::term::store::Term;

use self::trail::Trail;

#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub initial_conflict_limit: f64,
    pub conflict_factor: f64,
    pub bump_decay: f64,
    pub random_probability: f64,
    pub score_mode: u8,
    pub do_learn: u32,
    pub do_unate: bool,
    pub find_all_fails: bool,
    pub seed: u64,
    // 0 means unbounded
    pub max_steps: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            initial_conflict_limit: 100.0,
            conflict_factor: 1.5,
            bump_decay: 1.05,
            random_probability: 0.02,
            score_mode: 2,
            do_learn: 2,
            do_unate: true,
            find_all_fails: true,
            seed: 0,
            max_steps: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
    pub learned_rules: usize,
    pub backjumps: usize,
    pub restarts: usize,
    pub steps: u64,
}

// one failed branch: the assumptions in force and what the goal was left as
#[derive(Debug, Clone)]
pub struct FailEntry {
    pub trail: Trail,
    pub residual: Term,
}

pub type FailList = Vec<FailEntry>;

#[derive(Debug, Clone)]
pub struct ProveReport {
    pub fails: FailList,
    pub stats: SearchStats,
    pub interrupted: bool,
}

impl ProveReport {
    pub fn proved(&self) -> bool {
        !self.interrupted && self.fails.is_empty()
    }
}

// external cancellation; polled at every recursive entry and branch boundary
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
