use std::cell::Cell;
use std::rc::Rc;

use crate::term::rewrite::Assignment;
use crate::term::store::{Lit, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailKind {
    Decision,
    Unate,
    LearnedUnit,
}

#[derive(Debug)]
pub struct TrailEntry {
    pub lit: Lit,
    // the working formula the literal was derived against
    pub origin: Term,
    pub kind: TrailKind,
    pub level: u32,
    pub used_in_learn: Cell<bool>,
    parent: Option<Rc<TrailEntry>>,
}

// persistent linked record of assumed literals. push returns a new head
// sharing the old tail; dropping a branch-local head unwinds for free.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    head: Option<Rc<TrailEntry>>,
    len: usize,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, lit: Lit, origin: Term, kind: TrailKind, level: u32) -> Trail {
        debug_assert!(
            self.head.as_ref().map_or(true, |h| h.level <= level),
            "trail levels must nest"
        );
        let entry = TrailEntry {
            lit,
            origin,
            kind,
            level,
            used_in_learn: Cell::new(false),
            parent: self.head.clone(),
        };
        Trail {
            head: Some(Rc::new(entry)),
            len: self.len + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // polarity-honoring linear scan
    pub fn contains(&self, lit: Lit) -> bool {
        self.iter().any(|e| e.lit == lit)
    }

    pub fn value_of(&self, term: Term) -> Option<bool> {
        self.iter()
            .find(|e| e.lit.term == term)
            .map(|e| e.lit.sign)
    }

    pub fn head(&self) -> Option<&Rc<TrailEntry>> {
        self.head.as_ref()
    }

    pub fn iter(&self) -> TrailIter<'_> {
        TrailIter {
            cur: self.head.as_ref(),
        }
    }

    pub fn assignment(&self) -> Assignment {
        let mut asg = Assignment::new();
        for entry in self.iter() {
            asg.entry(entry.lit.term).or_insert(entry.lit.sign);
        }
        asg
    }

    // newest decision entry, if any branch is open
    pub fn deepest_decision(&self) -> Option<&Rc<TrailEntry>> {
        let mut cur = self.head.as_ref();
        while let Some(entry) = cur {
            if entry.kind == TrailKind::Decision {
                return Some(entry);
            }
            cur = entry.parent.as_ref();
        }
        None
    }
}

pub struct TrailIter<'a> {
    cur: Option<&'a Rc<TrailEntry>>,
}

impl<'a> Iterator for TrailIter<'a> {
    type Item = &'a Rc<TrailEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cur?;
        self.cur = entry.parent.as_ref();
        Some(entry)
    }
}
