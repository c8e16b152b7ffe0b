use crate::outcome::{Failure, MatchOutcome};
use crate::rules::RuleId;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub(crate) struct MemoEntry {
    pub(crate) outcome: MatchOutcome,
    /// Furthest failure seen while evaluating the rule, replayed on a hit so
    /// diagnostics do not depend on whether the cache was used.
    pub(crate) furthest: Option<Failure>,
}

/// Packrat cache of rule outcomes, keyed by rule and position.
///
/// Entries are only meaningful for the rule table and input they were
/// computed from; a cache belongs to a single parse session. Failures are
/// cached as well as successes.
#[derive(Debug, Default)]
pub struct MemoCache {
    entries: HashMap<(RuleId, usize), MemoEntry>,
    hits: usize,
    misses: usize,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&mut self, rule: RuleId, pos: usize) -> Option<&MemoEntry> {
        let res = self.entries.get(&(rule, pos));

        if res.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }

        res
    }

    pub(crate) fn insert(&mut self, rule: RuleId, pos: usize, entry: MemoEntry) {
        self.entries.insert((rule, pos), entry);
    }

    /// Number of cached (rule, position) outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop all entries and reset the statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
