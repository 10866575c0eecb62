//! Build options shared by the normalizer and the tree builder

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

/// Knobs for [`build_tree`](crate::build_tree) and [`levels`](crate::levels).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Ambient depth before the first record
    pub starting_depth: i64,
    /// Depths that get a placeholder node whenever the input jumps over them
    pub mandatory_depths: BTreeSet<i64>,
    /// Treat every depth as mandatory
    pub mandatory_depths_all: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            starting_depth: 0,
            mandatory_depths: BTreeSet::new(),
            mandatory_depths_all: false,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_depth(mut self, depth: i64) -> Self {
        self.starting_depth = depth;
        self
    }

    pub fn mandatory_depths<I: IntoIterator<Item = i64>>(mut self, depths: I) -> Self {
        self.mandatory_depths = depths.into_iter().collect();
        self
    }

    pub fn mandatory_depths_all(mut self, all: bool) -> Self {
        self.mandatory_depths_all = all;
        self
    }

    /// Highest declared mandatory depth, if any were declared.
    pub fn max_mandatory_depth(&self) -> Option<i64> {
        self.mandatory_depths.last().copied()
    }

    /// Depths strictly between `above` and `below`, the candidates for gap
    /// filling. Empty when `below` is not at least two deeper.
    pub(crate) fn between(above: i64, below: i64) -> Range<i64> {
        above.saturating_add(1)..below
    }

    /// Pull the next mandatory depth out of `pending`, shrinking it past the
    /// returned depth.
    pub(crate) fn next_gap(&self, pending: &mut Range<i64>) -> Option<i64> {
        if pending.is_empty() {
            return None;
        }
        if self.mandatory_depths_all {
            return pending.next();
        }
        let depth = self.mandatory_depths.range(pending.clone()).next().copied();
        match depth {
            // `depth < pending.end`, so this can't overflow
            Some(depth) => pending.start = depth + 1,
            None => pending.start = pending.end,
        }
        depth
    }
}
