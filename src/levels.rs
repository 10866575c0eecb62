//! Depth normalization
//!
//! Turns a stream of [`Record`]s into a stream of [`Leveled`] elements: every
//! element has a concrete depth, skip records are gone, and placeholder elements
//! (with no value) have been inserted for mandatory depths the input jumped over.
//!
//! # Logic
//!
//! 1. `level` is the ambient depth, seeded from the starting depth
//! 2. `last_level` is the depth of the last emitted element, seeded one above it
//! 3. Each record is resolved against `level`, and `level` moves to its next depth
//! 4. Skip records stop there; they emit nothing and leave `last_level` alone
//! 5. Otherwise every mandatory depth strictly between `last_level` and the
//!    record's depth is emitted as a gap, followed by the record itself

use crate::options::BuildOptions;
use crate::record::Record;
use serde::Serialize;
use std::ops::Range;
use tracing::trace;

/// A normalized `(value, depth)` element. `value` is `None` for gap fillers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leveled<T> {
    pub value: Option<T>,
    pub depth: i64,
}

impl<T> Leveled<T> {
    pub fn new(value: T, depth: i64) -> Self {
        Leveled {
            value: Some(value),
            depth,
        }
    }

    pub fn gap(depth: i64) -> Self {
        Leveled { value: None, depth }
    }

    pub fn is_gap(&self) -> bool {
        self.value.is_none()
    }
}

/// Lazy normalizer over a record iterator. See [`levels`].
#[derive(Debug)]
pub struct Levels<I, T> {
    records: I,
    options: BuildOptions,
    level: i64,
    last_level: i64,
    gaps: Range<i64>,
    pending: Option<Leveled<T>>,
}

/// Normalize `records` into leveled elements.
///
/// The result is finite iff `records` is, and it cannot be restarted.
pub fn levels<I, T>(records: I, options: &BuildOptions) -> Levels<I::IntoIter, T>
where
    I: IntoIterator<Item = Record<T>>,
{
    Levels {
        records: records.into_iter(),
        options: options.clone(),
        level: options.starting_depth,
        last_level: options.starting_depth.saturating_sub(1),
        gaps: 0..0,
        pending: None,
    }
}

impl<I, T> Iterator for Levels<I, T>
where
    I: Iterator<Item = Record<T>>,
{
    type Item = Leveled<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(gap) = self.options.next_gap(&mut self.gaps) {
                trace!(gap, "filling mandatory depth");
                return Some(Leveled::gap(gap));
            }
            if let Some(element) = self.pending.take() {
                return Some(element);
            }

            let resolved = self.records.next()?.resolve(self.level);
            self.level = resolved.next_depth;

            let Some(value) = resolved.value else {
                continue;
            };

            let depth = resolved.depth;
            self.gaps = BuildOptions::between(self.last_level, depth);
            self.last_level = depth;
            self.pending = Some(Leveled::new(value, depth));
        }
    }
}
