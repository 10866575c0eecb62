//! Leveled input records
//!
//! A [`Record`] is one unit of input to the tree builder. It carries an optional
//! value (a record without one is a *skip* record and never becomes a node) and
//! states where it sits relative to the ambient depth, plus where the record after
//! it should sit.
//!
//! Both positions can be given either as an absolute depth or as a delta:
//!
//! - `depth` / `depth_delta` place the record itself, relative to the ambient depth
//! - `next_depth` / `next_depth_delta` set the ambient depth for the following
//!   record, relative to the depth just resolved
//!
//! Skip records may only carry the `next_*` fields. They are how a stream closes
//! a group (`#}` followed by a dedent) without producing a node for the marker.

use std::fmt;
use thiserror::Error;

/// Errors raised while constructing a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("depth and depth_delta can't both be present")]
    ConflictingDepth,
    #[error("next_depth and next_depth_delta can't both be present")]
    ConflictingNextDepth,
    #[error("depth[_delta] can't be present without a value (use next_depth[_delta] instead)")]
    DepthWithoutValue,
}

/// A depth stated either absolutely or as an offset from a reference depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Absolute(i64),
    Relative(i64),
}

impl Depth {
    /// Resolve against the given reference depth. Offsets saturate at the
    /// bounds of `i64`.
    pub fn resolve(self, reference: i64) -> i64 {
        match self {
            Depth::Absolute(depth) => depth,
            Depth::Relative(delta) => reference.saturating_add(delta),
        }
    }

    fn from_fields(
        absolute: Option<i64>,
        relative: Option<i64>,
        conflict: RecordError,
    ) -> Result<Option<Depth>, RecordError> {
        match (absolute, relative) {
            (Some(_), Some(_)) => Err(conflict),
            (Some(depth), None) => Ok(Some(Depth::Absolute(depth))),
            (None, Some(delta)) => Ok(Some(Depth::Relative(delta))),
            (None, None) => Ok(None),
        }
    }
}

/// One input unit for the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    value: Option<T>,
    depth: Option<Depth>,
    next_depth: Option<Depth>,
}

/// A record resolved against the ambient depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// `None` for skip records
    pub value: Option<T>,
    pub depth: i64,
    pub next_depth: i64,
}

impl<T> Record<T> {
    /// Start building a record that produces a node.
    pub fn value(value: T) -> RecordBuilder<T> {
        RecordBuilder::new(Some(value))
    }

    /// Start building a skip record.
    pub fn skip() -> RecordBuilder<T> {
        RecordBuilder::new(None)
    }

    /// A record at an absolute depth, with the ambient depth following it.
    pub fn at(value: T, depth: i64) -> Self {
        Record {
            value: Some(value),
            depth: Some(Depth::Absolute(depth)),
            next_depth: None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.value.is_none()
    }

    pub fn get_value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn depth(&self) -> Option<Depth> {
        self.depth
    }

    pub fn next_depth(&self) -> Option<Depth> {
        self.next_depth
    }

    /// Resolve this record's depth and the ambient depth after it.
    ///
    /// The record's own depth falls back to `ambient`, and the next depth falls
    /// back to the record's own depth.
    pub fn resolve(self, ambient: i64) -> Resolved<T> {
        let depth = self.depth.map_or(ambient, |d| d.resolve(ambient));
        let next_depth = self.next_depth.map_or(depth, |d| d.resolve(depth));
        Resolved {
            value: self.value,
            depth,
            next_depth,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(value) = &self.value {
            parts.push(format!("{:?}", value));
        }
        for (key, depth) in [("L", self.depth), ("NL", self.next_depth)] {
            match depth {
                Some(Depth::Absolute(d)) => parts.push(format!("{}={}", key, d)),
                Some(Depth::Relative(d)) => parts.push(format!("{}R={:+}", key, d)),
                None => {}
            }
        }
        write!(f, "Record({})", parts.join(", "))
    }
}

/// Collects the raw optional fields of a [`Record`] and validates them on
/// [`build`](RecordBuilder::build).
#[derive(Debug, Clone)]
pub struct RecordBuilder<T> {
    value: Option<T>,
    depth: Option<i64>,
    depth_delta: Option<i64>,
    next_depth: Option<i64>,
    next_depth_delta: Option<i64>,
}

impl<T> RecordBuilder<T> {
    fn new(value: Option<T>) -> Self {
        RecordBuilder {
            value,
            depth: None,
            depth_delta: None,
            next_depth: None,
            next_depth_delta: None,
        }
    }

    pub fn depth(mut self, depth: i64) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn depth_delta(mut self, delta: i64) -> Self {
        self.depth_delta = Some(delta);
        self
    }

    pub fn next_depth(mut self, depth: i64) -> Self {
        self.next_depth = Some(depth);
        self
    }

    pub fn next_depth_delta(mut self, delta: i64) -> Self {
        self.next_depth_delta = Some(delta);
        self
    }

    pub fn build(self) -> Result<Record<T>, RecordError> {
        if self.value.is_none() && (self.depth.is_some() || self.depth_delta.is_some()) {
            return Err(RecordError::DepthWithoutValue);
        }
        let depth = Depth::from_fields(
            self.depth,
            self.depth_delta,
            RecordError::ConflictingDepth,
        )?;
        let next_depth = Depth::from_fields(
            self.next_depth,
            self.next_depth_delta,
            RecordError::ConflictingNextDepth,
        )?;
        Ok(Record {
            value: self.value,
            depth,
            next_depth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Record::value("x").depth(42).depth_delta(42), RecordError::ConflictingDepth)]
    #[case(Record::value("x").next_depth(42).next_depth_delta(42), RecordError::ConflictingNextDepth)]
    #[case(Record::skip().depth(42), RecordError::DepthWithoutValue)]
    #[case(Record::skip().depth_delta(42), RecordError::DepthWithoutValue)]
    fn rejects_invalid_fields(#[case] builder: RecordBuilder<&str>, #[case] expected: RecordError) {
        assert_eq!(builder.build().unwrap_err(), expected);
    }

    #[test]
    fn skip_record_may_change_next_depth() {
        let record = Record::<&str>::skip().next_depth_delta(-1).build().unwrap();
        assert!(record.is_skip());
        assert_eq!(record.next_depth(), Some(Depth::Relative(-1)));
    }

    #[rstest]
    #[case(Record::value("x"), 5, 5, 5)]
    #[case(Record::value("x").depth(2), 5, 2, 2)]
    #[case(Record::value("x").depth_delta(-2), 5, 3, 3)]
    #[case(Record::value("x").depth_delta(1).next_depth_delta(1), 5, 6, 7)]
    #[case(Record::value("x").depth(17).next_depth(18), 5, 17, 18)]
    #[case(Record::skip().next_depth_delta(-2), 5, 5, 3)]
    #[case(Record::value("x").depth_delta(1).next_depth_delta(i64::MAX), i64::MAX, i64::MAX, i64::MAX)]
    #[case(Record::value("x").depth_delta(-1).next_depth_delta(i64::MIN), i64::MIN, i64::MIN, i64::MIN)]
    fn resolves_against_ambient_depth(
        #[case] builder: RecordBuilder<&str>,
        #[case] ambient: i64,
        #[case] depth: i64,
        #[case] next_depth: i64,
    ) {
        let resolved = builder.build().unwrap().resolve(ambient);
        assert_eq!(resolved.depth, depth);
        assert_eq!(resolved.next_depth, next_depth);
    }

    #[test]
    fn display_lists_set_fields() {
        let record = Record::value("a").depth(3).next_depth_delta(1).build().unwrap();
        assert_eq!(record.to_string(), r#"Record("a", L=3, NLR=+1)"#);
        let skip = Record::<&str>::skip().next_depth_delta(-1).build().unwrap();
        assert_eq!(skip.to_string(), "Record(NLR=-1)");
    }
}
