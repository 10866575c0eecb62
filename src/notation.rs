//! Record notation
//!
//! A compact one-record-per-line syntax, used by fixtures and the CLI:
//!
//! ```text
//! ===a          value "a" at depth 3
//! +if(...)      value "if(...)" one deeper than the ambient depth
//! --k====       value "k" two shallower, next record at depth 4
//! x+            value "x", next record one deeper
//! #}-           skip record, next record one shallower
//! ```
//!
//! Leading `=` set the absolute depth, leading `+`/`-` the depth delta. A `#`
//! marks a skip record. Trailing `=` set the absolute next depth, trailing
//! `+`/`-` the next-depth delta. A count of zero means the field is unset, and
//! the value itself can't contain any of `#=+-`. Everything after a `|` is a
//! comment; blank lines are ignored.

use crate::record::{Record, RecordError};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Lazy-compiled regex for a single (trimmed) notation line
static LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(=*)(\+*)(-*)(#?)([^#=+-]+?)(=*)(\+*)(-*)$").unwrap()
});

/// Errors raised while reading notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("line {line}: can't read {text:?} as a record")]
    Malformed { line: usize, text: String },
    #[error("line {line}: {source}")]
    Record { line: usize, source: RecordError },
}

/// Read every record in `source`.
pub fn parse_records(source: &str) -> Result<Vec<Record<String>>, NotationError> {
    let mut records = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        records.push(parse_line(text).map_err(|err| match err {
            LineError::Malformed => NotationError::Malformed {
                line,
                text: text.to_string(),
            },
            LineError::Record(source) => NotationError::Record { line, source },
        })?);
    }
    Ok(records)
}

/// Read a single record, without comment or line handling.
pub fn parse_record(text: &str) -> Result<Record<String>, NotationError> {
    let text = text.trim();
    parse_line(text).map_err(|err| match err {
        LineError::Malformed => NotationError::Malformed {
            line: 1,
            text: text.to_string(),
        },
        LineError::Record(source) => NotationError::Record { line: 1, source },
    })
}

/// The part of a line before its `|` comment
pub fn strip_comment(line: &str) -> &str {
    line.split_once('|').map_or(line, |(before, _)| before)
}

enum LineError {
    Malformed,
    Record(RecordError),
}

fn parse_line(text: &str) -> Result<Record<String>, LineError> {
    let caps = LINE_REGEX.captures(text).ok_or(LineError::Malformed)?;
    let count = |i: usize| caps.get(i).map_or(0, |m| m.as_str().len() as i64);
    let nonzero = |n: i64| (n != 0).then_some(n);

    let value = caps.get(5).map_or("", |m| m.as_str()).trim().to_string();
    let mut builder = if count(4) > 0 {
        Record::skip()
    } else {
        Record::value(value)
    };
    if let Some(depth) = nonzero(count(1)) {
        builder = builder.depth(depth);
    }
    if let Some(delta) = nonzero(count(2) - count(3)) {
        builder = builder.depth_delta(delta);
    }
    if let Some(depth) = nonzero(count(6)) {
        builder = builder.next_depth(depth);
    }
    if let Some(delta) = nonzero(count(7) - count(8)) {
        builder = builder.next_depth_delta(delta);
    }
    builder.build().map_err(LineError::Record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Depth;
    use rstest::rstest;

    #[rstest]
    #[case("===a", Some("a"), Some(Depth::Absolute(3)), None)]
    #[case("+if(...)", Some("if(...)"), Some(Depth::Relative(1)), None)]
    #[case("--k==================", Some("k"), Some(Depth::Relative(-2)), Some(Depth::Absolute(18)))]
    #[case("=================j++", Some("j"), Some(Depth::Absolute(17)), Some(Depth::Relative(2)))]
    #[case("m-", Some("m"), None, Some(Depth::Relative(-1)))]
    #[case("#}-", None, None, Some(Depth::Relative(-1)))]
    #[case("#skip", None, None, None)]
    #[case("  null value with  ", Some("null value with"), None, None)]
    fn reads_fields(
        #[case] text: &str,
        #[case] value: Option<&str>,
        #[case] depth: Option<Depth>,
        #[case] next_depth: Option<Depth>,
    ) {
        let record = parse_record(text).unwrap();
        assert_eq!(record.get_value().map(String::as_str), value);
        assert_eq!(record.depth(), depth);
        assert_eq!(record.next_depth(), next_depth);
    }

    #[test]
    fn plus_and_minus_cancel_out() {
        let record = parse_record("+-x").unwrap();
        assert_eq!(record.depth(), None);
    }

    #[test]
    fn skip_with_depth_is_rejected() {
        assert_eq!(
            parse_records("a\n=#b\n"),
            Err(NotationError::Record {
                line: 2,
                source: RecordError::DepthWithoutValue
            })
        );
    }

    #[test]
    fn unreadable_line_reports_its_number() {
        let err = parse_records("a\n\n===\n").unwrap_err();
        assert_eq!(
            err,
            NotationError::Malformed {
                line: 3,
                text: "===".to_string()
            }
        );
        assert_eq!(err.to_string(), r#"line 3: can't read "===" as a record"#);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let records = parse_records("===a   | [0] a\n\n   | only a comment\nb\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get_value().map(String::as_str), Some("b"));
    }
}
