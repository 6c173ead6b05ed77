//! JSON paths for locating decode failures.
//!
//! A path is built on the stack as the decoder descends, one borrowed
//! segment per level, and is only rendered to a string when an error
//! is reported.

use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Field(&'a str),
    Index(usize),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct JsonPath<'a> {
    parent: Option<&'a JsonPath<'a>>,
    segment: Segment<'a>,
}

impl JsonPath<'static> {
    pub(crate) const fn root() -> Self {
        JsonPath {
            parent: None,
            segment: Segment::Root,
        }
    }
}

impl<'a> JsonPath<'a> {
    pub(crate) fn field<'b>(&'b self, name: &'b str) -> JsonPath<'b>
    where
        'a: 'b,
    {
        JsonPath {
            parent: Some(self),
            segment: Segment::Field(name),
        }
    }

    pub(crate) fn index<'b>(&'b self, index: usize) -> JsonPath<'b>
    where
        'a: 'b,
    {
        JsonPath {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }
}

impl fmt::Display for JsonPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent {
            write!(f, "{}", parent)?;
        }
        match self.segment {
            Segment::Root => write!(f, "$"),
            Segment::Field(name) if is_plain(name) => write!(f, ".{}", name),
            Segment::Field(name) => write!(f, "[{:?}]", name),
            Segment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Field names that can be written after a `.` without ambiguity.
fn is_plain(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '"' | '\\') || c.is_whitespace())
}
