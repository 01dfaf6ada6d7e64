//! Structured first-violation records.
//!
//! A [`Violation`] is what the engine hands back when a record fails its
//! schema: the path from the record root down to the offending slot, a
//! stable keyword code, machine-readable params, and a pre-rendered
//! reason phrase. Consumers branch on the code; the phrase is for humans.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One step on the path from the record root to a violating slot.
///
/// Root-level slots are positional (`Index`); properties of a nested
/// shape are named (`Key`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{i}"),
            PathSegment::Key(k) => write!(f, "{k}"),
        }
    }
}

/// Stable keyword identifying which constraint failed.
///
/// `MinProperties`, `MaxProperties`, and `AdditionalProperties` at the
/// record root are arity failures; everything else is a slot failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationCode {
    Type,
    Kind,
    Equal,
    Minimum,
    Maximum,
    Pattern,
    Required,
    MinProperties,
    MaxProperties,
    AdditionalProperties,
}

impl ViolationCode {
    /// The keyword string consumers branch on.
    pub fn keyword(&self) -> &'static str {
        match self {
            ViolationCode::Type => "type",
            ViolationCode::Kind => "kind",
            ViolationCode::Equal => "equal",
            ViolationCode::Minimum => "minimum",
            ViolationCode::Maximum => "maximum",
            ViolationCode::Pattern => "pattern",
            ViolationCode::Required => "required",
            ViolationCode::MinProperties => "minProperties",
            ViolationCode::MaxProperties => "maxProperties",
            ViolationCode::AdditionalProperties => "additionalProperties",
        }
    }

    /// Whether this code concerns the record's overall arity rather than
    /// one slot's content.
    pub fn is_arity(&self) -> bool {
        matches!(
            self,
            ViolationCode::MinProperties
                | ViolationCode::MaxProperties
                | ViolationCode::AdditionalProperties
        )
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The first detected failure of a record against a schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Path from the record root to the offending slot; empty for
    /// record-level (arity) failures.
    pub path: Vec<PathSegment>,

    /// Which constraint failed.
    pub code: ViolationCode,

    /// Machine-readable detail (expected/actual, bounds, pattern).
    pub params: Value,

    /// Human reason phrase, subject-less ("must be a number (foo is a
    /// string)"); the caller supplies the subject.
    reason: String,
}

impl Violation {
    pub fn new(
        path: Vec<PathSegment>,
        code: ViolationCode,
        params: Value,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path,
            code,
            params,
            reason: reason.into(),
        }
    }

    /// The subject-less reason phrase.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
