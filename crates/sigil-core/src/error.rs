//! Error types for signature compilation and validation.
//!
//! Construction-time errors ([`CompileError`]) indicate a setup bug in
//! the contract itself; per-call errors ([`SignatureError`]) report a
//! bad call. The two never mix: a compiled signature cannot fail to
//! validate for structural reasons, and a call can never surface a
//! compilation problem.

use serde::{Deserialize, Serialize};
use sigil_schema::{PathSegment, SchemaError, Violation};

/// Which class of contract failure a call hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Too few or too many positional arguments.
    Arity,

    /// A specific argument, or a nested property of it, violates its
    /// declared kind/literal/structural rule.
    Slot,

    /// Every candidate signature of a polymorphic callable failed.
    Aggregate,
}

/// A rejected call.
///
/// `code` is the engine's violation keyword (`minProperties`, `kind`,
/// `equal`, …) or `"anyOf"` for aggregates — the stable branching
/// surface. `message` follows the rendering rules in
/// [`crate::signature`] and is for humans only.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SignatureError {
    pub kind: FailureKind,
    pub code: String,
    pub message: String,

    /// Path from the argument list root to the offending slot; empty
    /// for arity and aggregate failures.
    pub path: Vec<PathSegment>,

    /// Presentation hint: how many internal dispatch frames sit between
    /// the raise site and the caller. Set by the wrapper, never affects
    /// `code` or `message`.
    pub skip_frames: usize,
}

impl SignatureError {
    /// Stable error name for hosts that key on one.
    pub fn name(&self) -> &'static str {
        "SignatureError"
    }

    pub(crate) fn from_violation(violation: &Violation, message: String) -> Self {
        let kind = if violation.path.is_empty() && violation.code.is_arity() {
            FailureKind::Arity
        } else {
            FailureKind::Slot
        };
        Self {
            kind,
            code: violation.code.keyword().to_string(),
            message,
            path: violation.path.clone(),
            skip_frames: 0,
        }
    }

    pub(crate) fn any_of(message: String) -> Self {
        Self {
            kind: FailureKind::Aggregate,
            code: "anyOf".to_string(),
            message,
            path: Vec::new(),
            skip_frames: 0,
        }
    }

    pub(crate) fn with_skip_frames(mut self, frames: usize) -> Self {
        self.skip_frames = frames;
        self
    }
}

/// Construction-time contract bugs, distinct from per-call failures.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The `"..."` rest marker may only close the expectation list.
    #[error("rest marker \"...\" is only allowed in the last position")]
    MisplacedRest,

    /// A polymorphic wrapper was built with no signatures at all.
    #[error("a polymorphic callable needs at least one signature")]
    EmptySet,

    /// The structural engine rejected the compiled definition.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sigil_schema::ViolationCode;

    #[test]
    fn arity_violations_classify_as_arity() {
        let v = Violation::new(
            Vec::new(),
            ViolationCode::MinProperties,
            json!({}),
            "length must be 1 (got 0)",
        );
        let err = SignatureError::from_violation(&v, "arguments length must be 1 (got 0)".into());
        assert_eq!(err.kind, FailureKind::Arity);
        assert_eq!(err.code, "minProperties");
        assert_eq!(err.name(), "SignatureError");
    }

    #[test]
    fn slot_violations_keep_their_path() {
        let v = Violation::new(
            vec![PathSegment::Index(0)],
            ViolationCode::Kind,
            json!({}),
            "must be a number (foo is a string)",
        );
        let err = SignatureError::from_violation(&v, "first argument must be a number".into());
        assert_eq!(err.kind, FailureKind::Slot);
        assert_eq!(err.path, vec![PathSegment::Index(0)]);
    }

    #[test]
    fn aggregate_errors_use_the_any_of_code() {
        let err = SignatureError::any_of("a OR b".into());
        assert_eq!(err.kind, FailureKind::Aggregate);
        assert_eq!(err.code, "anyOf");
        assert_eq!(err.to_string(), "a OR b");
    }

    #[test]
    fn skip_frames_never_touch_code_or_message() {
        let err = SignatureError::any_of("a OR b".into()).with_skip_frames(2);
        assert_eq!(err.skip_frames, 2);
        assert_eq!(err.code, "anyOf");
        assert_eq!(err.message, "a OR b");
    }
}
