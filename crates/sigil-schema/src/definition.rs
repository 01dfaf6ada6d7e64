//! Structural definitions.
//!
//! A [`Definition`] is the declarative form of a constraint: which
//! category a value must have, which literal it must equal, which range
//! or pattern it must satisfy, which nested properties it carries, and
//! how many slots the record as a whole may hold. Definitions are plain
//! data; [`crate::Schema::compile`] turns them into checkers.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A computed default for an absent slot.
///
/// The rule receives the record as filled so far — slots to its left are
/// already present or defaulted — and returns the value to assign.
/// Defaults participate only at the record root, and only after a
/// passing validation.
#[derive(Clone)]
pub struct DefaultRule(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl DefaultRule {
    pub fn new(rule: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(rule))
    }

    /// Compute the default against the slots filled so far.
    pub fn compute(&self, filled: &[Value]) -> Value {
        (self.0)(filled)
    }
}

impl fmt::Debug for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultRule(..)")
    }
}

/// One structural constraint, possibly nested.
///
/// Every field is optional; an empty definition accepts anything. The
/// record-level fields (`min_properties`, `max_properties`,
/// `additional_properties`) bound how many slots a record may carry;
/// the rest constrain one value.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    /// Value-shape constraint; only `"object"` is meaningful (a keyed
    /// record — arrays count, keyed by position).
    pub ty: Option<String>,

    /// Runtime category the value must have (see [`crate::kind_of`]).
    pub kind: Option<String>,

    /// Literal the value must equal exactly. `Some(Value::Null)` demands
    /// a present, null slot — distinct from an unconstrained one.
    pub equal: Option<Value>,

    /// Numeric lower bound (inclusive).
    pub minimum: Option<f64>,

    /// Numeric upper bound (inclusive).
    pub maximum: Option<f64>,

    /// Regex the string value must match. Compiled at schema build time.
    pub pattern: Option<String>,

    /// Constraints on named (or, at the root, positional) properties.
    pub properties: BTreeMap<String, Definition>,

    /// Minimum number of slots the record must carry.
    pub min_properties: Option<usize>,

    /// Maximum number of slots the record may carry.
    pub max_properties: Option<usize>,

    /// `Some(false)` forbids slots past the last declared property
    /// position (declared positions need not be contiguous);
    /// `Some(true)` allows any number of extra, unconstrained slots;
    /// `None` leaves the question to the arity bounds alone.
    pub additional_properties: Option<bool>,

    /// Computed default for an absent slot (record root only).
    pub default: Option<DefaultRule>,
}

impl Definition {
    /// An empty definition: accepts anything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A keyed-record definition (the shape of an argument list).
    pub fn object() -> Self {
        Self {
            ty: Some("object".to_string()),
            ..Self::default()
        }
    }

    /// Constrain the value's runtime category.
    pub fn of_kind(name: impl Into<String>) -> Self {
        Self {
            kind: Some(name.into()),
            ..Self::default()
        }
    }

    /// Require exact equality with a literal.
    pub fn equal_to(value: Value) -> Self {
        Self {
            equal: Some(value),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, definition: Definition) -> Self {
        self.properties.insert(key.into(), definition);
        self
    }

    pub fn with_min_properties(mut self, n: usize) -> Self {
        self.min_properties = Some(n);
        self
    }

    pub fn with_max_properties(mut self, n: usize) -> Self {
        self.max_properties = Some(n);
        self
    }

    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    pub fn with_minimum(mut self, bound: f64) -> Self {
        self.minimum = Some(bound);
        self
    }

    pub fn with_maximum(mut self, bound: f64) -> Self {
        self.maximum = Some(bound);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_default(mut self, rule: impl Fn(&[Value]) -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultRule::new(rule));
        self
    }

    /// Whether this definition imposes no constraint at all.
    pub fn is_open(&self) -> bool {
        self.ty.is_none()
            && self.kind.is_none()
            && self.equal.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.pattern.is_none()
            && self.properties.is_empty()
            && self.min_properties.is_none()
            && self.max_properties.is_none()
            && self.additional_properties.is_none()
            && self.default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_definition_is_open() {
        assert!(Definition::new().is_open());
        assert!(!Definition::of_kind("number").is_open());
        assert!(!Definition::equal_to(Value::Null).is_open());
    }

    #[test]
    fn builder_accumulates() {
        let def = Definition::object()
            .with_property("0", Definition::of_kind("number"))
            .with_property("1", Definition::of_kind("string"))
            .with_min_properties(2)
            .with_additional_properties(false);
        assert_eq!(def.ty.as_deref(), Some("object"));
        assert_eq!(def.properties.len(), 2);
        assert_eq!(def.min_properties, Some(2));
        assert_eq!(def.additional_properties, Some(false));
    }

    #[test]
    fn default_rule_reads_earlier_slots() {
        let rule = DefaultRule::new(|filled| json!(filled.len()));
        assert_eq!(rule.compute(&[json!(0), json!(0)]), json!(2));
    }
}
