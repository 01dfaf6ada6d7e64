//! Per-argument expectations and the definition builder.
//!
//! An [`Expectation`] is one declared constraint on one positional
//! argument. [`Expectation::to_definition`] lowers it to the structural
//! [`Definition`] the engine consumes — the only translation step
//! between the signature vocabulary and the schema vocabulary.

use serde_json::Value;
use sigil_schema::{Definition, kind_of};

/// One declared constraint on one positional argument.
#[derive(Debug, Clone)]
pub enum Expectation {
    /// The argument's runtime category must be this name
    /// ("number", "string", or a class/constructor name).
    Kind(String),

    /// The argument must be present and exactly null — distinct from an
    /// unconstrained slot, which may be absent.
    Null,

    /// The argument must equal this literal exactly.
    Literal(Value),

    /// Free-form structural constraints used verbatim: ranges,
    /// patterns, nested shapes, computed defaults.
    Shape(Definition),

    /// Constrain the argument to the runtime category of an example
    /// value. The degenerate branch: anything that is not a kind name,
    /// literal marker, or shape falls back to its category.
    Like(Value),

    /// Open marker: accepts anything, including absent.
    Any,

    /// Trailing `"..."` sentinel: all further arguments are
    /// unconstrained and the call has no maximum arity. Consumed during
    /// signature compilation, never lowered to a slot definition.
    Rest,
}

impl Expectation {
    pub fn kind(name: impl Into<String>) -> Self {
        Expectation::Kind(name.into())
    }

    pub fn literal(value: Value) -> Self {
        Expectation::Literal(value)
    }

    pub fn shape(definition: Definition) -> Self {
        Expectation::Shape(definition)
    }

    /// Lower this expectation to a structural property definition.
    ///
    /// No errors originate here; every shape degrades to a kind
    /// constraint on the best available category name. `Rest` should be
    /// consumed by the signature compiler before lowering — lowered
    /// anyway, it degrades to an open slot.
    pub fn to_definition(&self) -> Definition {
        match self {
            Expectation::Kind(name) => Definition::of_kind(name.clone()),
            Expectation::Null => Definition::equal_to(Value::Null),
            Expectation::Literal(value) => Definition::equal_to(value.clone()),
            Expectation::Shape(definition) => definition.clone(),
            Expectation::Like(value) => Definition::of_kind(kind_of(value)),
            Expectation::Any | Expectation::Rest => Definition::new(),
        }
    }
}

/// String sugar: `"..."` is the rest sentinel, anything else a kind
/// name. Mirrors the string forms accepted in expectation lists.
impl From<&str> for Expectation {
    fn from(s: &str) -> Self {
        if s == "..." {
            Expectation::Rest
        } else {
            Expectation::Kind(s.to_string())
        }
    }
}

impl From<Value> for Expectation {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Expectation::Null,
            other => Expectation::Like(other),
        }
    }
}
