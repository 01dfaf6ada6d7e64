//! Compiled signatures: one calling convention, validated per call.
//!
//! A [`Signature`] owns the compiled schema for one convention plus the
//! target it guards. Compilation happens once, from an immutable
//! expectation list; validation reuses the compiled schema on every
//! call and never mutates the signature — the only mutation anywhere is
//! the argument vector itself when a declared `default` rule fills an
//! absent slot after a passing check.

use crate::error::{CompileError, SignatureError};
use crate::expect::Expectation;
use serde_json::Value;
use sigil_schema::{Definition, PathSegment, Schema, Violation, kind_of};
use std::fmt;
use std::sync::Arc;

/// The callable a signature guards.
///
/// Carries a declared name and a declared parameter count — closures do
/// not expose an arity, so it is stated up front — and the function
/// itself. The function is never invoked during compilation.
#[derive(Clone)]
pub struct Target {
    name: Option<String>,
    arity: usize,
    func: Arc<dyn Fn(Option<&Value>, &[Value]) -> Value + Send + Sync>,
}

impl Target {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(Option<&Value>, &[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Some(name.into()),
            arity,
            func: Arc::new(func),
        }
    }

    pub fn anonymous(
        arity: usize,
        func: impl Fn(Option<&Value>, &[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: None,
            arity,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared parameter count (the arity pin when no expectations are
    /// supplied).
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub(crate) fn call(&self, receiver: Option<&Value>, args: &[Value]) -> Value {
        (self.func)(receiver, args)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A compiled validation contract for one calling convention.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    min_arity: usize,
    max_arity: Option<usize>,
    allow_additional: bool,
    schema: Schema,
    target: Target,
}

impl Signature {
    /// Compile a signature; the name resolves from the target, falling
    /// back to `"anonymous"`.
    pub fn compile(
        target: Target,
        expectations: Option<Vec<Expectation>>,
    ) -> Result<Self, CompileError> {
        let name = target
            .name()
            .unwrap_or("anonymous")
            .to_string();
        Self::build(name, target, expectations)
    }

    /// Compile with an explicit name override.
    pub fn compile_named(
        name: impl Into<String>,
        target: Target,
        expectations: Option<Vec<Expectation>>,
    ) -> Result<Self, CompileError> {
        Self::build(name.into(), target, expectations)
    }

    fn build(
        name: String,
        target: Target,
        expectations: Option<Vec<Expectation>>,
    ) -> Result<Self, CompileError> {
        let mut definition = Definition::object();
        let (min_arity, allow_additional) = match &expectations {
            // No expectation list: arity pinned to the target's declared
            // parameter count, no per-slot constraints.
            None => {
                let arity = target.arity();
                definition.min_properties = Some(arity);
                definition.max_properties = Some(arity);
                (arity, false)
            }
            Some(list) => {
                let mut allow_additional = false;
                let mut slots = 0usize;
                for (position, expectation) in list.iter().enumerate() {
                    if matches!(expectation, Expectation::Rest) {
                        if position + 1 != list.len() {
                            return Err(CompileError::MisplacedRest);
                        }
                        allow_additional = true;
                        continue;
                    }
                    definition = definition
                        .with_property(slots.to_string(), expectation.to_definition());
                    slots += 1;
                }
                definition.min_properties = Some(slots);
                definition.additional_properties = Some(allow_additional);
                (slots, allow_additional)
            }
        };

        let max_arity = if allow_additional { None } else { Some(min_arity) };
        let schema = Schema::compile(definition)?;

        Ok(Self {
            name,
            min_arity,
            max_arity,
            allow_additional,
            schema,
            target,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_arity(&self) -> usize {
        self.min_arity
    }

    /// `None` when a rest parameter removes the upper bound.
    pub fn max_arity(&self) -> Option<usize> {
        self.max_arity
    }

    pub fn allow_additional(&self) -> bool {
        self.allow_additional
    }

    /// Validate an argument list against the compiled schema.
    ///
    /// On a passing check, declared `default` rules fill absent slots
    /// left-to-right — the argument vector is the only thing mutated,
    /// and only on success.
    pub fn validate(&self, args: &mut Vec<Value>) -> Result<(), Violation> {
        if let Some(violation) = self.schema.first_violation(args) {
            return Err(violation);
        }
        self.schema.fill_defaults(args);
        Ok(())
    }

    /// Render a violation into the contextual phrase:
    /// `{argument name} {reason}`.
    pub fn render_failure(&self, violation: &Violation) -> String {
        format!("{} {}", argument_phrase(&violation.path), violation.reason())
    }

    /// Validate and raise: the direct entry point when only contract
    /// checking is needed, no dispatch. The message carries no name
    /// prefix.
    pub fn sign(&self, args: &mut Vec<Value>) -> Result<(), SignatureError> {
        self.validate(args)
            .map_err(|v| SignatureError::from_violation(&v, self.render_failure(&v)))
    }

    /// Validate, then run the target with the receiver binding
    /// preserved. Failure messages are prefixed with the receiver's
    /// category (when bound) and the signature's name:
    /// `object.anonymous arguments length must be 1 (got 0)`.
    pub fn invoke(
        &self,
        receiver: Option<&Value>,
        mut args: Vec<Value>,
    ) -> Result<Value, SignatureError> {
        match self.validate(&mut args) {
            Ok(()) => Ok(self.target.call(receiver, &args)),
            Err(v) => Err(SignatureError::from_violation(
                &v,
                self.prefixed(receiver, &self.render_failure(&v)),
            )),
        }
    }

    pub(crate) fn prefixed(&self, receiver: Option<&Value>, message: &str) -> String {
        match receiver {
            Some(bound) => format!("{}.{} {message}", kind_of(bound), self.name),
            None => format!("{} {message}", self.name),
        }
    }

    pub(crate) fn target(&self) -> &Target {
        &self.target
    }
}

/// Translate a violation path into the argument's human name.
///
/// Empty path → `arguments` (the whole list); first slot → `first
/// argument`; second → `second argument`; any other position →
/// `argument n°{i}`. Deeper segments are appended dot-joined to name a
/// nested property.
pub fn argument_phrase(path: &[PathSegment]) -> String {
    let Some(head) = path.first() else {
        return "arguments".to_string();
    };

    let mut name = match head {
        PathSegment::Index(0) => "first argument".to_string(),
        PathSegment::Index(1) => "second argument".to_string(),
        PathSegment::Index(i) => format!("argument n°{i}"),
        PathSegment::Key(k) => format!("argument {k}"),
    };

    if path.len() > 1 {
        let rest: Vec<String> = path[1..].iter().map(|s| s.to_string()).collect();
        name.push(' ');
        name.push_str(&rest.join("."));
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sigil_schema::ViolationCode;

    fn noop(arity: usize) -> Target {
        Target::anonymous(arity, |_, _| Value::Null)
    }

    #[test]
    fn kind_list_accepts_and_rejects_per_slot() {
        let sig = Signature::compile(
            noop(0),
            Some(vec![Expectation::kind("number"), Expectation::kind("string")]),
        )
        .unwrap();

        assert!(sig.validate(&mut vec![json!(10), json!("")]).is_ok());
        assert!(sig.validate(&mut vec![json!(10)]).is_err()); // not enough
        assert!(
            sig.validate(&mut vec![json!(10), json!(""), Value::Null])
                .is_err()
        ); // too much
        assert!(sig.validate(&mut vec![json!(false), json!("")]).is_err()); // first slot
        assert!(sig.validate(&mut vec![json!(10), json!(false)]).is_err()); // second slot
    }

    #[test]
    fn rest_absorbs_any_trailing_arguments() {
        let sig = Signature::compile(
            noop(0),
            Some(vec![Expectation::kind("number"), Expectation::Rest]),
        )
        .unwrap();

        assert_eq!(sig.min_arity(), 1);
        assert_eq!(sig.max_arity(), None);
        assert!(sig.allow_additional());

        assert!(sig.validate(&mut vec![]).is_err());
        assert!(sig.validate(&mut vec![json!(10)]).is_ok());
        assert!(sig.validate(&mut vec![json!(10), json!(true)]).is_ok());
        assert!(
            sig.validate(&mut vec![json!(10), json!(false), json!("")])
                .is_ok()
        );
    }

    #[test]
    fn rest_must_close_the_list() {
        let result = Signature::compile(
            noop(0),
            Some(vec![Expectation::Rest, Expectation::kind("number")]),
        );
        assert!(matches!(result, Err(CompileError::MisplacedRest)));
    }

    #[test]
    fn no_expectations_pin_arity_to_the_declared_count() {
        let sig = Signature::compile(noop(1), None).unwrap();
        assert_eq!(sig.min_arity(), 1);
        assert_eq!(sig.max_arity(), Some(1));

        assert!(sig.validate(&mut vec![]).is_err());
        assert!(sig.validate(&mut vec![json!(0), json!(1)]).is_err());
        assert!(sig.validate(&mut vec![json!(0)]).is_ok());
    }

    #[test]
    fn zero_arity_target_accepts_only_empty_calls() {
        let sig = Signature::compile(noop(0), None).unwrap();
        assert!(sig.validate(&mut vec![]).is_ok());
        assert!(sig.validate(&mut vec![json!(0)]).is_err());
    }

    #[test]
    fn defaults_fill_the_argument_list_on_pass() {
        let sig = Signature::compile(
            noop(0),
            Some(vec![
                Expectation::shape(Definition::new().with_default(|_| json!(10))),
                Expectation::shape(Definition::new().with_default(|filled| {
                    json!(filled[0].as_i64().unwrap() + 1)
                })),
            ]),
        )
        .unwrap();

        let mut args = Vec::new();
        assert!(sig.validate(&mut args).is_ok());
        assert_eq!(args, vec![json!(10), json!(11)]);
    }

    #[test]
    fn validation_is_idempotent_over_the_signature() {
        let sig = Signature::compile(
            noop(0),
            Some(vec![Expectation::kind("number"), Expectation::kind("string")]),
        )
        .unwrap();

        let mut args = vec![json!(10), json!(false)];
        let first = sig.validate(&mut args).unwrap_err();
        let second = sig.validate(&mut args).unwrap_err();
        assert_eq!(first.code, second.code);
        assert_eq!(first.path, second.path);
        assert_eq!(args, vec![json!(10), json!(false)]);
    }

    #[test]
    fn sign_raises_the_unprefixed_message() {
        let sig = Signature::compile(noop(0), Some(vec![Expectation::kind("number")])).unwrap();

        let err = sig.sign(&mut vec![json!("foo")]).unwrap_err();
        assert_eq!(err.name(), "SignatureError");
        assert_eq!(err.code, "kind");
        insta::assert_snapshot!(err.message, @"first argument must be a number (foo is a string)");
    }

    #[test]
    fn invoke_prefixes_name_and_receiver_category() {
        let sig = Signature::compile_named("test", noop(0), Some(vec![Expectation::kind("number")]))
            .unwrap();
        let err = sig.invoke(None, vec![json!("foo")]).unwrap_err();
        insta::assert_snapshot!(err.message, @"test first argument must be a number (foo is a string)");

        let sig = Signature::compile(noop(1), None).unwrap();
        let receiver = json!({});
        let err = sig.invoke(Some(&receiver), vec![]).unwrap_err();
        insta::assert_snapshot!(err.message, @"object.anonymous arguments length must be 1 (got 0)");
    }

    #[test]
    fn invoke_runs_the_target_with_filled_arguments() {
        let target = Target::new("sum", 0, |_, args| {
            json!(args.iter().filter_map(Value::as_i64).sum::<i64>())
        });
        let sig = Signature::compile(
            target,
            Some(vec![
                Expectation::kind("number"),
                Expectation::shape(Definition::new().with_default(|_| json!(5))),
            ]),
        )
        .unwrap();

        assert_eq!(sig.name(), "sum");
        assert_eq!(sig.invoke(None, vec![json!(2)]).unwrap(), json!(7));
    }

    #[test]
    fn name_resolution_order() {
        let named = Signature::compile(Target::new("declared", 0, |_, _| Value::Null), None)
            .unwrap();
        assert_eq!(named.name(), "declared");

        let overridden =
            Signature::compile_named("override", Target::new("declared", 0, |_, _| Value::Null), None)
                .unwrap();
        assert_eq!(overridden.name(), "override");

        let anonymous = Signature::compile(noop(0), None).unwrap();
        assert_eq!(anonymous.name(), "anonymous");
    }

    #[test]
    fn argument_phrases() {
        assert_eq!(argument_phrase(&[]), "arguments");
        assert_eq!(argument_phrase(&[PathSegment::Index(0)]), "first argument");
        assert_eq!(argument_phrase(&[PathSegment::Index(1)]), "second argument");
        assert_eq!(argument_phrase(&[PathSegment::Index(4)]), "argument n°4");
        assert_eq!(
            argument_phrase(&[PathSegment::Index(1), PathSegment::Key("name".into())]),
            "second argument name"
        );
        assert_eq!(
            argument_phrase(&[
                PathSegment::Index(2),
                PathSegment::Key("user".into()),
                PathSegment::Key("name".into()),
            ]),
            "argument n°2 user.name"
        );
    }

    #[test]
    fn nested_violation_renders_the_property_path() {
        let sig = Signature::compile(
            noop(0),
            Some(vec![
                Expectation::Any,
                Expectation::shape(
                    Definition::new().with_property("name", Definition::of_kind("string")),
                ),
            ]),
        )
        .unwrap();

        let mut args = vec![json!(0), json!({"name": 5})];
        let violation = sig.validate(&mut args).unwrap_err();
        assert_eq!(violation.code, ViolationCode::Kind);
        insta::assert_snapshot!(
            sig.render_failure(&violation),
            @"second argument name must be a string (5 is a number)"
        );
    }
}
