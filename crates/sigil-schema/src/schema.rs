//! Compiled schemas and first-violation checking.
//!
//! [`Schema::compile`] freezes a [`Definition`] into an immutable
//! checker: every `pattern` string in the tree becomes a compiled
//! `regex::Regex`, and a malformed pattern is a construction-time
//! [`SchemaError`] — a setup bug, kept separate from per-record
//! validation failures.
//!
//! Checking is fixed-order, first-violation-wins:
//!
//! 1. minimum slot count (absent slots with a `default` rule count as
//!    satisfied),
//! 2. maximum slot count / additional-slot cap,
//! 3. per-slot constraints in ascending position, recursing into nested
//!    shapes.
//!
//! [`Schema::fill_defaults`] runs only after a passing check: declared
//! defaults are applied left-to-right, each rule reading the slots
//! already filled before it.

use crate::definition::{DefaultRule, Definition};
use crate::kind::{article, describe, kind_of};
use crate::violation::{PathSegment, Violation, ViolationCode};
use regex::Regex;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Construction-time schema errors.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A `pattern` constraint is not a valid regex.
    #[error("invalid pattern /{pattern}/: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// A compiled, immutable structural checker.
#[derive(Debug, Clone)]
pub struct Schema {
    definition: Definition,
    patterns: BTreeMap<String, Regex>,
}

impl Schema {
    /// Compile a definition, validating every pattern in the tree.
    pub fn compile(definition: Definition) -> Result<Self, SchemaError> {
        let mut patterns = BTreeMap::new();
        collect_patterns(&definition, &mut patterns)?;
        Ok(Self {
            definition,
            patterns,
        })
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Check a record and return the first violation, if any.
    ///
    /// The record itself is never mutated here; defaults are a separate
    /// pass ([`Self::fill_defaults`]).
    pub fn first_violation(&self, record: &[Value]) -> Option<Violation> {
        let def = &self.definition;
        let present = record.len();

        // Absent slots with a default rule satisfy the minimum bound;
        // the fill pass will materialize them.
        let defaulted = indexed_properties(def)
            .filter(|(i, slot)| *i >= present && slot.default.is_some())
            .count();

        // When additional slots are forbidden, the record may not extend
        // past the last declared position — declared positions need not
        // be contiguous, so the cap is the highest one plus one, not the
        // property count.
        let declared_cap = match def.additional_properties {
            Some(false) => Some(
                indexed_properties(def)
                    .map(|(i, _)| i + 1)
                    .max()
                    .unwrap_or(0),
            ),
            _ => None,
        };

        if let Some(min) = def.min_properties
            && present + defaulted < min
        {
            let exact = def.max_properties == Some(min) || declared_cap == Some(min);
            return Some(arity_violation(
                ViolationCode::MinProperties,
                min,
                present,
                if exact { Bound::Exact } else { Bound::AtLeast },
            ));
        }

        if let Some(max) = def.max_properties
            && present > max
        {
            let exact = def.min_properties == Some(max);
            return Some(arity_violation(
                ViolationCode::MaxProperties,
                max,
                present,
                if exact { Bound::Exact } else { Bound::AtMost },
            ));
        }

        if let Some(cap) = declared_cap
            && present > cap
        {
            let exact = def.min_properties == Some(cap);
            return Some(arity_violation(
                ViolationCode::AdditionalProperties,
                cap,
                present,
                if exact { Bound::Exact } else { Bound::AtMost },
            ));
        }

        for (index, slot) in indexed_properties(def) {
            match record.get(index) {
                Some(value) => {
                    let path = vec![PathSegment::Index(index)];
                    if let Some(v) = self.check_value(value, slot, path) {
                        return Some(v);
                    }
                }
                // Absent slots are governed by the arity bounds above;
                // a defaulted slot will be filled after the check.
                None => continue,
            }
        }

        None
    }

    /// Apply default rules to absent slots, left-to-right.
    ///
    /// Each rule reads the record as filled so far, so a later default
    /// may depend on an earlier one. Only call after a passing
    /// [`Self::first_violation`]; this is the engine's sole mutation of
    /// caller data.
    pub fn fill_defaults(&self, record: &mut Vec<Value>) {
        for (index, rule) in self.default_rules() {
            if index < record.len() {
                continue;
            }
            // Positional integrity: a gap before a defaulted slot is
            // padded with nulls rather than shifting positions.
            while record.len() < index {
                record.push(Value::Null);
            }
            let value = rule.compute(record);
            record.push(value);
        }
    }

    fn default_rules(&self) -> impl Iterator<Item = (usize, &DefaultRule)> {
        indexed_properties(&self.definition)
            .filter_map(|(i, slot)| slot.default.as_ref().map(|rule| (i, rule)))
    }

    fn check_value(
        &self,
        value: &Value,
        def: &Definition,
        path: Vec<PathSegment>,
    ) -> Option<Violation> {
        if let Some(kind) = &def.kind {
            let actual = kind_of(value);
            if actual != kind {
                return Some(Violation::new(
                    path,
                    ViolationCode::Kind,
                    json!({"expected": kind, "actual": actual}),
                    format!(
                        "must be {} {kind} ({} is {} {actual})",
                        article(kind),
                        describe(value),
                        article(actual),
                    ),
                ));
            }
        }

        if let Some(expected) = &def.equal
            && value != expected
        {
            return Some(Violation::new(
                path,
                ViolationCode::Equal,
                json!({"expected": expected, "actual": value}),
                format!("must be {} (got {})", describe(expected), describe(value)),
            ));
        }

        if def.ty.as_deref() == Some("object") && !value.is_object() && !value.is_array() {
            let actual = kind_of(value);
            return Some(Violation::new(
                path,
                ViolationCode::Type,
                json!({"expected": "object", "actual": actual}),
                format!("must be an object (got {} {actual})", article(actual)),
            ));
        }

        if let Some(bound) = def.minimum
            && let Some(n) = value.as_f64()
            && n < bound
        {
            return Some(Violation::new(
                path,
                ViolationCode::Minimum,
                json!({"minimum": bound, "actual": n}),
                format!("must be at least {bound} (got {n})"),
            ));
        }

        if let Some(bound) = def.maximum
            && let Some(n) = value.as_f64()
            && n > bound
        {
            return Some(Violation::new(
                path,
                ViolationCode::Maximum,
                json!({"maximum": bound, "actual": n}),
                format!("must be at most {bound} (got {n})"),
            ));
        }

        if let Some(pattern) = &def.pattern
            && let Some(s) = value.as_str()
        {
            // Compile guarantees the regex exists.
            let matched = self
                .patterns
                .get(pattern)
                .map(|re| re.is_match(s))
                .unwrap_or(false);
            if !matched {
                return Some(Violation::new(
                    path,
                    ViolationCode::Pattern,
                    json!({"pattern": pattern, "actual": s}),
                    format!("must match /{pattern}/ (got {s})"),
                ));
            }
        }

        if let Some(map) = value.as_object() {
            if let Some(min) = def.min_properties
                && map.len() < min
            {
                return Some(Violation::new(
                    path,
                    ViolationCode::MinProperties,
                    json!({"minProperties": min, "actual": map.len()}),
                    format!("must have at least {min} properties (got {})", map.len()),
                ));
            }
            if let Some(max) = def.max_properties
                && map.len() > max
            {
                return Some(Violation::new(
                    path,
                    ViolationCode::MaxProperties,
                    json!({"maxProperties": max, "actual": map.len()}),
                    format!("must have at most {max} properties (got {})", map.len()),
                ));
            }
            if def.additional_properties == Some(false)
                && let Some(extra) = map.keys().find(|k| !def.properties.contains_key(*k))
            {
                let mut at = path.clone();
                at.push(PathSegment::Key(extra.clone()));
                return Some(Violation::new(
                    at,
                    ViolationCode::AdditionalProperties,
                    json!({"property": extra}),
                    "is not allowed",
                ));
            }

            for (key, slot) in &def.properties {
                let mut at = path.clone();
                at.push(PathSegment::Key(key.clone()));
                match map.get(key) {
                    Some(nested) => {
                        if let Some(v) = self.check_value(nested, slot, at) {
                            return Some(v);
                        }
                    }
                    None => {
                        if slot.default.is_none() && !slot.is_open() {
                            return Some(Violation::new(
                                at,
                                ViolationCode::Required,
                                json!({"property": key}),
                                "must be present",
                            ));
                        }
                    }
                }
            }
        }

        None
    }
}

enum Bound {
    Exact,
    AtLeast,
    AtMost,
}

fn arity_violation(code: ViolationCode, bound: usize, actual: usize, shape: Bound) -> Violation {
    let reason = match shape {
        Bound::Exact => format!("length must be {bound} (got {actual})"),
        Bound::AtLeast => format!("length must be at least {bound} (got {actual})"),
        Bound::AtMost => format!("length must be at most {bound} (got {actual})"),
    };
    Violation::new(
        Vec::new(),
        code,
        json!({"bound": bound, "actual": actual}),
        reason,
    )
}

/// Root properties as (position, definition), ascending by position.
///
/// Keys that do not parse as positions are skipped at the root; named
/// keys only occur inside nested shapes.
fn indexed_properties(def: &Definition) -> impl Iterator<Item = (usize, &Definition)> {
    let mut slots: Vec<(usize, &Definition)> = def
        .properties
        .iter()
        .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
        .collect();
    slots.sort_by_key(|(i, _)| *i);
    slots.into_iter()
}

fn collect_patterns(
    def: &Definition,
    patterns: &mut BTreeMap<String, Regex>,
) -> Result<(), SchemaError> {
    if let Some(pattern) = &def.pattern
        && !patterns.contains_key(pattern)
    {
        let re = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
            pattern: pattern.clone(),
            source: Box::new(source),
        })?;
        patterns.insert(pattern.clone(), re);
    }
    for slot in def.properties.values() {
        collect_patterns(slot, patterns)?;
    }
    Ok(())
}
