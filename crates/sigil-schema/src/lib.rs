//! # sigil-schema
//!
//! The structural validation engine behind sigil's argument signatures.
//!
//! A [`Definition`] declares what a value record must look like: arity
//! bounds (`min_properties`/`max_properties`/`additional_properties`),
//! per-slot constraints (`kind`, `equal`, ranges, patterns, nested
//! shapes), and computed `default` rules for absent slots.
//!
//! [`Schema::compile`] turns a definition into a reusable, immutable
//! checker (pattern strings become compiled regexes; bad patterns are
//! construction-time errors). [`Schema::first_violation`] evaluates a
//! record and returns the first [`Violation`] found — a structured
//! `{path, code, params}` record plus a human reason phrase — or `None`
//! when the record is admissible. [`Schema::fill_defaults`] is an
//! ordered post-pass that assigns computed defaults into absent slots,
//! left-to-right, each rule reading the already-filled earlier slots.
//!
//! This crate never names arguments or callables; turning a violation
//! path into "first argument …" wording is the caller's concern.

pub mod definition;
pub mod kind;
pub mod schema;
pub mod violation;

pub use definition::{DefaultRule, Definition};
pub use kind::{describe, kind_of};
pub use schema::{Schema, SchemaError};
pub use violation::{PathSegment, Violation, ViolationCode};
