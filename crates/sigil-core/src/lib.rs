//! # sigil-core
//!
//! Call-time argument contracts and polymorphic dispatch.
//!
//! A [`Signature`] is a compiled, reusable contract for one calling
//! convention: an ordered list of per-argument [`Expectation`]s becomes
//! a structural schema (arity bounds + per-slot constraints), and every
//! call's argument list is validated against it before the target runs.
//! A [`SignatureSet`] holds the alternative conventions of a
//! polymorphic callable and resolves each call to the first admissible
//! signature in ascending-arity order, or aggregates every candidate's
//! failure into one combined error. [`SignedFn`] wraps a [`Target`]
//! callable so that validation happens on every invocation, preserving
//! the receiver binding.
//!
//! ## Flow
//!
//! ```text
//! Expectation list ── to_definition ──▶ Definition
//!        │                                  │
//!   Signature::compile ◀── sigil_schema::Schema::compile
//!        │
//!   [SignatureSet orders candidates by min arity]
//!        │
//!   validate(args) ──▶ pass (defaults filled) │ Violation
//!        │                                         │
//!   target runs                       SignatureError (rendered message)
//! ```
//!
//! Failure messages name the failing argument ("first argument",
//! "argument n°4", nested property paths) and are prefixed with the
//! signature's name and, for bound calls, the receiver's category:
//! `object.anonymous arguments length must be 1 (got 0)`. Consumers
//! branch on [`SignatureError::code`], never on message text.

pub mod error;
pub mod expect;
pub mod set;
pub mod signature;
pub mod wrap;

pub use error::{CompileError, FailureKind, SignatureError};
pub use expect::Expectation;
pub use set::SignatureSet;
pub use signature::{Signature, Target, argument_phrase};
pub use wrap::{PolymorphBuilder, SignedFn};
