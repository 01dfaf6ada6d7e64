//! Dispatch wrappers: callables that validate before they run.
//!
//! [`SignedFn`] wraps a [`Target`] with one [`Signature`] or a whole
//! [`SignatureSet`]; every call validates the arguments first and
//! raises before the target runs on failure, with the receiver binding
//! preserved on the way through. The wrapper also owns the
//! skip-frames presentation policy: a configured count of internal
//! dispatch frames is stamped onto raised errors as metadata for host
//! stack renderers, without ever touching `code` or `message`.

use crate::error::{CompileError, SignatureError};
use crate::expect::Expectation;
use crate::set::SignatureSet;
use crate::signature::{Signature, Target};
use serde_json::Value;

#[derive(Debug, Clone)]
enum Contract {
    Single(Signature),
    Overloaded(SignatureSet),
}

/// A callable wrapped with its contract.
#[derive(Debug, Clone)]
pub struct SignedFn {
    contract: Contract,
    skip_frames: usize,
}

impl SignedFn {
    /// Wrap with an arity-only contract pinned to the target's declared
    /// parameter count.
    pub fn new(target: Target) -> Result<Self, CompileError> {
        Ok(Self::from_signature(Signature::compile(target, None)?))
    }

    /// Wrap with a per-argument expectation list.
    pub fn with_expectations(
        target: Target,
        expectations: Vec<Expectation>,
    ) -> Result<Self, CompileError> {
        Ok(Self::from_signature(Signature::compile(
            target,
            Some(expectations),
        )?))
    }

    pub fn from_signature(signature: Signature) -> Self {
        Self {
            contract: Contract::Single(signature),
            skip_frames: 0,
        }
    }

    pub fn from_set(set: SignatureSet) -> Result<Self, CompileError> {
        if set.is_empty() {
            return Err(CompileError::EmptySet);
        }
        Ok(Self {
            contract: Contract::Overloaded(set),
            skip_frames: 0,
        })
    }

    /// Start a polymorphic wrapper; unnamed overload targets inherit
    /// this name in their failure messages.
    pub fn polymorph(name: impl Into<String>) -> PolymorphBuilder {
        PolymorphBuilder {
            name: name.into(),
            overloads: Vec::new(),
        }
    }

    /// Configure how many internal dispatch frames a host stack
    /// renderer should drop from raised errors. Presentation metadata
    /// only.
    pub fn skip_frames(mut self, frames: usize) -> Self {
        self.skip_frames = frames;
        self
    }

    /// Validate, then forward to the target with the receiver binding
    /// preserved.
    pub fn call(
        &self,
        receiver: Option<&Value>,
        args: Vec<Value>,
    ) -> Result<Value, SignatureError> {
        let result = match &self.contract {
            Contract::Single(signature) => signature.invoke(receiver, args),
            Contract::Overloaded(set) => set.invoke(receiver, args),
        };
        result.map_err(|e| e.with_skip_frames(self.skip_frames))
    }
}

/// Accumulates the overloads of a polymorphic callable.
pub struct PolymorphBuilder {
    name: String,
    overloads: Vec<(Option<Vec<Expectation>>, Target)>,
}

impl PolymorphBuilder {
    /// Add a calling convention with a per-argument expectation list.
    pub fn overload(mut self, expectations: Vec<Expectation>, target: Target) -> Self {
        self.overloads.push((Some(expectations), target));
        self
    }

    /// Add a calling convention pinned to the target's declared arity.
    pub fn overload_arity(mut self, target: Target) -> Self {
        self.overloads.push((None, target));
        self
    }

    /// Compile every overload and build the wrapper. Targets that carry
    /// their own declared name keep it; unnamed targets take the
    /// polymorph name.
    pub fn build(self) -> Result<SignedFn, CompileError> {
        if self.overloads.is_empty() {
            return Err(CompileError::EmptySet);
        }

        let mut set = SignatureSet::new();
        for (expectations, target) in self.overloads {
            let signature = match target.name() {
                Some(_) => Signature::compile(target, expectations)?,
                None => Signature::compile_named(self.name.clone(), target, expectations)?,
            };
            set.add(signature);
        }

        SignedFn::from_set(set)
    }
}
