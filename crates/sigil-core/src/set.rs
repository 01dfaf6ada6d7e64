//! Ordered signature sets for polymorphic callables.
//!
//! A [`SignatureSet`] holds every calling convention of one callable,
//! kept ascending by minimum arity. Dispatch is strictly first-match in
//! that order — the least-arity admissible candidate wins, trading
//! "most specific" for "smallest" when conventions overlap. When no
//! candidate admits a call, every per-signature failure message is
//! aggregated into one combined error.

use crate::error::SignatureError;
use crate::signature::Signature;
use serde_json::Value;

/// The alternative calling conventions of one polymorphic callable.
#[derive(Debug, Clone, Default)]
pub struct SignatureSet {
    signatures: Vec<Signature>,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature at the position preserving ascending order by
    /// minimum arity. Equal-arity entries go after existing ones, so
    /// insertion order breaks ties. Incremental — the set is never
    /// re-sorted wholesale.
    pub fn add(&mut self, signature: Signature) {
        let at = self
            .signatures
            .partition_point(|s| s.min_arity() <= signature.min_arity());
        self.signatures.insert(at, signature);
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// The signatures in dispatch order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Resolve a call to the first admissible signature.
    ///
    /// Candidates are tried left-to-right in sorted order; the first
    /// passing validation wins (its `default` rules fill the argument
    /// list). When every candidate fails, the per-signature messages —
    /// each independently rendered and prefixed — are joined with
    /// `" OR "` into one aggregate error with code `anyOf`. An empty
    /// set admits nothing: dispatching one is a setup bug, reported as
    /// an aggregate failure that says so rather than an empty message.
    pub fn select(
        &self,
        receiver: Option<&Value>,
        args: &mut Vec<Value>,
    ) -> Result<&Signature, SignatureError> {
        if self.signatures.is_empty() {
            return Err(SignatureError::any_of(
                "no calling convention declared".to_string(),
            ));
        }

        let mut failures = Vec::with_capacity(self.signatures.len());

        for signature in &self.signatures {
            match signature.validate(args) {
                Ok(()) => return Ok(signature),
                Err(v) => {
                    failures.push(signature.prefixed(receiver, &signature.render_failure(&v)));
                }
            }
        }

        Err(SignatureError::any_of(failures.join(" OR ")))
    }

    /// Resolve and run: the matching signature's own target is called
    /// with the receiver binding preserved.
    pub fn invoke(
        &self,
        receiver: Option<&Value>,
        mut args: Vec<Value>,
    ) -> Result<Value, SignatureError> {
        let signature = self.select(receiver, &mut args)?;
        Ok(signature.target().call(receiver, &args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::expect::Expectation;
    use crate::signature::Target;
    use serde_json::json;

    fn arity_sig(name: &str, arity: usize) -> Signature {
        let tag = json!(arity);
        Signature::compile_named(
            name,
            Target::anonymous(arity, move |_, _| tag.clone()),
            None,
        )
        .unwrap()
    }

    #[test]
    fn insertion_keeps_ascending_arity_order() {
        let mut set = SignatureSet::new();
        set.add(arity_sig("m", 2));
        set.add(arity_sig("m", 0));
        set.add(arity_sig("m", 1));

        let arities: Vec<usize> = set.signatures().iter().map(|s| s.min_arity()).collect();
        assert_eq!(arities, vec![0, 1, 2]);
    }

    #[test]
    fn equal_arity_ties_break_by_insertion_order() {
        let mut set = SignatureSet::new();
        set.add(arity_sig("first", 1));
        set.add(arity_sig("second", 1));

        let names: Vec<&str> = set.signatures().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn dispatch_picks_the_first_admissible_signature() {
        let mut set = SignatureSet::new();
        set.add(arity_sig("m", 2));
        set.add(arity_sig("m", 1));

        assert_eq!(set.invoke(None, vec![json!(0)]).unwrap(), json!(1));
        assert_eq!(set.invoke(None, vec![json!(0), json!(0)]).unwrap(), json!(2));
    }

    #[test]
    fn least_arity_candidate_wins_on_overlap() {
        // A rest signature admits every call a wider one would; the
        // smaller minimum arity is tried first and wins.
        let mut set = SignatureSet::new();
        set.add(
            Signature::compile_named(
                "wide",
                Target::anonymous(0, |_, _| json!("wide")),
                Some(vec![Expectation::kind("number"), Expectation::kind("number")]),
            )
            .unwrap(),
        );
        set.add(
            Signature::compile_named(
                "narrow",
                Target::anonymous(0, |_, _| json!("narrow")),
                Some(vec![Expectation::kind("number"), Expectation::Rest]),
            )
            .unwrap(),
        );

        assert_eq!(
            set.invoke(None, vec![json!(1), json!(2)]).unwrap(),
            json!("narrow")
        );
    }

    #[test]
    fn aggregate_failure_joins_every_candidate_message() {
        let mut set = SignatureSet::new();
        set.add(arity_sig("method", 1));
        set.add(arity_sig("method", 2));

        let err = set.invoke(None, vec![]).unwrap_err();
        assert_eq!(err.kind, FailureKind::Aggregate);
        assert_eq!(err.code, "anyOf");
        insta::assert_snapshot!(
            err.message,
            @"method arguments length must be 1 (got 0) OR method arguments length must be 2 (got 0)"
        );
    }

    #[test]
    fn empty_set_dispatch_reports_the_setup_bug() {
        let set = SignatureSet::new();
        let err = set.invoke(None, vec![json!(0)]).unwrap_err();
        assert_eq!(err.kind, FailureKind::Aggregate);
        assert_eq!(err.code, "anyOf");
        assert_eq!(err.message, "no calling convention declared");
    }

    #[test]
    fn defaults_fill_only_for_the_matching_signature() {
        let mut set = SignatureSet::new();
        set.add(
            Signature::compile_named(
                "m",
                Target::anonymous(0, |_, args| json!(args.len())),
                Some(vec![Expectation::shape(
                    sigil_schema::Definition::new().with_default(|_| json!(10)),
                )]),
            )
            .unwrap(),
        );

        let mut args = Vec::new();
        let sig = set.select(None, &mut args).unwrap();
        assert_eq!(sig.min_arity(), 1);
        assert_eq!(args, vec![json!(10)]);
    }
}
