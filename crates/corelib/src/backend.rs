//! Proving-engine adapter trait and capability model.

use serde::Serialize;

use crate::circuit::{Circuit, ConstraintSystem};
use crate::config::EngineConfig;
use crate::crypto::field::Fr;
use crate::errors::{CompileError, ProofError};
use crate::proof::Proof;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Capabilities {
    pub curves: Vec<&'static str>,  // e.g., ["bn254"]
    pub schemes: Vec<&'static str>, // e.g., ["native"]
    /// Whether proofs hide the witness.
    pub zero_knowledge: bool,
}

pub trait ProvingEngine: Send + Sync {
    type ProvingKey;
    type VerifyingKey;

    fn id(&self) -> &'static str; // "native@0.1" etc.
    fn capabilities(&self) -> Capabilities;

    /// Build the constraint system of an unassigned circuit.
    fn compile<C: Circuit>(
        &self,
        cfg: &EngineConfig,
        circuit: &C,
    ) -> Result<ConstraintSystem, CompileError>;

    fn setup(&self, cs: &ConstraintSystem) -> (Self::ProvingKey, Self::VerifyingKey);

    /// Any unsatisfied relation yields [`ProofError::Unsatisfied`], never
    /// the specific relation.
    fn prove<C: Circuit>(
        &self,
        cs: &ConstraintSystem,
        pk: &Self::ProvingKey,
        circuit: &C,
    ) -> Result<Proof, ProofError>;

    fn verify(&self, proof: &Proof, vk: &Self::VerifyingKey, public_inputs: &[Fr]) -> bool;
}

/// Check a requested engine configuration against what the engine offers.
pub fn validate_engine_config(
    engine_id: &str,
    cfg: &EngineConfig,
    caps: &Capabilities,
) -> Result<(), CompileError> {
    if !caps.curves.iter().any(|c| c.eq_ignore_ascii_case(&cfg.curve)) {
        return Err(CompileError::CurveUnsupported {
            engine: engine_id.to_string(),
            curve: cfg.curve.clone(),
        });
    }
    if !caps.schemes.iter().any(|s| s.eq_ignore_ascii_case(&cfg.scheme)) {
        return Err(CompileError::SchemeUnsupported {
            engine: engine_id.to_string(),
            scheme: cfg.scheme.clone(),
        });
    }
    Ok(())
}
