//! Native engine: transparent R1CS proofs for development.
//!
//! The proof body carries the full witness; verification substitutes the
//! verifier's public inputs and re-checks every constraint. Sound, not
//! zero-knowledge.

use irisid_corelib::backend::{validate_engine_config, Capabilities, ProvingEngine};
use irisid_corelib::circuit::{Circuit, CircuitBuilder, ConstraintSystem, Witness};
use irisid_corelib::config::EngineConfig;
use irisid_corelib::crypto::field::Fr;
use irisid_corelib::errors::{CompileError, ProofError};
use irisid_corelib::proof::{self, Proof, ProofHeader};

pub const ENGINE_ID: &str = "native@0.1";

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeProvingKey {
    pub cs_digest: [u8; 32],
}

#[derive(Debug, Clone)]
pub struct NativeVerifyingKey {
    pub cs: ConstraintSystem,
    pub cs_digest: [u8; 32],
}

impl ProvingEngine for NativeEngine {
    type ProvingKey = NativeProvingKey;
    type VerifyingKey = NativeVerifyingKey;

    fn id(&self) -> &'static str {
        ENGINE_ID
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            curves: vec!["bn254"],
            schemes: vec!["native"],
            zero_knowledge: false,
        }
    }

    fn compile<C: Circuit>(
        &self,
        cfg: &EngineConfig,
        circuit: &C,
    ) -> Result<ConstraintSystem, CompileError> {
        let _span = tracing::info_span!("compile", engine = ENGINE_ID).entered();
        validate_engine_config(ENGINE_ID, cfg, &self.capabilities())?;
        let (cs, _) = CircuitBuilder::synthesize(circuit)?;
        tracing::info!(
            constraints = cs.num_constraints(),
            variables = cs.num_variables(),
            public = cs.public_inputs().len(),
            "compiled constraint system"
        );
        Ok(cs)
    }

    fn setup(&self, cs: &ConstraintSystem) -> (NativeProvingKey, NativeVerifyingKey) {
        let _span = tracing::info_span!("setup", engine = ENGINE_ID).entered();
        let cs_digest = cs.digest();
        (
            NativeProvingKey { cs_digest },
            NativeVerifyingKey {
                cs: cs.clone(),
                cs_digest,
            },
        )
    }

    fn prove<C: Circuit>(
        &self,
        cs: &ConstraintSystem,
        pk: &NativeProvingKey,
        circuit: &C,
    ) -> Result<Proof, ProofError> {
        let _span = tracing::info_span!("prove", engine = ENGINE_ID).entered();
        let digest = cs.digest();
        if digest != pk.cs_digest {
            return Err(ProofError::KeyMismatch);
        }

        let (synth, witness) = CircuitBuilder::synthesize(circuit).map_err(|e| {
            tracing::debug!(error = %e, "witness synthesis failed");
            ProofError::Unsatisfied
        })?;
        if synth.digest() != digest {
            return Err(ProofError::KeyMismatch);
        }
        let witness = witness.ok_or_else(|| {
            tracing::debug!("witness incomplete");
            ProofError::Unsatisfied
        })?;
        if let Err(at) = cs.check(&witness) {
            tracing::debug!(constraint = at, "constraint unsatisfied");
            return Err(ProofError::Unsatisfied);
        }

        let body = proof::encode_elements(witness.values());
        let header = ProofHeader {
            engine_id_hash: proof::engine_id_hash(ENGINE_ID),
            cs_digest_hash: proof::cs_digest_hash(&digest),
            pubio_hash: proof::pubio_hash(&witness.public_values(cs)),
            body_len: body.len() as u64,
        };
        tracing::info!(bytes = body.len(), "proof generated");
        Ok(Proof { header, body })
    }

    fn verify(&self, proof: &Proof, vk: &NativeVerifyingKey, public_inputs: &[Fr]) -> bool {
        let _span = tracing::info_span!("verify", engine = ENGINE_ID).entered();
        let header = &proof.header;
        if header.engine_id_hash != proof::engine_id_hash(ENGINE_ID)
            || header.cs_digest_hash != proof::cs_digest_hash(&vk.cs_digest)
            || header.pubio_hash != proof::pubio_hash(public_inputs)
            || header.body_len != proof.body.len() as u64
        {
            tracing::debug!("header bindings mismatch");
            return false;
        }
        let values = match proof::decode_elements(&proof.body) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "malformed proof body");
                return false;
            }
        };
        let Some(witness) = Witness::new(values).with_public(&vk.cs, public_inputs) else {
            tracing::debug!("public input arity mismatch");
            return false;
        };
        let ok = vk.cs.check(&witness).is_ok();
        tracing::info!(ok, "verified");
        ok
    }
}
