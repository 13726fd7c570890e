//! CommitmentSelector: from a committed seed to a bounded public index.
//!
//! The index is the hash commitment, read as an unsigned integer, reduced
//! modulo the configured bound.

use serde::{Deserialize, Serialize};

use crate::circuit::{Api, Circuit};
use crate::config::SelectionConfig;
use crate::crypto::field::Fr;
use crate::crypto::mimc::mimc_hash;
use crate::errors::CircuitError;
use crate::gadgets::hash::HashGadget;
use crate::gadgets::range::{reduce, reduce_value, validate_bound};

/// A secret preimage and its public hash commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentSeed {
    pub preimage: Fr,
    pub hash: Fr,
}

impl CommitmentSeed {
    pub fn from_preimage(preimage: Fr, domain_label: &str) -> Self {
        let hash = mimc_hash(domain_label, &preimage);
        Self { preimage, hash }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub hash: Fr,
    pub index: u64,
}

/// Host computation of the hash commitment and its selected index.
pub fn select_index(preimage: &Fr, cfg: &SelectionConfig) -> Result<Selection, CircuitError> {
    validate_bound(cfg.max)?;
    let hash = mimc_hash(&cfg.domain_label, preimage);
    let index = reduce_value(&hash, cfg.max)?;
    Ok(Selection { hash, index })
}

/// Assert `hash` commits to `preimage` and derive `index = hash mod max`.
pub fn commit_and_select<A: Api>(
    api: &mut A,
    preimage: &A::Var,
    hash: &A::Var,
    cfg: &SelectionConfig,
) -> Result<A::Var, CircuitError> {
    validate_bound(cfg.max)?;

    let mut hasher = HashGadget::new(&cfg.domain_label);
    hasher.write(std::slice::from_ref(preimage));
    let digest = hasher.sum(api);
    api.assert_equal(&digest, hash, CircuitError::HashCommitmentMismatch)?;

    reduce(api, hash, cfg.max)
}

/// Proves knowledge of a preimage whose hash selects the public index.
///
/// Public inputs, in order: `hash`, `index`.
#[derive(Debug, Clone)]
pub struct SelectionCircuit {
    pub config: SelectionConfig,
    pub preimage: Option<Fr>,
    pub hash: Option<Fr>,
    pub index: Option<Fr>,
}

impl SelectionCircuit {
    /// Unassigned instance, used to compile the constraint system.
    pub fn shape(config: SelectionConfig) -> Self {
        Self {
            config,
            preimage: None,
            hash: None,
            index: None,
        }
    }

    pub fn assigned(config: SelectionConfig, preimage: Fr) -> Result<Self, CircuitError> {
        let sel = select_index(&preimage, &config)?;
        Ok(Self {
            config,
            preimage: Some(preimage),
            hash: Some(sel.hash),
            index: Some(Fr::from_u64(sel.index)),
        })
    }

    /// Public input values, when assigned.
    pub fn public_inputs(&self) -> Option<Vec<Fr>> {
        Some(vec![self.hash.clone()?, self.index.clone()?])
    }
}

impl Circuit for SelectionCircuit {
    fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError> {
        let hash = api.public_input("hash", self.hash.as_ref())?;
        let index = api.public_input("index", self.index.as_ref())?;
        let preimage = api.secret_input("preimage", self.preimage.as_ref())?;
        let computed = commit_and_select(api, &preimage, &hash, &self.config)?;
        api.assert_equal(&computed, &index, CircuitError::BoundViolation)
    }
}
