//! IdentitySelectionShell: selected positions of a secret artifact list
//! are revealed and bound to commitment-derived indices.

use serde::{Deserialize, Serialize};

use crate::circuit::{Api, Circuit};
use crate::config::SelectionConfig;
use crate::crypto::field::Fr;
use crate::errors::CircuitError;
use crate::gadgets::mux::{one_hot, select};
use crate::gadgets::range::validate_bound;
use crate::selection::{commit_and_select, select_index};

/// Largest artifact list the multiplexer accepts; each position costs one
/// zero test per check.
pub const MAX_ARTIFACTS: u64 = 1 << 12;

fn validate_artifact_bound(max: u64) -> Result<(), CircuitError> {
    validate_bound(max)?;
    if max > MAX_ARTIFACTS {
        return Err(CircuitError::InvalidBound(format!(
            "{max} artifacts exceed multiplexer limit {MAX_ARTIFACTS}"
        )));
    }
    Ok(())
}

fn validate_artifact_count(len: usize, max: u64) -> Result<(), CircuitError> {
    validate_artifact_bound(max)?;
    if len as u64 != max {
        return Err(CircuitError::InvalidBound(format!(
            "{len} artifacts for bound {max}"
        )));
    }
    Ok(())
}

/// One iris segment, opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrisArtifact {
    pub x: Fr,
    pub y: Fr,
}

#[derive(Debug, Clone)]
pub struct ArtifactVar<V> {
    pub x: V,
    pub y: V,
}

/// Multiplex `artifacts[index]` without branching on `index`.
pub fn select_artifact<A: Api>(
    api: &mut A,
    artifacts: &[ArtifactVar<A::Var>],
    index: &A::Var,
) -> Result<ArtifactVar<A::Var>, CircuitError> {
    if artifacts.is_empty() {
        return Err(CircuitError::InvalidBound("empty artifact list".into()));
    }
    validate_artifact_bound(artifacts.len() as u64)?;
    let indicators = one_hot(api, index, artifacts.len(), CircuitError::SelectionMismatch)?;
    let xs: Vec<A::Var> = artifacts.iter().map(|a| a.x.clone()).collect();
    let ys: Vec<A::Var> = artifacts.iter().map(|a| a.y.clone()).collect();
    Ok(ArtifactVar {
        x: select(api, &indicators, &xs),
        y: select(api, &indicators, &ys),
    })
}

/// One seed and the artifact it claims to select.
#[derive(Debug, Clone, Default)]
pub struct SelectionCheck {
    pub preimage: Option<Fr>,
    pub hash: Option<Fr>,
    pub index: Option<Fr>,
    pub revealed: Option<IrisArtifact>,
}

/// Public inputs per check, in order: `hash`, `index`, `x`, `y`.
#[derive(Debug, Clone)]
pub struct IdentityCircuit {
    pub config: SelectionConfig,
    pub artifacts: Vec<Option<IrisArtifact>>,
    pub checks: Vec<SelectionCheck>,
}

impl IdentityCircuit {
    pub fn shape(config: SelectionConfig, n_checks: usize) -> Result<Self, CircuitError> {
        validate_artifact_bound(config.max)?;
        let n = config.max as usize;
        Ok(Self {
            config,
            artifacts: vec![None; n],
            checks: vec![SelectionCheck::default(); n_checks],
        })
    }

    pub fn assign(
        config: SelectionConfig,
        artifacts: &[IrisArtifact],
        preimages: &[Fr],
    ) -> Result<Self, CircuitError> {
        validate_artifact_count(artifacts.len(), config.max)?;
        let mut checks = Vec::with_capacity(preimages.len());
        for p in preimages {
            let sel = select_index(p, &config)?;
            checks.push(SelectionCheck {
                preimage: Some(p.clone()),
                hash: Some(sel.hash),
                index: Some(Fr::from_u64(sel.index)),
                revealed: Some(artifacts[sel.index as usize].clone()),
            });
        }
        Ok(Self {
            config,
            artifacts: artifacts.iter().cloned().map(Some).collect(),
            checks,
        })
    }

    pub fn public_inputs(&self) -> Option<Vec<Fr>> {
        let mut out = Vec::with_capacity(4 * self.checks.len());
        for c in &self.checks {
            let revealed = c.revealed.as_ref()?;
            out.extend([
                c.hash.clone()?,
                c.index.clone()?,
                revealed.x.clone(),
                revealed.y.clone(),
            ]);
        }
        Some(out)
    }
}

impl Circuit for IdentityCircuit {
    fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError> {
        validate_artifact_count(self.artifacts.len(), self.config.max)?;

        let mut artifacts = Vec::with_capacity(self.artifacts.len());
        for (j, a) in self.artifacts.iter().enumerate() {
            artifacts.push(ArtifactVar {
                x: api.secret_input(&format!("artifact[{j}].x"), a.as_ref().map(|a| &a.x))?,
                y: api.secret_input(&format!("artifact[{j}].y"), a.as_ref().map(|a| &a.y))?,
            });
        }

        for (i, check) in self.checks.iter().enumerate() {
            let revealed = check.revealed.as_ref();
            let hash = api.public_input(&format!("check[{i}].hash"), check.hash.as_ref())?;
            let index = api.public_input(&format!("check[{i}].index"), check.index.as_ref())?;
            let x = api.public_input(&format!("check[{i}].x"), revealed.map(|r| &r.x))?;
            let y = api.public_input(&format!("check[{i}].y"), revealed.map(|r| &r.y))?;
            let preimage =
                api.secret_input(&format!("check[{i}].preimage"), check.preimage.as_ref())?;

            let computed = commit_and_select(api, &preimage, &hash, &self.config)?;
            api.assert_equal(&computed, &index, CircuitError::BoundViolation)?;
            let selected = select_artifact(api, &artifacts, &computed)?;
            api.assert_equal(&selected.x, &x, CircuitError::SelectionMismatch)?;
            api.assert_equal(&selected.y, &y, CircuitError::SelectionMismatch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitBuilder, Evaluator};

    fn artifacts(n: u64) -> Vec<IrisArtifact> {
        (0..n)
            .map(|j| IrisArtifact {
                x: Fr::from_u64(100 + j),
                y: Fr::from_u64(200 + j),
            })
            .collect()
    }

    #[test]
    fn reveals_the_selected_artifact() {
        let cfg = SelectionConfig::with_max(8);
        let list = artifacts(8);
        let circuit = IdentityCircuit::assign(cfg, &list, &[Fr::from_u64(3), Fr::from_u64(4)]).unwrap();
        Evaluator::run(&circuit).unwrap();
        let (cs, w) = CircuitBuilder::synthesize(&circuit).unwrap();
        cs.check(&w.unwrap()).unwrap();
        assert_eq!(cs.public_inputs().len(), 8);
    }

    #[test]
    fn wrong_revealed_artifact_is_a_selection_mismatch() {
        let cfg = SelectionConfig::with_max(4);
        let list = artifacts(4);
        let mut circuit = IdentityCircuit::assign(cfg, &list, &[Fr::from_u64(11)]).unwrap();
        let idx = circuit.checks[0].index.clone().unwrap();
        let other = list
            .iter()
            .enumerate()
            .find(|(j, _)| Fr::from_u64(*j as u64) != idx)
            .map(|(_, a)| a.clone());
        circuit.checks[0].revealed = other;
        assert_eq!(
            Evaluator::run(&circuit).map(|_| ()),
            Err(CircuitError::SelectionMismatch)
        );
    }

    #[test]
    fn artifact_count_must_match_bound() {
        let cfg = SelectionConfig::with_max(4);
        assert!(matches!(
            IdentityCircuit::assign(cfg, &artifacts(3), &[]),
            Err(CircuitError::InvalidBound(_))
        ));
    }

    #[test]
    fn oversized_bound_is_rejected_before_allocation() {
        let cfg = SelectionConfig::with_max(crate::gadgets::range::MAX_BOUND);
        assert!(matches!(
            IdentityCircuit::shape(cfg, 1),
            Err(CircuitError::InvalidBound(_))
        ));
        IdentityCircuit::shape(SelectionConfig::with_max(MAX_ARTIFACTS), 1).unwrap();
        assert!(IdentityCircuit::shape(SelectionConfig::with_max(MAX_ARTIFACTS + 1), 0).is_err());
    }

    #[test]
    fn empty_list_is_rejected_by_mux() {
        let mut ev = Evaluator::new();
        let empty: Vec<ArtifactVar<Fr>> = Vec::new();
        assert!(matches!(
            select_artifact(&mut ev, &empty, &Fr::zero()),
            Err(CircuitError::InvalidBound(_))
        ));
    }
}
