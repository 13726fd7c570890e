//! Host-face implementation of [`Api`]: variables are field elements.

use crate::circuit::{Api, Circuit, HintFn};
use crate::crypto::field::Fr;
use crate::errors::CircuitError;

#[derive(Debug, Default)]
pub struct Evaluator {
    public: Vec<(String, Fr)>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate a circuit; the first violated relation is returned as-is.
    pub fn run<C: Circuit>(circuit: &C) -> Result<Self, CircuitError> {
        let mut ev = Self::new();
        circuit.define(&mut ev)?;
        Ok(ev)
    }

    /// Public inputs in allocation order.
    pub fn public_inputs(&self) -> &[(String, Fr)] {
        &self.public
    }
}

impl Api for Evaluator {
    type Var = Fr;

    fn public_input(&mut self, name: &str, value: Option<&Fr>) -> Result<Fr, CircuitError> {
        let v = value
            .cloned()
            .ok_or_else(|| CircuitError::MissingAssignment(name.to_string()))?;
        self.public.push((name.to_string(), v.clone()));
        Ok(v)
    }

    fn secret_input(&mut self, name: &str, value: Option<&Fr>) -> Result<Fr, CircuitError> {
        value
            .cloned()
            .ok_or_else(|| CircuitError::MissingAssignment(name.to_string()))
    }

    fn constant(&mut self, value: &Fr) -> Fr {
        value.clone()
    }

    fn add(&mut self, a: &Fr, b: &Fr) -> Fr {
        a + b
    }

    fn sub(&mut self, a: &Fr, b: &Fr) -> Fr {
        a - b
    }

    fn scale(&mut self, a: &Fr, k: &Fr) -> Fr {
        a * k
    }

    fn mul(&mut self, a: &Fr, b: &Fr) -> Fr {
        a * b
    }

    fn assert_product(
        &mut self,
        a: &Fr,
        b: &Fr,
        c: &Fr,
        on_fail: CircuitError,
    ) -> Result<(), CircuitError> {
        if &(a * b) == c {
            Ok(())
        } else {
            Err(on_fail)
        }
    }

    fn assert_equal(&mut self, a: &Fr, b: &Fr, on_fail: CircuitError) -> Result<(), CircuitError> {
        if a == b {
            Ok(())
        } else {
            Err(on_fail)
        }
    }

    fn hint(
        &mut self,
        inputs: &[Fr],
        outputs: usize,
        f: HintFn<'_>,
    ) -> Result<Vec<Fr>, CircuitError> {
        let values = f(inputs)?;
        debug_assert_eq!(values.len(), outputs, "hint output arity");
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertions_report_requested_kind() {
        let mut ev = Evaluator::new();
        let a = ev.constant(&Fr::from_u64(3));
        let b = ev.constant(&Fr::from_u64(4));
        let c = ev.mul(&a, &b);
        ev.assert_product(&a, &b, &c, CircuitError::BoundViolation)
            .unwrap();
        assert_eq!(
            ev.assert_equal(&a, &b, CircuitError::HashCommitmentMismatch),
            Err(CircuitError::HashCommitmentMismatch)
        );
    }

    #[test]
    fn missing_inputs_are_named() {
        let mut ev = Evaluator::new();
        assert_eq!(
            ev.secret_input("preimage", None),
            Err(CircuitError::MissingAssignment("preimage".into()))
        );
    }

    #[test]
    fn public_inputs_are_recorded_in_order() {
        let mut ev = Evaluator::new();
        ev.public_input("hash", Some(&Fr::from_u64(9))).unwrap();
        ev.secret_input("preimage", Some(&Fr::from_u64(1))).unwrap();
        ev.public_input("index", Some(&Fr::from_u64(2))).unwrap();
        let names: Vec<_> = ev.public_inputs().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["hash", "index"]);
    }
}
