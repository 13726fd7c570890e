//! Gadget-face implementation of [`Api`]: records R1CS constraints over
//! linear combinations, tracking witness values when they are known.

use std::collections::BTreeMap;

use crate::circuit::{Api, Circuit, HintFn};
use crate::crypto::field::Fr;
use crate::crypto::hash::{hash_labeled, Blake3};
use crate::errors::CircuitError;

/// Index of the variable fixed to one.
pub const ONE: usize = 0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearCombination {
    terms: BTreeMap<usize, Fr>,
}

impl LinearCombination {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn var(index: usize) -> Self {
        let mut lc = Self::zero();
        lc.add_term(index, &Fr::one());
        lc
    }

    pub fn constant(k: &Fr) -> Self {
        let mut lc = Self::zero();
        lc.add_term(ONE, k);
        lc
    }

    fn add_term(&mut self, index: usize, k: &Fr) {
        let coeff = self.terms.entry(index).or_insert_with(Fr::zero);
        *coeff = &*coeff + k;
        if coeff.is_zero() {
            self.terms.remove(&index);
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for (i, k) in &other.terms {
            out.add_term(*i, k);
        }
        out
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(&-Fr::one()))
    }

    pub fn scale(&self, k: &Fr) -> Self {
        if k.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self.terms.iter().map(|(i, c)| (*i, c * k)).collect(),
        }
    }

    /// `Some(k)` when the combination only involves the constant one.
    pub fn as_constant(&self) -> Option<Fr> {
        match self.terms.len() {
            0 => Some(Fr::zero()),
            1 => self.terms.get(&ONE).cloned(),
            _ => None,
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (usize, &Fr)> {
        self.terms.iter().map(|(i, k)| (*i, k))
    }

    pub fn evaluate(&self, values: &[Fr]) -> Option<Fr> {
        let mut acc = Fr::zero();
        for (i, k) in &self.terms {
            acc = acc + &(values.get(*i)? * k);
        }
        Some(acc)
    }

    fn evaluate_partial(&self, values: &[Option<Fr>]) -> Option<Fr> {
        let mut acc = Fr::zero();
        for (i, k) in &self.terms {
            let v = values.get(*i)?.as_ref()?;
            acc = acc + &(v * k);
        }
        Some(acc)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.terms.len() as u64).to_le_bytes());
        for (i, k) in &self.terms {
            out.extend_from_slice(&(*i as u64).to_le_bytes());
            out.extend_from_slice(&k.to_bytes_be());
        }
    }
}

/// `a * b = c`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub a: LinearCombination,
    pub b: LinearCombination,
    pub c: LinearCombination,
}

impl Constraint {
    pub fn is_satisfied(&self, values: &[Fr]) -> bool {
        match (
            self.a.evaluate(values),
            self.b.evaluate(values),
            self.c.evaluate(values),
        ) {
            (Some(a), Some(b), Some(c)) => a * b == c,
            _ => false,
        }
    }
}

/// Full assignment; index 0 holds the constant one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness {
    values: Vec<Fr>,
}

impl Witness {
    pub fn new(values: Vec<Fr>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Fr] {
        &self.values
    }

    /// Public slots in allocation order.
    pub fn public_values(&self, cs: &ConstraintSystem) -> Vec<Fr> {
        cs.public
            .iter()
            .filter_map(|(_, i)| self.values.get(*i).cloned())
            .collect()
    }

    /// Overwrite the public slots with verifier-supplied values.
    pub fn with_public(&self, cs: &ConstraintSystem, public: &[Fr]) -> Option<Witness> {
        if public.len() != cs.public.len() || self.values.len() != cs.num_variables {
            return None;
        }
        let mut values = self.values.clone();
        for ((_, i), v) in cs.public.iter().zip(public) {
            values[*i] = v.clone();
        }
        Some(Witness { values })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintSystem {
    num_variables: usize,
    public: Vec<(String, usize)>,
    secret: Vec<(String, usize)>,
    constraints: Vec<Constraint>,
}

impl ConstraintSystem {
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn public_inputs(&self) -> &[(String, usize)] {
        &self.public
    }

    pub fn secret_inputs(&self) -> &[(String, usize)] {
        &self.secret
    }

    /// BLAKE3 digest over the canonical encoding of the system's shape.
    pub fn digest(&self) -> [u8; 32] {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(self.num_variables as u64).to_le_bytes());
        for (name, i) in self.public.iter().chain(self.secret.iter()) {
            buf.extend_from_slice(&(name.len() as u64).to_le_bytes());
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(&(*i as u64).to_le_bytes());
        }
        buf.extend_from_slice(&(self.constraints.len() as u64).to_le_bytes());
        for c in &self.constraints {
            c.a.encode(&mut buf);
            c.b.encode(&mut buf);
            c.c.encode(&mut buf);
        }
        hash_labeled::<Blake3>("IRISID.CS", &buf)
    }

    /// Index of the first unsatisfied constraint, if any.
    pub fn check(&self, witness: &Witness) -> Result<(), usize> {
        let values = witness.values();
        if values.len() != self.num_variables || values.first().map(Fr::is_one) != Some(true) {
            return Err(0);
        }
        match self.constraints.iter().position(|c| !c.is_satisfied(values)) {
            Some(i) => Err(i),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct CircuitBuilder {
    values: Vec<Option<Fr>>,
    public: Vec<(String, usize)>,
    secret: Vec<(String, usize)>,
    constraints: Vec<Constraint>,
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self {
            values: vec![Some(Fr::one())],
            public: Vec::new(),
            secret: Vec::new(),
            constraints: Vec::new(),
        }
    }
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the constraint system and, if every value is known, the witness.
    pub fn synthesize<C: Circuit>(
        circuit: &C,
    ) -> Result<(ConstraintSystem, Option<Witness>), CircuitError> {
        let mut b = Self::new();
        circuit.define(&mut b)?;
        Ok(b.finish())
    }

    pub fn finish(self) -> (ConstraintSystem, Option<Witness>) {
        let witness = self
            .values
            .iter()
            .cloned()
            .collect::<Option<Vec<_>>>()
            .map(Witness::new);
        let cs = ConstraintSystem {
            num_variables: self.values.len(),
            public: self.public,
            secret: self.secret,
            constraints: self.constraints,
        };
        (cs, witness)
    }

    fn alloc(&mut self, value: Option<Fr>) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    fn value_of(&self, lc: &LinearCombination) -> Option<Fr> {
        lc.evaluate_partial(&self.values)
    }

    fn enforce(
        &mut self,
        a: &LinearCombination,
        b: &LinearCombination,
        c: &LinearCombination,
        kind: Option<&CircuitError>,
    ) {
        if let (Some(va), Some(vb), Some(vc)) = (self.value_of(a), self.value_of(b), self.value_of(c))
        {
            if va * vb != vc {
                let kind = kind.map(ToString::to_string).unwrap_or_default();
                tracing::debug!(
                    constraint = self.constraints.len(),
                    kind = %kind,
                    "relation violated during synthesis"
                );
            }
        }
        self.constraints.push(Constraint {
            a: a.clone(),
            b: b.clone(),
            c: c.clone(),
        });
    }
}

impl Api for CircuitBuilder {
    type Var = LinearCombination;

    fn public_input(
        &mut self,
        name: &str,
        value: Option<&Fr>,
    ) -> Result<LinearCombination, CircuitError> {
        let i = self.alloc(value.cloned());
        self.public.push((name.to_string(), i));
        Ok(LinearCombination::var(i))
    }

    fn secret_input(
        &mut self,
        name: &str,
        value: Option<&Fr>,
    ) -> Result<LinearCombination, CircuitError> {
        let i = self.alloc(value.cloned());
        self.secret.push((name.to_string(), i));
        Ok(LinearCombination::var(i))
    }

    fn constant(&mut self, value: &Fr) -> LinearCombination {
        LinearCombination::constant(value)
    }

    fn add(&mut self, a: &LinearCombination, b: &LinearCombination) -> LinearCombination {
        a.add(b)
    }

    fn sub(&mut self, a: &LinearCombination, b: &LinearCombination) -> LinearCombination {
        a.sub(b)
    }

    fn scale(&mut self, a: &LinearCombination, k: &Fr) -> LinearCombination {
        a.scale(k)
    }

    fn mul(&mut self, a: &LinearCombination, b: &LinearCombination) -> LinearCombination {
        if let Some(k) = a.as_constant() {
            return b.scale(&k);
        }
        if let Some(k) = b.as_constant() {
            return a.scale(&k);
        }
        let value = match (self.value_of(a), self.value_of(b)) {
            (Some(x), Some(y)) => Some(x * y),
            _ => None,
        };
        let out = LinearCombination::var(self.alloc(value));
        self.enforce(a, b, &out, None);
        out
    }

    fn assert_product(
        &mut self,
        a: &LinearCombination,
        b: &LinearCombination,
        c: &LinearCombination,
        on_fail: CircuitError,
    ) -> Result<(), CircuitError> {
        self.enforce(a, b, c, Some(&on_fail));
        Ok(())
    }

    fn assert_equal(
        &mut self,
        a: &LinearCombination,
        b: &LinearCombination,
        on_fail: CircuitError,
    ) -> Result<(), CircuitError> {
        let one = LinearCombination::var(ONE);
        self.enforce(a, &one, b, Some(&on_fail));
        Ok(())
    }

    fn hint(
        &mut self,
        inputs: &[LinearCombination],
        outputs: usize,
        f: HintFn<'_>,
    ) -> Result<Vec<LinearCombination>, CircuitError> {
        let known = inputs
            .iter()
            .map(|lc| self.value_of(lc))
            .collect::<Option<Vec<_>>>();
        let computed = match known {
            Some(vals) => match f(&vals) {
                Ok(out) if out.len() == outputs => Some(out),
                Ok(_) => {
                    tracing::debug!("hint returned wrong arity");
                    None
                }
                Err(e) => {
                    tracing::debug!(error = %e, "hint failed during synthesis");
                    None
                }
            },
            None => None,
        };
        Ok((0..outputs)
            .map(|k| {
                let v = computed.as_ref().map(|vals| vals[k].clone());
                LinearCombination::var(self.alloc(v))
            })
            .collect())
    }
}
