//! Constraint API shared by every gadget.
//!
//! Gadgets are written once against [`Api`] and run on two faces:
//! - [`Evaluator`]: plain field arithmetic; a failed assertion returns the
//!   precise [`CircuitError`] kind.
//! - [`CircuitBuilder`]: records rank-1 constraints `a * b = c` and, when
//!   input values are supplied, the matching witness.
//!
//! Gadget control flow never depends on witness values, so both faces walk
//! the same path and the builder yields the same shape with or without
//! values.

pub mod builder;
pub mod eval;

use std::fmt;

use crate::crypto::field::Fr;
use crate::errors::{ArithError, CircuitError};

pub use builder::{CircuitBuilder, Constraint, ConstraintSystem, LinearCombination, Witness};
pub use eval::Evaluator;

/// Out-of-circuit computation that proposes witness values.
pub type HintFn<'a> = &'a dyn Fn(&[Fr]) -> Result<Vec<Fr>, ArithError>;

pub trait Api {
    type Var: Clone + fmt::Debug;

    fn public_input(&mut self, name: &str, value: Option<&Fr>)
        -> Result<Self::Var, CircuitError>;
    fn secret_input(&mut self, name: &str, value: Option<&Fr>)
        -> Result<Self::Var, CircuitError>;

    fn constant(&mut self, value: &Fr) -> Self::Var;
    fn add(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;
    fn sub(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;
    fn scale(&mut self, a: &Self::Var, k: &Fr) -> Self::Var;
    fn mul(&mut self, a: &Self::Var, b: &Self::Var) -> Self::Var;

    /// Assert `a * b = c`.
    fn assert_product(
        &mut self,
        a: &Self::Var,
        b: &Self::Var,
        c: &Self::Var,
        on_fail: CircuitError,
    ) -> Result<(), CircuitError>;

    fn assert_equal(
        &mut self,
        a: &Self::Var,
        b: &Self::Var,
        on_fail: CircuitError,
    ) -> Result<(), CircuitError>;

    /// Allocate `outputs` unconstrained variables computed by `f` from the
    /// values of `inputs`. Callers must constrain them.
    fn hint(
        &mut self,
        inputs: &[Self::Var],
        outputs: usize,
        f: HintFn<'_>,
    ) -> Result<Vec<Self::Var>, CircuitError>;

    fn one(&mut self) -> Self::Var {
        self.constant(&Fr::one())
    }

    fn zero(&mut self) -> Self::Var {
        self.constant(&Fr::zero())
    }

    fn neg(&mut self, a: &Self::Var) -> Self::Var {
        self.scale(a, &-Fr::one())
    }

    fn add_constant(&mut self, a: &Self::Var, k: &Fr) -> Self::Var {
        let k = self.constant(k);
        self.add(a, &k)
    }

    /// Sum of a non-empty or empty list; the empty sum is zero.
    fn sum(&mut self, terms: &[Self::Var]) -> Self::Var {
        let mut acc = self.zero();
        for t in terms {
            acc = self.add(&acc, t);
        }
        acc
    }
}

/// A relation that can be compiled, witnessed, and evaluated.
pub trait Circuit {
    fn define<A: Api>(&self, api: &mut A) -> Result<(), CircuitError>;
}
