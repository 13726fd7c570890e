//! Branch-free selection by a runtime index.

use crate::circuit::Api;
use crate::crypto::field::Fr;
use crate::errors::CircuitError;
use crate::gadgets::bits::is_zero;

/// Indicators `e_j = [index == j]` for `j < n`, with `sum e_j = 1` asserted.
pub fn one_hot<A: Api>(
    api: &mut A,
    index: &A::Var,
    n: usize,
    on_fail: CircuitError,
) -> Result<Vec<A::Var>, CircuitError> {
    let mut indicators = Vec::with_capacity(n);
    for j in 0..n {
        let offset = api.add_constant(index, &-Fr::from_u64(j as u64));
        indicators.push(is_zero(api, &offset, on_fail.clone())?);
    }
    let total = api.sum(&indicators);
    let one = api.one();
    api.assert_equal(&total, &one, on_fail)?;
    Ok(indicators)
}

/// `sum e_j * v_j`
pub fn select<A: Api>(api: &mut A, indicators: &[A::Var], values: &[A::Var]) -> A::Var {
    let terms: Vec<A::Var> = indicators
        .iter()
        .zip(values)
        .map(|(e, v)| api.mul(e, v))
        .collect();
    api.sum(&terms)
}
