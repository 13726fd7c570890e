//! Bit-level gadgets: booleanity, decomposition with exact recomposition,
//! canonical (unique) decomposition of full field elements, range checks,
//! and zero tests.

use num_bigint::BigUint;
use num_traits::One;

use crate::circuit::Api;
use crate::crypto::field::{modulus, Fr, FIELD_BITS};
use crate::errors::{ArithError, CircuitError};

pub fn assert_boolean<A: Api>(
    api: &mut A,
    b: &A::Var,
    on_fail: CircuitError,
) -> Result<(), CircuitError> {
    api.assert_product(b, b, b, on_fail)
}

/// Little-endian recomposition `sum b_i * 2^i`.
pub fn from_binary<A: Api>(api: &mut A, bits: &[A::Var]) -> A::Var {
    let mut acc = api.zero();
    let mut weight = Fr::one();
    let two = Fr::from_u64(2);
    for b in bits {
        let term = api.scale(b, &weight);
        acc = api.add(&acc, &term);
        weight = weight * &two;
    }
    acc
}

/// Decompose `v` into `n` little-endian bits and assert the bits recompose
/// to exactly `v`. For `n < FIELD_BITS` this also proves `v < 2^n`.
pub fn to_binary<A: Api>(
    api: &mut A,
    v: &A::Var,
    n: usize,
    on_fail: CircuitError,
) -> Result<Vec<A::Var>, CircuitError> {
    let f = move |vals: &[Fr]| -> Result<Vec<Fr>, ArithError> {
        Ok((0..n).map(|i| Fr::from_u64(vals[0].bit(i) as u64)).collect())
    };
    let bits = api.hint(std::slice::from_ref(v), n, &f)?;
    for b in &bits {
        assert_boolean(api, b, on_fail.clone())?;
    }
    let recomposed = from_binary(api, &bits);
    api.assert_equal(&recomposed, v, on_fail)?;
    Ok(bits)
}

/// Full-width decomposition that is unique: besides the round trip, the
/// bits must encode an integer no larger than `p - 1`.
pub fn to_binary_canonical<A: Api>(
    api: &mut A,
    v: &A::Var,
    on_fail: CircuitError,
) -> Result<Vec<A::Var>, CircuitError> {
    let bits = to_binary(api, v, FIELD_BITS, on_fail.clone())?;
    let bound: BigUint = modulus() - BigUint::one();
    assert_le_constant(api, &bits, &bound, on_fail)?;
    Ok(bits)
}

/// Assert the little-endian `bits` encode an integer `<= bound`.
///
/// Scans from the most significant bit carrying a flag that is 1 while the
/// prefix still equals the bound's prefix; wherever the bound has a 0 the
/// flagged bit must also be 0.
pub fn assert_le_constant<A: Api>(
    api: &mut A,
    bits: &[A::Var],
    bound: &BigUint,
    on_fail: CircuitError,
) -> Result<(), CircuitError> {
    let mut prefix_equal = api.one();
    let zero = api.zero();
    for (i, b) in bits.iter().enumerate().rev() {
        if bound.bit(i as u64) {
            prefix_equal = api.mul(&prefix_equal, b);
        } else {
            api.assert_product(&prefix_equal, b, &zero, on_fail.clone())?;
        }
    }
    Ok(())
}

/// Assert `0 <= v < 2^n` as an integer.
pub fn assert_bit_length<A: Api>(
    api: &mut A,
    v: &A::Var,
    n: usize,
    on_fail: CircuitError,
) -> Result<(), CircuitError> {
    debug_assert!(n < FIELD_BITS, "range checks must stay below the field width");
    to_binary(api, v, n, on_fail).map(|_| ())
}

/// Multiplicative inverse, asserted as `a * inv = 1`.
pub fn inverse<A: Api>(
    api: &mut A,
    a: &A::Var,
    on_fail: CircuitError,
) -> Result<A::Var, CircuitError> {
    let f = |vals: &[Fr]| -> Result<Vec<Fr>, ArithError> {
        Ok(vec![vals[0].inverse().unwrap_or_else(Fr::zero)])
    };
    let inv = api.hint(std::slice::from_ref(a), 1, &f)?.remove(0);
    let one = api.one();
    api.assert_product(a, &inv, &one, on_fail)?;
    Ok(inv)
}

pub fn assert_nonzero<A: Api>(
    api: &mut A,
    a: &A::Var,
    on_fail: CircuitError,
) -> Result<(), CircuitError> {
    inverse(api, a, on_fail).map(|_| ())
}

/// 1 if `a = 0`, else 0.
pub fn is_zero<A: Api>(
    api: &mut A,
    a: &A::Var,
    on_fail: CircuitError,
) -> Result<A::Var, CircuitError> {
    let f = |vals: &[Fr]| -> Result<Vec<Fr>, ArithError> {
        Ok(vec![vals[0].inverse().unwrap_or_else(Fr::zero)])
    };
    let inv = api.hint(std::slice::from_ref(a), 1, &f)?.remove(0);
    let a_inv = api.mul(a, &inv);
    let one = api.one();
    let out = api.sub(&one, &a_inv);
    let zero = api.zero();
    api.assert_product(a, &out, &zero, on_fail)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitBuilder, Evaluator};

    #[test]
    fn decomposition_roundtrips() {
        let mut ev = Evaluator::new();
        let v = Fr::from_u64(0b1011);
        let bits = to_binary(&mut ev, &v, 4, CircuitError::BitDecompositionMismatch).unwrap();
        assert_eq!(bits, vec![Fr::one(), Fr::one(), Fr::zero(), Fr::one()]);
        assert_eq!(from_binary(&mut ev, &bits), v);
    }

    #[test]
    fn too_narrow_decomposition_fails() {
        let mut ev = Evaluator::new();
        assert_eq!(
            to_binary(
                &mut ev,
                &Fr::from_u64(16),
                4,
                CircuitError::BitDecompositionMismatch
            ),
            Err(CircuitError::BitDecompositionMismatch)
        );
        assert_eq!(
            assert_bit_length(&mut ev, &Fr::from_i64(-1), 64, CircuitError::BoundViolation),
            Err(CircuitError::BoundViolation)
        );
    }

    #[test]
    fn canonical_decomposition_accepts_p_minus_one() {
        let mut ev = Evaluator::new();
        let v = Fr::from_i64(-1);
        to_binary_canonical(&mut ev, &v, CircuitError::BitDecompositionMismatch).unwrap();
    }

    #[test]
    fn le_constant_rejects_larger_values() {
        let mut ev = Evaluator::new();
        let bits: Vec<Fr> = [0u64, 1, 1].iter().map(|b| Fr::from_u64(*b)).collect(); // 6
        assert_le_constant(&mut ev, &bits, &BigUint::from(6u8), CircuitError::BoundViolation)
            .unwrap();
        assert_eq!(
            assert_le_constant(&mut ev, &bits, &BigUint::from(5u8), CircuitError::BoundViolation),
            Err(CircuitError::BoundViolation)
        );
    }

    #[test]
    fn zero_test_and_inverse() {
        let mut ev = Evaluator::new();
        let kind = || CircuitError::SelectionMismatch;
        assert_eq!(is_zero(&mut ev, &Fr::zero(), kind()).unwrap(), Fr::one());
        assert_eq!(is_zero(&mut ev, &Fr::from_u64(5), kind()).unwrap(), Fr::zero());
        assert_eq!(
            inverse(&mut ev, &Fr::zero(), CircuitError::DivisionByZero),
            Err(CircuitError::DivisionByZero)
        );
    }

    #[test]
    fn builder_range_check_is_unsatisfied_for_large_values() {
        let mut b = CircuitBuilder::new();
        let v = b.secret_input("v", Some(&Fr::from_u64(300))).unwrap();
        assert_bit_length(&mut b, &v, 8, CircuitError::BoundViolation).unwrap();
        let (cs, w) = b.finish();
        assert!(cs.check(&w.unwrap()).is_err());
    }
}
