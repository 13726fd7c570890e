//! RangeReducer: reduce any field element, read as its canonical unsigned
//! integer, into `[0, max)` for a bound fixed at circuit-construction time.
//!
//! The value is decomposed canonically into 254 bits, regrouped into four
//! 64-bit limbs and folded with the weights `2^(64k) mod max`. The folded
//! value is congruent to the input modulo `max` and stays below `2^98`, so
//! the fraction modulus gadget reduces it within its supported magnitude.
//! The bound itself is then asserted separately (`index` and
//! `max - 1 - index` both fit in `bitlen(max - 1)` bits) so a wrapped
//! remainder cannot slip through.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::circuit::Api;
use crate::crypto::field::{Fr, FIELD_BITS};
use crate::errors::{ArithError, CircuitError};
use crate::fraction::FieldFraction;
use crate::gadgets::bits::{assert_bit_length, from_binary, to_binary_canonical};
use crate::gadgets::fraction::FractionVar;

/// Largest supported bound.
pub const MAX_BOUND: u64 = 1 << 32;

pub const LIMB_BITS: usize = 64;

pub fn validate_bound(max: u64) -> Result<(), CircuitError> {
    if max == 0 || max > MAX_BOUND {
        return Err(CircuitError::InvalidBound(format!(
            "max {max} outside [1, {MAX_BOUND}]"
        )));
    }
    Ok(())
}

fn bound_width(max: u64) -> usize {
    (u64::BITS - (max - 1).leading_zeros()) as usize
}

fn limb_weight(k: usize, max: u64) -> Fr {
    let w = (BigUint::from(1u8) << (LIMB_BITS * k)) % BigUint::from(max);
    Fr::from_biguint(w)
}

fn fold_limbs<A: Api>(api: &mut A, bits: &[A::Var], max: u64) -> A::Var {
    let mut acc = api.zero();
    for (k, chunk) in bits.chunks(LIMB_BITS).enumerate() {
        let limb = from_binary(api, chunk);
        let term = api.scale(&limb, &limb_weight(k, max));
        acc = api.add(&acc, &term);
    }
    acc
}

/// Assert `0 <= index < max`.
pub fn assert_index_bound<A: Api>(
    api: &mut A,
    index: &A::Var,
    max: u64,
) -> Result<(), CircuitError> {
    validate_bound(max)?;
    let width = bound_width(max);
    assert_bit_length(api, index, width, CircuitError::BoundViolation)?;
    let top = api.constant(&Fr::from_u64(max - 1));
    let headroom = api.sub(&top, index);
    assert_bit_length(api, &headroom, width, CircuitError::BoundViolation)
}

/// `v mod max` as an index in `[0, max)`, with `v` read as an unsigned
/// integer in `[0, p)`.
pub fn reduce<A: Api>(api: &mut A, v: &A::Var, max: u64) -> Result<A::Var, CircuitError> {
    validate_bound(max)?;
    let bits = to_binary_canonical(api, v, CircuitError::BitDecompositionMismatch)?;
    debug_assert_eq!(bits.len(), FIELD_BITS);
    let folded = fold_limbs(api, &bits, max);

    let x = FractionVar::integer(api, &folded);
    let y = FractionVar::constant(api, &FieldFraction::from_field(Fr::from_u64(max)));
    let remainder = x.modulo(api, &y)?;

    let f = |vals: &[Fr]| -> Result<Vec<Fr>, ArithError> {
        let inv = vals[1].inverse().ok_or(ArithError::DivisionByZero)?;
        Ok(vec![&vals[0] * &inv])
    };
    let index = api
        .hint(&[remainder.num().clone(), remainder.den().clone()], 1, &f)?
        .remove(0);
    api.assert_product(
        &index,
        remainder.den(),
        remainder.num(),
        CircuitError::BoundViolation,
    )?;
    assert_index_bound(api, &index, max)?;
    Ok(index)
}

/// Host counterpart of [`reduce`].
pub fn reduce_value(v: &Fr, max: u64) -> Result<u64, CircuitError> {
    validate_bound(max)?;
    (v.as_biguint() % BigUint::from(max))
        .to_u64()
        .ok_or(CircuitError::BoundViolation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitBuilder, Evaluator, Witness};
    use crate::crypto::field::modulus;

    #[test]
    fn widths_cover_bound() {
        assert_eq!(bound_width(1), 0);
        assert_eq!(bound_width(2), 1);
        assert_eq!(bound_width(72), 7);
        assert_eq!(bound_width(128), 7);
        assert_eq!(bound_width(MAX_BOUND), 32);
    }

    #[test]
    fn limb_weights_reduce_powers_of_two() {
        assert_eq!(limb_weight(0, 72), Fr::one());
        // 2^64 mod 72 = 16
        assert_eq!(limb_weight(1, 72), Fr::from_u64(16));
        assert_eq!(limb_weight(3, 1), Fr::zero());
    }

    #[test]
    fn rejects_degenerate_bounds() {
        assert!(matches!(validate_bound(0), Err(CircuitError::InvalidBound(_))));
        assert!(validate_bound(MAX_BOUND + 1).is_err());
        validate_bound(1).unwrap();
    }

    #[test]
    fn gadget_matches_host() {
        for (v, max) in [(0u64, 72u64), (71, 72), (72, 72), (1_000_003, 72), (5, 1), (u64::MAX, 97)] {
            let mut ev = Evaluator::new();
            let fv = Fr::from_u64(v);
            let idx = reduce(&mut ev, &fv, max).unwrap();
            assert_eq!(idx, Fr::from_u64(v % max));
            assert_eq!(reduce_value(&fv, max).unwrap(), v % max);
        }
    }

    #[test]
    fn full_width_values_reduce_as_unsigned() {
        let p_minus_one = Fr::from_i64(-1);
        let big = Fr::from_biguint(BigUint::from(1u8) << 200);
        for (v, max) in [(p_minus_one, 72u64), (big, 72), (Fr::from_i64(-5), MAX_BOUND)] {
            let expected = (v.as_biguint() % BigUint::from(max)).to_u64().unwrap();
            assert_eq!(reduce_value(&v, max).unwrap(), expected);
            let mut ev = Evaluator::new();
            assert_eq!(reduce(&mut ev, &v, max).unwrap(), Fr::from_u64(expected));
        }
        // (p - 1) mod 72 = 0
        assert_eq!(reduce_value(&Fr::from_i64(-1), 72).unwrap(), 0);
        assert!((modulus() - 1u32) % 72u32 == BigUint::from(0u8));
    }

    #[test]
    fn bound_check_rejects_out_of_range_index() {
        let mut ev = Evaluator::new();
        assert_index_bound(&mut ev, &Fr::from_u64(71), 72).unwrap();
        for bad in [Fr::from_u64(72), Fr::from_u64(71 + 72), Fr::from_i64(-1)] {
            assert_eq!(
                assert_index_bound(&mut ev, &bad, 72),
                Err(CircuitError::BoundViolation)
            );
        }
    }

    /// A wrapped index that still satisfies `index * den = num` is caught
    /// only by the bound decomposition.
    #[test]
    fn wrapped_index_fails_bound_constraints() {
        for wrapped in [Fr::from_u64(7 + 72), Fr::from_i64(-1)] {
            let mut b = CircuitBuilder::new();
            let index = b.secret_input("index", Some(&wrapped)).unwrap();
            let num = b.secret_input("num", Some(&wrapped)).unwrap();
            let den = b.secret_input("den", Some(&Fr::one())).unwrap();
            b.assert_product(&index, &den, &num, CircuitError::BoundViolation)
                .unwrap();
            assert_index_bound(&mut b, &index, 72).unwrap();
            let (cs, w) = b.finish();
            let failed = cs.check(&w.unwrap()).unwrap_err();
            assert!(failed >= 1, "product relation holds; bound must fail");
        }
    }

    #[test]
    fn tampered_reduce_witness_is_unsatisfied() {
        let mut b = CircuitBuilder::new();
        let v = b.secret_input("v", Some(&Fr::from_u64(1_000))).unwrap();
        let idx = reduce(&mut b, &v, 72).unwrap();
        let (cs, w) = b.finish();
        let w = w.unwrap();
        cs.check(&w).unwrap();

        let (slot, _) = idx.terms().next().unwrap();
        let mut values = w.values().to_vec();
        values[slot] = &values[slot] + &Fr::from_u64(72);
        assert!(cs.check(&Witness::new(values)).is_err());
    }
}
