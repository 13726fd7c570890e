//! Gadget face of [`FieldFraction`].
//!
//! Each operation takes its canonical result from the host face as a hint
//! and then asserts the defining relation over the committed parts, so the
//! relation (not the hint) is what a proof attests. Every `FractionVar`
//! produced here has an asserted non-zero denominator.

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::One;

use crate::circuit::Api;
use crate::crypto::field::Fr;
use crate::errors::{ArithError, CircuitError};
use crate::fraction::{floor_parts, simplify, FieldFraction, MAGNITUDE_BITS};
use crate::gadgets::bits::{assert_bit_length, assert_nonzero};

#[derive(Clone, Debug)]
pub struct FractionVar<V> {
    num: V,
    den: V,
}

fn host(vals: &[Fr]) -> Result<FieldFraction, ArithError> {
    FieldFraction::from_parts(vals[0].clone(), vals[1].clone())
}

fn host_pair(vals: &[Fr]) -> Result<(FieldFraction, FieldFraction), ArithError> {
    Ok((host(&vals[..2])?, host(&vals[2..4])?))
}

fn parts(f: FieldFraction) -> Vec<Fr> {
    vec![f.numerator().clone(), f.denominator().clone()]
}

fn magnitude_error() -> CircuitError {
    CircuitError::MagnitudeOutOfRange {
        bits: MAGNITUDE_BITS,
    }
}

fn two_pow(bits: u32) -> Fr {
    Fr::from_biguint(BigUint::one() << bits)
}

impl<V: Clone + std::fmt::Debug> FractionVar<V> {
    pub fn num(&self) -> &V {
        &self.num
    }

    pub fn den(&self) -> &V {
        &self.den
    }

    pub fn constant<A: Api<Var = V>>(api: &mut A, f: &FieldFraction) -> Self {
        Self {
            num: api.constant(f.numerator()),
            den: api.constant(f.denominator()),
        }
    }

    /// `v/1`
    pub fn integer<A: Api<Var = V>>(api: &mut A, v: &V) -> Self {
        Self {
            num: v.clone(),
            den: api.one(),
        }
    }

    pub fn from_parts<A: Api<Var = V>>(api: &mut A, num: &V, den: &V) -> Result<Self, CircuitError> {
        assert_nonzero(api, den, CircuitError::DivisionByZero)?;
        Self {
            num: num.clone(),
            den: den.clone(),
        }
        .simplify(api)
    }

    /// Hint a canonical fraction computed by `f` and assert its denominator
    /// is non-zero.
    fn hinted<A: Api<Var = V>>(
        api: &mut A,
        inputs: &[V],
        f: &dyn Fn(&[Fr]) -> Result<FieldFraction, ArithError>,
    ) -> Result<Self, CircuitError> {
        let g = |vals: &[Fr]| -> Result<Vec<Fr>, ArithError> { f(vals).map(parts) };
        let mut out = api.hint(inputs, 2, &g)?;
        let den = out.remove(1);
        let num = out.remove(0);
        assert_nonzero(api, &den, CircuitError::DivisionByZero)?;
        Ok(Self { num, den })
    }

    /// Canonical representative of the same value: `n'*d = n*d'`.
    pub fn simplify<A: Api<Var = V>>(&self, api: &mut A) -> Result<Self, CircuitError> {
        let f = |vals: &[Fr]| -> Result<FieldFraction, ArithError> {
            let (n, d) = simplify(&vals[0], &vals[1])?;
            FieldFraction::from_parts(n, d)
        };
        let s = Self::hinted(api, &[self.num.clone(), self.den.clone()], &f)?;
        let lhs = api.mul(&s.num, &self.den);
        api.assert_product(
            &self.num,
            &s.den,
            &lhs,
            CircuitError::RelationViolated("simplify"),
        )?;
        Ok(s)
    }

    pub fn neg<A: Api<Var = V>>(&self, api: &mut A) -> Self {
        Self {
            num: api.neg(&self.num),
            den: self.den.clone(),
        }
    }

    fn inputs(&self, other: &Self) -> [V; 4] {
        [
            self.num.clone(),
            self.den.clone(),
            other.num.clone(),
            other.den.clone(),
        ]
    }

    /// `s.n * (a.d * b.d) = (a.n * b.d + b.n * a.d) * s.d`
    pub fn add<A: Api<Var = V>>(&self, api: &mut A, other: &Self) -> Result<Self, CircuitError> {
        let f = |vals: &[Fr]| -> Result<FieldFraction, ArithError> {
            let (a, b) = host_pair(vals)?;
            a.add(&b)
        };
        let s = Self::hinted(api, &self.inputs(other), &f)?;
        let dd = api.mul(&self.den, &other.den);
        let left = api.mul(&self.num, &other.den);
        let right = api.mul(&other.num, &self.den);
        let cross = api.add(&left, &right);
        let lhs = api.mul(&s.num, &dd);
        api.assert_product(&cross, &s.den, &lhs, CircuitError::RelationViolated("add"))?;
        Ok(s)
    }

    pub fn sub<A: Api<Var = V>>(&self, api: &mut A, other: &Self) -> Result<Self, CircuitError> {
        let negated = other.neg(api);
        self.add(api, &negated)
    }

    /// `s.n * (a.d * b.d) = (a.n * b.n) * s.d`
    pub fn mul<A: Api<Var = V>>(&self, api: &mut A, other: &Self) -> Result<Self, CircuitError> {
        let f = |vals: &[Fr]| -> Result<FieldFraction, ArithError> {
            let (a, b) = host_pair(vals)?;
            a.mul(&b)
        };
        let s = Self::hinted(api, &self.inputs(other), &f)?;
        let dd = api.mul(&self.den, &other.den);
        let nn = api.mul(&self.num, &other.num);
        let lhs = api.mul(&s.num, &dd);
        api.assert_product(&nn, &s.den, &lhs, CircuitError::RelationViolated("mul"))?;
        Ok(s)
    }

    /// Asserts `r * y = x` rather than computing a quotient.
    pub fn div<A: Api<Var = V>>(&self, api: &mut A, y: &Self) -> Result<Self, CircuitError> {
        assert_nonzero(api, &y.num, CircuitError::DivisionByZero)?;
        let f = |vals: &[Fr]| -> Result<FieldFraction, ArithError> {
            let (x, y) = host_pair(vals)?;
            x.div(&y)
        };
        let r = Self::hinted(api, &self.inputs(y), &f)?;
        // r.n * y.n * x.d = x.n * r.d * y.d
        let ny = api.mul(&r.num, &y.num);
        let dy = api.mul(&r.den, &y.den);
        let rhs = api.mul(&self.num, &dy);
        api.assert_product(&ny, &self.den, &rhs, CircuitError::RelationViolated("div"))?;
        Ok(r)
    }

    /// Numerator in `[-2^B, 2^B)`, denominator in `[1, 2^B]`.
    fn assert_magnitude<A: Api<Var = V>>(&self, api: &mut A) -> Result<(), CircuitError> {
        let bits = MAGNITUDE_BITS as usize;
        let shifted = api.add_constant(&self.num, &two_pow(MAGNITUDE_BITS));
        assert_bit_length(api, &shifted, bits + 1, magnitude_error())?;
        let den_minus_one = api.add_constant(&self.den, &-Fr::one());
        assert_bit_length(api, &den_minus_one, bits, magnitude_error())
    }

    /// Returns a variable holding -1, 0 or 1.
    pub fn compare<A: Api<Var = V>>(&self, api: &mut A, other: &Self) -> Result<V, CircuitError> {
        self.assert_magnitude(api)?;
        other.assert_magnitude(api)?;
        let f = |vals: &[Fr]| -> Result<Vec<Fr>, ArithError> {
            let (a, b) = host_pair(vals)?;
            let sign = match a.compare(&b)? {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            };
            Ok(vec![Fr::from_i64(sign)])
        };
        let s = api.hint(&self.inputs(other), 1, &f)?.remove(0);
        let kind = || CircuitError::RelationViolated("compare");

        // s^3 = s  <=>  s in {-1, 0, 1}
        let s2 = api.mul(&s, &s);
        api.assert_product(&s2, &s, &s, kind())?;

        let left = api.mul(&self.num, &other.den);
        let right = api.mul(&other.num, &self.den);
        let diff = api.sub(&left, &right);

        // s = 0 forces diff = 0
        let one = api.one();
        let not_s2 = api.sub(&one, &s2);
        let zero = api.zero();
        api.assert_product(&diff, &not_s2, &zero, kind())?;

        // s = +-1 forces s*diff >= 1
        let signed = api.mul(&s, &diff);
        let slack = api.sub(&signed, &s2);
        assert_bit_length(api, &slack, 2 * MAGNITUDE_BITS as usize + 1, kind())?;
        Ok(s)
    }

    /// Rounds toward negative infinity; the result has denominator 1.
    /// Asserts `n = q*d + r` with `0 <= r < d`.
    pub fn floor<A: Api<Var = V>>(&self, api: &mut A) -> Result<Self, CircuitError> {
        let f = |vals: &[Fr]| -> Result<Vec<Fr>, ArithError> {
            let (q, r) = floor_parts(&vals[0], &vals[1])?;
            Ok(vec![q, r])
        };
        let mut out = api.hint(&[self.num.clone(), self.den.clone()], 2, &f)?;
        let r = out.remove(1);
        let q = out.remove(0);
        let kind = || CircuitError::RelationViolated("floor");
        let bits = MAGNITUDE_BITS as usize;

        let qd = api.mul(&q, &self.den);
        let recomposed = api.add(&qd, &r);
        api.assert_equal(&recomposed, &self.num, kind())?;

        assert_bit_length(api, &r, bits, kind())?;
        let d_minus_r = api.sub(&self.den, &r);
        let gap = api.add_constant(&d_minus_r, &-Fr::one());
        assert_bit_length(api, &gap, bits, kind())?;

        let shifted = api.add_constant(&q, &two_pow(MAGNITUDE_BITS));
        assert_bit_length(api, &shifted, bits + 1, magnitude_error())?;

        Ok(Self::integer(api, &q))
    }

    /// Euclidean modulus `x - floor(x / |y|) * |y|`, in `[0, |y|)`.
    pub fn modulo<A: Api<Var = V>>(&self, api: &mut A, y: &Self) -> Result<Self, CircuitError> {
        assert_nonzero(api, &y.num, CircuitError::DivisionByZero)?;
        let zero = FractionVar::constant(api, &FieldFraction::zero());
        let sign = y.compare(api, &zero)?;
        let abs_y = Self {
            num: api.mul(&sign, &y.num),
            den: y.den.clone(),
        };
        let q = self.div(api, &abs_y)?.floor(api)?;
        let multiple = q.mul(api, &abs_y)?;
        self.sub(api, &multiple)
    }
}
