//! Canonical rational numbers over the BN254 scalar field (host face).
//!
//! A `FieldFraction` is kept in canonical form: numerator and denominator
//! are coprime once lifted to signed integers, and the denominator is
//! positive. Ordering-sensitive operations (`compare`, `floor`, `modulo`)
//! rely on the centered lift and require lifted numerators in
//! `[-2^MAGNITUDE_BITS, 2^MAGNITUDE_BITS)` and denominators in
//! `[1, 2^MAGNITUDE_BITS]`; anything larger is rejected rather than
//! misordered.
//!
//! Every operation borrows its operands and returns a fresh value.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::crypto::field::{Fr, FIELD_BITS};
use crate::errors::ArithError;

pub const MAGNITUDE_BITS: u32 = 120;

/// Upper bound on fractional digits accepted by `from_decimal`.
pub const MAX_DECIMAL_PLACES: usize = 36;

/// Reduce `n/d` to lowest terms with a positive denominator.
pub fn simplify(n: &Fr, d: &Fr) -> Result<(Fr, Fr), ArithError> {
    let a = n.lift();
    let b = d.lift();
    if a.is_zero() && b.is_zero() {
        return Err(ArithError::SimplifyDegenerate);
    }
    if b.is_zero() {
        return Err(ArithError::DivisionByZero);
    }
    let g = a.gcd(&b);
    let (mut a, mut b) = (a / &g, b / &g);
    if b.is_negative() {
        a = -a;
        b = -b;
    }
    Ok((Fr::from_bigint(&a), Fr::from_bigint(&b)))
}

/// Floor division on raw parts: `(q, r)` with `n = q*d + r`, `0 <= r < d`.
/// Requires a positive denominator within the supported magnitude.
pub fn floor_parts(n: &Fr, d: &Fr) -> Result<(Fr, Fr), ArithError> {
    if d.is_zero() {
        return Err(ArithError::DivisionByZero);
    }
    let (ln, ld) = (n.lift(), d.lift());
    check_numerator(&ln)?;
    check_denominator(&ld)?;
    let (q, r) = ln.div_mod_floor(&ld);
    Ok((Fr::from_bigint(&q), Fr::from_bigint(&r)))
}

fn bound() -> BigInt {
    BigInt::one() << MAGNITUDE_BITS
}

fn check_numerator(v: &BigInt) -> Result<(), ArithError> {
    let b = bound();
    if *v < -&b || *v >= b {
        return Err(ArithError::MagnitudeOutOfRange {
            bits: MAGNITUDE_BITS,
        });
    }
    Ok(())
}

fn check_denominator(v: &BigInt) -> Result<(), ArithError> {
    if !v.is_positive() || *v > bound() {
        return Err(ArithError::MagnitudeOutOfRange {
            bits: MAGNITUDE_BITS,
        });
    }
    Ok(())
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FieldFraction {
    numerator: Fr,
    denominator: Fr,
}

impl FieldFraction {
    pub fn from_parts(numerator: Fr, denominator: Fr) -> Result<Self, ArithError> {
        if denominator.is_zero() {
            return Err(ArithError::DivisionByZero);
        }
        let (numerator, denominator) = simplify(&numerator, &denominator)?;
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn from_integer(v: i64) -> Self {
        Self::from_field(Fr::from_i64(v))
    }

    /// Embed a field element as `v/1`.
    pub fn from_field(v: Fr) -> Self {
        Self {
            numerator: v,
            denominator: Fr::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// Parse a terminating decimal such as `-12.375`.
    ///
    /// Each fractional digit is shifted into the numerator (x10) until the
    /// fractional part is exhausted; more than `MAX_DECIMAL_PLACES` digits,
    /// or anything that is not a plain decimal, is a `PrecisionOverflow`.
    pub fn from_decimal(input: &str) -> Result<Self, ArithError> {
        let overflow = || ArithError::PrecisionOverflow {
            input: input.to_string(),
        };
        let s = input.trim();
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
        let all_digits = |t: &str| t.bytes().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(overflow());
        }

        let mut numerator = if whole.is_empty() {
            BigInt::zero()
        } else {
            whole.parse::<BigInt>().map_err(|_| overflow())?
        };
        let mut denominator = BigInt::one();
        let ten = BigInt::from(10u8);
        for (places, digit) in frac.trim_end_matches('0').bytes().enumerate() {
            if places == MAX_DECIMAL_PLACES {
                return Err(overflow());
            }
            numerator = numerator * &ten + BigInt::from(digit - b'0');
            denominator *= &ten;
        }
        if numerator.bits() as usize >= FIELD_BITS - 1 {
            return Err(overflow());
        }
        if negative {
            numerator = -numerator;
        }
        Self::from_parts(Fr::from_bigint(&numerator), Fr::from_bigint(&denominator))
    }

    /// Shortest round-trip decimal rendering of `v`, then `from_decimal`.
    pub fn from_f64(v: f64) -> Result<Self, ArithError> {
        if !v.is_finite() {
            return Err(ArithError::PrecisionOverflow {
                input: v.to_string(),
            });
        }
        Self::from_decimal(&format!("{v}"))
    }

    /// Terminating decimal rendering, if the denominator has no prime
    /// factors other than 2 and 5.
    pub fn to_decimal(&self) -> Option<String> {
        let n = self.numerator.lift();
        let mut d = self.denominator.lift();
        let (two, five) = (BigInt::from(2u8), BigInt::from(5u8));
        let (mut twos, mut fives) = (0usize, 0usize);
        while d.is_even() {
            d /= &two;
            twos += 1;
        }
        while (&d % &five).is_zero() {
            d /= &five;
            fives += 1;
        }
        if !d.is_one() {
            return None;
        }
        let places = twos.max(fives);
        let scaled = (n.abs() * num_traits::pow(BigInt::from(10u8), places))
            / self.denominator.lift();
        let digits = scaled.to_string();
        let sign = if n.is_negative() { "-" } else { "" };
        if places == 0 {
            return Some(format!("{sign}{digits}"));
        }
        let padded = format!("{digits:0>width$}", width = places + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - places);
        Some(format!("{sign}{int_part}.{frac_part}"))
    }

    pub fn numerator(&self) -> &Fr {
        &self.numerator
    }

    pub fn denominator(&self) -> &Fr {
        &self.denominator
    }

    pub fn is_integer(&self) -> bool {
        self.denominator.is_one()
    }

    pub fn neg(&self) -> Self {
        Self {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, ArithError> {
        if self.denominator == other.denominator {
            return Self::from_parts(
                &self.numerator + &other.numerator,
                self.denominator.clone(),
            );
        }
        let d1 = self.denominator.lift();
        let d2 = other.denominator.lift();
        let common = d1.lcm(&d2);
        let scale_a = Fr::from_bigint(&(&common / &d1));
        let scale_b = Fr::from_bigint(&(&common / &d2));
        let numerator = &(&scale_a * &self.numerator) + &(&scale_b * &other.numerator);
        Self::from_parts(numerator, Fr::from_bigint(&common))
    }

    pub fn sub(&self, other: &Self) -> Result<Self, ArithError> {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Result<Self, ArithError> {
        Self::from_parts(
            &self.numerator * &other.numerator,
            &self.denominator * &other.denominator,
        )
    }

    pub fn div(&self, other: &Self) -> Result<Self, ArithError> {
        if other.numerator.is_zero() {
            return Err(ArithError::DivisionByZero);
        }
        let reciprocal =
            Self::from_parts(other.denominator.clone(), other.numerator.clone())?;
        self.mul(&reciprocal)
    }

    fn check_magnitude(&self) -> Result<(), ArithError> {
        check_numerator(&self.numerator.lift())?;
        check_denominator(&self.denominator.lift())
    }

    /// Signed comparison through the centered lift.
    pub fn compare(&self, other: &Self) -> Result<Ordering, ArithError> {
        self.check_magnitude()?;
        other.check_magnitude()?;
        let lhs = self.numerator.lift() * other.denominator.lift();
        let rhs = other.numerator.lift() * self.denominator.lift();
        Ok(lhs.cmp(&rhs))
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.lift().sign() == Sign::Minus
    }

    pub fn abs(&self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self.clone()
        }
    }

    /// Greatest integer `<= self`, rounding toward negative infinity; the
    /// result has denominator 1.
    pub fn floor(&self) -> Result<Self, ArithError> {
        let (q, _) = floor_parts(&self.numerator, &self.denominator)?;
        Ok(Self::from_field(q))
    }

    /// Euclidean modulus: `self - floor(self / |y|) * |y|`, always in
    /// `[0, |y|)`.
    pub fn modulo(&self, y: &Self) -> Result<Self, ArithError> {
        if y.numerator.is_zero() {
            return Err(ArithError::DivisionByZero);
        }
        y.check_magnitude()?;
        let abs_y = y.abs();
        let q = self.div(&abs_y)?.floor()?;
        self.sub(&q.mul(&abs_y)?)
    }
}

impl fmt::Display for FieldFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator.lift(), self.denominator.lift())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> FieldFraction {
        FieldFraction::from_parts(Fr::from_i64(n), Fr::from_i64(d)).unwrap()
    }

    #[test]
    fn decimal_quarter() {
        let f = FieldFraction::from_decimal("0.25").unwrap();
        assert_eq!(f.numerator(), &Fr::from_u64(1));
        assert_eq!(f.denominator(), &Fr::from_u64(4));
    }

    #[test]
    fn decimal_with_whole_part_and_sign() {
        assert_eq!(FieldFraction::from_decimal("-12.375").unwrap(), frac(-99, 8));
        assert_eq!(FieldFraction::from_decimal("3").unwrap(), frac(3, 1));
        assert_eq!(FieldFraction::from_decimal(".5").unwrap(), frac(1, 2));
        assert_eq!(FieldFraction::from_decimal("2.500").unwrap(), frac(5, 2));
        assert_eq!(FieldFraction::from_f64(0.1).unwrap(), frac(1, 10));
    }

    #[test]
    fn decimal_rejects_malformed_and_long() {
        for bad in ["", ".", "1.2.3", "abc", "1e5", "--1"] {
            assert!(matches!(
                FieldFraction::from_decimal(bad),
                Err(ArithError::PrecisionOverflow { .. })
            ));
        }
        let long = format!("0.{}", "1".repeat(MAX_DECIMAL_PLACES + 1));
        assert!(matches!(
            FieldFraction::from_decimal(&long),
            Err(ArithError::PrecisionOverflow { .. })
        ));
        assert!(FieldFraction::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn to_decimal_renders_terminating_only() {
        assert_eq!(frac(1, 4).to_decimal().as_deref(), Some("0.25"));
        assert_eq!(frac(-99, 8).to_decimal().as_deref(), Some("-12.375"));
        assert_eq!(frac(7, 1).to_decimal().as_deref(), Some("7"));
        assert_eq!(frac(-1, 20).to_decimal().as_deref(), Some("-0.05"));
        assert_eq!(frac(2, 3).to_decimal(), None);
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert_eq!(
            FieldFraction::from_parts(Fr::one(), Fr::zero()),
            Err(ArithError::DivisionByZero)
        );
        assert_eq!(
            simplify(&Fr::zero(), &Fr::zero()),
            Err(ArithError::SimplifyDegenerate)
        );
    }

    #[test]
    fn canonical_sign_lives_in_numerator() {
        let f = frac(6, -4);
        assert_eq!(f.numerator(), &Fr::from_i64(-3));
        assert_eq!(f.denominator(), &Fr::from_u64(2));
        assert_eq!(frac(0, -7), FieldFraction::zero());
    }

    #[test]
    fn add_with_distinct_denominators() {
        assert_eq!(frac(1, 10).add(&frac(2, 3)).unwrap(), frac(23, 30));
        assert_eq!(frac(1, 6).add(&frac(1, 6)).unwrap(), frac(1, 3));
        assert_eq!(frac(1, 4).add(&frac(1, 6)).unwrap(), frac(5, 12));
    }

    #[test]
    fn div_leaves_divisor_untouched() {
        let x = frac(3, 4);
        let y = frac(2, 5);
        let before = y.clone();
        assert_eq!(x.div(&y).unwrap(), frac(15, 8));
        assert_eq!(y, before);
        assert_eq!(y.div(&y).unwrap(), FieldFraction::one());
        assert_eq!(x.div(&FieldFraction::zero()), Err(ArithError::DivisionByZero));
    }

    #[test]
    fn floor_scenarios() {
        assert_eq!(frac(11, 10).floor().unwrap(), frac(1, 1));
        assert_eq!(frac(1, 10).floor().unwrap(), FieldFraction::zero());
        assert_eq!(frac(-1, 10).floor().unwrap(), frac(-1, 1));
        assert_eq!(frac(-4, 2).floor().unwrap(), frac(-2, 1));
    }

    #[test]
    fn modulo_is_euclidean() {
        assert_eq!(frac(5, 1).modulo(&frac(2, 1)).unwrap(), frac(1, 1));
        assert_eq!(frac(-5, 1).modulo(&frac(2, 1)).unwrap(), frac(1, 1));
        assert_eq!(frac(5, 1).modulo(&frac(-2, 1)).unwrap(), frac(1, 1));
        assert_eq!(frac(7, 2).modulo(&frac(3, 4)).unwrap(), frac(1, 2));
        assert_eq!(
            frac(1, 1).modulo(&FieldFraction::zero()),
            Err(ArithError::DivisionByZero)
        );
    }

    #[test]
    fn compare_orders_signed_values() {
        assert_eq!(frac(-1, 2).compare(&frac(1, 3)).unwrap(), Ordering::Less);
        assert_eq!(frac(2, 4).compare(&frac(1, 2)).unwrap(), Ordering::Equal);
        assert_eq!(frac(5, 3).compare(&frac(3, 2)).unwrap(), Ordering::Greater);
    }

    #[test]
    fn ordering_rejects_out_of_range_magnitudes() {
        let huge = FieldFraction::from_field(Fr::from_biguint(
            num_bigint::BigUint::one() << (MAGNITUDE_BITS + 1),
        ));
        assert_eq!(
            huge.compare(&FieldFraction::one()),
            Err(ArithError::MagnitudeOutOfRange {
                bits: MAGNITUDE_BITS
            })
        );
        assert!(huge.floor().is_err());
        // arithmetic itself is unrestricted
        assert!(huge.add(&FieldFraction::one()).is_ok());
    }

    #[test]
    fn display_uses_signed_lift() {
        assert_eq!(frac(-3, 9).to_string(), "-1/3");
    }
}
