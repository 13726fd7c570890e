//! BN254 scalar field and host-side bridging to big integers.
//! Elements are kept as canonical `BigUint` residues in [0, p).

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Bit length of the modulus.
pub const FIELD_BITS: usize = 254;

static MODULUS: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(
        b"30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001",
        16,
    )
    .unwrap_or_default()
});

static HALF_MODULUS: Lazy<BigUint> = Lazy::new(|| (modulus() - 1u32) >> 1);

/// Prime modulus p of the BN254 scalar field.
pub fn modulus() -> &'static BigUint {
    &MODULUS
}

/// Reduce arbitrary big-endian bytes to a field element in [0, p).
pub fn reduce_bytes_be(bytes: &[u8]) -> Fr {
    Fr::from_biguint(BigUint::from_bytes_be(bytes))
}

/// Element of the BN254 scalar field.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Fr(BigUint);

impl Fr {
    pub fn zero() -> Self {
        Fr(BigUint::zero())
    }

    pub fn one() -> Self {
        Fr(BigUint::one())
    }

    pub fn from_u64(v: u64) -> Self {
        Fr::from_biguint(BigUint::from(v))
    }

    pub fn from_i64(v: i64) -> Self {
        Fr::from_bigint(&BigInt::from(v))
    }

    pub fn from_biguint(v: BigUint) -> Self {
        Fr(v % modulus())
    }

    /// Map a signed integer to its residue class.
    pub fn from_bigint(v: &BigInt) -> Self {
        let p = BigInt::from_biguint(Sign::Plus, modulus().clone());
        let r = ((v % &p) + &p) % &p;
        Fr(r.magnitude().clone())
    }

    pub fn to_biguint(&self) -> BigUint {
        self.0.clone()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Centered lift: the representative in [-(p-1)/2, (p-1)/2].
    pub fn lift(&self) -> BigInt {
        if self.0 <= *HALF_MODULUS {
            BigInt::from_biguint(Sign::Plus, self.0.clone())
        } else {
            BigInt::from_biguint(Sign::Plus, self.0.clone())
                - BigInt::from_biguint(Sign::Plus, modulus().clone())
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn pow(&self, exp: u64) -> Fr {
        Fr(self.0.modpow(&BigUint::from(exp), modulus()))
    }

    /// Multiplicative inverse via Fermat; `None` for zero.
    pub fn inverse(&self) -> Option<Fr> {
        if self.is_zero() {
            return None;
        }
        let exp = modulus() - 2u32;
        Some(Fr(self.0.modpow(&exp, modulus())))
    }

    /// Bit `i` of the canonical residue (little-endian numbering).
    pub fn bit(&self, i: usize) -> bool {
        self.0.bit(i as u64)
    }

    /// Canonical 32-byte big-endian encoding.
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// Decode a canonical 32-byte big-endian encoding; rejects values >= p.
    pub fn from_bytes_be_canonical(bytes: &[u8; 32]) -> Option<Fr> {
        let v = BigUint::from_bytes_be(bytes);
        if v < *modulus() {
            Some(Fr(v))
        } else {
            None
        }
    }
}

impl From<u64> for Fr {
    fn from(v: u64) -> Self {
        Fr::from_u64(v)
    }
}

impl fmt::Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrError(String);

impl fmt::Display for ParseFrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid field element '{}'", self.0)
    }
}

impl std::error::Error for ParseFrError {}

/// Signed decimal, or `0x`-prefixed hex; reduced mod p.
impl FromStr for Fr {
    type Err = ParseFrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let parsed = match t.strip_prefix("0x") {
            Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16).map(Fr::from_biguint),
            None => BigInt::parse_bytes(t.as_bytes(), 10).map(|v| Fr::from_bigint(&v)),
        };
        parsed.ok_or_else(|| ParseFrError(s.to_string()))
    }
}

impl Serialize for Fr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl fmt::Debug for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fr({})", self.lift())
    }
}

impl Add<&Fr> for &Fr {
    type Output = Fr;
    fn add(self, rhs: &Fr) -> Fr {
        let mut s = &self.0 + &rhs.0;
        if s >= *modulus() {
            s -= modulus();
        }
        Fr(s)
    }
}

impl Sub<&Fr> for &Fr {
    type Output = Fr;
    fn sub(self, rhs: &Fr) -> Fr {
        if self.0 >= rhs.0 {
            Fr(&self.0 - &rhs.0)
        } else {
            Fr(modulus() - (&rhs.0 - &self.0))
        }
    }
}

impl Mul<&Fr> for &Fr {
    type Output = Fr;
    fn mul(self, rhs: &Fr) -> Fr {
        Fr((&self.0 * &rhs.0) % modulus())
    }
}

impl Neg for &Fr {
    type Output = Fr;
    fn neg(self) -> Fr {
        if self.is_zero() {
            Fr::zero()
        } else {
            Fr(modulus() - &self.0)
        }
    }
}

macro_rules! forward_owned {
    ($tr:ident, $m:ident) => {
        impl $tr<Fr> for Fr {
            type Output = Fr;
            fn $m(self, rhs: Fr) -> Fr {
                (&self).$m(&rhs)
            }
        }
        impl $tr<&Fr> for Fr {
            type Output = Fr;
            fn $m(self, rhs: &Fr) -> Fr {
                (&self).$m(rhs)
            }
        }
    };
}

forward_owned!(Add, add);
forward_owned!(Sub, sub);
forward_owned!(Mul, mul);

impl Neg for Fr {
    type Output = Fr;
    fn neg(self) -> Fr {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulus_is_bn254_scalar() {
        let p = modulus();
        assert_eq!(p.bits(), FIELD_BITS as u64);
        assert_eq!(
            p.to_string(),
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
        );
    }

    #[test]
    fn reduce_basic() {
        assert_eq!(reduce_bytes_be(&[0u8; 1]), Fr::zero());
        let ones = reduce_bytes_be(&[0xffu8; 64]);
        assert!(ones.as_biguint() < modulus());
    }

    #[test]
    fn lift_is_centered() {
        assert_eq!(Fr::from_i64(-5).lift(), BigInt::from(-5));
        assert_eq!(Fr::from_u64(7).lift(), BigInt::from(7));
        let half = Fr::from_biguint(HALF_MODULUS.clone());
        assert!(half.lift() > BigInt::zero());
        assert!((half + Fr::one()).lift() < BigInt::zero());
    }

    #[test]
    fn inverse_roundtrip() {
        let a = Fr::from_u64(72);
        let inv = a.inverse().unwrap();
        assert!((a * inv).is_one());
        assert!(Fr::zero().inverse().is_none());
    }

    #[test]
    fn bytes_roundtrip_rejects_noncanonical() {
        let a = Fr::from_i64(-1);
        assert_eq!(Fr::from_bytes_be_canonical(&a.to_bytes_be()), Some(a));
        assert!(Fr::from_bytes_be_canonical(&[0xff; 32]).is_none());
    }

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!("42".parse::<Fr>().unwrap(), Fr::from_u64(42));
        assert_eq!("-1".parse::<Fr>().unwrap(), Fr::from_i64(-1));
        assert_eq!("0xff".parse::<Fr>().unwrap(), Fr::from_u64(255));
        assert!("4x2".parse::<Fr>().is_err());
    }
}
