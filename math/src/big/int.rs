use std::cmp::Ordering;

use crate::big::uint::BigUint;
use crate::integer::Integer;
use crate::number::{One, Zero};

/// Arbitrary-precision signed integer, as produced by decoding an ASN.1
/// INTEGER: stored as a sign flag plus a magnitude `BigUint`.
#[derive(Clone)]
pub struct BigInt {
    negative: bool,
    magnitude: BigUint,
}

impl BigInt {
    pub fn from_be_bytes(data: &[u8]) -> Self {
        if data.is_empty() {
            return Self::zero();
        }

        let negative = (data[0] & 0x80) != 0;
        if !negative {
            return Self {
                negative: false,
                magnitude: BigUint::from_be_bytes(data),
            };
        }

        // Two's complement: invert and add one to get the magnitude.
        let mut inverted = data.to_vec();
        for b in inverted.iter_mut() {
            *b = !*b;
        }
        let magnitude = BigUint::from_be_bytes(&inverted).add(&BigUint::one());
        Self {
            negative: true,
            magnitude,
        }
    }

    /// Minimal-length two's complement big-endian encoding, matching how
    /// ASN.1 INTEGER values are serialized.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        if self.is_zero() {
            return vec![0];
        }

        if !self.negative {
            let mut bytes = self.magnitude.to_be_bytes();
            if bytes[0] & 0x80 != 0 {
                bytes.insert(0, 0);
            }
            return bytes;
        }

        let one = BigUint::one();
        let mag_minus_one = self.magnitude.sub(&one);
        let mut bytes = mag_minus_one.to_be_bytes();
        for b in bytes.iter_mut() {
            *b = !*b;
        }
        if bytes[0] & 0x80 == 0 {
            bytes.insert(0, 0xff);
        }
        bytes
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.magnitude.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.magnitude.is_zero()
    }

    pub fn nbits(&self) -> usize {
        self.magnitude.nbits()
    }

    /// Fails (returns `None`) if this value is negative: most of the
    /// PKIX-level consumers of `BigInt` (moduli, exponents, coordinates)
    /// reject negative values rather than silently taking the magnitude.
    pub fn to_uint(&self) -> Option<BigUint> {
        if self.negative && !self.magnitude.is_zero() {
            None
        } else {
            Some(self.magnitude.clone())
        }
    }

    pub fn magnitude(&self) -> &BigUint {
        &self.magnitude
    }

    pub fn add(&self, rhs: &Self) -> Self {
        if self.negative == rhs.negative {
            return Self {
                negative: self.negative,
                magnitude: &self.magnitude + &rhs.magnitude,
            };
        }

        if self.magnitude >= rhs.magnitude {
            Self {
                negative: self.negative,
                magnitude: &self.magnitude - &rhs.magnitude,
            }
        } else {
            Self {
                negative: rhs.negative,
                magnitude: &rhs.magnitude - &self.magnitude,
            }
        }
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.neg())
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        let magnitude = &self.magnitude * &rhs.magnitude;
        Self {
            negative: (self.negative != rhs.negative) && !magnitude.is_zero(),
            magnitude,
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            negative: !self.negative,
            magnitude: self.magnitude.clone(),
        }
    }
}

auto_ops::impl_op_ex!(+ |lhs: &BigInt, rhs: &BigInt| -> BigInt { BigInt::add(lhs, rhs) });
auto_ops::impl_op_ex!(-|lhs: &BigInt, rhs: &BigInt| -> BigInt { BigInt::sub(lhs, rhs) });
auto_ops::impl_op_ex!(*|lhs: &BigInt, rhs: &BigInt| -> BigInt { BigInt::mul(lhs, rhs) });
auto_ops::impl_op_ex!(-|v: &BigInt| -> BigInt { BigInt::neg(v) });

impl Zero for BigInt {
    fn zero() -> Self {
        Self {
            negative: false,
            magnitude: BigUint::zero(),
        }
    }

    fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }
}

impl One for BigInt {
    fn one() -> Self {
        Self {
            negative: false,
            magnitude: BigUint::one(),
        }
    }

    fn is_one(&self) -> bool {
        !self.negative && self.magnitude.is_one()
    }
}

impl From<BigUint> for BigInt {
    fn from(magnitude: BigUint) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }
}

impl From<i64> for BigInt {
    fn from(v: i64) -> Self {
        if v < 0 {
            Self {
                negative: true,
                magnitude: BigUint::from_u64((-v) as u64),
            }
        } else {
            Self {
                negative: false,
                magnitude: BigUint::from_u64(v as u64),
            }
        }
    }
}

impl std::fmt::Display for BigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negative && !self.magnitude.is_zero() {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

impl std::fmt::Debug for BigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BigInt({})", self)
    }
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.is_zero() && other.is_zero()
            || (self.negative == other.negative && self.magnitude == other.magnitude)
    }
}
impl Eq for BigInt {}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.magnitude.cmp(&other.magnitude),
            (true, true) => other.magnitude.cmp(&self.magnitude),
        }
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_negative_two_complement() {
        // -1 encodes as 0xff in two's complement.
        let v = BigInt::from_be_bytes(&[0xff]);
        assert!(v.is_negative());
        assert_eq!(v.to_string(), "-1");
    }

    #[test]
    fn roundtrips_through_bytes() {
        for v in [-200i64, -1, 0, 1, 127, 128, 60000] {
            let n = BigInt::from(v);
            let bytes = n.to_be_bytes();
            let back = BigInt::from_be_bytes(&bytes);
            assert_eq!(n, back, "roundtrip failed for {}", v);
        }
    }

    #[test]
    fn negative_values_reject_to_uint() {
        let v = BigInt::from(-5);
        assert!(v.to_uint().is_none());
        assert!(BigInt::from(5).to_uint().is_some());
    }

    #[test]
    fn ordering_accounts_for_sign() {
        assert!(BigInt::from(-5) < BigInt::from(3));
        assert!(BigInt::from(-5) < BigInt::from(-3));
    }
}
