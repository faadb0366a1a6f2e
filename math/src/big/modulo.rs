use crate::big::uint::BigUint;
use crate::gcd::extended_gcd;
use crate::integer::Integer;
use crate::number::{One, Zero};

/// A `mod n` arithmetic namespace. Borrows its modulus so that the RSA/DSA
/// analyzers can run many operations against the same modulus without
/// re-cloning it each time.
pub struct Modulo<'a> {
    n: &'a BigUint,
}

impl<'a> Modulo<'a> {
    pub fn new(n: &'a BigUint) -> Self {
        assert!(!n.is_zero(), "modulus must be non-zero");
        Self { n }
    }

    pub fn rem(&self, v: &BigUint) -> BigUint {
        v.quorem(self.n).1
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.rem(&(a + b))
    }

    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let a = self.rem(a);
        let b = self.rem(b);
        if a >= b {
            a - b
        } else {
            (a + self.n.clone()) - b
        }
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        self.rem(&(a * b))
    }

    pub fn negate(&self, a: &BigUint) -> BigUint {
        self.sub(&BigUint::zero(), a)
    }

    /// Modular exponentiation via square-and-multiply.
    pub fn pow(&self, base: &BigUint, exp: &BigUint) -> BigUint {
        let mut out = BigUint::one();
        let mut b = self.rem(base);

        for i in 0..exp.value_bits() {
            if exp.bit(i) == 1 {
                out = self.mul(&out, &b);
            }
            b = self.mul(&b, &b);
        }

        out
    }

    /// Modular multiplicative inverse via the extended Euclidean algorithm.
    /// Returns `None` when `a` and the modulus are not coprime (no inverse
    /// exists), which every caller must treat as a diagnosable condition
    /// rather than panic.
    pub fn inv(&self, a: &BigUint) -> Option<BigUint> {
        let (g, x, _y) = extended_gcd(&self.rem(a), self.n);
        if !g.is_one() {
            return None;
        }

        Some(if x.is_negative() {
            self.n.clone() - x.magnitude().quorem(self.n).1
        } else {
            x.to_uint().unwrap().quorem(self.n).1
        })
    }

    pub fn div(&self, a: &BigUint, b: &BigUint) -> Option<BigUint> {
        let inv = self.inv(b)?;
        Some(self.mul(a, &inv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modular_pow_matches_naive() {
        let n = BigUint::from_u64(97);
        let m = Modulo::new(&n);
        // 5^3 mod 97 = 125 mod 97 = 28
        assert_eq!(m.pow(&BigUint::from_u64(5), &BigUint::from_u64(3)), BigUint::from_u64(28));
    }

    #[test]
    fn inverse_round_trips() {
        let n = BigUint::from_u64(97);
        let m = Modulo::new(&n);
        let a = BigUint::from_u64(13);
        let inv = m.inv(&a).unwrap();
        assert_eq!(m.mul(&a, &inv), BigUint::one());
    }

    #[test]
    fn inverse_is_none_when_not_coprime() {
        let n = BigUint::from_u64(10);
        let m = Modulo::new(&n);
        // gcd(4, 10) = 2
        assert!(m.inv(&BigUint::from_u64(4)).is_none());
    }

    #[test]
    fn sub_wraps_around_modulus() {
        let n = BigUint::from_u64(10);
        let m = Modulo::new(&n);
        assert_eq!(m.sub(&BigUint::from_u64(2), &BigUint::from_u64(5)), BigUint::from_u64(7));
    }
}
