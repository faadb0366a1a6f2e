use crate::big::{BigInt, BigUint};
use crate::integer::Integer;
use crate::number::{One, Zero};

/// Euclidean algorithm: greatest common divisor of `a` and `b`.
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();

    while !b.is_zero() {
        let r = a.quorem(&b).1;
        a = b;
        b = r;
    }

    a
}

/// Extended Euclidean algorithm. Returns `(g, x, y)` such that
/// `g = gcd(a, b) = a*x + b*y`, with `x` and `y` signed.
///
/// Used by `Modulo::inv` to compute modular inverses: `a*x + n*y = gcd(a, n)`
/// means `x` is the inverse of `a` mod `n` whenever `gcd(a, n) == 1`.
pub fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let (q, rem) = old_r.quorem(&r);
        let q = BigInt::from(q);

        old_r = r;
        r = rem;

        let new_s = old_s.clone() - (&q * &s);
        old_s = s;
        s = new_s;

        let new_t = old_t.clone() - (&q * &t);
        old_t = t;
        t = new_t;
    }

    (old_r, old_s, old_t)
}
