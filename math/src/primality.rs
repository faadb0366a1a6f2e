//! Probabilistic primality testing.
//!
//! The Python original (`NumberTheory.is_probable_prime`) runs a fixed round
//! count of Miller-Rabin witnesses; we do the same rather than chase a
//! particular error bound, since the analyzer only ever reports "probably
//! prime" / "composite", never a confidence figure.

use crate::big::{Modulo, BigUint};
use crate::integer::Integer;
use crate::number::{One, Zero};

const DEFAULT_ROUNDS: u32 = 40;

/// First few small primes, checked by trial division before falling back to
/// Miller-Rabin. Cheap and catches the overwhelming majority of composites
/// immediately, mirroring how the analyzer flags "tiny factor" RSA moduli.
const SMALL_PRIMES: &[u64] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Returns the smallest small prime that divides `n`, if any.
pub fn trial_divide(n: &BigUint, limit: u64) -> Option<u64> {
    for &p in SMALL_PRIMES {
        if p > limit {
            break;
        }
        let d = BigUint::from_u64(p);
        if n > &d && n.quorem(&d).1.is_zero() {
            return Some(p);
        }
    }
    None
}

/// Miller-Rabin probable-primality test with a fixed witness count.
///
/// Even numbers and numbers below 2 are always reported composite; this
/// function does no trial division of its own, so callers wanting the cheap
/// small-factor short circuit should call [`trial_divide`] first.
pub fn is_probable_prime(n: &BigUint) -> bool {
    is_probable_prime_rounds(n, DEFAULT_ROUNDS)
}

pub fn is_probable_prime_rounds(n: &BigUint, rounds: u32) -> bool {
    let two = BigUint::from_u64(2);
    let three = BigUint::from_u64(3);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.bit(0) == 0 {
        return false;
    }

    // Write n - 1 = d * 2^r with d odd.
    let n_minus_one = n - &BigUint::one();
    let mut d = n_minus_one.clone();
    let mut r = 0usize;
    while d.bit(0) == 0 {
        d.shr();
        r += 1;
    }

    let m = Modulo::new(n);

    // Deterministic small bases, then pseudo-random-ish increasing bases for
    // the remainder of the requested round count. There is no RNG available
    // in this crate, so we derive witnesses from a simple counter sequence;
    // this is adequate for a security *advisory* tool, not key generation.
    let bases: Vec<u64> = vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    let mut witnesses: Vec<BigUint> = bases
        .into_iter()
        .map(BigUint::from_u64)
        .filter(|b| b < &n_minus_one)
        .collect();

    let mut extra = 41u64;
    while (witnesses.len() as u32) < rounds {
        let w = BigUint::from_u64(extra);
        if w < n_minus_one {
            witnesses.push(w);
        }
        extra += 2;
        if extra > 100_000 {
            break;
        }
    }

    for a in witnesses.iter().take(rounds as usize) {
        if !miller_rabin_round(&m, a, &d, r, n) {
            return false;
        }
    }

    true
}

fn miller_rabin_round(m: &Modulo<'_>, a: &BigUint, d: &BigUint, r: usize, n: &BigUint) -> bool {
    let n_minus_one = n - &BigUint::one();
    let mut x = m.pow(a, d);

    if x.is_one() || x == n_minus_one {
        return true;
    }

    for _ in 1..r {
        x = m.mul(&x, &x);
        if x == n_minus_one {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_small_primes() {
        for p in [2u64, 3, 5, 7, 11, 97, 7919] {
            assert!(is_probable_prime(&BigUint::from_u64(p)), "{} should be prime", p);
        }
    }

    #[test]
    fn identifies_small_composites() {
        for c in [4u64, 6, 8, 9, 100, 7921] {
            assert!(!is_probable_prime(&BigUint::from_u64(c)), "{} should be composite", c);
        }
    }

    #[test]
    fn trial_divide_finds_small_factor() {
        assert_eq!(trial_divide(&BigUint::from_u64(91), 100), Some(7));
        assert_eq!(trial_divide(&BigUint::from_u64(97), 100), None);
    }
}
