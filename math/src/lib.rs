//! Arbitrary-precision integer arithmetic used by the public-key analyzers.
//!
//! This is a slimmed-down descendant of `pkg/math::big` from the parent
//! project: just `BigUint`/`BigInt`, modular arithmetic, and `gcd`. The
//! matrix/geometry/compute modules of the parent `math` crate have no
//! counterpart in a certificate analyzer and were not carried over.

pub mod big;
pub mod gcd;
pub mod integer;
pub mod number;
pub mod primality;
