//! Arbitrary precision integers: `BigUint` (unsigned), `BigInt` (two's
//! complement signed, as ASN.1 INTEGER values decode to) and `Modulo` (a
//! `mod n` arithmetic namespace used by the RSA/DSA/ECDSA analyzers).

mod int;
mod modulo;
mod uint;

pub use int::BigInt;
pub use modulo::Modulo;
pub use uint::BigUint;
