//! BER/DER decoding for the fixed set of ASN.1 structures a certificate can
//! contain. Unlike the parent project's `asn` crate, this is not a general
//! ASN.1 notation compiler: there is no `.asn1` source, no code generation,
//! and no BER leniency beyond what PKIX parsing needs. Every structure is a
//! hand-written Rust type built directly on `Element`/`Identifier`/`Length`.

pub mod encoding;
pub mod oid;
pub mod tag;
pub mod types;

pub use encoding::{expect_tag, parse_single, Element, Identifier, Length, Reader};
pub use oid::ObjectIdentifier;
pub use tag::{Tag, TagClass};
