//! `SubjectPublicKeyInfo` (RFC 5280 §4.1.2.7): an AlgorithmIdentifier plus
//! the encoded public key in a BIT STRING. Interpreting the bits into an
//! `RSA`/`DSA`/`ECDSA`/`EdDSA` key shape is `sak::pubkey`'s job, not this
//! crate's: `pkix` only knows the wire shape.

use asn::types::BitString;
use asn::Element;
use common::errors::{err_msg, Result};

use crate::algorithm::AlgorithmIdentifier;

#[derive(Debug, Clone)]
pub struct SubjectPublicKeyInfo {
    pub algorithm: AlgorithmIdentifier,
    pub subject_public_key: BitString,
    pub raw: Vec<u8>,
}

impl SubjectPublicKeyInfo {
    pub fn decode(el: &Element) -> Result<Self> {
        let fields = Element::read_all(&el.data)?;
        if fields.len() != 2 {
            return Err(err_msg("SubjectPublicKeyInfo must have 2 fields"));
        }

        let algorithm = AlgorithmIdentifier::decode(&fields[0])?;
        let subject_public_key = BitString::from_der(&fields[1].data)?;

        Ok(Self {
            algorithm,
            subject_public_key,
            raw: el.outer.to_vec(),
        })
    }
}
