//! `SubjectKeyIdentifier` (RFC 5280 §4.2.1.2) and `AuthorityKeyIdentifier`
//! (§4.2.1.1).

use asn::{Element, TagClass};
use common::errors::{err_msg, Result};
use math::big::BigInt;
use pkix::{Extension, GeneralName};

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

const TAG_KEY_IDENTIFIER: usize = 0;
const TAG_CERT_ISSUER: usize = 1;
const TAG_CERT_SERIAL: usize = 2;

pub fn decode_subject_key_identifier(ext: &Extension) -> Result<Vec<u8>> {
    let el = Element::read_all(&ext.value)?.into_iter().next().ok_or_else(|| err_msg("SubjectKeyIdentifier is empty"))?;
    Ok(el.data.to_vec())
}

/// Any hash length other than 20 bytes (SHA-1, the widely deployed
/// RFC 5280 §4.2.1.2 method (1) convention) is not wrong, just unusual.
const COMMON_KEY_IDENTIFIER_LEN: usize = 20;

/// Digests of `spki_key_bits` (the raw `subjectPublicKey` BIT STRING octets,
/// RFC 5280 §4.2.1.2 method (1)) under every hash this engine recognizes as a
/// plausible key-identifier derivation, SHA-1 first.
fn candidate_digests(spki_key_bits: &[u8]) -> Vec<Vec<u8>> {
    use sha2::Digest;
    vec![
        sha1::Sha1::digest(spki_key_bits).to_vec(),
        sha2::Sha224::digest(spki_key_bits).to_vec(),
        sha2::Sha256::digest(spki_key_bits).to_vec(),
        sha2::Sha384::digest(spki_key_bits).to_vec(),
        sha2::Sha512::digest(spki_key_bits).to_vec(),
        sha3::Sha3_224::digest(spki_key_bits).to_vec(),
        sha3::Sha3_256::digest(spki_key_bits).to_vec(),
        sha3::Sha3_384::digest(spki_key_bits).to_vec(),
        sha3::Sha3_512::digest(spki_key_bits).to_vec(),
        md5::Md5::digest(spki_key_bits).to_vec(),
    ]
}

pub fn analyze_subject_key_identifier(_ext: &Extension, id: &[u8], spki_key_bits: &[u8]) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if id.len() != COMMON_KEY_IDENTIFIER_LEN {
        out.push(SecurityJudgement::new(
            JudgementCode::KeyIdentifierLengthUnusual,
            format!("SubjectKeyIdentifier is {} bytes, not the common 20-byte SHA-1 digest length", id.len()),
        ));
    }

    let digests = candidate_digests(spki_key_bits);
    if digests[0] == id {
        // matches the common SHA-1 convention, nothing further to report
    } else if digests[1..].iter().any(|d| d == id) {
        out.push(SecurityJudgement::new(
            JudgementCode::KeyIdentifierOtherHash,
            "SubjectKeyIdentifier matches a hash of the public key, but not the common SHA-1 convention",
        ));
    } else {
        out.push(SecurityJudgement::new(
            JudgementCode::KeyIdentifierArbitrary,
            "SubjectKeyIdentifier does not match any recognized hash of the public key",
        ));
    }

    out
}

#[derive(Debug, Clone, Default)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub cert_issuer: Option<Vec<GeneralName>>,
    pub cert_serial: Option<BigInt>,
}

pub fn decode_authority_key_identifier(ext: &Extension) -> Result<AuthorityKeyIdentifier> {
    let fields = Element::read_all(&ext.value)?;
    let mut aki = AuthorityKeyIdentifier::default();

    for f in &fields {
        if f.ident.tag.class != TagClass::ContextSpecific {
            continue;
        }
        match f.ident.tag.number {
            TAG_KEY_IDENTIFIER => aki.key_identifier = Some(f.data.to_vec()),
            TAG_CERT_ISSUER => {
                let names = Element::read_all(&f.data)?.iter().map(GeneralName::decode).collect::<Result<Vec<_>>>()?;
                aki.cert_issuer = Some(names);
            }
            TAG_CERT_SERIAL => aki.cert_serial = Some(BigInt::from_be_bytes(&f.data)),
            _ => {}
        }
    }

    Ok(aki)
}

pub fn analyze_authority_key_identifier(ext: &Extension, aki: &AuthorityKeyIdentifier, is_self_signed_root: bool) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if ext.critical && !is_self_signed_root {
        out.push(SecurityJudgement::new(
            JudgementCode::AuthorityKeyIdentifierCritical,
            "AuthorityKeyIdentifier should not be marked critical (RFC 5280 §4.2.1.1)",
        ));
    }

    let has_serial = aki.cert_serial.is_some();
    let has_issuer = aki.cert_issuer.is_some();
    if has_serial && !has_issuer {
        out.push(SecurityJudgement::new(
            JudgementCode::AuthorityKeyIdentifierSerialWithoutName,
            "authorityCertSerialNumber is present without authorityCertIssuer",
        ));
    }
    if has_issuer && !has_serial {
        out.push(SecurityJudgement::new(
            JudgementCode::AuthorityKeyIdentifierNameWithoutSerial,
            "authorityCertIssuer is present without authorityCertSerialNumber",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ski_ext(bytes: &[u8]) -> Extension {
        let mut value = vec![0x04, bytes.len() as u8];
        value.extend_from_slice(bytes);
        Extension {
            oid: pkix::oid::EXT_SUBJECT_KEY_IDENTIFIER.clone(),
            critical: false,
            value,
        }
    }

    #[test]
    fn flags_unusual_length() {
        let ext = ski_ext(&[0u8; 8]);
        let id = decode_subject_key_identifier(&ext).unwrap();
        let out = analyze_subject_key_identifier(&ext, &id, b"some key bits");
        assert!(out.has_code(JudgementCode::KeyIdentifierLengthUnusual));
    }

    #[test]
    fn accepts_sha1_of_the_key() {
        use sha2::Digest as _;
        let key_bits = b"some key bits";
        let digest = sha1::Sha1::digest(key_bits).to_vec();
        let ext = ski_ext(&digest);
        let id = decode_subject_key_identifier(&ext).unwrap();
        let out = analyze_subject_key_identifier(&ext, &id, key_bits);
        assert!(out.is_empty());
    }

    #[test]
    fn flags_other_hash_of_the_key() {
        use sha2::Digest as _;
        let key_bits = b"some key bits";
        let digest = sha2::Sha256::digest(key_bits).to_vec();
        let ext = ski_ext(&digest);
        let id = decode_subject_key_identifier(&ext).unwrap();
        let out = analyze_subject_key_identifier(&ext, &id, key_bits);
        assert!(out.has_code(JudgementCode::KeyIdentifierOtherHash));
    }

    #[test]
    fn flags_md5_of_the_key_as_other_hash() {
        use sha2::Digest as _;
        let key_bits = b"some key bits";
        let digest = md5::Md5::digest(key_bits).to_vec();
        let ext = ski_ext(&digest);
        let id = decode_subject_key_identifier(&ext).unwrap();
        let out = analyze_subject_key_identifier(&ext, &id, key_bits);
        assert!(out.has_code(JudgementCode::KeyIdentifierOtherHash));
    }

    #[test]
    fn flags_arbitrary_identifier() {
        let key_bits = b"some key bits";
        let ext = ski_ext(&[0u8; 20]);
        let id = decode_subject_key_identifier(&ext).unwrap();
        let out = analyze_subject_key_identifier(&ext, &id, key_bits);
        assert!(out.has_code(JudgementCode::KeyIdentifierArbitrary));
    }

    #[test]
    fn flags_serial_without_issuer() {
        let mut value = vec![];
        value.push(0x30);
        let inner = vec![0x82u8, 0x01, 0x2a]; // [2] INTEGER 42
        value.push(inner.len() as u8);
        value.extend_from_slice(&inner);
        let ext = Extension {
            oid: pkix::oid::EXT_AUTHORITY_KEY_IDENTIFIER.clone(),
            critical: false,
            value,
        };
        let aki = decode_authority_key_identifier(&ext).unwrap();
        let out = analyze_authority_key_identifier(&ext, &aki, false);
        assert!(out.has_code(JudgementCode::AuthorityKeyIdentifierSerialWithoutName));
    }
}
