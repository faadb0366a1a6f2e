//! `KeyUsage` (RFC 5280 §4.2.1.3): a BIT STRING of named usage flags.

use asn::types::BitString;
use common::errors::Result;
use pkix::Extension;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyUsageFlags {
    pub digital_signature: bool,
    pub non_repudiation: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsageFlags {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn decode(ext: &Extension) -> Result<(BitString, KeyUsageFlags)> {
    let bs = BitString::from_der(&ext.value)?;

    let bit = |i: usize| -> bool {
        if i >= bs.bit_len() {
            return false;
        }
        let byte = bs.bytes[i / 8];
        (byte >> (7 - (i % 8))) & 1 == 1
    };

    let flags = KeyUsageFlags {
        digital_signature: bit(0),
        non_repudiation: bit(1),
        key_encipherment: bit(2),
        data_encipherment: bit(3),
        key_agreement: bit(4),
        key_cert_sign: bit(5),
        crl_sign: bit(6),
        encipher_only: bit(7),
        decipher_only: bit(8),
    };

    Ok((bs, flags))
}

pub fn analyze(ext: &Extension, bs: &BitString, flags: KeyUsageFlags, is_ca: bool) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if flags.is_empty() {
        out.push(SecurityJudgement::new(JudgementCode::ExtKeyUsageEmpty, "KeyUsage has no bits set"));
    }

    if !bs.is_canonical() {
        out.push(SecurityJudgement::new(
            JudgementCode::ExtKeyUsageTrailingZeroBits,
            "KeyUsage BIT STRING has non-zero padding bits",
        ));
    }

    if !ext.critical {
        out.push(SecurityJudgement::new(JudgementCode::ExtKeyUsageNotCritical, "KeyUsage extension is not marked critical"));
    }

    if flags.key_cert_sign && !is_ca {
        out.push(SecurityJudgement::new(
            JudgementCode::ExtKeyUsageKeyCertSignImpliesCa,
            "keyCertSign is set but BasicConstraints does not mark this certificate as a CA",
        ));
    }

    if is_ca && !flags.key_cert_sign {
        out.push(SecurityJudgement::new(
            JudgementCode::ExtKeyUsageMissingInCa,
            "Certificate is a CA but KeyUsage lacks keyCertSign",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ku_ext(bits: &[u8]) -> Extension {
        let mut value = vec![0u8]; // unused bit count
        value.extend_from_slice(bits);
        Extension {
            oid: pkix::oid::EXT_KEY_USAGE.clone(),
            critical: true,
            value,
        }
    }

    #[test]
    fn decodes_digital_signature_bit() {
        let ext = ku_ext(&[0b1000_0000]);
        let (_, flags) = decode(&ext).unwrap();
        assert!(flags.digital_signature);
        assert!(!flags.key_cert_sign);
    }

    #[test]
    fn flags_empty_key_usage() {
        let ext = ku_ext(&[0b0000_0000]);
        let (bs, flags) = decode(&ext).unwrap();
        let out = analyze(&ext, &bs, flags, false);
        assert!(out.has_code(JudgementCode::ExtKeyUsageEmpty));
    }
}
