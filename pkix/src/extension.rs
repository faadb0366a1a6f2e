//! `Extension` (RFC 5280 §4.1.2.9): `{ extnID, critical DEFAULT FALSE, extnValue OCTET STRING }`.
//!
//! This crate decodes only the envelope. Per-OID payload interpretation
//! (BasicConstraints, KeyUsage, SubjectAltName, ...) is `sak::extensions`'
//! job; `pkix::Extension` exposes the raw `extnValue` contents so that layer
//! can decode it itself and fall back to `*_Malformed` without this crate
//! needing to know about judgement codes.

use asn::tag::TAG_NUMBER_BOOLEAN;
use asn::{Element, ObjectIdentifier, TagClass};
use common::errors::{err_msg, Result};

#[derive(Debug, Clone)]
pub struct Extension {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// Contents of the extnValue OCTET STRING (the payload still needs its
    /// own ASN.1 decode per extension type).
    pub value: Vec<u8>,
}

impl Extension {
    pub fn decode(el: &Element) -> Result<Self> {
        let fields = Element::read_all(&el.data)?;
        if fields.len() < 2 {
            return Err(err_msg("Extension must have at least 2 fields"));
        }

        let oid = ObjectIdentifier::from_der(&fields[0].data)?;

        let (critical, value_el) = if fields.len() == 3 {
            let b = &fields[1];
            if b.ident.tag.class != TagClass::Universal || b.ident.tag.number != TAG_NUMBER_BOOLEAN {
                return Err(err_msg("Extension critical field must be BOOLEAN"));
            }
            if b.data.len() != 1 {
                return Err(err_msg("BOOLEAN must be one octet"));
            }
            (b.data[0] != 0, &fields[2])
        } else {
            (false, &fields[1])
        };

        // extnValue is itself an OCTET STRING wrapping the real payload.
        let value = value_el.data.to_vec();

        Ok(Self { oid, critical, value })
    }
}

/// Decodes the `Extensions` SEQUENCE contents into a list, preserving
/// source order. An empty (but present) sequence parses successfully: the
/// caller is expected to flag that as diagnosable, not treat it as absent.
pub fn decode_extensions(data: &[u8]) -> Result<Vec<Extension>> {
    let elements = Element::read_all(data)?;
    let mut out = Vec::with_capacity(elements.len());
    for el in &elements {
        out.push(Extension::decode(el)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extension_tlv(oid_der: &[u8], critical: Option<bool>, value: &[u8]) -> Vec<u8> {
        let mut inner = oid_der.to_vec();
        if let Some(c) = critical {
            inner.extend_from_slice(&[0x01, 0x01, if c { 0xff } else { 0x00 }]);
        }
        inner.extend_from_slice(&[0x04, value.len() as u8]);
        inner.extend_from_slice(value);

        let mut out = vec![0x30, inner.len() as u8];
        out.extend_from_slice(&inner);
        out
    }

    #[test]
    fn decodes_non_critical_extension_default() {
        let ski_oid = [0x06, 0x03, 0x55, 0x1d, 0x0e]; // 2.5.29.14
        let bytes = extension_tlv(&ski_oid, None, b"hello");
        let el = asn::parse_single(&bytes).unwrap();
        let ext = Extension::decode(&el).unwrap();
        assert!(!ext.critical);
        assert_eq!(ext.value, b"hello");
    }

    #[test]
    fn decodes_explicit_critical_true() {
        let bc_oid = [0x06, 0x03, 0x55, 0x1d, 0x13]; // 2.5.29.19
        let bytes = extension_tlv(&bc_oid, Some(true), &[0x30, 0x00]);
        let el = asn::parse_single(&bytes).unwrap();
        let ext = Extension::decode(&el).unwrap();
        assert!(ext.critical);
    }

    #[test]
    fn empty_extensions_sequence_parses() {
        let exts = decode_extensions(&[]).unwrap();
        assert!(exts.is_empty());
    }
}
