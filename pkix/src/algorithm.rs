//! `AlgorithmIdentifier` (RFC 5280 §4.1.1.2): an OID plus algorithm-specific
//! parameters, whose raw bytes this engine keeps around since several checks
//! (e.g. "parameters must be NULL") compare the encoding, not just a decoded
//! value.

use asn::tag::TAG_NUMBER_NULL;
use asn::{Element, ObjectIdentifier, TagClass};
use common::errors::{err_msg, Result};

#[derive(Debug, Clone)]
pub struct AlgorithmIdentifier {
    pub algorithm: ObjectIdentifier,
    /// The raw parameters element, if the SEQUENCE had a second field.
    pub parameters: Option<Element>,
    /// Bytes of the whole AlgorithmIdentifier SEQUENCE, used to compare the
    /// outer/inner signature-algorithm identifiers byte-for-byte.
    pub raw: Vec<u8>,
}

impl AlgorithmIdentifier {
    pub fn decode(el: &Element) -> Result<Self> {
        let fields = Element::read_all(&el.data)?;
        if fields.is_empty() {
            return Err(err_msg("AlgorithmIdentifier missing algorithm OID"));
        }

        let algorithm = ObjectIdentifier::from_der(&fields[0].data)?;
        let parameters = fields.get(1).cloned();

        Ok(Self {
            algorithm,
            parameters,
            raw: el.outer.to_vec(),
        })
    }

    /// Whether the parameters field is present and is exactly `NULL`, the
    /// form RSA/DSA/ECDSA-with-hash signature algorithms require.
    pub fn parameters_is_null(&self) -> bool {
        match &self.parameters {
            Some(p) => {
                p.ident.tag.class == TagClass::Universal
                    && p.ident.tag.number == TAG_NUMBER_NULL
                    && p.data.is_empty()
            }
            None => false,
        }
    }

    pub fn parameters_absent(&self) -> bool {
        self.parameters.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asn::parse_single;

    fn alg_id_with_null(oid_der: &[u8]) -> Vec<u8> {
        let mut inner = oid_der.to_vec();
        inner.extend_from_slice(&[0x05, 0x00]);
        let mut out = vec![0x30, inner.len() as u8];
        out.extend_from_slice(&inner);
        out
    }

    #[test]
    fn decodes_algorithm_with_null_parameters() {
        let rsa_oid = [0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];
        let bytes = alg_id_with_null(&rsa_oid);
        let el = parse_single(&bytes).unwrap();
        let alg = AlgorithmIdentifier::decode(&el).unwrap();
        assert!(alg.parameters_is_null());
        assert_eq!(alg.algorithm.to_string(), "1.2.840.113549.1.1.1");
    }

    #[test]
    fn detects_missing_parameters() {
        let rsa_oid = [0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];
        let mut out = vec![0x30, rsa_oid.len() as u8];
        out.extend_from_slice(&rsa_oid);
        let el = parse_single(&out).unwrap();
        let alg = AlgorithmIdentifier::decode(&el).unwrap();
        assert!(alg.parameters_absent());
    }
}
