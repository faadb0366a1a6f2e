//! Lenient top-level decode: tolerates what `pkix::Certificate::decode_der`
//! treats as a hard parse failure (trailing bytes after the top-level
//! structure) and sweeps the whole DER tree for non-canonical encodings
//! (non-minimal INTEGERs, BIT STRINGs with non-zero padding bits) that the
//! strict decoder accepts silently.

use asn::tag::{TAG_NUMBER_BIT_STRING, TAG_NUMBER_INTEGER};
use asn::types::{integer_is_minimal, BitString};
use asn::{Element, Reader, TagClass};
use pkix::Certificate;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

fn walk(el: &Element, out: &mut SecurityJudgements) {
    if el.ident.tag.class == TagClass::Universal {
        match el.ident.tag.number {
            TAG_NUMBER_INTEGER => {
                if !el.data.is_empty() && !integer_is_minimal(&el.data) {
                    out.push(SecurityJudgement::new(JudgementCode::CertInvalidDer, "INTEGER uses a non-minimal two's-complement encoding"));
                }
            }
            TAG_NUMBER_BIT_STRING => {
                if let Ok(bs) = BitString::from_der(&el.data) {
                    if !bs.is_canonical() {
                        out.push(SecurityJudgement::new(JudgementCode::CertInvalidDer, "BIT STRING has non-zero unused padding bits"));
                    }
                }
            }
            _ => {}
        }
    }

    if el.ident.constructed {
        if let Ok(children) = Element::read_all(&el.data) {
            for child in &children {
                walk(child, out);
            }
        }
    }
}

/// Scans every TLV reachable from `top`, recursing into constructed values.
pub fn scan_canonical_der(top: &Element) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();
    walk(top, &mut out);
    out
}

/// Decodes a single top-level Certificate, same as
/// [`pkix::Certificate::decode_der`], but treats trailing bytes after the
/// structure and non-canonical DER elsewhere in the tree as judgements
/// against an otherwise-decodable certificate instead of a hard error.
/// Returns `None` only when the bytes don't decode as a Certificate at all.
pub fn decode_lenient(data: &[u8]) -> (Option<Certificate>, SecurityJudgements) {
    let mut out = SecurityJudgements::new();

    let mut r = Reader::new(data);
    let top = match Element::read(&mut r) {
        Ok(el) => el,
        Err(_) => return (None, out),
    };
    if !r.is_empty() {
        out.push(SecurityJudgement::new(
            JudgementCode::CertTrailingData,
            "trailing data follows the top-level Certificate structure",
        ));
    }

    out.extend(scan_canonical_der(&top));

    let cert = Certificate::decode_der(&top.outer).ok();
    (cert, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_trailing_data() {
        let der = vec![0x30, 0x03, 0x02, 0x01, 0x05, 0xff, 0xff];
        let (_, out) = decode_lenient(&der);
        assert!(out.has_code(JudgementCode::CertTrailingData));
    }

    #[test]
    fn no_trailing_data_is_not_flagged() {
        let der = vec![0x30, 0x03, 0x02, 0x01, 0x05];
        let (_, out) = decode_lenient(&der);
        assert!(!out.has_code(JudgementCode::CertTrailingData));
    }

    #[test]
    fn flags_non_minimal_integer() {
        let el = Element::read(&mut Reader::new(&[0x30, 0x04, 0x02, 0x02, 0x00, 0x05])).unwrap();
        let out = scan_canonical_der(&el);
        assert!(out.has_code(JudgementCode::CertInvalidDer));
    }

    #[test]
    fn accepts_minimal_integer() {
        let el = Element::read(&mut Reader::new(&[0x30, 0x03, 0x02, 0x01, 0x05])).unwrap();
        let out = scan_canonical_der(&el);
        assert!(!out.has_code(JudgementCode::CertInvalidDer));
    }

    #[test]
    fn flags_bit_string_padding_bits() {
        // unused_bits=4, content 0xF0 would be canonical; 0xFF is not.
        let el = Element::read(&mut Reader::new(&[0x30, 0x04, 0x03, 0x02, 0x04, 0xff])).unwrap();
        let out = scan_canonical_der(&el);
        assert!(out.has_code(JudgementCode::CertInvalidDer));
    }
}
