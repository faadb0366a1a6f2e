//! `Certificate` / `TBSCertificate` (RFC 5280 §4.1).

use asn::tag::{TAG_NUMBER_GENERALIZEDTIME, TAG_NUMBER_SEQUENCE, TAG_NUMBER_UTCTIME};
use asn::types::BitString;
use asn::{parse_single, Element, TagClass};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use common::errors::{err_msg, Result};
use math::big::BigInt;

use crate::algorithm::AlgorithmIdentifier;
use crate::extension::{decode_extensions, Extension};
use crate::name::{decode_name, DistinguishedName};
use crate::spki::SubjectPublicKeyInfo;

/// A validity timestamp, keeping track of which ASN.1 time type it was
/// originally encoded as: RFC 5280 mandates UTCTime through 2049 and
/// GeneralizedTime from 2050 onward, so the encoding form itself is
/// diagnosable independent of the instant it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoding {
    Utc,
    Generalized,
}

#[derive(Debug, Clone)]
pub struct Time {
    /// `None` when the contents octets don't parse as a well-formed
    /// timestamp of their declared type; the certificate is still
    /// analyzable, just with this bound unknown rather than the whole
    /// decode failing.
    pub value: Option<DateTime<Utc>>,
    pub encoding: TimeEncoding,
}

#[derive(Debug, Clone)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

fn decode_time(el: &Element) -> Result<Time> {
    if el.ident.tag.class != TagClass::Universal {
        return Err(err_msg("Time must use a universal tag"));
    }

    match el.ident.tag.number {
        TAG_NUMBER_UTCTIME => Ok(Time {
            value: asn::types::parse_utc_time(&el.data).ok(),
            encoding: TimeEncoding::Utc,
        }),
        TAG_NUMBER_GENERALIZEDTIME => Ok(Time {
            value: asn::types::parse_generalized_time(&el.data).ok(),
            encoding: TimeEncoding::Generalized,
        }),
        _ => Err(err_msg("Time must be UTCTime or GeneralizedTime")),
    }
}

fn decode_validity(el: &Element) -> Result<Validity> {
    let fields = Element::read_all(&el.data)?;
    if fields.len() != 2 {
        return Err(err_msg("Validity must have exactly 2 fields"));
    }
    Ok(Validity {
        not_before: decode_time(&fields[0])?,
        not_after: decode_time(&fields[1])?,
    })
}

#[derive(Debug, Clone)]
pub struct TbsCertificate {
    /// 1, 2 or 3 (the encoded value plus one).
    pub version: u8,
    pub serial_number: BigInt,
    pub signature: AlgorithmIdentifier,
    pub issuer: DistinguishedName,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub subject_public_key_info: SubjectPublicKeyInfo,
    pub issuer_unique_id: Option<BitString>,
    pub subject_unique_id: Option<BitString>,
    pub extensions: Option<Vec<Extension>>,
    pub raw: Bytes,
}

impl TbsCertificate {
    fn decode(el: &Element) -> Result<Self> {
        let fields = Element::read_all(&el.data)?;
        let mut idx = 0;

        let version = if idx < fields.len()
            && fields[idx].ident.tag.class == TagClass::ContextSpecific
            && fields[idx].ident.tag.number == 0
        {
            let inner = Element::read_all(&fields[idx].data)?;
            let v = inner
                .first()
                .ok_or_else(|| err_msg("version field missing inner INTEGER"))?;
            let n = BigInt::from_be_bytes(&v.data);
            let n = n.to_uint().ok_or_else(|| err_msg("version must be non-negative"))?;
            let n = n.to_u64().ok_or_else(|| err_msg("version out of range"))?;
            idx += 1;
            (n as u8) + 1
        } else {
            1
        };

        let serial_number = fields
            .get(idx)
            .map(|e| BigInt::from_be_bytes(&e.data))
            .ok_or_else(|| err_msg("TBSCertificate missing serialNumber"))?;
        idx += 1;

        let signature = AlgorithmIdentifier::decode(
            fields.get(idx).ok_or_else(|| err_msg("TBSCertificate missing signature field"))?,
        )?;
        idx += 1;

        let issuer = decode_name(
            &fields.get(idx).ok_or_else(|| err_msg("TBSCertificate missing issuer"))?.data,
        )?;
        idx += 1;

        let validity = decode_validity(
            fields.get(idx).ok_or_else(|| err_msg("TBSCertificate missing validity"))?,
        )?;
        idx += 1;

        let subject = decode_name(
            &fields.get(idx).ok_or_else(|| err_msg("TBSCertificate missing subject"))?.data,
        )?;
        idx += 1;

        let subject_public_key_info = SubjectPublicKeyInfo::decode(
            fields
                .get(idx)
                .ok_or_else(|| err_msg("TBSCertificate missing subjectPublicKeyInfo"))?,
        )?;
        idx += 1;

        let mut issuer_unique_id = None;
        let mut subject_unique_id = None;
        let mut extensions = None;

        while idx < fields.len() {
            let f = &fields[idx];
            if f.ident.tag.class != TagClass::ContextSpecific {
                return Err(err_msg("Unexpected field in TBSCertificate tail"));
            }
            match f.ident.tag.number {
                1 => {
                    issuer_unique_id = Some(BitString::from_der(&f.data)?);
                }
                2 => {
                    subject_unique_id = Some(BitString::from_der(&f.data)?);
                }
                3 => {
                    // [3] EXPLICIT Extensions: f.data is the Extensions SEQUENCE TLV.
                    let inner = Element::read_all(&f.data)?;
                    let seq = inner
                        .into_iter()
                        .next()
                        .ok_or_else(|| err_msg("extensions field missing inner SEQUENCE"))?;
                    extensions = Some(decode_extensions(&seq.data)?);
                }
                n => return Err(err_msg(format!("Unknown TBSCertificate context tag [{}]", n))),
            }
            idx += 1;
        }

        Ok(Self {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            issuer_unique_id,
            subject_unique_id,
            extensions,
            raw: el.outer.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Certificate {
    pub tbs_certificate: TbsCertificate,
    /// The signatureAlgorithm field of the outer Certificate SEQUENCE, kept
    /// separate from `tbs_certificate.signature` so callers can check the
    /// RFC 5280 §4.1.1.2 invariant that the two must be byte-identical.
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature_value: BitString,
}

impl Certificate {
    /// Decodes a single DER-encoded Certificate. This is the one operation
    /// whose failure means "this is not a certificate" rather than "this
    /// certificate has a defect" — callers should surface it as a hard
    /// error, not a judgement.
    pub fn decode_der(data: &[u8]) -> Result<Self> {
        let el = parse_single(data)?;
        if el.ident.tag.class != TagClass::Universal || el.ident.tag.number != TAG_NUMBER_SEQUENCE {
            return Err(err_msg("Top-level value is not a SEQUENCE"));
        }

        let fields = Element::read_all(&el.data)?;
        if fields.len() != 3 {
            return Err(err_msg("Certificate must have exactly 3 fields"));
        }

        let tbs_certificate = TbsCertificate::decode(&fields[0])?;
        let signature_algorithm = AlgorithmIdentifier::decode(&fields[1])?;
        let signature_value = BitString::from_der(&fields[2].data)?;

        Ok(Self {
            tbs_certificate,
            signature_algorithm,
            signature_value,
        })
    }

    /// Whether the outer and inner (TBSCertificate) signature-algorithm
    /// identifiers are byte-identical, as RFC 5280 §4.1.1.2 requires.
    pub fn signature_algorithms_match(&self) -> bool {
        self.signature_algorithm.raw == self.tbs_certificate.signature.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_sequence_top_level() {
        let data = [0x02, 0x01, 0x05];
        assert!(Certificate::decode_der(&data).is_err());
    }

    #[test]
    fn rejects_wrong_field_count() {
        let data = [0x30, 0x03, 0x02, 0x01, 0x05];
        assert!(Certificate::decode_der(&data).is_err());
    }
}
