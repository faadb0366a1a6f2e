//! Whole-certificate-body checks: version, serial number, validity period,
//! signature-algorithm consistency, subject/issuer well-formedness and the
//! version-gated unique-ID/extensions rules of RFC 5280 §4.1.2.

use math::integer::Integer;
use math::number::Zero;
use pkix::Certificate;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

/// Serial numbers beyond 20 octets are technically non-conformant (RFC
/// 5280 §4.1.2.2 caps them there) but common enough in the wild that this
/// is a judgement, not a decode error.
const MAX_CONFORMANT_SERIAL_BYTES: usize = 20;

pub fn analyze(cert: &Certificate) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();
    let tbs = &cert.tbs_certificate;

    if tbs.version > 3 {
        out.push(SecurityJudgement::new(JudgementCode::CertVersionUnknown, format!("version {} is not one of v1/v2/v3", tbs.version)));
    }

    if tbs.serial_number.is_negative() {
        out.push(SecurityJudgement::new(JudgementCode::CertSerialNegative, "serialNumber is negative"));
    } else if tbs.serial_number.magnitude().is_zero() {
        out.push(SecurityJudgement::new(JudgementCode::CertSerialZero, "serialNumber is zero"));
    } else if tbs.serial_number.magnitude().to_be_bytes().len() > MAX_CONFORMANT_SERIAL_BYTES {
        out.push(SecurityJudgement::new(
            JudgementCode::CertSerialLarge,
            format!("serialNumber is {} bytes, exceeding the 20-octet RFC 5280 recommendation", tbs.serial_number.magnitude().to_be_bytes().len()),
        ));
    }

    match (tbs.validity.not_before.value, tbs.validity.not_after.value) {
        (Some(not_before), Some(not_after)) => {
            if not_before >= not_after {
                out.push(SecurityJudgement::new(JudgementCode::CertValidityNotBeforeAfterNotAfter, "notBefore is not strictly before notAfter"));
            }
            if tbs.validity.not_before.encoding != expected_time_encoding(not_before) || tbs.validity.not_after.encoding != expected_time_encoding(not_after) {
                out.push(SecurityJudgement::new(
                    JudgementCode::CertValidityEncodingMismatch,
                    "a validity timestamp does not use the RFC 5280 §4.1.2.5 mandated time type for its year",
                ));
            }
        }
        _ => {
            out.push(SecurityJudgement::new(
                JudgementCode::CertValidityTimestampMalformed,
                "notBefore or notAfter does not parse as a well-formed timestamp",
            ));
        }
    }

    if !cert.signature_algorithms_match() {
        out.push(SecurityJudgement::new(
            JudgementCode::CertSignatureAlgorithmMismatch,
            "outer signatureAlgorithm does not match the TBSCertificate's signature field",
        ));
    }

    if tbs.subject.is_empty() {
        out.push(SecurityJudgement::new(JudgementCode::CertSubjectEmpty, "subject is an empty Name"));
    }
    if tbs.issuer.is_empty() {
        out.push(SecurityJudgement::new(JudgementCode::CertIssuerEmpty, "issuer is an empty Name"));
    }

    let has_unique_ids = tbs.issuer_unique_id.is_some() || tbs.subject_unique_id.is_some();
    let extensions_absent_or_empty = tbs.extensions.as_ref().map(|exts| exts.is_empty()).unwrap_or(true);
    if has_unique_ids {
        if tbs.version == 1 {
            out.push(SecurityJudgement::new(JudgementCode::CertUniqueIdForbiddenInV1, "unique identifiers are present in a v1 certificate"));
        } else if tbs.version != 2 && extensions_absent_or_empty {
            out.push(SecurityJudgement::new(JudgementCode::CertUniqueIdImpliesV2, "unique identifiers are present without extensions; this requires at least v2"));
        }
    }

    let is_ca = tbs
        .extensions
        .as_ref()
        .and_then(|exts| exts.iter().find(|e| e.oid == *pkix::oid::EXT_BASIC_CONSTRAINTS))
        .and_then(|e| crate::extensions::basic_constraints::decode(e).ok())
        .map(|bc| bc.is_ca)
        .unwrap_or(false);
    if has_unique_ids && tbs.version == 3 && is_ca {
        out.push(SecurityJudgement::new(
            JudgementCode::CertUniqueIdForbiddenInCaV3,
            "CAs conforming to RFC 5280 must not populate unique identifiers",
        ));
    }

    match &tbs.extensions {
        Some(exts) if exts.is_empty() => {
            out.push(SecurityJudgement::new(JudgementCode::CertExtensionsEmptySequence, "extensions field is present but contains no extensions"));
        }
        Some(_) if tbs.version == 1 => {
            out.push(SecurityJudgement::new(JudgementCode::CertExtensionsForbiddenInV1, "extensions are present in a v1 certificate"));
        }
        _ => {}
    }

    out
}

/// RFC 5280 §4.1.2.5: dates through 2049 must use UTCTime, 2050 onward must
/// use GeneralizedTime.
fn expected_time_encoding(value: chrono::DateTime<chrono::Utc>) -> pkix::TimeEncoding {
    use chrono::Datelike;
    if value.year() < 2050 {
        pkix::TimeEncoding::Utc
    } else {
        pkix::TimeEncoding::Generalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use math::big::BigInt;
    use pkix::{AlgorithmIdentifier, SubjectPublicKeyInfo, TbsCertificate, Time, TimeEncoding, Validity};
    use asn::types::BitString;
    use bytes::Bytes;

    fn sample_alg() -> AlgorithmIdentifier {
        AlgorithmIdentifier {
            algorithm: pkix::oid::RSA_ENCRYPTION.clone(),
            parameters: None,
            raw: vec![0x30, 0x00],
        }
    }

    fn sample_tbs(not_before_year: i32, not_after_year: i32) -> TbsCertificate {
        TbsCertificate {
            version: 3,
            serial_number: BigInt::from(1i64),
            signature: sample_alg(),
            issuer: pkix::DistinguishedName { rdns: vec![] },
            validity: Validity {
                not_before: Time { value: Some(Utc.with_ymd_and_hms(not_before_year, 1, 1, 0, 0, 0).unwrap()), encoding: TimeEncoding::Utc },
                not_after: Time { value: Some(Utc.with_ymd_and_hms(not_after_year, 1, 1, 0, 0, 0).unwrap()), encoding: TimeEncoding::Utc },
            },
            subject: pkix::DistinguishedName { rdns: vec![] },
            subject_public_key_info: SubjectPublicKeyInfo {
                algorithm: sample_alg(),
                subject_public_key: BitString { bytes: Bytes::new(), unused_bits: 0 },
                raw: vec![],
            },
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: None,
            raw: Bytes::new(),
        }
    }

    #[test]
    fn flags_backwards_validity() {
        let tbs = sample_tbs(2030, 2020);
        let cert = Certificate {
            signature_algorithm: tbs.signature.clone(),
            tbs_certificate: tbs,
            signature_value: BitString { bytes: Bytes::new(), unused_bits: 0 },
        };
        let out = analyze(&cert);
        assert!(out.has_code(JudgementCode::CertValidityNotBeforeAfterNotAfter));
    }

    #[test]
    fn flags_malformed_validity_timestamp() {
        let mut tbs = sample_tbs(2020, 2030);
        tbs.validity.not_before.value = None;
        let cert = Certificate {
            signature_algorithm: tbs.signature.clone(),
            tbs_certificate: tbs,
            signature_value: BitString { bytes: Bytes::new(), unused_bits: 0 },
        };
        let out = analyze(&cert);
        assert!(out.has_code(JudgementCode::CertValidityTimestampMalformed));
        assert!(!out.has_code(JudgementCode::CertValidityNotBeforeAfterNotAfter));
    }

    #[test]
    fn flags_empty_names() {
        let tbs = sample_tbs(2020, 2030);
        let cert = Certificate {
            signature_algorithm: tbs.signature.clone(),
            tbs_certificate: tbs,
            signature_value: BitString { bytes: Bytes::new(), unused_bits: 0 },
        };
        let out = analyze(&cert);
        assert!(out.has_code(JudgementCode::CertSubjectEmpty));
        assert!(out.has_code(JudgementCode::CertIssuerEmpty));
    }
}
