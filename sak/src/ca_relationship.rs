//! Relationship checks between a certificate and its issuing CA: name
//! matching, key-identifier linkage, validity overlap and the actual
//! cryptographic signature verification.

use pkix::Certificate;

use crate::codes::JudgementCode;
use crate::extensions::ExtensionsAnalysis;
use crate::judgement::{SecurityJudgement, SecurityJudgements};
use crate::signature_verifier::{SignatureVerifier, VerifyOutcome};

pub fn analyze(
    subject_cert: &Certificate,
    subject_extensions: &ExtensionsAnalysis,
    issuer_cert: &Certificate,
    issuer_extensions: &ExtensionsAnalysis,
    verifier: &dyn SignatureVerifier,
) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if subject_cert.tbs_certificate.issuer.matches(&issuer_cert.tbs_certificate.subject) {
        out.push(SecurityJudgement::new(JudgementCode::CaRelationshipSubjectIssuerMatch, "issuer matches the candidate CA's subject"));
    } else {
        out.push(SecurityJudgement::new(JudgementCode::CaRelationshipSubjectIssuerMismatch, "issuer does not match the candidate CA's subject"));
    }

    if !issuer_extensions.is_ca {
        out.push(SecurityJudgement::new(JudgementCode::CaRelationshipIssuerNotCa, "candidate issuer's BasicConstraints does not mark it as a CA"));
    }

    if let Some(aki) = &subject_extensions.authority_key_identifier {
        if let (Some(aki_key_id), Some(issuer_ski)) = (&aki.key_identifier, &issuer_extensions.subject_key_identifier) {
            if aki_key_id == issuer_ski {
                out.push(SecurityJudgement::new(JudgementCode::CaRelationshipAkiKeyIdMatch, "authorityKeyIdentifier matches the candidate CA's subjectKeyIdentifier"));
            } else {
                out.push(SecurityJudgement::new(JudgementCode::CaRelationshipAkiKeyIdMismatch, "authorityKeyIdentifier does not match the candidate CA's subjectKeyIdentifier"));
            }
        }

        if let Some(aki_serial) = &aki.cert_serial {
            if *aki_serial == issuer_cert.tbs_certificate.serial_number {
                out.push(SecurityJudgement::new(JudgementCode::CaRelationshipSerialMatch, "authorityCertSerialNumber matches the candidate CA's serialNumber"));
            } else {
                out.push(SecurityJudgement::new(JudgementCode::CaRelationshipSerialMismatch, "authorityCertSerialNumber does not match the candidate CA's serialNumber"));
            }
        }

        if let Some(cert_issuer_names) = &aki.cert_issuer {
            let matches_some_name = cert_issuer_names.iter().any(|name| match name {
                pkix::GeneralName::DirectoryName(dn) => dn.matches(&issuer_cert.tbs_certificate.subject),
                _ => false,
            });
            if !matches_some_name {
                out.push(SecurityJudgement::new(
                    JudgementCode::CaRelationshipAuthorityCertIssuerMismatch,
                    "authorityCertIssuer does not name the candidate CA's subject",
                ));
            }
        }
    }

    let subj_validity = &subject_cert.tbs_certificate.validity;
    let issuer_validity = &issuer_cert.tbs_certificate.validity;
    match (
        subj_validity.not_before.value,
        subj_validity.not_after.value,
        issuer_validity.not_before.value,
        issuer_validity.not_after.value,
    ) {
        (Some(subj_nb), Some(subj_na), Some(issuer_nb), Some(issuer_na)) => {
            let overlap_start = subj_nb.max(issuer_nb);
            let overlap_end = subj_na.min(issuer_na);

            if overlap_start > overlap_end {
                out.push(SecurityJudgement::new(JudgementCode::CaRelationshipValidityNoOverlap, "certificate and issuer validity periods do not overlap at all"));
            } else if subj_nb >= issuer_nb && subj_na <= issuer_na {
                out.push(SecurityJudgement::new(JudgementCode::CaRelationshipValidityFullOverlap, "certificate validity is fully contained within the issuer's"));
            } else {
                out.push(SecurityJudgement::new(
                    JudgementCode::CaRelationshipValidityPartialOverlap,
                    "certificate validity extends beyond the issuer's own validity period",
                ));
            }
        }
        _ => {
            out.push(SecurityJudgement::new(
                JudgementCode::CaRelationshipValidityTimestampMalformed,
                "certificate or issuer validity timestamp does not parse as a well-formed timestamp",
            ));
        }
    }

    if subject_cert.tbs_certificate.version < issuer_cert.tbs_certificate.version {
        out.push(SecurityJudgement::new(
            JudgementCode::CaRelationshipVersionDowngrade,
            "certificate uses an older X.509 version than its issuer",
        ));
    }

    let tbs_der = &subject_cert.tbs_certificate.raw;
    let outcome = verifier.verify(
        tbs_der,
        &subject_cert.signature_algorithm,
        &subject_cert.signature_value.bytes,
        &issuer_cert.tbs_certificate.subject_public_key_info,
    );
    match outcome {
        VerifyOutcome::Valid => out.push(SecurityJudgement::new(JudgementCode::CaRelationshipSignatureVerificationSuccess, "signature verifies against the candidate CA's public key")),
        VerifyOutcome::Invalid => out.push(SecurityJudgement::new(JudgementCode::CaRelationshipSignatureVerificationFailure, "signature does not verify against the candidate CA's public key")),
        VerifyOutcome::Unsupported => {}
    }

    let sig_oid = &subject_cert.signature_algorithm.algorithm;
    let is_ecdsa_signature = *sig_oid == *pkix::oid::ECDSA_SHA1
        || *sig_oid == *pkix::oid::ECDSA_SHA256
        || *sig_oid == *pkix::oid::ECDSA_SHA384
        || *sig_oid == *pkix::oid::ECDSA_SHA512;
    if is_ecdsa_signature && issuer_cert.tbs_certificate.subject_public_key_info.algorithm.algorithm == *pkix::oid::EC_PUBLIC_KEY {
        if let Ok(crate::pubkey::ecdsa::EcParameters::Named(curve_oid)) =
            crate::pubkey::ecdsa::decode_ec_parameters(&issuer_cert.tbs_certificate.subject_public_key_info.algorithm)
        {
            if let Some(curve) = crate::pubkey::curve::by_oid(&curve_oid) {
                out.extend(crate::pubkey::ecdsa::analyze_signature(&subject_cert.signature_value.bytes, curve.bits));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysValid;
    impl SignatureVerifier for AlwaysValid {
        fn verify(&self, _: &[u8], _: &pkix::AlgorithmIdentifier, _: &[u8], _: &pkix::SubjectPublicKeyInfo) -> VerifyOutcome {
            VerifyOutcome::Valid
        }
    }

    fn sample_alg() -> pkix::AlgorithmIdentifier {
        pkix::AlgorithmIdentifier {
            algorithm: pkix::oid::RSA_ENCRYPTION.clone(),
            parameters: None,
            raw: vec![],
        }
    }

    fn sample_spki() -> pkix::SubjectPublicKeyInfo {
        pkix::SubjectPublicKeyInfo {
            algorithm: sample_alg(),
            subject_public_key: asn::types::BitString { bytes: bytes::Bytes::new(), unused_bits: 0 },
            raw: vec![],
        }
    }

    fn sample_validity(not_before: Option<chrono::DateTime<chrono::Utc>>, not_after: Option<chrono::DateTime<chrono::Utc>>) -> pkix::Validity {
        pkix::Validity {
            not_before: pkix::Time { value: not_before, encoding: pkix::TimeEncoding::Utc },
            not_after: pkix::Time { value: not_after, encoding: pkix::TimeEncoding::Utc },
        }
    }

    fn sample_cert(validity: pkix::Validity) -> pkix::Certificate {
        let tbs = pkix::TbsCertificate {
            version: 3,
            serial_number: math::big::BigInt::from(1i64),
            signature: sample_alg(),
            issuer: pkix::DistinguishedName { rdns: vec![] },
            validity,
            subject: pkix::DistinguishedName { rdns: vec![] },
            subject_public_key_info: sample_spki(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: None,
            raw: bytes::Bytes::new(),
        };
        pkix::Certificate {
            signature_algorithm: tbs.signature.clone(),
            tbs_certificate: tbs,
            signature_value: asn::types::BitString { bytes: bytes::Bytes::new(), unused_bits: 0 },
        }
    }

    #[test]
    fn reports_signature_success_from_stub() {
        let verifier = AlwaysValid;
        assert_eq!(verifier.verify(b"", &sample_alg(), b"", &sample_spki()), VerifyOutcome::Valid);
    }

    #[test]
    fn flags_malformed_validity_timestamp() {
        use chrono::TimeZone;

        let subject = sample_cert(sample_validity(Some(chrono::Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()), None));
        let issuer = sample_cert(sample_validity(
            Some(chrono::Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
            Some(chrono::Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
        ));

        let subject_extensions = crate::extensions::analyze(&[], &subject.tbs_certificate.subject, b"", false, 0);
        let issuer_extensions = crate::extensions::analyze(&[], &issuer.tbs_certificate.subject, b"", true, 0);

        let out = analyze(&subject, &subject_extensions, &issuer, &issuer_extensions, &AlwaysValid);
        assert!(out.has_code(JudgementCode::CaRelationshipValidityTimestampMalformed));
        assert!(!out.has_code(JudgementCode::CaRelationshipValidityFullOverlap));
        assert!(!out.has_code(JudgementCode::CaRelationshipValidityNoOverlap));
        assert!(!out.has_code(JudgementCode::CaRelationshipValidityPartialOverlap));
    }
}
