//! End-to-end fixtures built from hand-assembled DER, one per concrete
//! scenario this engine is expected to catch, plus the handful of
//! properties that should hold for every input.

use asn::ObjectIdentifier;
use pkix::Certificate;
use sak::codes::JudgementCode;

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    assert!(content.len() < 128, "fixtures only need the short length form");
    let mut out = vec![tag, content.len() as u8];
    out.extend_from_slice(content);
    out
}

fn oid_der(oid: &ObjectIdentifier) -> Vec<u8> {
    tlv(0x06, &oid.to_der())
}

fn null_der() -> Vec<u8> {
    vec![0x05, 0x00]
}

fn alg_id_der(oid: &ObjectIdentifier) -> Vec<u8> {
    let mut content = oid_der(oid);
    content.extend_from_slice(&null_der());
    tlv(0x30, &content)
}

fn empty_name_der() -> Vec<u8> {
    tlv(0x30, &[])
}

fn int_der(magnitude_be: &[u8]) -> Vec<u8> {
    tlv(0x02, magnitude_be)
}

fn utc_time_der(s: &str) -> Vec<u8> {
    tlv(0x17, s.as_bytes())
}

fn bit_string_der(content: &[u8]) -> Vec<u8> {
    let mut v = vec![0u8];
    v.extend_from_slice(content);
    tlv(0x03, &v)
}

fn rsa_spki_der(modulus: &[u8], exponent: &[u8]) -> Vec<u8> {
    let mut key = int_der(modulus);
    key.extend_from_slice(&int_der(exponent));
    let key_seq = tlv(0x30, &key);

    let mut spki = alg_id_der(&pkix::oid::RSA_ENCRYPTION);
    spki.extend_from_slice(&bit_string_der(&key_seq));
    tlv(0x30, &spki)
}

/// Assembles a minimal, otherwise-unremarkable certificate around the
/// given serial number bytes and RSA key, so each scenario only has to
/// vary the one field it's testing.
fn certificate_der(serial: &[u8], modulus: &[u8], exponent: &[u8]) -> Vec<u8> {
    let sig_alg = alg_id_der(&pkix::oid::RSA_SHA256);

    let mut validity = utc_time_der("250101000000Z");
    validity.extend_from_slice(&utc_time_der("260101000000Z"));
    let validity = tlv(0x30, &validity);

    let mut tbs = vec![];
    tbs.extend_from_slice(&int_der(serial));
    tbs.extend_from_slice(&sig_alg);
    tbs.extend_from_slice(&empty_name_der());
    tbs.extend_from_slice(&validity);
    tbs.extend_from_slice(&empty_name_der());
    tbs.extend_from_slice(&rsa_spki_der(modulus, exponent));
    let tbs = tlv(0x30, &tbs);

    let mut cert = tbs;
    cert.extend_from_slice(&sig_alg);
    cert.extend_from_slice(&bit_string_der(&[0xAA, 0xBB]));
    tlv(0x30, &cert)
}

#[test]
fn negative_serial_is_flagged_without_also_flagging_zero() {
    let der = certificate_der(&[0xFF], &[0x0c, 0xb1], &[0x01, 0x00, 0x01]);
    let cert = Certificate::decode_der(&der).unwrap();
    let judgements = sak::body::analyze(&cert);
    assert!(judgements.has_code(JudgementCode::CertSerialNegative));
    assert!(!judgements.has_code(JudgementCode::CertSerialZero));
}

#[test]
fn rsa_exponent_of_one_has_zero_security_bits() {
    // modulus 3233 = 61 * 53, composite-looking, exponent 1.
    let der = certificate_der(&[0x01], &[0x0c, 0xa1], &[0x01]);
    let cert = Certificate::decode_der(&der).unwrap();
    let analysis = sak::pubkey::analyze(&cert.tbs_certificate.subject_public_key_info, false, 1000, None);
    let found = analysis.judgements.iter().find(|j| j.code == JudgementCode::PublicKeyRsaExponentOne).expect("exponent-one judgement");
    assert_eq!(found.bits, Some(0));
}

#[test]
fn ecdsa_point_not_on_curve_is_flagged() {
    use sak::pubkey::ecdsa::{analyze, EcParameters};

    let p256 = ObjectIdentifier::from_dotted_str("1.2.840.10045.3.1.7").unwrap();
    let mut point = vec![0x04u8];
    point.extend_from_slice(&[0x11; 32]); // x
    point.extend_from_slice(&[0x22; 32]); // y, not on the curve
    let judgements = analyze(&EcParameters::Named(p256), &point);
    assert!(judgements.has_code(JudgementCode::PublicKeyEccPublicKeyPointNotOnCurve));
}

#[test]
fn aki_ski_mismatch_is_flagged_alongside_signature_failure_and_name_match() {
    use pkix::{AlgorithmIdentifier, DistinguishedName, SubjectPublicKeyInfo};
    use sak::ca_relationship::analyze as analyze_relationship;
    use sak::extensions::key_identifier::AuthorityKeyIdentifier;
    use sak::extensions::ExtensionsAnalysis;
    use sak::judgement::SecurityJudgements;
    use sak::signature_verifier::{SignatureVerifier, VerifyOutcome};

    struct AlwaysInvalid;
    impl SignatureVerifier for AlwaysInvalid {
        fn verify(&self, _: &[u8], _: &AlgorithmIdentifier, _: &[u8], _: &SubjectPublicKeyInfo) -> VerifyOutcome {
            VerifyOutcome::Invalid
        }
    }

    let shared_name = DistinguishedName { rdns: vec![] };

    let subject_der = certificate_der(&[0x01], &[0x0c, 0xa1], &[0x01, 0x00, 0x01]);
    let issuer_der = certificate_der(&[0x02], &[0x0c, 0xa1], &[0x01, 0x00, 0x01]);
    let subject_cert = Certificate::decode_der(&subject_der).unwrap();
    let issuer_cert = Certificate::decode_der(&issuer_der).unwrap();

    let subject_extensions = ExtensionsAnalysis {
        is_ca: false,
        basic_constraints: None,
        subject_key_identifier: None,
        authority_key_identifier: Some(AuthorityKeyIdentifier {
            key_identifier: Some(vec![0xAA; 20]),
            cert_issuer: None,
            cert_serial: None,
        }),
        subject_alt_names: vec![],
        name_constraints: None,
        ns_cert_type: None,
        per_extension: vec![],
        set_level: SecurityJudgements::new(),
    };
    let issuer_extensions = ExtensionsAnalysis {
        is_ca: true,
        basic_constraints: None,
        subject_key_identifier: Some(vec![0xBB; 20]),
        authority_key_identifier: None,
        subject_alt_names: vec![],
        name_constraints: None,
        ns_cert_type: None,
        per_extension: vec![],
        set_level: SecurityJudgements::new(),
    };

    let _ = &shared_name; // both certs already share the same empty issuer/subject Name.

    let judgements = analyze_relationship(&subject_cert, &subject_extensions, &issuer_cert, &issuer_extensions, &AlwaysInvalid);

    assert!(judgements.has_code(JudgementCode::CaRelationshipAkiKeyIdMismatch));
    assert!(judgements.has_code(JudgementCode::CaRelationshipSignatureVerificationFailure));
    assert!(judgements.has_code(JudgementCode::CaRelationshipSubjectIssuerMatch));
}

#[test]
fn wildcard_not_leftmost_is_flagged() {
    use sak::extensions::subject_alt_name::decode;
    use pkix::{DistinguishedName, Extension};

    let dns_name_tlv = tlv(0x82, b"foo.*.example.com");
    let ext = Extension {
        oid: pkix::oid::EXT_SUBJECT_ALT_NAME.clone(),
        critical: false,
        value: dns_name_tlv,
    };
    let names = decode(&ext).unwrap();
    let subject = DistinguishedName { rdns: vec![] };
    let judgements = sak::extensions::subject_alt_name::analyze(&ext, &names, &subject, false);
    assert!(judgements.has_code(JudgementCode::SubjectAltNameBadWildcardDomainNotLeftmost));
}

#[test]
fn ct_sct_with_disallowed_hash_is_flagged() {
    use pkix::Extension;
    use sak::extensions::ct_scts::{analyze, decode};

    const LOG_ID_LEN: usize = 32;
    let mut sct = vec![0u8]; // version v1
    sct.extend_from_slice(&[0u8; LOG_ID_LEN]);
    sct.extend_from_slice(&2_000_000_000_000u64.to_be_bytes()); // plausible timestamp
    sct.extend_from_slice(&[0, 0]); // no extensions
    sct.push(5); // hash_algorithm = sha384, disallowed
    sct.push(1); // signature_algorithm = rsa
    sct.extend_from_slice(&[0, 2, 0xAA, 0xBB]);

    let mut list = (sct.len() as u16).to_be_bytes().to_vec();
    list.extend_from_slice(&sct);
    let mut payload = (list.len() as u16).to_be_bytes().to_vec();
    payload.extend_from_slice(&list);

    let ext = Extension {
        oid: pkix::oid::EXT_CT_PRECERT_SCTS.clone(),
        critical: false,
        value: tlv(0x04, &payload),
    };

    let scts = decode(&ext).unwrap();
    let judgements = analyze(&ext, &scts, 2_000_000_000_000);
    assert!(judgements.has_code(JudgementCode::CertificateTransparencySctsSctInvalidHashFunction));
}

#[test]
fn determinism_same_input_same_codes() {
    let der = certificate_der(&[0xFF], &[0x0c, 0xa1], &[0x01]);
    let cert = Certificate::decode_der(&der).unwrap();
    let first: Vec<JudgementCode> = sak::body::analyze(&cert).iter().map(|j| j.code).collect();
    let second: Vec<JudgementCode> = sak::body::analyze(&cert).iter().map(|j| j.code).collect();
    assert_eq!(first, second);
}

#[test]
fn additivity_driver_output_is_the_union_of_its_analyzers() {
    let der = certificate_der(&[0xFF], &[0x0c, 0xa1], &[0x01]);
    let cert = Certificate::decode_der(&der).unwrap();
    let config = sak::config::AnalysisConfig::default();
    let verifier = sak::signature_verifier::InProcessVerifier;

    let body_codes: std::collections::HashSet<_> = sak::body::analyze(&cert).iter().map(|j| j.code).collect();
    let pubkey_codes: std::collections::HashSet<_> = sak::pubkey::analyze(&cert.tbs_certificate.subject_public_key_info, false, 1000, None)
        .judgements
        .iter()
        .map(|j| j.code)
        .collect();

    let report = sak::report::analyze_certificate("fixture", &cert, None, &config, &verifier, None, 0);
    let report_codes: std::collections::HashSet<_> = report.security.iter().map(|j| j.code).collect();

    assert!(body_codes.is_subset(&report_codes));
    assert!(pubkey_codes.is_subset(&report_codes));
}

#[test]
fn der_round_trips_through_the_reader() {
    // The reader keeps each field's raw TLV (rather than re-deriving it from
    // the parsed struct), so the TBSCertificate bytes it hands back must be
    // an exact prefix of the input, and decoding twice must agree.
    let der = certificate_der(&[0x2A], &[0x0c, 0xa1], &[0x01, 0x00, 0x01]);
    let cert = Certificate::decode_der(&der).unwrap();
    let cert_again = Certificate::decode_der(&der).unwrap();
    assert!(der.starts_with(cert.tbs_certificate.raw.as_ref()));
    assert_eq!(cert.tbs_certificate.raw.as_ref(), cert_again.tbs_certificate.raw.as_ref());
}

#[test]
fn verdict_lattice_monotonicity_matches_the_bits_table() {
    use sak::judgement::Verdict;

    assert!(Verdict::NoSecurity < Verdict::BrokenSecurity);
    assert!(Verdict::BrokenSecurity < Verdict::WeakSecurity);
    assert!(Verdict::WeakSecurity < Verdict::MediumSecurity);
    assert!(Verdict::MediumSecurity < Verdict::HighSecurity);
    assert!(Verdict::HighSecurity < Verdict::BestInClass);

    assert_eq!(sak::bits::bits_to_verdict(0), Verdict::BrokenSecurity);
    assert_eq!(sak::bits::bits_to_verdict(127), Verdict::HighSecurity);
    assert_eq!(sak::bits::bits_to_verdict(128), Verdict::BestInClass);
}
