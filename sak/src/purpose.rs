//! Checks a certificate's stated capabilities (KeyUsage/ExtendedKeyUsage/
//! BasicConstraints) against a declared or inferred role, and matches a
//! hostname against SubjectAltName/CN the way a TLS client would.

use pkix::Certificate;

use crate::codes::JudgementCode;
use crate::config::Purpose;
use crate::extensions::key_usage::KeyUsageFlags;
use crate::extensions::ns_cert_type::NsCertTypeFlags;
use crate::extensions::ExtensionsAnalysis;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

pub fn analyze_role(
    extensions: &ExtensionsAnalysis,
    key_usage: Option<KeyUsageFlags>,
    ekus: &[asn::ObjectIdentifier],
    ns_cert_type: Option<NsCertTypeFlags>,
    role: Purpose,
) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();
    let ku = key_usage.unwrap_or_default();
    let has_eku = |oid: &asn::ObjectIdentifier| ekus.iter().any(|e| e == oid) || ekus.iter().any(|e| *e == *pkix::oid::EKU_ANY);

    match role {
        Purpose::TlsServer => {
            if !ku.digital_signature {
                out.push(SecurityJudgement::new(
                    JudgementCode::PurposeTlsServerMissingDigitalSignature,
                    "TLS server certificate lacks the digitalSignature KeyUsage bit",
                ));
            }
            if !ku.key_encipherment && !ku.key_agreement {
                out.push(SecurityJudgement::new(
                    JudgementCode::PurposeTlsServerMissingKeyEncipherment,
                    "TLS server certificate lacks keyEncipherment/keyAgreement KeyUsage",
                ));
            }
            if !ekus.is_empty() && !has_eku(&pkix::oid::EKU_SERVER_AUTH) {
                out.push(SecurityJudgement::new(
                    JudgementCode::PurposeTlsServerMissingEku,
                    "ExtendedKeyUsage is present but does not include serverAuth",
                ));
            }
        }
        Purpose::TlsClient => {
            if !ku.digital_signature {
                out.push(SecurityJudgement::new(
                    JudgementCode::PurposeTlsClientMissingDigitalSignature,
                    "TLS client certificate lacks the digitalSignature KeyUsage bit",
                ));
            }
            if !ekus.is_empty() && !has_eku(&pkix::oid::EKU_CLIENT_AUTH) {
                out.push(SecurityJudgement::new(
                    JudgementCode::PurposeTlsClientMissingEku,
                    "ExtendedKeyUsage is present but does not include clientAuth",
                ));
            }
        }
        Purpose::Ca => {
            if extensions.basic_constraints.is_none() {
                out.push(SecurityJudgement::new(JudgementCode::PurposeCaMissingBasicConstraints, "certificate has no BasicConstraints extension"));
            }
            if !ku.key_cert_sign {
                out.push(SecurityJudgement::new(JudgementCode::PurposeCaMissingKeyCertSign, "certificate lacks the keyCertSign KeyUsage bit"));
            }
        }
    }

    if extensions.is_ca && role != Purpose::Ca {
        out.push(SecurityJudgement::new(JudgementCode::CertUnexpectedlyCa, "certificate is marked as a CA but is being used in a non-CA role"));
    }
    if !extensions.is_ca && role == Purpose::Ca {
        out.push(SecurityJudgement::new(JudgementCode::CertUnexpectedlyNotCa, "certificate is being used as a CA but BasicConstraints does not mark it as one"));
    }
    if role != Purpose::TlsServer && has_eku(&pkix::oid::EKU_SERVER_AUTH) && ku.digital_signature {
        out.push(SecurityJudgement::new(JudgementCode::CertUnexpectedlyServerCapable, "certificate is capable of TLS server use outside its expected role"));
    }
    if role != Purpose::TlsClient && has_eku(&pkix::oid::EKU_CLIENT_AUTH) && ku.digital_signature {
        out.push(SecurityJudgement::new(JudgementCode::CertUnexpectedlyClientCapable, "certificate is capable of TLS client use outside its expected role"));
    }

    if let Some(nct) = ns_cert_type {
        let role_bit = match role {
            Purpose::TlsServer => nct.ssl_server,
            Purpose::TlsClient => nct.ssl_client,
            Purpose::Ca => nct.ssl_ca,
        };
        if !role_bit {
            out.push(SecurityJudgement::new(
                JudgementCode::PurposeNsCertTypeMismatch,
                "NSCertType extension is present but does not include the bit matching this role",
            ));
        }
    }

    out
}

fn split_labels(name: &str) -> Vec<&str> {
    name.split('.').collect()
}

/// RFC 6125 §6.4.1/§6.4.3: a presented identifier's wildcard may only stand
/// for a single, whole, leftmost label; comparison of the remaining labels
/// is case-insensitive and exact.
fn hostname_matches_pattern(hostname: &str, pattern: &str) -> bool {
    let host_labels = split_labels(hostname);
    let pattern_labels = split_labels(pattern);
    if host_labels.len() != pattern_labels.len() {
        return false;
    }

    for (i, (h, p)) in host_labels.iter().zip(pattern_labels.iter()).enumerate() {
        if i == 0 && *p == "*" {
            continue;
        }
        if !h.eq_ignore_ascii_case(p) {
            return false;
        }
    }
    true
}

/// Matches a hostname against a certificate's SubjectAltName dNSNames,
/// falling back to the subject's commonName only when no dNSName entries
/// exist at all (RFC 6125 §6.4.4 deprecates the CN fallback once a SAN is
/// present, regardless of whether any dNSName within it matches).
pub fn analyze_hostname(cert: &Certificate, extensions: &ExtensionsAnalysis, hostname: &str) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let dns_names: Vec<&str> = extensions
        .subject_alt_names
        .iter()
        .filter_map(|name| match name {
            pkix::GeneralName::DnsName(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();

    if !dns_names.is_empty() {
        let matched = dns_names.iter().any(|pattern| hostname_matches_pattern(hostname, pattern));
        if matched {
            out.push(SecurityJudgement::new(JudgementCode::PurposeHostnameMatch, format!("{} matches a SubjectAltName dNSName", hostname)));
        } else {
            out.push(SecurityJudgement::new(JudgementCode::PurposeHostnameMismatch, format!("{} does not match any SubjectAltName dNSName", hostname)));
        }
        return out;
    }

    match cert.tbs_certificate.subject.common_name() {
        Some(cn) if hostname_matches_pattern(hostname, cn) => {
            out.push(SecurityJudgement::new(JudgementCode::PurposeHostnameMatch, format!("{} matches the subject commonName", hostname)));
            if cert.tbs_certificate.subject.rdns.iter().any(|rdn| rdn.is_multi_valued() && rdn.attrs.iter().any(|a| a.attr_type == *pkix::oid::AT_COMMON_NAME)) {
                out.push(SecurityJudgement::new(
                    JudgementCode::CertCnMatchMultiValueRdn,
                    "hostname matched a commonName that shares a multi-valued RDN with other attributes",
                ));
            }
        }
        _ => {
            out.push(SecurityJudgement::new(JudgementCode::PurposeHostnameMismatch, format!("{} does not match the subject commonName and no SubjectAltName is present", hostname)));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_matches_single_leftmost_label() {
        assert!(hostname_matches_pattern("www.example.com", "*.example.com"));
        assert!(!hostname_matches_pattern("a.b.example.com", "*.example.com"));
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        assert!(hostname_matches_pattern("Example.com", "example.com"));
    }

    #[test]
    fn ca_role_without_key_cert_sign_is_flagged() {
        let extensions = ExtensionsAnalysis {
            is_ca: true,
            basic_constraints: None,
            subject_key_identifier: None,
            authority_key_identifier: None,
            subject_alt_names: vec![],
            name_constraints: None,
            ns_cert_type: None,
            per_extension: vec![],
            set_level: SecurityJudgements::new(),
        };
        let out = analyze_role(&extensions, Some(KeyUsageFlags::default()), &[], None, Purpose::Ca);
        assert!(out.has_code(JudgementCode::PurposeCaMissingKeyCertSign));
    }

    #[test]
    fn ns_cert_type_role_mismatch_is_flagged() {
        let extensions = ExtensionsAnalysis {
            is_ca: false,
            basic_constraints: None,
            subject_key_identifier: None,
            authority_key_identifier: None,
            subject_alt_names: vec![],
            name_constraints: None,
            ns_cert_type: None,
            per_extension: vec![],
            set_level: SecurityJudgements::new(),
        };
        let nct = NsCertTypeFlags {
            ssl_client: true,
            ..Default::default()
        };
        let out = analyze_role(&extensions, Some(KeyUsageFlags::default()), &[], Some(nct), Purpose::TlsServer);
        assert!(out.has_code(JudgementCode::PurposeNsCertTypeMismatch));
    }
}
