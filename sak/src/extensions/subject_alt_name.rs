//! `SubjectAltName` / `IssuerAltName` (RFC 5280 §4.2.1.6/.7): `SEQUENCE OF GeneralName`.
//!
//! Shared by both extensions since they carry the same `GeneralNames` type;
//! the caller picks which judgement codes apply (subject vs issuer) for the
//! couple of checks that differ between the two.

use asn::Element;
use common::errors::Result;
use pkix::{DistinguishedName, Extension, GeneralName};

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

pub fn decode(ext: &Extension) -> Result<Vec<GeneralName>> {
    let fields = Element::read_all(&ext.value)?;
    fields.iter().map(GeneralName::decode).collect()
}

/// Checks a `dNSName` entry for the wildcard rules this engine enforces:
/// at most one `*`, only as the leftmost label, and not so generic a
/// wildcard that it would match an entire public-suffix-adjacent level
/// (fewer than 3 labels total, e.g. `*.com`).
fn check_wildcard_domain(name: &str) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();
    if !name.contains('*') {
        return out;
    }

    let labels: Vec<&str> = name.split('.').collect();
    let wildcard_labels = labels.iter().filter(|l| l.contains('*')).count();

    if wildcard_labels > 1 {
        out.push(SecurityJudgement::new(
            JudgementCode::SubjectAltNameBadWildcardDomainMultiple,
            format!("{} contains more than one wildcard label", name),
        ));
        return out;
    }

    if labels.first().map(|l| l.contains('*')) != Some(true) {
        out.push(SecurityJudgement::new(
            JudgementCode::SubjectAltNameBadWildcardDomainNotLeftmost,
            format!("{} has a wildcard that is not in the leftmost label", name),
        ));
        return out;
    }

    if labels[0] != "*" {
        out.push(SecurityJudgement::new(
            JudgementCode::SubjectAltNameBadWildcardDomainNotLeftmost,
            format!("{} mixes a wildcard with other characters in the leftmost label", name),
        ));
    }

    if labels.len() < 3 {
        out.push(SecurityJudgement::new(
            JudgementCode::SubjectAltNameBadWildcardDomainTooGeneric,
            format!("{} is a wildcard over too few labels to be specific", name),
        ));
    }

    out
}

pub fn analyze(ext: &Extension, names: &[GeneralName], subject: &DistinguishedName, is_issuer_alt_name: bool) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if names.is_empty() {
        let code = if is_issuer_alt_name {
            JudgementCode::IssuerAltNameEmpty
        } else {
            JudgementCode::SubjectAltNameEmpty
        };
        out.push(SecurityJudgement::new(code, "AltName extension is present but empty"));
        return out;
    }

    if !is_issuer_alt_name {
        if subject.is_empty() && !ext.critical {
            out.push(SecurityJudgement::new(
                JudgementCode::SubjectAltNameNotCriticalWithEmptySubject,
                "subject is empty but SubjectAltName is not critical",
            ));
        }

        let only_email = names.iter().all(|n| matches!(n, GeneralName::Rfc822Name(_)));
        if only_email && !subject.is_empty() {
            out.push(SecurityJudgement::new(
                JudgementCode::SubjectAltNameEmailOnlyWithNonEmptySubject,
                "SubjectAltName contains only email addresses despite a non-empty subject",
            ));
        }
    }

    for name in names {
        match name {
            GeneralName::DnsName(dns) => {
                if dns.is_empty() || dns.split('.').any(|label| label.is_empty()) {
                    out.push(SecurityJudgement::new(
                        JudgementCode::SubjectAltNameBadDnsLabel,
                        format!("{:?} contains an empty DNS label", dns),
                    ));
                }
                out.extend(check_wildcard_domain(dns));
            }
            GeneralName::Uri(uri) => {
                if !uri.contains("://") {
                    out.push(SecurityJudgement::new(
                        JudgementCode::SubjectAltNameBadUriScheme,
                        format!("{:?} is missing a URI scheme", uri),
                    ));
                }
            }
            GeneralName::IpAddress(ip) => {
                if ip.len() != 4 && ip.len() != 16 {
                    out.push(SecurityJudgement::new(
                        JudgementCode::SubjectAltNameBadIpLength,
                        format!("iPAddress is {} bytes, neither an IPv4 (4) nor IPv6 (16) address", ip.len()),
                    ));
                }
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_non_leftmost_wildcard() {
        let out = check_wildcard_domain("foo.*.example.com");
        assert!(out.has_code(JudgementCode::SubjectAltNameBadWildcardDomainNotLeftmost));
    }

    #[test]
    fn flags_too_generic_wildcard() {
        let out = check_wildcard_domain("*.com");
        assert!(out.has_code(JudgementCode::SubjectAltNameBadWildcardDomainTooGeneric));
    }

    #[test]
    fn accepts_reasonable_wildcard() {
        let out = check_wildcard_domain("*.example.com");
        assert!(out.is_empty());
    }

    #[test]
    fn flags_multiple_wildcards() {
        let out = check_wildcard_domain("*.*.example.com");
        assert!(out.has_code(JudgementCode::SubjectAltNameBadWildcardDomainMultiple));
    }

    fn san_ext() -> Extension {
        Extension {
            oid: pkix::oid::EXT_SUBJECT_ALT_NAME.clone(),
            critical: false,
            value: vec![],
        }
    }

    #[test]
    fn flags_ip_address_of_bad_length() {
        let names = vec![GeneralName::IpAddress(vec![1, 2, 3])];
        let out = analyze(&san_ext(), &names, &DistinguishedName { rdns: vec![] }, false);
        assert!(out.has_code(JudgementCode::SubjectAltNameBadIpLength));
    }

    #[test]
    fn accepts_ipv4_and_ipv6_lengths() {
        let names = vec![GeneralName::IpAddress(vec![0; 4]), GeneralName::IpAddress(vec![0; 16])];
        let out = analyze(&san_ext(), &names, &DistinguishedName { rdns: vec![] }, false);
        assert!(!out.has_code(JudgementCode::SubjectAltNameBadIpLength));
    }

    #[test]
    fn decode_then_analyze_reaches_bad_ip_length_from_raw_der() {
        // [7] IMPLICIT OCTET STRING (iPAddress), 3 octets: a malformed length
        // that must still decode rather than failing the whole SEQUENCE.
        let mut ext = san_ext();
        ext.value = vec![0x87, 0x03, 1, 2, 3];
        let names = decode(&ext).unwrap();
        let out = analyze(&ext, &names, &DistinguishedName { rdns: vec![] }, false);
        assert!(out.has_code(JudgementCode::SubjectAltNameBadIpLength));
    }
}
