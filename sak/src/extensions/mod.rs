//! Per-extension dispatch and set-level checks across the whole
//! `Extensions` SEQUENCE of a certificate.

pub mod basic_constraints;
pub mod certificate_policies;
pub mod crl_distribution_points;
pub mod ct_precert_poison;
pub mod ct_scts;
pub mod extended_key_usage;
pub mod key_identifier;
pub mod key_usage;
pub mod name_constraints;
pub mod ns_cert_type;
pub mod subject_alt_name;

use std::collections::HashSet;

use asn::ObjectIdentifier;
use pkix::{DistinguishedName, Extension};

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

pub struct ExtensionAnalysis {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    pub judgements: SecurityJudgements,
}

pub struct ExtensionsAnalysis {
    pub is_ca: bool,
    pub basic_constraints: Option<basic_constraints::BasicConstraints>,
    pub subject_key_identifier: Option<Vec<u8>>,
    pub authority_key_identifier: Option<key_identifier::AuthorityKeyIdentifier>,
    pub subject_alt_names: Vec<pkix::GeneralName>,
    pub name_constraints: Option<name_constraints::NameConstraints>,
    pub ns_cert_type: Option<ns_cert_type::NsCertTypeFlags>,
    pub per_extension: Vec<ExtensionAnalysis>,
    pub set_level: SecurityJudgements,
}

fn decode_analyze<T, D, A>(ext: &Extension, decode: D, analyze: A) -> SecurityJudgements
where
    D: FnOnce(&Extension) -> common::errors::Result<T>,
    A: FnOnce(&Extension, &T) -> SecurityJudgements,
{
    match decode(ext) {
        Ok(value) => analyze(ext, &value),
        Err(_) => {
            let mut out = SecurityJudgements::new();
            out.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, format!("{} could not be decoded", ext.oid)));
            out
        }
    }
}

pub fn analyze(extensions: &[Extension], subject: &DistinguishedName, spki_key_bits: &[u8], is_self_signed_root: bool, now_ms: u64) -> ExtensionsAnalysis {
    let mut set_level = SecurityJudgements::new();

    let mut seen = HashSet::new();
    for ext in extensions {
        if !seen.insert(ext.oid.clone()) {
            set_level.push(SecurityJudgement::new(
                JudgementCode::CertExtensionDuplicate,
                format!("extension {} appears more than once", ext.oid),
            ));
        }
    }

    let basic_constraints = extensions
        .iter()
        .find(|e| e.oid == *pkix::oid::EXT_BASIC_CONSTRAINTS)
        .and_then(|e| basic_constraints::decode(e).ok());
    let is_ca = basic_constraints.map(|bc| bc.is_ca).unwrap_or(false);

    let mut subject_key_identifier = None;
    let mut authority_key_identifier = None;
    let mut subject_alt_names = vec![];
    let mut name_constraints_value = None;
    let mut ns_cert_type_value = None;
    let mut key_usage_flags = None;

    let mut per_extension = Vec::with_capacity(extensions.len());

    for ext in extensions {
        let oid = &ext.oid;

        let judgements = if *oid == *pkix::oid::EXT_BASIC_CONSTRAINTS {
            decode_analyze(ext, basic_constraints::decode, |e, bc| basic_constraints::analyze(e, bc))
        } else if *oid == *pkix::oid::EXT_KEY_USAGE {
            match key_usage::decode(ext) {
                Ok((bs, flags)) => {
                    key_usage_flags = Some(flags);
                    key_usage::analyze(ext, &bs, flags, is_ca)
                }
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, "KeyUsage could not be decoded"));
                    j
                }
            }
        } else if *oid == *pkix::oid::EXT_EXTENDED_KEY_USAGE {
            decode_analyze(ext, extended_key_usage::decode, |e, ekus| extended_key_usage::analyze(e, ekus))
        } else if *oid == *pkix::oid::EXT_SUBJECT_ALT_NAME {
            match subject_alt_name::decode(ext) {
                Ok(names) => {
                    subject_alt_names = names.clone();
                    subject_alt_name::analyze(ext, &names, subject, false)
                }
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, "SubjectAltName could not be decoded"));
                    j
                }
            }
        } else if *oid == *pkix::oid::EXT_ISSUER_ALT_NAME {
            match subject_alt_name::decode(ext) {
                Ok(names) => subject_alt_name::analyze(ext, &names, subject, true),
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, "IssuerAltName could not be decoded"));
                    j
                }
            }
        } else if *oid == *pkix::oid::EXT_SUBJECT_KEY_IDENTIFIER {
            match key_identifier::decode_subject_key_identifier(ext) {
                Ok(id) => {
                    subject_key_identifier = Some(id.clone());
                    key_identifier::analyze_subject_key_identifier(ext, &id, spki_key_bits)
                }
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, "SubjectKeyIdentifier could not be decoded"));
                    j
                }
            }
        } else if *oid == *pkix::oid::EXT_AUTHORITY_KEY_IDENTIFIER {
            match key_identifier::decode_authority_key_identifier(ext) {
                Ok(aki) => {
                    let j = key_identifier::analyze_authority_key_identifier(ext, &aki, is_self_signed_root);
                    authority_key_identifier = Some(aki);
                    j
                }
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, "AuthorityKeyIdentifier could not be decoded"));
                    j
                }
            }
        } else if *oid == *pkix::oid::EXT_CERTIFICATE_POLICIES {
            decode_analyze(ext, certificate_policies::decode, |e, policies| certificate_policies::analyze(e, policies))
        } else if *oid == *pkix::oid::EXT_CRL_DISTRIBUTION_POINTS {
            decode_analyze(ext, crl_distribution_points::decode, |e, points| crl_distribution_points::analyze(e, points))
        } else if *oid == *pkix::oid::EXT_NAME_CONSTRAINTS {
            match name_constraints::decode(ext) {
                Ok(nc) => {
                    name_constraints_value = Some(nc);
                    name_constraints::analyze(ext, is_ca)
                }
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, "NameConstraints could not be decoded"));
                    j
                }
            }
        } else if *oid == *pkix::oid::EXT_CT_PRECERT_SCTS {
            match ct_scts::decode(ext) {
                Ok(scts) => ct_scts::analyze(ext, &scts, now_ms),
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::CertificateTransparencySctsMalformed, "SCT list could not be decoded"));
                    j
                }
            }
        } else if *oid == *pkix::oid::EXT_CT_PRECERT_POISON {
            ct_precert_poison::analyze(ext)
        } else if *oid == *pkix::oid::EXT_NS_CERT_TYPE {
            match ns_cert_type::decode(ext) {
                Ok(flags) => {
                    ns_cert_type_value = Some(flags);
                    SecurityJudgements::new()
                }
                Err(_) => {
                    let mut j = SecurityJudgements::new();
                    j.push(SecurityJudgement::new(JudgementCode::ExtensionMalformed, "NSCertType could not be decoded"));
                    j
                }
            }
        } else {
            let mut j = SecurityJudgements::new();
            if ext.critical {
                j.push(SecurityJudgement::new(
                    JudgementCode::CertExtensionUnknownCritical,
                    format!("unrecognized extension {} is marked critical", ext.oid),
                ));
            } else {
                j.push(SecurityJudgement::new(JudgementCode::ExtensionUncheckable, format!("extension {} is not analyzed by this engine", ext.oid)));
            }
            j
        };

        per_extension.push(ExtensionAnalysis {
            oid: ext.oid.clone(),
            critical: ext.critical,
            judgements,
        });
    }

    let key_cert_sign = key_usage_flags.map(|f| f.key_cert_sign).unwrap_or(false);
    if key_cert_sign && basic_constraints.is_none() {
        set_level.push(SecurityJudgement::new(
            JudgementCode::ExtBasicConstraintsMissingForCa,
            "KeyUsage sets keyCertSign but BasicConstraints is absent",
        ));
    }
    if let Some(bc) = &basic_constraints {
        if bc.is_ca && bc.path_len.is_some() && !key_cert_sign {
            set_level.push(SecurityJudgement::new(
                JudgementCode::ExtBasicConstraintsPathLenWithoutKeyCertSign,
                "pathLenConstraint is present but KeyUsage lacks keyCertSign",
            ));
        }
    }

    ExtensionsAnalysis {
        is_ca,
        basic_constraints,
        subject_key_identifier,
        authority_key_identifier,
        subject_alt_names,
        name_constraints: name_constraints_value,
        ns_cert_type: ns_cert_type_value,
        per_extension,
        set_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_constraints_ext(is_ca: bool, path_len: Option<u8>) -> Extension {
        let mut inner = vec![];
        if is_ca {
            inner.extend_from_slice(&[0x01, 0x01, 0xff]);
        }
        if let Some(n) = path_len {
            inner.extend_from_slice(&[0x02, 0x01, n]);
        }
        Extension {
            oid: pkix::oid::EXT_BASIC_CONSTRAINTS.clone(),
            critical: true,
            value: inner,
        }
    }

    fn key_usage_ext(bits: u8) -> Extension {
        Extension {
            oid: pkix::oid::EXT_KEY_USAGE.clone(),
            critical: true,
            value: vec![0u8, bits],
        }
    }

    fn subject() -> DistinguishedName {
        DistinguishedName { rdns: vec![] }
    }

    #[test]
    fn key_cert_sign_without_basic_constraints_is_flagged() {
        let exts = vec![key_usage_ext(0b0000_0100)]; // keyCertSign is bit 5
        let out = analyze(&exts, &subject(), b"", false, 0);
        assert!(out.set_level.has_code(JudgementCode::ExtBasicConstraintsMissingForCa));
    }

    #[test]
    fn path_len_on_ca_without_key_cert_sign_is_flagged() {
        let exts = vec![basic_constraints_ext(true, Some(1)), key_usage_ext(0b1000_0000)]; // only digitalSignature
        let out = analyze(&exts, &subject(), b"", false, 0);
        assert!(out.set_level.has_code(JudgementCode::ExtBasicConstraintsPathLenWithoutKeyCertSign));
    }

    #[test]
    fn path_len_on_ca_with_key_cert_sign_is_not_flagged() {
        let exts = vec![basic_constraints_ext(true, Some(1)), key_usage_ext(0b0000_0100)];
        let out = analyze(&exts, &subject(), b"", false, 0);
        assert!(!out.set_level.has_code(JudgementCode::ExtBasicConstraintsPathLenWithoutKeyCertSign));
    }
}
