//! `CertificatePolicies` (RFC 5280 §4.2.1.4):
//! `SEQUENCE OF PolicyInformation`, each with optional policy qualifiers.

use std::collections::HashSet;

use asn::tag::TAG_NUMBER_UTF8STRING;
use asn::{Element, ObjectIdentifier, TagClass};
use common::errors::{err_msg, Result};
use pkix::Extension;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

#[derive(Debug, Clone)]
pub enum PolicyQualifier {
    CpsUri(String),
    UserNotice { explicit_text: Option<String>, has_notice_ref: bool },
    Other(ObjectIdentifier),
}

#[derive(Debug, Clone)]
pub struct PolicyInformation {
    pub policy_id: ObjectIdentifier,
    pub qualifiers: Vec<PolicyQualifier>,
}

fn decode_qualifier(el: &Element) -> Result<PolicyQualifier> {
    let fields = Element::read_all(&el.data)?;
    let id = fields.first().ok_or_else(|| err_msg("PolicyQualifierInfo missing qualifier id"))?;
    let oid = ObjectIdentifier::from_der(&id.data)?;
    let qualifier = fields.get(1);

    if oid == *pkix::oid::QT_CPS {
        let q = qualifier.ok_or_else(|| err_msg("CPSuri qualifier missing value"))?;
        let uri = std::str::from_utf8(&q.data).map_err(|_| err_msg("CPSuri is not valid text"))?;
        return Ok(PolicyQualifier::CpsUri(uri.to_string()));
    }

    if oid == *pkix::oid::QT_UNOTICE {
        let mut explicit_text = None;
        let mut has_notice_ref = false;
        if let Some(q) = qualifier {
            for f in Element::read_all(&q.data)? {
                if f.ident.tag.class == TagClass::Universal && f.ident.tag.number == TAG_NUMBER_UTF8STRING {
                    explicit_text = Some(std::str::from_utf8(&f.data).unwrap_or_default().to_string());
                } else {
                    has_notice_ref = true;
                }
            }
        }
        return Ok(PolicyQualifier::UserNotice { explicit_text, has_notice_ref });
    }

    Ok(PolicyQualifier::Other(oid))
}

pub fn decode(ext: &Extension) -> Result<Vec<PolicyInformation>> {
    Element::read_all(&ext.value)?
        .iter()
        .map(|el| {
            let fields = Element::read_all(&el.data)?;
            let id = fields.first().ok_or_else(|| err_msg("PolicyInformation missing policyIdentifier"))?;
            let policy_id = ObjectIdentifier::from_der(&id.data)?;
            let qualifiers = fields[1..].iter().map(decode_qualifier).collect::<Result<Vec<_>>>()?;
            Ok(PolicyInformation { policy_id, qualifiers })
        })
        .collect()
}

const MAX_USER_NOTICE_LEN: usize = 200;

pub fn analyze(_ext: &Extension, policies: &[PolicyInformation]) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let mut seen = HashSet::new();
    for p in policies {
        if !seen.insert(p.policy_id.clone()) {
            out.push(SecurityJudgement::new(
                JudgementCode::CertificatePoliciesDuplicate,
                format!("policy OID {} appears more than once", p.policy_id),
            ));
        }

        let is_any_policy = p.policy_id == *pkix::oid::POLICY_ANY;

        for q in &p.qualifiers {
            match q {
                PolicyQualifier::CpsUri(uri) => {
                    if !uri.contains("://") {
                        out.push(SecurityJudgement::new(
                            JudgementCode::CertificatePoliciesCpsInvalidUri,
                            format!("CPS qualifier {:?} is not a URI", uri),
                        ));
                    }
                }
                PolicyQualifier::UserNotice { explicit_text, has_notice_ref } => {
                    if let Some(text) = explicit_text {
                        if text.len() > MAX_USER_NOTICE_LEN {
                            out.push(SecurityJudgement::new(
                                JudgementCode::CertificatePoliciesUserNoticeTooLong,
                                format!("explicitText is {} characters, exceeding the recommended {}", text.len(), MAX_USER_NOTICE_LEN),
                            ));
                        }
                        if text.chars().any(|c| c.is_control()) {
                            out.push(SecurityJudgement::new(
                                JudgementCode::CertificatePoliciesUserNoticeControlChars,
                                "explicitText contains control characters",
                            ));
                        }
                    }
                    if *has_notice_ref {
                        out.push(SecurityJudgement::new(
                            JudgementCode::CertificatePoliciesNoticeRefDiscouraged,
                            "NoticeReference is present; RFC 5280 recommends against relying on it",
                        ));
                    }
                }
                PolicyQualifier::Other(oid) => {
                    if is_any_policy {
                        out.push(SecurityJudgement::new(
                            JudgementCode::CertificatePoliciesUnknownQualifierUnderAnyPolicy,
                            format!("unrecognized qualifier {} is present under anyPolicy", oid),
                        ));
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policies_ext(der_bodies: &[Vec<u8>]) -> Extension {
        let mut value = vec![];
        for body in der_bodies {
            value.push(0x30);
            value.push(body.len() as u8);
            value.extend_from_slice(body);
        }
        Extension {
            oid: pkix::oid::EXT_CERTIFICATE_POLICIES.clone(),
            critical: false,
            value,
        }
    }

    fn policy_info(oid: &asn::ObjectIdentifier) -> Vec<u8> {
        let der = oid.to_der();
        let mut body = vec![0x06, der.len() as u8];
        body.extend_from_slice(&der);
        body
    }

    #[test]
    fn flags_duplicate_policy_oid() {
        let oid = pkix::oid::POLICY_ANY.clone();
        let ext = policies_ext(&[policy_info(&oid), policy_info(&oid)]);
        let policies = decode(&ext).unwrap();
        let out = analyze(&ext, &policies);
        assert!(out.has_code(JudgementCode::CertificatePoliciesDuplicate));
    }

    #[test]
    fn single_policy_has_no_judgements() {
        let oid = pkix::oid::POLICY_ANY.clone();
        let ext = policies_ext(&[policy_info(&oid)]);
        let policies = decode(&ext).unwrap();
        let out = analyze(&ext, &policies);
        assert!(out.is_empty());
    }
}
