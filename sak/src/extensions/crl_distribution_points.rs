//! `CRLDistributionPoints` (RFC 5280 §4.2.1.13): `SEQUENCE OF DistributionPoint`.

use asn::{Element, TagClass};
use common::errors::Result;
use pkix::{Extension, GeneralName};

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

const TAG_DISTRIBUTION_POINT_NAME: usize = 0;
const TAG_REASONS: usize = 1;
const TAG_CRL_ISSUER: usize = 2;

const TAG_FULL_NAME: usize = 0;
const TAG_NAME_RELATIVE_TO_ISSUER: usize = 1;

#[derive(Debug, Clone, Default)]
pub enum DistributionPointName {
    #[default]
    Absent,
    FullName(Vec<GeneralName>),
    NameRelativeToCrlIssuer,
}

#[derive(Debug, Clone, Default)]
pub struct DistributionPoint {
    pub name: DistributionPointName,
    pub reasons: Option<Vec<u8>>,
    pub crl_issuer: Option<Vec<GeneralName>>,
}

pub fn decode(ext: &Extension) -> Result<Vec<DistributionPoint>> {
    Element::read_all(&ext.value)?
        .iter()
        .map(|el| {
            let mut dp = DistributionPoint::default();
            for f in Element::read_all(&el.data)? {
                if f.ident.tag.class != TagClass::ContextSpecific {
                    continue;
                }
                match f.ident.tag.number {
                    TAG_DISTRIBUTION_POINT_NAME => {
                        let inner = Element::read_all(&f.data)?;
                        if let Some(choice) = inner.first() {
                            dp.name = match choice.ident.tag.number {
                                TAG_FULL_NAME => {
                                    let names = Element::read_all(&choice.data)?
                                        .iter()
                                        .map(GeneralName::decode)
                                        .collect::<Result<Vec<_>>>()?;
                                    DistributionPointName::FullName(names)
                                }
                                TAG_NAME_RELATIVE_TO_ISSUER => DistributionPointName::NameRelativeToCrlIssuer,
                                _ => DistributionPointName::Absent,
                            };
                        }
                    }
                    TAG_REASONS => dp.reasons = Some(f.data.to_vec()),
                    TAG_CRL_ISSUER => {
                        let names = Element::read_all(&f.data)?.iter().map(GeneralName::decode).collect::<Result<Vec<_>>>()?;
                        dp.crl_issuer = Some(names);
                    }
                    _ => {}
                }
            }
            Ok(dp)
        })
        .collect()
}

/// The 7 ReasonFlags bits a single DistributionPoint can restrict itself to
/// (RFC 5280 §4.2.1.13); full CRL coverage requires every reason to be
/// served by at least one unrestricted distribution point.
const REASON_BIT_COUNT: usize = 8;

pub fn analyze(ext: &Extension, points: &[DistributionPoint]) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if ext.critical {
        out.push(SecurityJudgement::new(
            JudgementCode::CrlDistributionPointsCritical,
            "CRLDistributionPoints is marked critical, which most clients do not expect",
        ));
    }

    let mut uncovered_reasons = vec![true; REASON_BIT_COUNT];
    let mut any_unrestricted = false;
    let mut relative_name_count = 0usize;

    for dp in points {
        match &dp.name {
            DistributionPointName::Absent => {
                if dp.reasons.is_some() {
                    out.push(SecurityJudgement::new(
                        JudgementCode::CrlDistributionPointsReasonsOnly,
                        "DistributionPoint restricts reasons but provides no distributionPoint name",
                    ));
                }
            }
            DistributionPointName::FullName(names) => {
                for name in names {
                    if let GeneralName::Uri(uri) = name {
                        if uri.starts_with("ldap://") || uri.starts_with("ldaps://") {
                            if !uri.contains('?') {
                                out.push(SecurityJudgement::new(
                                    JudgementCode::CrlDistributionPointsLdapMissingComponent,
                                    format!("{:?} is an LDAP URI missing its attribute/scope/filter components", uri),
                                ));
                            }
                        } else if uri.starts_with("http://") || uri.starts_with("https://") {
                            if !uri.ends_with(".crl") {
                                out.push(SecurityJudgement::new(
                                    JudgementCode::CrlDistributionPointsUrlMissingCrlSuffix,
                                    format!("{:?} does not end in .crl", uri),
                                ));
                            }
                        }
                    }
                }
            }
            DistributionPointName::NameRelativeToCrlIssuer => {
                relative_name_count += 1;
                out.push(SecurityJudgement::new(
                    JudgementCode::CrlDistributionPointsNameRelativeDiscouraged,
                    "nameRelativeToCRLIssuer is rarely implemented correctly by relying parties",
                ));
            }
        }

        match &dp.reasons {
            Some(bits) => {
                for i in 0..REASON_BIT_COUNT {
                    let byte = bits.first().copied().unwrap_or(0);
                    let set = (byte >> (7 - i.min(7))) & 1 == 1;
                    if set {
                        uncovered_reasons[i] = false;
                    }
                }
            }
            None => any_unrestricted = true,
        }
    }

    if relative_name_count > 1 {
        out.push(SecurityJudgement::new(
            JudgementCode::CrlDistributionPointsNameRelativeForbiddenMultipleIssuers,
            "multiple distribution points use nameRelativeToCRLIssuer, which is ambiguous without a shared issuer",
        ));
    }

    if !any_unrestricted && uncovered_reasons.iter().any(|&u| u) {
        out.push(SecurityJudgement::new(
            JudgementCode::CrlDistributionPointsNoFullReasonCoverage,
            "no distribution point covers all revocation reasons",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dp_ext(bodies: &[Vec<u8>]) -> Extension {
        let mut value = vec![];
        for body in bodies {
            value.push(0x30);
            value.push(body.len() as u8);
            value.extend_from_slice(body);
        }
        Extension {
            oid: pkix::oid::EXT_CRL_DISTRIBUTION_POINTS.clone(),
            critical: false,
            value,
        }
    }

    fn full_name_http(url: &str) -> Vec<u8> {
        let mut uri = vec![0x86, url.len() as u8];
        uri.extend_from_slice(url.as_bytes());
        let mut full_name = vec![0xa0, uri.len() as u8];
        full_name.extend_from_slice(&uri);
        let mut dp_name = vec![0xa0, full_name.len() as u8];
        dp_name.extend_from_slice(&full_name);
        dp_name
    }

    #[test]
    fn flags_missing_crl_suffix() {
        let ext = dp_ext(&[full_name_http("http://example.com/ca")]);
        let points = decode(&ext).unwrap();
        let out = analyze(&ext, &points);
        assert!(out.has_code(JudgementCode::CrlDistributionPointsUrlMissingCrlSuffix));
    }

    #[test]
    fn accepts_proper_crl_url() {
        let ext = dp_ext(&[full_name_http("http://example.com/ca.crl")]);
        let points = decode(&ext).unwrap();
        let out = analyze(&ext, &points);
        assert!(!out.has_code(JudgementCode::CrlDistributionPointsUrlMissingCrlSuffix));
    }
}
