//! `ExtKeyUsageSyntax` (RFC 5280 §4.2.1.12): `SEQUENCE OF KeyPurposeId`.

use std::collections::HashSet;

use asn::{Element, ObjectIdentifier};
use common::errors::Result;
use pkix::Extension;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

pub fn decode(ext: &Extension) -> Result<Vec<ObjectIdentifier>> {
    let fields = Element::read_all(&ext.value)?;
    fields.iter().map(|f| ObjectIdentifier::from_der(&f.data)).collect()
}

pub fn analyze(ext: &Extension, ekus: &[ObjectIdentifier]) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if ekus.is_empty() {
        out.push(SecurityJudgement::new(JudgementCode::ExtExtendedKeyUsageEmpty, "ExtendedKeyUsage has no entries"));
    }

    let mut seen = HashSet::new();
    for eku in ekus {
        if !seen.insert(eku.clone()) {
            out.push(SecurityJudgement::new(
                JudgementCode::ExtExtendedKeyUsageDuplicate,
                format!("ExtendedKeyUsage contains duplicate OID {}", eku),
            ));
        }
    }

    if ext.critical && ekus.iter().any(|e| *e == *pkix::oid::EKU_ANY) {
        out.push(SecurityJudgement::new(
            JudgementCode::ExtExtendedKeyUsageAnyCritical,
            "anyExtendedKeyUsage is present in a critical ExtendedKeyUsage extension",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eku_ext(critical: bool, oids: &[&asn::ObjectIdentifier]) -> Extension {
        let mut value = vec![];
        for oid in oids {
            let der = oid.to_der();
            value.push(0x06);
            value.push(der.len() as u8);
            value.extend_from_slice(&der);
        }
        Extension {
            oid: pkix::oid::EXT_EXTENDED_KEY_USAGE.clone(),
            critical,
            value,
        }
    }

    #[test]
    fn flags_duplicate_entries() {
        let server = pkix::oid::EKU_SERVER_AUTH.clone();
        let ext = eku_ext(false, &[&server, &server]);
        let ekus = decode(&ext).unwrap();
        let out = analyze(&ext, &ekus);
        assert!(out.has_code(JudgementCode::ExtExtendedKeyUsageDuplicate));
    }

    #[test]
    fn empty_list_is_flagged() {
        let ext = eku_ext(false, &[]);
        let ekus = decode(&ext).unwrap();
        let out = analyze(&ext, &ekus);
        assert!(out.has_code(JudgementCode::ExtExtendedKeyUsageEmpty));
    }
}
