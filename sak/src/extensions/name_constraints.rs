//! `NameConstraints` (RFC 5280 §4.2.1.10): permitted/excluded subtree lists.
//! Only the criticality and CA-only placement rules are scored here; the
//! CA-relationship analyzer is responsible for actually enforcing the
//! constraints against a subordinate certificate's names.

use asn::{Element, TagClass};
use common::errors::Result;
use pkix::{Extension, GeneralName};

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

const TAG_PERMITTED_SUBTREES: usize = 0;
const TAG_EXCLUDED_SUBTREES: usize = 1;

#[derive(Debug, Clone, Default)]
pub struct NameConstraints {
    pub permitted: Vec<GeneralName>,
    pub excluded: Vec<GeneralName>,
}

fn decode_subtrees(data: &[u8]) -> Result<Vec<GeneralName>> {
    Element::read_all(data)?
        .iter()
        .map(|el| {
            // GeneralSubtree ::= SEQUENCE { base GeneralName, minimum [0]
            // INTEGER DEFAULT 0, maximum [1] INTEGER OPTIONAL }; only `base`
            // is consulted, min/max are not used by any current CA.
            let fields = Element::read_all(&el.data)?;
            let base = fields.first().ok_or_else(|| common::errors::err_msg("GeneralSubtree missing base"))?;
            GeneralName::decode(base)
        })
        .collect()
}

pub fn decode(ext: &Extension) -> Result<NameConstraints> {
    let mut nc = NameConstraints::default();
    for f in Element::read_all(&ext.value)? {
        if f.ident.tag.class != TagClass::ContextSpecific {
            continue;
        }
        match f.ident.tag.number {
            TAG_PERMITTED_SUBTREES => nc.permitted = decode_subtrees(&f.data)?,
            TAG_EXCLUDED_SUBTREES => nc.excluded = decode_subtrees(&f.data)?,
            _ => {}
        }
    }
    Ok(nc)
}

pub fn analyze(ext: &Extension, is_ca: bool) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if !ext.critical {
        out.push(SecurityJudgement::new(
            JudgementCode::NameConstraintsNotCritical,
            "NameConstraints extension is not marked critical",
        ));
    }

    if !is_ca {
        out.push(SecurityJudgement::new(
            JudgementCode::NameConstraintsInNonCa,
            "NameConstraints is present on a certificate that is not a CA",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nc_ext(critical: bool) -> Extension {
        Extension {
            oid: pkix::oid::EXT_NAME_CONSTRAINTS.clone(),
            critical,
            value: vec![0x30, 0x00],
        }
    }

    #[test]
    fn flags_non_critical() {
        let ext = nc_ext(false);
        let out = analyze(&ext, true);
        assert!(out.has_code(JudgementCode::NameConstraintsNotCritical));
    }

    #[test]
    fn flags_non_ca() {
        let ext = nc_ext(true);
        let out = analyze(&ext, false);
        assert!(out.has_code(JudgementCode::NameConstraintsInNonCa));
    }

    #[test]
    fn empty_decodes_cleanly() {
        let ext = Extension {
            oid: pkix::oid::EXT_NAME_CONSTRAINTS.clone(),
            critical: true,
            value: vec![0x30, 0x00],
        };
        let nc = decode(&ext).unwrap();
        assert!(nc.permitted.is_empty());
        assert!(nc.excluded.is_empty());
    }
}
