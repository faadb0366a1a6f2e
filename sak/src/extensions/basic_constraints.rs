//! `BasicConstraints` (RFC 5280 §4.2.1.9):
//! `SEQUENCE { cA BOOLEAN DEFAULT FALSE, pathLenConstraint INTEGER OPTIONAL }`.

use asn::tag::TAG_NUMBER_BOOLEAN;
use asn::{Element, TagClass};
use common::errors::{err_msg, Result};
use math::big::BigInt;
use math::integer::Integer;
use pkix::Extension;

use crate::codes::JudgementCode;
use crate::judgement::SecurityJudgements;

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub path_len: Option<u64>,
}

pub fn decode(ext: &Extension) -> Result<BasicConstraints> {
    let fields = Element::read_all(&ext.value)?;

    let mut is_ca = false;
    let mut idx = 0;
    if let Some(f) = fields.get(idx) {
        if f.ident.tag.class == TagClass::Universal && f.ident.tag.number == TAG_NUMBER_BOOLEAN {
            if f.data.len() != 1 {
                return Err(err_msg("BasicConstraints cA must be one octet"));
            }
            is_ca = f.data[0] != 0;
            idx += 1;
        }
    }

    let path_len = match fields.get(idx) {
        Some(f) => {
            let n = BigInt::from_be_bytes(&f.data);
            Some(n.to_uint().and_then(|u| u.to_u64()).ok_or_else(|| err_msg("pathLenConstraint out of range"))?)
        }
        None => None,
    };

    Ok(BasicConstraints { is_ca, path_len })
}

pub fn analyze(ext: &Extension, bc: &BasicConstraints) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if !ext.critical {
        out.push(crate::judgement::SecurityJudgement::new(
            JudgementCode::ExtBasicConstraintsNotCritical,
            "BasicConstraints extension is not marked critical",
        ));
    }

    if bc.path_len.is_some() && !bc.is_ca {
        out.push(crate::judgement::SecurityJudgement::new(
            JudgementCode::ExtBasicConstraintsPathLenWithoutCa,
            "pathLenConstraint is present but cA is FALSE",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bc_ext(is_ca: bool, critical: bool) -> Extension {
        let mut inner = vec![];
        if is_ca {
            inner.extend_from_slice(&[0x01, 0x01, 0xff]);
        }
        Extension {
            oid: pkix::oid::EXT_BASIC_CONSTRAINTS.clone(),
            critical,
            value: inner,
        }
    }

    #[test]
    fn flags_non_critical() {
        let ext = bc_ext(true, false);
        let bc = decode(&ext).unwrap();
        let out = analyze(&ext, &bc);
        assert!(out.has_code(JudgementCode::ExtBasicConstraintsNotCritical));
    }

    #[test]
    fn empty_sequence_is_not_ca() {
        let ext = bc_ext(false, true);
        let bc = decode(&ext).unwrap();
        assert!(!bc.is_ca);
        assert!(bc.path_len.is_none());
    }
}
