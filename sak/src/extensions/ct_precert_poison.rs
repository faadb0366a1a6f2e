//! `CTPrecertPoison` (RFC 6962 §3.1): `critical BOOLEAN (TRUE), extnValue NULL`.
//! Its only purpose is to mark a precertificate as unusable for TLS; any
//! value other than a present, critical, NULL extension is a malformed
//! signal a relying party could misinterpret.

use pkix::Extension;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

pub fn analyze(ext: &Extension) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    out.push(SecurityJudgement::new(JudgementCode::CtPrecertPoisonPresent, "certificate is a CT precertificate and must not be used as a leaf certificate"));

    if !ext.critical {
        out.push(SecurityJudgement::new(
            JudgementCode::CtPrecertPoisonNotCritical,
            "CTPrecertPoison must be marked critical (RFC 6962 §3.1)",
        ));
    }

    if ext.value != [0x05, 0x00] {
        out.push(SecurityJudgement::new(
            JudgementCode::CtPrecertPoisonNotNull,
            "CTPrecertPoison extnValue is not the required NULL",
        ));
    }

    out
}
