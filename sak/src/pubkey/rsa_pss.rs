//! RSASSA-PSS parameter analysis (RFC 8017 appendix A.2.3).
//!
//! `RSASSA-PSS-params ::= SEQUENCE {
//!     hashAlgorithm [0] HashAlgorithm DEFAULT sha1,
//!     maskGenAlgorithm [1] MaskGenAlgorithm DEFAULT mgf1SHA1,
//!     saltLength [2] INTEGER DEFAULT 20,
//!     trailerField [3] INTEGER DEFAULT 1 }`

use asn::{Element, TagClass};
use common::errors::Result;
use math::big::BigInt;
use math::integer::Integer;
use pkix::algorithm::AlgorithmIdentifier;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements, Verdict};

const DEFAULT_SALT_LENGTH: u64 = 20;
const DEFAULT_TRAILER_FIELD: u64 = 1;

fn explicit_field(fields: &[Element], context_tag: usize) -> Option<Result<Element>> {
    fields
        .iter()
        .find(|f| f.ident.tag.class == TagClass::ContextSpecific && f.ident.tag.number == context_tag)
        .map(|f| -> Result<Element> {
            let inner = Element::read_all(&f.data)?;
            inner
                .into_iter()
                .next()
                .ok_or_else(|| common::errors::err_msg("RSASSA-PSS-params explicit field is empty"))
        })
}

fn explicit_integer(fields: &[Element], context_tag: usize, default: u64) -> u64 {
    match explicit_field(fields, context_tag) {
        Some(Ok(el)) => BigInt::from_be_bytes(&el.data).to_uint().and_then(|u| u.to_u64()).unwrap_or(default),
        _ => default,
    }
}

/// Checks an RSA-PSS `AlgorithmIdentifier`'s parameters, producing
/// judgements for non-standard hash/mask/salt/trailer choices. Any decode
/// failure inside the optional fields is reported as a judgement, not
/// propagated as a hard error: a malformed PSS parameter set is still a
/// certificate that parsed, just one whose signature scheme is suspect.
pub fn analyze(alg: &AlgorithmIdentifier) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let params = match &alg.parameters {
        Some(p) => p,
        None => return out,
    };

    let fields = match Element::read_all(&params.data) {
        Ok(f) => f,
        Err(_) => {
            out.push(SecurityJudgement::new(
                JudgementCode::ExtensionMalformed,
                "RSASSA-PSS-params is not a well-formed SEQUENCE",
            ));
            return out;
        }
    };

    let mut hash_oid: Option<asn::ObjectIdentifier> = None;
    let mut hash_name = "sha1";
    if let Some(Ok(hash_el)) = explicit_field(&fields, 0) {
        if let Ok(hash_alg) = AlgorithmIdentifier::decode(&hash_el) {
            hash_name = pkix::oid::name_for(&hash_alg.algorithm).unwrap_or("sha1");
            if hash_name != "sha256" && hash_name != "sha384" && hash_name != "sha512" {
                out.push(
                    SecurityJudgement::new(
                        JudgementCode::PublicKeyRsaPssUnsupportedHash,
                        format!("RSASSA-PSS hash algorithm is non-standard: {}", hash_alg.algorithm),
                    )
                    .with_verdict(Verdict::WeakSecurity),
                );
            }
            hash_oid = Some(hash_alg.algorithm);
        }
    }

    if let Some(Ok(mask_el)) = explicit_field(&fields, 1) {
        if let Ok(mask_alg) = AlgorithmIdentifier::decode(&mask_el) {
            if pkix::oid::name_for(&mask_alg.algorithm) != Some("mgf1") {
                out.push(
                    SecurityJudgement::new(
                        JudgementCode::PublicKeyRsaPssUnsupportedMask,
                        "RSASSA-PSS mask generation function is not MGF1",
                    )
                    .with_verdict(Verdict::WeakSecurity),
                );
            } else if let Some(outer_hash) = &hash_oid {
                // MGF1 itself carries a hash algorithm as its one parameter;
                // RFC 8017 doesn't require it to match the top-level
                // hashAlgorithm, but every sane generator sets them equal —
                // a mismatch is a sign of a hand-crafted or buggy parameter set.
                if let Some(mgf_params) = &mask_alg.parameters {
                    if let Ok(mgf_hash_el) = asn::Element::read_all(&mgf_params.data).and_then(|v| v.into_iter().next().ok_or_else(|| common::errors::err_msg("MGF1 params empty"))) {
                        if let Ok(mgf_hash_alg) = AlgorithmIdentifier::decode(&mgf_hash_el) {
                            if mgf_hash_alg.algorithm != *outer_hash {
                                out.push(SecurityJudgement::new(
                                    JudgementCode::SignatureAlgorithmMismatch,
                                    "RSASSA-PSS hashAlgorithm does not match the hash embedded in maskGenAlgorithm",
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    let hash_output_bytes: u64 = match hash_name {
        "sha256" => 32,
        "sha384" => 48,
        "sha512" => 64,
        _ => 20, // sha1 and any other/unsupported hash default to its nominal 20-byte length
    };

    let salt_len = explicit_integer(&fields, 2, DEFAULT_SALT_LENGTH);
    if salt_len == 0 {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyRsaPssNoSaltUsed, "RSASSA-PSS salt length is zero")
                .with_verdict(Verdict::WeakSecurity),
        );
    } else if salt_len < hash_output_bytes / 2 {
        out.push(
            SecurityJudgement::new(
                JudgementCode::PublicKeyRsaPssShortSaltUsed,
                format!("RSASSA-PSS salt length is only {} bytes", salt_len),
            )
            .with_verdict(Verdict::WeakSecurity),
        );
    }

    let trailer = explicit_integer(&fields, 3, DEFAULT_TRAILER_FIELD);
    if trailer != DEFAULT_TRAILER_FIELD {
        out.push(SecurityJudgement::new(
            JudgementCode::PublicKeyRsaPssUnknownTrailerField,
            format!("RSASSA-PSS trailer field is {}, expected 1", trailer),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alg_id_no_params(oid_der: &[u8]) -> AlgorithmIdentifier {
        let mut out = vec![0x30, oid_der.len() as u8];
        out.extend_from_slice(oid_der);
        let el = asn::parse_single(&out).unwrap();
        AlgorithmIdentifier::decode(&el).unwrap()
    }

    #[test]
    fn absent_parameters_produce_no_judgements() {
        let rsa_oid = [0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0a];
        let alg = alg_id_no_params(&rsa_oid);
        let out = analyze(&alg);
        assert!(out.is_empty());
    }
}
