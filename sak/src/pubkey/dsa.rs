//! DSA public key analysis (FIPS 186-4): parameter validity and the
//! `(L, N)` size-pair check.

use asn::Element;
use common::errors::{err_msg, Result};
use math::big::{BigUint, Modulo};
use math::integer::Integer;
use math::number::{One, Zero};
use math::primality;
use pkix::algorithm::AlgorithmIdentifier;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements, Verdict};

#[derive(Debug, Clone)]
pub struct DsaParameters {
    pub p: BigUint,
    pub q: BigUint,
    pub g: BigUint,
}

/// Approved `(L, N)` bit-length pairs (FIPS 186-4 §4.2).
const APPROVED_SIZES: &[(u32, u32)] = &[(1024, 160), (2048, 224), (2048, 256), (3072, 256)];

pub fn decode_parameters(alg: &AlgorithmIdentifier) -> Result<DsaParameters> {
    let params = alg.parameters.as_ref().ok_or_else(|| err_msg("DSA AlgorithmIdentifier missing parameters"))?;
    let fields = Element::read_all(&params.data)?;
    if fields.len() != 3 {
        return Err(err_msg("Dss-Parms must have exactly 3 fields"));
    }
    Ok(DsaParameters {
        p: BigUint::from_be_bytes(&fields[0].data),
        q: BigUint::from_be_bytes(&fields[1].data),
        g: BigUint::from_be_bytes(&fields[2].data),
    })
}

pub fn decode_public_key(bit_string_bytes: &[u8]) -> Result<BigUint> {
    let el = asn::parse_single(bit_string_bytes)?;
    Ok(BigUint::from_be_bytes(&el.data))
}

pub fn analyze(params: &DsaParameters, _y: &BigUint) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let l = params.p.nbits() as u32;
    let n = params.q.nbits() as u32;
    if !APPROVED_SIZES.iter().any(|&(al, an)| al == l && an == n) {
        out.push(SecurityJudgement::new(
            JudgementCode::PublicKeyDsaNonStandardParameterSizes,
            format!("DSA (L, N) = ({}, {}) is not an approved parameter size", l, n),
        ));
    }

    if !primality::is_probable_prime(&params.p) {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyDsaPNotPrime, "DSA modulus p is not prime")
                .with_verdict(Verdict::NoSecurity),
        );
    }
    if !primality::is_probable_prime(&params.q) {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyDsaQNotPrime, "DSA subgroup order q is not prime")
                .with_verdict(Verdict::NoSecurity),
        );
    }

    if !params.p.is_zero() && !params.q.is_zero() {
        let p_minus_one = &params.p - &BigUint::one();
        if !(&p_minus_one % &params.q).is_zero() {
            out.push(
                SecurityJudgement::new(
                    JudgementCode::PublicKeyDsaPMinusOneNotDivisibleByQ,
                    "DSA q does not divide p - 1",
                )
                .with_verdict(Verdict::NoSecurity),
            );
        }
    }

    if params.g <= BigUint::one() || params.g >= params.p {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyDsaGOutOfRange, "DSA generator g is out of range [2, p-1]")
                .with_verdict(Verdict::NoSecurity),
        );
    } else if !params.p.is_zero() {
        let m = Modulo::new(&params.p);
        let order_check = m.pow(&params.g, &params.q);
        if !order_check.is_one() {
            out.push(
                SecurityJudgement::new(JudgementCode::PublicKeyDsaGOrderInvalid, "DSA generator g does not have order q")
                    .with_verdict(Verdict::NoSecurity),
            );
        }
    }

    for (label, value) in [("p", &params.p), ("q", &params.q)] {
        let bytes = value.to_be_bytes();
        let total_bits = (bytes.len() * 8) as u32;
        if total_bits == 0 {
            continue;
        }
        let ratio = common::bits::hamming_weight(&bytes) as f64 / total_bits as f64;
        if !(0.4..=0.6).contains(&ratio) {
            out.push(
                SecurityJudgement::new(
                    JudgementCode::PublicKeyDsaBitBiasPresent,
                    format!("DSA {} has a skewed bit distribution ({:.1}% ones)", label, ratio * 100.0),
                )
                .with_verdict(Verdict::WeakSecurity),
            );
        }
    }

    let security_bits = crate::bits::factoring_security_bits(l).min(n / 2);
    out.push(
        SecurityJudgement::new(JudgementCode::PublicKeyDsaSecurityStrength, format!("DSA key strength is {} bits", security_bits))
            .with_bits(security_bits),
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_nonstandard_parameter_sizes() {
        let params = DsaParameters {
            p: BigUint::from_u64(23),
            q: BigUint::from_u64(11),
            g: BigUint::from_u64(4),
        };
        let y = BigUint::from_u64(9);
        let out = analyze(&params, &y);
        assert!(out.has_code(JudgementCode::PublicKeyDsaNonStandardParameterSizes));
    }

    #[test]
    fn security_strength_is_bounded_by_half_the_subgroup_order() {
        let params = DsaParameters {
            p: BigUint::from_u64(23),
            q: BigUint::from_u64(11),
            g: BigUint::from_u64(4),
        };
        let y = BigUint::from_u64(9);
        let out = analyze(&params, &y);
        let strength = out.iter().find(|j| j.code == JudgementCode::PublicKeyDsaSecurityStrength).unwrap();
        // q is 11, nbits() == 4, so N/2 == 2 caps the estimate far below
        // what factoring_security_bits(L) alone would return.
        assert_eq!(strength.bits, Some(2));
    }
}
