//! RSA public key analysis: modulus sign/primality/small-factor/bit-bias
//! checks and public exponent classification.

use asn::{Element, TagClass};
use common::bits::hamming_weight;
use common::errors::{err_msg, Result};
use math::big::BigUint;
use math::integer::Integer;
use math::number::{One, Zero};
use math::primality;

use crate::codes::JudgementCode;
use crate::judgement::{Commonness, SecurityJudgement, SecurityJudgements, Verdict};
use crate::moduli::ModulusDb;

#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    pub modulus: BigUint,
    pub exponent: BigUint,
}

/// Decodes `RSAPublicKey ::= SEQUENCE { modulus INTEGER, publicExponent INTEGER }`
/// from the SubjectPublicKeyInfo's BIT STRING contents (RFC 8017 appendix A.1.1).
///
/// A negative modulus or exponent still decodes here (INTEGER permits it);
/// the sign is checked by [`analyze`], never by this function, so that a
/// negative-modulus key is reported as a judgement and not a decode error.
pub fn decode(bit_string_bytes: &[u8]) -> Result<RsaPublicKey> {
    let fields = Element::read_all(bit_string_bytes)?;
    if fields.len() != 2 {
        return Err(err_msg("RSAPublicKey must have exactly 2 fields"));
    }
    for f in &fields {
        if f.ident.tag.class != TagClass::Universal || f.ident.tag.number != asn::tag::TAG_NUMBER_INTEGER {
            return Err(err_msg("RSAPublicKey fields must be INTEGER"));
        }
    }

    // The modulus and exponent are mathematically unsigned; the sign check
    // on the raw INTEGER encoding happens in `analyze`, so decode via the
    // signed form here and only take the magnitude when it is legitimately
    // non-negative.
    let modulus_signed = math::big::BigInt::from_be_bytes(&fields[0].data);
    let exponent_signed = math::big::BigInt::from_be_bytes(&fields[1].data);

    Ok(RsaPublicKey {
        modulus: modulus_signed.magnitude().clone(),
        exponent: exponent_signed.magnitude().clone(),
    })
}

/// Re-decodes the raw INTEGER contents to check their sign directly,
/// since [`decode`] only keeps magnitudes.
fn field_is_negative(bit_string_bytes: &[u8], index: usize) -> Result<bool> {
    let fields = Element::read_all(bit_string_bytes)?;
    let f = fields.get(index).ok_or_else(|| err_msg("RSAPublicKey missing field"))?;
    Ok(math::big::BigInt::from_be_bytes(&f.data).is_negative())
}

const SMALL_EXPONENTS: &[u64] = &[3, 5, 7, 17, 257];
const COMMON_EXPONENT: u64 = 65537;

pub fn analyze(raw_bit_string: &[u8], key: &RsaPublicKey, fast: bool, testprimes_max: u32, moduli: Option<&ModulusDb>) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    if let Some(db) = moduli {
        if db.contains(&key.modulus) {
            out.push(
                SecurityJudgement::new(JudgementCode::PublicKeyRsaModulusCompromised, "RSA modulus matches a known-compromised modulus database entry")
                    .with_verdict(Verdict::NoSecurity),
            );
        }
    }

    let modulus_negative = field_is_negative(raw_bit_string, 0).unwrap_or(false);
    let exponent_negative = field_is_negative(raw_bit_string, 1).unwrap_or(false);

    if modulus_negative {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyRsaModulusNegative, "RSA modulus is negative")
                .with_verdict(Verdict::NoSecurity),
        );
    }
    if exponent_negative {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentNegative, "RSA public exponent is negative")
                .with_verdict(Verdict::NoSecurity),
        );
    }

    if key.modulus.is_zero() {
        return out;
    }

    let bits = key.modulus.nbits() as u32;
    if fast && bits > 4096 {
        return out;
    }

    if let Some(factor) = primality::trial_divide(&key.modulus, testprimes_max as u64) {
        out.push(
            SecurityJudgement::new(
                JudgementCode::PublicKeyRsaModulusTinyFactor,
                format!("RSA modulus is divisible by small prime {}", factor),
            )
            .with_verdict(Verdict::NoSecurity),
        );
    } else if primality::is_probable_prime(&key.modulus) {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyRsaModulusPrime, "RSA modulus is itself prime")
                .with_verdict(Verdict::NoSecurity),
        );
    } else {
        // Fermat's method catches moduli whose two factors are suspiciously
        // close together (p ~ q), a classic weak-key-generation symptom.
        let isqrt = key.modulus.isqrt();
        let mut a = isqrt.clone();
        if &a * &a < key.modulus {
            a = &a + &BigUint::one();
        }
        let mut found = None;
        for _ in 0..testprimes_max.min(10_000) {
            let a2 = &a * &a;
            if a2 < key.modulus {
                a = &a + &BigUint::one();
                continue;
            }
            let b2 = &a2 - &key.modulus;
            let b = b2.isqrt();
            if &b * &b == b2 {
                found = Some(a.clone());
                break;
            }
            a = &a + &BigUint::one();
        }
        if found.is_some() {
            out.push(
                SecurityJudgement::new(
                    JudgementCode::PublicKeyRsaModulusFactorable,
                    "RSA modulus factors are suspiciously close together",
                )
                .with_verdict(Verdict::BrokenSecurity),
            );
        }
    }

    let security_bits = crate::bits::factoring_security_bits(bits);
    let length_judgement = if bits < 1024 {
        SecurityJudgement::new(JudgementCode::PublicKeyRsaModulusLengthShort, format!("RSA modulus is only {} bits", bits))
    } else {
        SecurityJudgement::new(JudgementCode::PublicKeyRsaModulusLengthOk, format!("RSA modulus is {} bits", bits))
    };
    out.push(length_judgement.with_bits(security_bits));

    let modulus_bytes = key.modulus.to_be_bytes();
    let set_bits = hamming_weight(&modulus_bytes);
    let total_bits = (modulus_bytes.len() * 8) as u32;
    if total_bits > 0 {
        let ratio = set_bits as f64 / total_bits as f64;
        if !(0.4..=0.6).contains(&ratio) {
            out.push(
                SecurityJudgement::new(
                    JudgementCode::PublicKeyRsaModulusBitBiasPresent,
                    format!("RSA modulus has a skewed bit distribution ({:.1}% ones)", ratio * 100.0),
                )
                .with_verdict(Verdict::WeakSecurity),
            );
        }
    }

    // A zero exponent isn't negative in its raw encoding, but spec-wise it
    // falls in the same "≤ 0" bucket as an explicitly negative one.
    if !exponent_negative && key.exponent.is_zero() {
        out.push(
            SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentNegative, "RSA public exponent is zero")
                .with_verdict(Verdict::NoSecurity),
        );
    } else if !exponent_negative {
        if key.exponent.is_one() {
            out.push(
                SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentOne, "RSA public exponent is 1 (no encryption at all)")
                    .with_verdict(Verdict::NoSecurity)
                    .with_bits(0),
            );
        } else if SMALL_EXPONENTS.iter().any(|&e| key.exponent == BigUint::from_u64(e)) {
            out.push(
                SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentSmall, "RSA public exponent is unusually small")
                    .with_verdict(Verdict::WeakSecurity)
                    .with_commonness(Commonness::Unusual),
            );
        } else if key.exponent == BigUint::from_u64(COMMON_EXPONENT) {
            out.push(
                SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentCommon, "RSA public exponent is a common value")
                    .with_commonness(Commonness::Common),
            );
        } else if key.exponent.nbits() > 32 {
            out.push(
                SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentLarge, "RSA public exponent is unusually large")
                    .with_commonness(Commonness::HighlyUnusual),
            );
        } else {
            out.push(
                SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentUnusual, "RSA public exponent is not one of the common values")
                    .with_commonness(Commonness::Unusual),
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsa_key_der(modulus: u64, exponent: u64) -> Vec<u8> {
        let m = math::big::BigInt::from(modulus as i64).to_be_bytes();
        let e = math::big::BigInt::from(exponent as i64).to_be_bytes();
        let mut inner = vec![];
        inner.push(0x02);
        inner.push(m.len() as u8);
        inner.extend_from_slice(&m);
        inner.push(0x02);
        inner.push(e.len() as u8);
        inner.extend_from_slice(&e);
        let mut out = vec![0x30, inner.len() as u8];
        out.extend_from_slice(&inner);
        out
    }

    #[test]
    fn flags_exponent_of_one() {
        let der = rsa_key_der(3233, 1);
        let key = decode(&der).unwrap();
        let judgements = analyze(&der, &key, false, 1000, None);
        assert!(judgements.has_code(JudgementCode::PublicKeyRsaExponentOne));
    }

    #[test]
    fn flags_prime_modulus() {
        let der = rsa_key_der(97, 65537);
        let key = decode(&der).unwrap();
        let judgements = analyze(&der, &key, false, 1000, None);
        assert!(judgements.has_code(JudgementCode::PublicKeyRsaModulusPrime));
    }

    #[test]
    fn common_exponent_is_not_flagged_unusual() {
        let der = rsa_key_der(3233, 65537);
        let key = decode(&der).unwrap();
        let judgements = analyze(&der, &key, false, 1000, None);
        assert!(judgements.has_code(JudgementCode::PublicKeyRsaExponentCommon));
        assert!(!judgements.has_code(JudgementCode::PublicKeyRsaExponentUnusual));
    }
}
