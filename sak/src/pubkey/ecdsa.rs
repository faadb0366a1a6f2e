//! ECDSA (and EdDSA) public key analysis.
//!
//! ECDSA keys are an uncompressed point on a named or explicit curve
//! (RFC 5480); EdDSA keys (Ed25519/Ed448) are a fixed-length raw encoding
//! with no curve parameters to examine (RFC 8410).

use asn::{Element, ObjectIdentifier, TagClass};
use common::errors::{err_msg, Result};
use math::big::{BigInt, BigUint};
use math::integer::Integer;
use pkix::algorithm::AlgorithmIdentifier;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};
use crate::pubkey::curve::{self, EllipticCurve, FieldKind};

#[derive(Debug, Clone)]
pub enum EcParameters {
    Named(ObjectIdentifier),
    /// Explicit (non-named) domain parameters: the `ECParameters` SEQUENCE
    /// contents, kept around so the explicit-curve analyzer can attempt
    /// the characteristic-two polynomial validation below.
    Explicit(bytes::Bytes),
}

pub fn decode_ec_parameters(alg: &AlgorithmIdentifier) -> Result<EcParameters> {
    let params = alg.parameters.as_ref().ok_or_else(|| err_msg("ECDSA AlgorithmIdentifier missing parameters"))?;

    if params.ident.tag.class == TagClass::Universal && params.ident.tag.number == asn::tag::TAG_NUMBER_OBJECT_IDENTIFIER
    {
        return Ok(EcParameters::Named(ObjectIdentifier::from_der(&params.data)?));
    }
    if params.ident.tag.class == TagClass::Universal && params.ident.tag.number == asn::tag::TAG_NUMBER_SEQUENCE {
        return Ok(EcParameters::Explicit(params.data.clone()));
    }
    Err(err_msg("Unrecognized ECParameters form"))
}

fn bigint_to_i64(v: &math::big::BigInt) -> Option<i64> {
    let mag = i64::try_from(v.magnitude().to_u64()?).ok()?;
    Some(if v.is_negative() { -mag } else { mag })
}

/// Exponents of a characteristic-two reduction polynomial, trinomial
/// (`x^m + x^k + 1`) or pentanomial (`x^m + x^k3 + x^k2 + x^k1 + 1`),
/// decoded from X9.62's `Characteristic-two` basis choice.
fn basis_exponents(basis_oid: &ObjectIdentifier, basis_params: Option<&[u8]>) -> Result<Vec<i64>> {
    if *basis_oid == *pkix::oid::EC_TP_BASIS {
        let k = basis_params.ok_or_else(|| err_msg("trinomial basis missing k"))?;
        Ok(vec![bigint_to_i64(&BigInt::from_be_bytes(k)).ok_or_else(|| err_msg("trinomial k out of range"))?])
    } else if *basis_oid == *pkix::oid::EC_PP_BASIS {
        let data = basis_params.ok_or_else(|| err_msg("pentanomial basis missing parameters"))?;
        let fields = Element::read_all(data)?;
        if fields.len() != 3 {
            return Err(err_msg("Pentanomial must have exactly 3 fields"));
        }
        fields
            .iter()
            .map(|f| bigint_to_i64(&BigInt::from_be_bytes(&f.data)).ok_or_else(|| err_msg("pentanomial exponent out of range")))
            .collect()
    } else if *basis_oid == *pkix::oid::EC_GN_BASIS {
        Ok(vec![])
    } else {
        Err(err_msg("Unrecognized characteristic-two basis"))
    }
}

/// Validates an explicit-curve `ECParameters`' characteristic-two field
/// description: the basis exponents (plus the implicit degree `m` and
/// constant term) must all be distinct and non-negative, and `m` itself
/// must be the polynomial's leading (highest) exponent.
pub fn analyze_explicit_field(params_data: &[u8]) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let validate = || -> Result<()> {
        let fields = Element::read_all(params_data)?;
        let field_id = fields.get(1).ok_or_else(|| err_msg("ECParameters missing fieldID"))?;
        let field_id_fields = Element::read_all(&field_id.data)?;
        let field_type = field_id_fields.first().ok_or_else(|| err_msg("FieldID missing fieldType"))?;
        let field_type_oid = ObjectIdentifier::from_der(&field_type.data)?;
        if field_type_oid != *pkix::oid::EC_CHARACTERISTIC_TWO_FIELD {
            return Ok(());
        }

        let c2_params = field_id_fields.get(1).ok_or_else(|| err_msg("FieldID missing Characteristic-two parameters"))?;
        let c2_fields = Element::read_all(&c2_params.data)?;
        let m = bigint_to_i64(&BigInt::from_be_bytes(&c2_fields.first().ok_or_else(|| err_msg("Characteristic-two missing m"))?.data))
            .ok_or_else(|| err_msg("m out of range"))?;
        let basis_oid = ObjectIdentifier::from_der(&c2_fields.get(1).ok_or_else(|| err_msg("Characteristic-two missing basis"))?.data)?;
        let basis_params_el = c2_fields.get(2);
        let basis_params_bytes = basis_params_el.map(|e| e.data.as_ref());
        let mut exponents = basis_exponents(&basis_oid, basis_params_bytes)?;
        exponents.push(m);
        exponents.push(0);

        let mut seen = std::collections::HashSet::new();
        let all_distinct_nonnegative = exponents.iter().all(|e| *e >= 0 && seen.insert(*e));
        let leading_is_m = exponents.iter().copied().max() == Some(m);
        if !all_distinct_nonnegative || !leading_is_m {
            return Err(err_msg("malformed reduction polynomial"));
        }
        Ok(())
    };

    if validate().is_err() {
        out.push(SecurityJudgement::new(
            JudgementCode::PublicKeyEccExplicitCurvePolynomialInvalid,
            "explicit curve's characteristic-two reduction polynomial is malformed",
        ));
    }

    out
}

/// An uncompressed `04 || X || Y` point (X9.62 §4.3.6). Compressed points
/// are rejected as undecodable rather than inflated into judgements, since
/// compression itself is not an approved PKIX encoding.
pub fn decode_point(bit_string_bytes: &[u8], field_bytes: usize) -> Result<(BigUint, BigUint)> {
    if bit_string_bytes.len() != 1 + 2 * field_bytes || bit_string_bytes.first() != Some(&0x04) {
        return Err(err_msg("EC point is not an uncompressed X9.62 point"));
    }
    let x = &bit_string_bytes[1..1 + field_bytes];
    let y = &bit_string_bytes[1 + field_bytes..];
    Ok((BigUint::from_be_bytes(x), BigUint::from_be_bytes(y)))
}

/// Fraction of set bits in `value`'s fixed-width `total_bits`-bit
/// representation, or `None` if the field is degenerate (zero-width).
fn bit_bias_ratio(value: &BigUint, total_bits: usize) -> Option<f64> {
    if total_bits == 0 {
        return None;
    }
    let bytes = value.to_be_bytes();
    Some(common::bits::hamming_weight(&bytes) as f64 / total_bits as f64)
}

pub fn analyze(ec_params: &EcParameters, point_bytes: &[u8]) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let curve: &'static EllipticCurve = match ec_params {
        EcParameters::Explicit(params_data) => {
            out.push(SecurityJudgement::new(
                JudgementCode::PublicKeyEccExplicitCurve,
                "EC public key uses explicit (non-named) domain parameters",
            ));
            out.extend(analyze_explicit_field(params_data));
            return out;
        }
        EcParameters::Named(oid) => match curve::by_oid(oid) {
            Some(c) => c,
            None => {
                out.push(SecurityJudgement::new(
                    JudgementCode::PublicKeyEccUnknownCurve,
                    format!("EC public key uses unrecognized named curve {}", oid),
                ));
                return out;
            }
        },
    };

    if curve.koblitz {
        out.push(SecurityJudgement::new(
            JudgementCode::PublicKeyEccKoblitzCurve,
            format!("EC public key uses Koblitz curve {}", curve.name),
        ));
    }

    if curve.field != FieldKind::Prime {
        return out;
    }

    let field_bytes = common::ceil_div(curve.bits as usize, 8);
    let (x, y) = match decode_point(point_bytes, field_bytes) {
        Ok(p) => p,
        Err(_) => {
            out.push(SecurityJudgement::new(
                JudgementCode::SignatureEcdsaMalformedUndecodable,
                "EC public key point could not be decoded",
            ));
            return out;
        }
    };

    if !curve.contains_point(&x, &y) {
        out.push(SecurityJudgement::new(
            JudgementCode::PublicKeyEccPublicKeyPointNotOnCurve,
            "EC public key point does not satisfy the curve equation",
        ));
        return out;
    }

    if x == curve.gx && y == curve.gy {
        out.push(SecurityJudgement::new(
            JudgementCode::PublicKeyEccPublicKeyIsGenerator,
            "EC public key is exactly the curve's base point",
        ));
    }

    for (label, coord) in [("x", &x), ("y", &y)] {
        if let Some(ratio) = bit_bias_ratio(coord, field_bytes * 8) {
            if !(0.4..=0.6).contains(&ratio) {
                out.push(
                    SecurityJudgement::new(
                        JudgementCode::PublicKeyEccBitBiasPresent,
                        format!("EC public key coordinate {} has a skewed bit distribution ({:.1}% ones)", label, ratio * 100.0),
                    )
                    .with_verdict(crate::judgement::Verdict::WeakSecurity),
                );
            }
        }
    }

    out.push(
        SecurityJudgement::new(JudgementCode::PublicKeyEccKeyStrength, format!("EC key on {} ({} bits)", curve.name, curve.bits))
            .with_bits(curve.bits / 2),
    );

    out
}

/// EdDSA keys (RFC 8410) carry no curve parameters at all: the algorithm
/// OID alone (Ed25519 vs Ed448) fixes the curve, and the public key is a
/// fixed-length raw byte string, not an ASN.1 structure.
pub fn analyze_eddsa(oid: &ObjectIdentifier, key_bytes: &[u8]) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let (expected_len, bits) = if *oid == *pkix::oid::ED25519 {
        (32, 128u32)
    } else if *oid == *pkix::oid::ED448 {
        (57, 224u32)
    } else {
        out.push(SecurityJudgement::new(
            JudgementCode::PublicKeyEccUnknownCurve,
            "Unrecognized EdDSA algorithm OID",
        ));
        return out;
    };

    if key_bytes.len() != expected_len {
        out.push(SecurityJudgement::new(
            JudgementCode::SignatureEcdsaMalformedUndecodable,
            format!("EdDSA public key is {} bytes, expected {}", key_bytes.len(), expected_len),
        ));
        return out;
    }

    out.push(
        SecurityJudgement::new(JudgementCode::PublicKeyEccKeyStrength, format!("EdDSA key ({} bits)", bits))
            .with_bits(bits / 2),
    );
    out
}

/// Decodes an ECDSA signature's `ECDSA-Sig-Value ::= SEQUENCE { r INTEGER,
/// s INTEGER }` (RFC 3279 §2.2.3) out of the raw `signatureValue` bit
/// string contents.
pub fn decode_signature(sig_bytes: &[u8]) -> Result<(BigUint, BigUint)> {
    let el = asn::parse_single(sig_bytes)?;
    let fields = Element::read_all(&el.data)?;
    if fields.len() != 2 {
        return Err(err_msg("ECDSA-Sig-Value must have exactly 2 fields"));
    }
    Ok((BigUint::from_be_bytes(&fields[0].data), BigUint::from_be_bytes(&fields[1].data)))
}

/// Checks an ECDSA signature's `r`/`s` components for bit-bias, against the
/// signing curve's field width. A malformed `ECDSA-Sig-Value` is reported
/// and no bias check is attempted.
pub fn analyze_signature(sig_bytes: &[u8], curve_bits: u32) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();

    let (r, s) = match decode_signature(sig_bytes) {
        Ok(rs) => rs,
        Err(_) => {
            out.push(SecurityJudgement::new(
                JudgementCode::SignatureEcdsaMalformedUndecodable,
                "ECDSA signature does not decode as SEQUENCE { r INTEGER, s INTEGER }",
            ));
            return out;
        }
    };

    for (label, value) in [("r", &r), ("s", &s)] {
        if let Some(ratio) = bit_bias_ratio(value, curve_bits as usize) {
            if !(0.4..=0.6).contains(&ratio) {
                out.push(
                    SecurityJudgement::new(
                        JudgementCode::SignatureEcdsaBitBiasPresent,
                        format!("ECDSA signature component {} has a skewed bit distribution ({:.1}% ones)", label, ratio * 100.0),
                    )
                    .with_verdict(crate::judgement::Verdict::WeakSecurity),
                );
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length_ed25519_key() {
        let oid = pkix::oid::ED25519.clone();
        let out = analyze_eddsa(&oid, &[0u8; 31]);
        assert!(out.has_code(JudgementCode::SignatureEcdsaMalformedUndecodable));
    }

    #[test]
    fn accepts_correct_length_ed25519_key() {
        let oid = pkix::oid::ED25519.clone();
        let out = analyze_eddsa(&oid, &[0u8; 32]);
        assert!(out.has_code(JudgementCode::PublicKeyEccKeyStrength));
    }

    #[test]
    fn flags_unknown_named_curve() {
        let unknown = ObjectIdentifier::from_dotted_str("1.2.3.4.5").unwrap();
        let out = analyze(&EcParameters::Named(unknown), &[]);
        assert!(out.has_code(JudgementCode::PublicKeyEccUnknownCurve));
    }

    fn der_signature(r: &[u8], s: &[u8]) -> Vec<u8> {
        fn der_integer(v: &[u8]) -> Vec<u8> {
            let mut out = vec![0x02, v.len() as u8];
            out.extend_from_slice(v);
            out
        }
        let r_enc = der_integer(r);
        let s_enc = der_integer(s);
        let mut seq = vec![0x30, (r_enc.len() + s_enc.len()) as u8];
        seq.extend_from_slice(&r_enc);
        seq.extend_from_slice(&s_enc);
        seq
    }

    #[test]
    fn malformed_signature_is_flagged() {
        let out = analyze_signature(&[0x30, 0x01, 0x00], 256);
        assert!(out.has_code(JudgementCode::SignatureEcdsaMalformedUndecodable));
    }

    #[test]
    fn biased_signature_component_is_flagged() {
        let sig = der_signature(&[0x00; 32], &[0x7f; 32]);
        let out = analyze_signature(&sig, 256);
        assert!(out.has_code(JudgementCode::SignatureEcdsaBitBiasPresent));
    }

    fn der_tlv(tag: u8, content: &[u8]) -> Vec<u8> {
        assert!(content.len() < 128);
        let mut out = vec![tag, content.len() as u8];
        out.extend_from_slice(content);
        out
    }

    fn der_oid(oid: &ObjectIdentifier) -> Vec<u8> {
        der_tlv(0x06, &oid.to_der())
    }

    fn der_int(bytes: &[u8]) -> Vec<u8> {
        der_tlv(0x02, bytes)
    }

    /// Builds the content bytes of a trinomial-basis `ECParameters`
    /// SEQUENCE carrying only what `analyze_explicit_field` reads:
    /// version, then `fieldID { characteristic-two-field, { m, tpBasis, k } }`.
    fn trinomial_ec_params(m: u8, k: u8) -> Vec<u8> {
        let mut c2_content = der_int(&[m]);
        c2_content.extend(der_oid(&pkix::oid::EC_TP_BASIS));
        c2_content.extend(der_int(&[k]));
        let c2 = der_tlv(0x30, &c2_content);

        let mut field_id_content = der_oid(&pkix::oid::EC_CHARACTERISTIC_TWO_FIELD);
        field_id_content.extend(c2);
        let field_id = der_tlv(0x30, &field_id_content);

        let mut params = der_int(&[1]);
        params.extend(field_id);
        params
    }

    #[test]
    fn valid_trinomial_polynomial_is_not_flagged() {
        let params = trinomial_ec_params(5, 3);
        let out = analyze_explicit_field(&params);
        assert!(!out.has_code(JudgementCode::PublicKeyEccExplicitCurvePolynomialInvalid));
    }

    #[test]
    fn trinomial_polynomial_with_repeated_exponent_is_flagged() {
        let params = trinomial_ec_params(5, 5);
        let out = analyze_explicit_field(&params);
        assert!(out.has_code(JudgementCode::PublicKeyEccExplicitCurvePolynomialInvalid));
    }
}
