//! Public key interpretation and analysis: dispatches on the
//! `SubjectPublicKeyInfo` algorithm OID to the RSA, RSA-PSS, DSA, ECDSA or
//! EdDSA analyzer.

pub mod curve;
pub mod dsa;
pub mod ecdsa;
pub mod rsa;
pub mod rsa_pss;

use pkix::SubjectPublicKeyInfo;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};
use crate::moduli::ModulusDb;

/// The interpreted key material, tagged by algorithm family. Decode
/// failures inside a family-specific payload surface as a judgement against
/// the whole key, not as a hard error: an undecodable public key still
/// leaves the rest of the certificate worth analyzing.
#[derive(Debug, Clone)]
pub enum PublicKeyMaterial {
    Rsa(rsa::RsaPublicKey),
    Dsa(dsa::DsaParameters),
    Ecdsa(ecdsa::EcParameters),
    EdDsa,
    Unknown,
}

pub struct PublicKeyAnalysis {
    pub material: PublicKeyMaterial,
    pub judgements: SecurityJudgements,
}

pub fn analyze(spki: &SubjectPublicKeyInfo, fast_rsa: bool, rsa_testprimes_max: u32, moduli: Option<&ModulusDb>) -> PublicKeyAnalysis {
    let oid = &spki.algorithm.algorithm;

    if *oid == *pkix::oid::RSA_ENCRYPTION || *oid == *pkix::oid::RSASSA_PSS {
        let mut judgements = SecurityJudgements::new();
        if *oid == *pkix::oid::RSASSA_PSS {
            judgements.extend(rsa_pss::analyze(&spki.algorithm));
        } else if spki.algorithm.parameters_absent() {
            judgements.push(SecurityJudgement::new(
                JudgementCode::PublicKeyRsaParametersMissing,
                "RSA AlgorithmIdentifier parameters field is absent",
            ));
        } else if !spki.algorithm.parameters_is_null() {
            judgements.push(SecurityJudgement::new(
                JudgementCode::PublicKeyRsaParametersNotNull,
                "RSA AlgorithmIdentifier parameters are not NULL",
            ));
        }

        return match rsa::decode(&spki.subject_public_key.bytes) {
            Ok(key) => {
                judgements.extend(rsa::analyze(&spki.subject_public_key.bytes, &key, fast_rsa, rsa_testprimes_max, moduli));
                PublicKeyAnalysis {
                    material: PublicKeyMaterial::Rsa(key),
                    judgements,
                }
            }
            Err(_) => {
                judgements.push(SecurityJudgement::new(JudgementCode::CertPubkeyInvalidDer, "RSAPublicKey could not be decoded"));
                PublicKeyAnalysis {
                    material: PublicKeyMaterial::Unknown,
                    judgements,
                }
            }
        };
    }

    if *oid == *pkix::oid::DSA {
        let mut judgements = SecurityJudgements::new();
        return match dsa::decode_parameters(&spki.algorithm).and_then(|params| {
            let y = dsa::decode_public_key(&spki.subject_public_key.bytes)?;
            Ok((params, y))
        }) {
            Ok((params, y)) => {
                judgements.extend(dsa::analyze(&params, &y));
                PublicKeyAnalysis {
                    material: PublicKeyMaterial::Dsa(params),
                    judgements,
                }
            }
            Err(_) => {
                judgements.push(SecurityJudgement::new(JudgementCode::CertPubkeyInvalidDer, "DSA public key could not be decoded"));
                PublicKeyAnalysis {
                    material: PublicKeyMaterial::Unknown,
                    judgements,
                }
            }
        };
    }

    if *oid == *pkix::oid::EC_PUBLIC_KEY {
        let mut judgements = SecurityJudgements::new();
        return match ecdsa::decode_ec_parameters(&spki.algorithm) {
            Ok(params) => {
                judgements.extend(ecdsa::analyze(&params, &spki.subject_public_key.bytes));
                PublicKeyAnalysis {
                    material: PublicKeyMaterial::Ecdsa(params),
                    judgements,
                }
            }
            Err(_) => {
                judgements.push(SecurityJudgement::new(JudgementCode::CertPubkeyInvalidDer, "ECParameters could not be decoded"));
                PublicKeyAnalysis {
                    material: PublicKeyMaterial::Unknown,
                    judgements,
                }
            }
        };
    }

    if *oid == *pkix::oid::ED25519 || *oid == *pkix::oid::ED448 {
        let judgements = ecdsa::analyze_eddsa(oid, &spki.subject_public_key.bytes);
        return PublicKeyAnalysis {
            material: PublicKeyMaterial::EdDsa,
            judgements,
        };
    }

    PublicKeyAnalysis {
        material: PublicKeyMaterial::Unknown,
        judgements: SecurityJudgements::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rsa_key_der() -> Vec<u8> {
        let m = math::big::BigInt::from(3233i64).to_be_bytes();
        let e = math::big::BigInt::from(65537i64).to_be_bytes();
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

    fn rsa_spki(parameters: Option<asn::Element>) -> SubjectPublicKeyInfo {
        SubjectPublicKeyInfo {
            algorithm: pkix::AlgorithmIdentifier {
                algorithm: pkix::oid::RSA_ENCRYPTION.clone(),
                parameters,
                raw: vec![],
            },
            subject_public_key: asn::types::BitString { bytes: bytes::Bytes::from(rsa_key_der()), unused_bits: 0 },
            raw: vec![],
        }
    }

    #[test]
    fn flags_missing_rsa_parameters() {
        let spki = rsa_spki(None);
        let out = analyze(&spki, false, 1000, None);
        assert!(out.judgements.has_code(JudgementCode::PublicKeyRsaParametersMissing));
    }

    #[test]
    fn flags_non_null_rsa_parameters() {
        let spki = rsa_spki(Some(asn::parse_single(&[0x02, 0x01, 0x05]).unwrap()));
        let out = analyze(&spki, false, 1000, None);
        assert!(out.judgements.has_code(JudgementCode::PublicKeyRsaParametersNotNull));
    }

    #[test]
    fn accepts_null_rsa_parameters() {
        let spki = rsa_spki(Some(asn::parse_single(&[0x05, 0x00]).unwrap()));
        let out = analyze(&spki, false, 1000, None);
        assert!(!out.judgements.has_code(JudgementCode::PublicKeyRsaParametersMissing));
        assert!(!out.judgements.has_code(JudgementCode::PublicKeyRsaParametersNotNull));
    }
}
