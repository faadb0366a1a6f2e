//! Actual cryptographic signature verification, behind a trait so tests can
//! swap in a deterministic stub instead of exercising real crypto crates.

use dsa::signature::Verifier as DsaVerifierTrait;
use ecdsa::signature::Verifier as EcdsaVerifierTrait;
use ed25519_dalek::Verifier as Ed25519VerifierTrait;
use math::integer::Integer;
use pkix::{AlgorithmIdentifier, SubjectPublicKeyInfo};
use rsa::signature::Verifier as RsaVerifierTrait;
use sha2::{Digest, Sha256, Sha384, Sha512};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Invalid,
    Unsupported,
}

pub trait SignatureVerifier {
    fn verify(&self, tbs_der: &[u8], signature_alg: &AlgorithmIdentifier, signature: &[u8], spki: &SubjectPublicKeyInfo) -> VerifyOutcome;
}

/// Verifies against the real RSA/DSA/ECDSA/EdDSA primitives. RSA-PSS and
/// the DSA/ECDSA hash-function combinations not represented by a fixed OID
/// (only the hardcoded sha1/sha256/sha384/sha512-with-X combinations have
/// OIDs at all) are reported as `Unsupported` rather than guessed at.
pub struct InProcessVerifier;

impl SignatureVerifier for InProcessVerifier {
    fn verify(&self, tbs_der: &[u8], signature_alg: &AlgorithmIdentifier, signature: &[u8], spki: &SubjectPublicKeyInfo) -> VerifyOutcome {
        let oid = &signature_alg.algorithm;

        if *oid == *pkix::oid::RSA_SHA1 || *oid == *pkix::oid::RSA_SHA256 || *oid == *pkix::oid::RSA_SHA384 || *oid == *pkix::oid::RSA_SHA512 {
            return verify_rsa_pkcs1(oid, tbs_der, signature, spki);
        }

        if *oid == *pkix::oid::DSA_SHA1 || *oid == *pkix::oid::DSA_SHA256 {
            return verify_dsa(oid, tbs_der, signature, spki);
        }

        if *oid == *pkix::oid::ECDSA_SHA1 || *oid == *pkix::oid::ECDSA_SHA256 || *oid == *pkix::oid::ECDSA_SHA384 || *oid == *pkix::oid::ECDSA_SHA512 {
            return verify_ecdsa(oid, tbs_der, signature, spki);
        }

        if *oid == *pkix::oid::ED25519 {
            return verify_ed25519(tbs_der, signature, spki);
        }

        VerifyOutcome::Unsupported
    }
}

fn verify_rsa_pkcs1(oid: &asn::ObjectIdentifier, tbs_der: &[u8], signature: &[u8], spki: &SubjectPublicKeyInfo) -> VerifyOutcome {
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::RsaPublicKey as RsaCryptoKey;

    let parsed = match crate::pubkey::rsa::decode(&spki.subject_public_key.bytes) {
        Ok(k) => k,
        Err(_) => return VerifyOutcome::Unsupported,
    };
    let n = rsa::BigUint::from_bytes_be(&parsed.modulus.to_be_bytes());
    let e = rsa::BigUint::from_bytes_be(&parsed.exponent.to_be_bytes());
    let key = match RsaCryptoKey::new(n, e) {
        Ok(k) => k,
        Err(_) => return VerifyOutcome::Unsupported,
    };

    let sig = match Signature::try_from(signature) {
        Ok(s) => s,
        Err(_) => return VerifyOutcome::Invalid,
    };

    let outcome = if *oid == *pkix::oid::RSA_SHA1 {
        VerifyingKey::<sha1::Sha1>::new(key).verify(tbs_der, &sig)
    } else if *oid == *pkix::oid::RSA_SHA256 {
        VerifyingKey::<Sha256>::new(key).verify(tbs_der, &sig)
    } else if *oid == *pkix::oid::RSA_SHA384 {
        VerifyingKey::<Sha384>::new(key).verify(tbs_der, &sig)
    } else {
        VerifyingKey::<Sha512>::new(key).verify(tbs_der, &sig)
    };

    match outcome {
        Ok(()) => VerifyOutcome::Valid,
        Err(_) => VerifyOutcome::Invalid,
    }
}

fn verify_dsa(oid: &asn::ObjectIdentifier, tbs_der: &[u8], signature: &[u8], spki: &SubjectPublicKeyInfo) -> VerifyOutcome {
    use dsa::{Components, VerifyingKey};

    let params = match crate::pubkey::dsa::decode_parameters(&spki.algorithm) {
        Ok(p) => p,
        Err(_) => return VerifyOutcome::Unsupported,
    };
    let y = match crate::pubkey::dsa::decode_public_key(&spki.subject_public_key.bytes) {
        Ok(y) => y,
        Err(_) => return VerifyOutcome::Unsupported,
    };

    let components = match Components::from_components(
        dsa::BigUint::from_bytes_be(&params.p.to_be_bytes()),
        dsa::BigUint::from_bytes_be(&params.q.to_be_bytes()),
        dsa::BigUint::from_bytes_be(&params.g.to_be_bytes()),
    ) {
        Ok(c) => c,
        Err(_) => return VerifyOutcome::Unsupported,
    };
    let key = match VerifyingKey::from_components(components, dsa::BigUint::from_bytes_be(&y.to_be_bytes())) {
        Ok(k) => k,
        Err(_) => return VerifyOutcome::Unsupported,
    };

    let sig = match dsa::Signature::try_from(signature) {
        Ok(s) => s,
        Err(_) => return VerifyOutcome::Invalid,
    };

    let result = if *oid == *pkix::oid::DSA_SHA1 {
        let digest = sha1::Sha1::digest(tbs_der);
        key.verify(&digest, &sig)
    } else {
        let digest = Sha256::digest(tbs_der);
        key.verify(&digest, &sig)
    };

    match result {
        Ok(()) => VerifyOutcome::Valid,
        Err(_) => VerifyOutcome::Invalid,
    }
}

fn verify_ecdsa(oid: &asn::ObjectIdentifier, tbs_der: &[u8], signature: &[u8], spki: &SubjectPublicKeyInfo) -> VerifyOutcome {
    use p256::ecdsa::{Signature as P256Signature, VerifyingKey as P256VerifyingKey};
    use p384::ecdsa::{Signature as P384Signature, VerifyingKey as P384VerifyingKey};

    let curve = match crate::pubkey::ecdsa::decode_ec_parameters(&spki.algorithm).ok().and_then(|params| match params {
        crate::pubkey::ecdsa::EcParameters::Named(oid) => crate::pubkey::curve::by_oid(&oid),
        _ => None,
    }) {
        Some(c) => c,
        None => return VerifyOutcome::Unsupported,
    };

    if curve.bits == 256 {
        let key = match P256VerifyingKey::from_sec1_bytes(&spki.subject_public_key.bytes) {
            Ok(k) => k,
            Err(_) => return VerifyOutcome::Invalid,
        };
        let sig = match P256Signature::from_der(signature) {
            Ok(s) => s,
            Err(_) => return VerifyOutcome::Invalid,
        };
        return verify_ecdsa_outcome(key.verify(tbs_der, &sig), oid);
    }

    if curve.bits == 384 {
        let key = match P384VerifyingKey::from_sec1_bytes(&spki.subject_public_key.bytes) {
            Ok(k) => k,
            Err(_) => return VerifyOutcome::Invalid,
        };
        let sig = match P384Signature::from_der(signature) {
            Ok(s) => s,
            Err(_) => return VerifyOutcome::Invalid,
        };
        return verify_ecdsa_outcome(key.verify(tbs_der, &sig), oid);
    }

    VerifyOutcome::Unsupported
}

fn verify_ecdsa_outcome<E>(result: Result<(), E>, _oid: &asn::ObjectIdentifier) -> VerifyOutcome {
    match result {
        Ok(()) => VerifyOutcome::Valid,
        Err(_) => VerifyOutcome::Invalid,
    }
}

fn verify_ed25519(tbs_der: &[u8], signature: &[u8], spki: &SubjectPublicKeyInfo) -> VerifyOutcome {
    let key_bytes: [u8; 32] = match spki.subject_public_key.bytes.as_ref().try_into() {
        Ok(b) => b,
        Err(_) => return VerifyOutcome::Invalid,
    };
    let key = match ed25519_dalek::VerifyingKey::from_bytes(&key_bytes) {
        Ok(k) => k,
        Err(_) => return VerifyOutcome::Invalid,
    };
    let sig_bytes: [u8; 64] = match signature.try_into() {
        Ok(b) => b,
        Err(_) => return VerifyOutcome::Invalid,
    };
    let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

    match key.verify(tbs_der, &sig) {
        Ok(()) => VerifyOutcome::Valid,
        Err(_) => VerifyOutcome::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubVerifier(VerifyOutcome);
    impl SignatureVerifier for StubVerifier {
        fn verify(&self, _tbs_der: &[u8], _signature_alg: &AlgorithmIdentifier, _signature: &[u8], _spki: &SubjectPublicKeyInfo) -> VerifyOutcome {
            self.0
        }
    }

    #[test]
    fn stub_reports_configured_outcome() {
        let stub = StubVerifier(VerifyOutcome::Valid);
        let alg = AlgorithmIdentifier {
            algorithm: pkix::oid::RSA_SHA256.clone(),
            parameters: None,
            raw: vec![],
        };
        let spki = SubjectPublicKeyInfo {
            algorithm: alg.clone(),
            subject_public_key: asn::types::BitString { bytes: bytes::Bytes::new(), unused_bits: 0 },
            raw: vec![],
        };
        assert_eq!(stub.verify(b"tbs", &alg, b"sig", &spki), VerifyOutcome::Valid);
    }
}
