//! Bidirectional name ↔ OID mapping for every object identifier this engine
//! needs to recognize: extensions, signature/hash/key algorithms, policy
//! qualifiers, and X.520 attribute types.
//!
//! The parent project generates this kind of table from compiled ASN.1
//! modules (`PKIX1Explicit88`, `PKCS_1`, ...); since there's no module
//! compiler here, the table is simply written out by hand, the same shape
//! `x509sak`'s OID registry takes.

use std::collections::HashMap;

use asn::ObjectIdentifier;
use lazy_static::lazy_static;

macro_rules! oids {
    ($($konst:ident = $name:expr => $dotted:expr),* $(,)?) => {
        lazy_static! {
            $(pub static ref $konst: ObjectIdentifier =
                ObjectIdentifier::from_dotted_str($dotted).unwrap();)*
        }

        /// All (name, dotted-string) pairs in the registry, used to build
        /// the reverse name lookup table.
        pub const ALL: &[(&str, &str)] = &[
            $(($name, $dotted)),*
        ];
    };
}

oids! {
    // Extension OIDs (RFC 5280 §4.2).
    EXT_SUBJECT_KEY_IDENTIFIER = "subjectKeyIdentifier" => "2.5.29.14",
    EXT_KEY_USAGE = "keyUsage" => "2.5.29.15",
    EXT_SUBJECT_ALT_NAME = "subjectAltName" => "2.5.29.17",
    EXT_ISSUER_ALT_NAME = "issuerAltName" => "2.5.29.18",
    EXT_BASIC_CONSTRAINTS = "basicConstraints" => "2.5.29.19",
    EXT_NAME_CONSTRAINTS = "nameConstraints" => "2.5.29.30",
    EXT_CRL_DISTRIBUTION_POINTS = "cRLDistributionPoints" => "2.5.29.31",
    EXT_CERTIFICATE_POLICIES = "certificatePolicies" => "2.5.29.32",
    EXT_POLICY_MAPPINGS = "policyMappings" => "2.5.29.33",
    EXT_AUTHORITY_KEY_IDENTIFIER = "authorityKeyIdentifier" => "2.5.29.35",
    EXT_POLICY_CONSTRAINTS = "policyConstraints" => "2.5.29.36",
    EXT_EXTENDED_KEY_USAGE = "extKeyUsage" => "2.5.29.37",
    EXT_FRESHEST_CRL = "freshestCRL" => "2.5.29.46",
    EXT_INHIBIT_ANY_POLICY = "inhibitAnyPolicy" => "2.5.29.54",
    EXT_AUTHORITY_INFO_ACCESS = "authorityInfoAccess" => "1.3.6.1.5.5.7.1.1",
    EXT_SUBJECT_INFO_ACCESS = "subjectInfoAccess" => "1.3.6.1.5.5.7.1.11",
    EXT_NS_CERT_TYPE = "nsCertType" => "2.16.840.1.113730.1.1",
    EXT_CT_PRECERT_SCTS = "ctPrecertificateSCTs" => "1.3.6.1.4.1.11129.2.4.2",
    EXT_CT_PRECERT_POISON = "ctPrecertificatePoison" => "1.3.6.1.4.1.11129.2.4.3",

    // Signature / key algorithm OIDs.
    RSA_ENCRYPTION = "rsaEncryption" => "1.2.840.113549.1.1.1",
    RSA_MD5 = "md5WithRSAEncryption" => "1.2.840.113549.1.1.4",
    RSA_SHA1 = "sha1WithRSAEncryption" => "1.2.840.113549.1.1.5",
    RSA_SHA256 = "sha256WithRSAEncryption" => "1.2.840.113549.1.1.11",
    RSA_SHA384 = "sha384WithRSAEncryption" => "1.2.840.113549.1.1.12",
    RSA_SHA512 = "sha512WithRSAEncryption" => "1.2.840.113549.1.1.13",
    RSASSA_PSS = "rsassaPss" => "1.2.840.113549.1.1.10",
    MGF1 = "mgf1" => "1.2.840.113549.1.1.8",
    DSA = "id-dsa" => "1.2.840.10040.4.1",
    DSA_SHA1 = "id-dsa-with-sha1" => "1.2.840.10040.4.3",
    DSA_SHA256 = "dsa-with-sha256" => "2.16.840.1.101.3.4.3.2",
    EC_PUBLIC_KEY = "id-ecPublicKey" => "1.2.840.10045.2.1",
    ECDSA_SHA1 = "ecdsa-with-SHA1" => "1.2.840.10045.4.1",
    ECDSA_SHA256 = "ecdsa-with-SHA256" => "1.2.840.10045.4.3.2",
    ECDSA_SHA384 = "ecdsa-with-SHA384" => "1.2.840.10045.4.3.3",
    ECDSA_SHA512 = "ecdsa-with-SHA512" => "1.2.840.10045.4.3.4",
    ED25519 = "id-Ed25519" => "1.3.101.112",
    ED448 = "id-Ed448" => "1.3.101.113",

    // Hash function OIDs.
    HASH_MD5 = "md5" => "1.2.840.113549.2.5",
    HASH_SHA1 = "sha1" => "1.3.14.3.2.26",
    HASH_SHA224 = "sha224" => "2.16.840.1.101.3.4.2.4",
    HASH_SHA256 = "sha256" => "2.16.840.1.101.3.4.2.1",
    HASH_SHA384 = "sha384" => "2.16.840.1.101.3.4.2.2",
    HASH_SHA512 = "sha512" => "2.16.840.1.101.3.4.2.3",
    HASH_SHA3_256 = "sha3-256" => "2.16.840.1.101.3.4.2.8",
    HASH_SHA3_384 = "sha3-384" => "2.16.840.1.101.3.4.2.9",
    HASH_SHA3_512 = "sha3-512" => "2.16.840.1.101.3.4.2.10",

    // Named elliptic curves.
    CURVE_SECP192R1 = "secp192r1" => "1.2.840.10045.3.1.1",
    CURVE_SECP224R1 = "secp224r1" => "1.3.132.0.33",
    CURVE_SECP256R1 = "secp256r1" => "1.2.840.10045.3.1.7",
    CURVE_SECP384R1 = "secp384r1" => "1.3.132.0.34",
    CURVE_SECP521R1 = "secp521r1" => "1.3.132.0.35",
    CURVE_SECP256K1 = "secp256k1" => "1.3.132.0.10",
    EC_PRIME_FIELD = "prime-field" => "1.2.840.10045.1.1",
    EC_CHARACTERISTIC_TWO_FIELD = "characteristic-two-field" => "1.2.840.10045.1.2",
    EC_GN_BASIS = "gnBasis" => "1.2.840.10045.1.2.3.1",
    EC_TP_BASIS = "tpBasis" => "1.2.840.10045.1.2.3.2",
    EC_PP_BASIS = "ppBasis" => "1.2.840.10045.1.2.3.3",

    // Extended key usages (RFC 5280 §4.2.1.12).
    EKU_ANY = "anyExtendedKeyUsage" => "2.5.29.37.0",
    EKU_SERVER_AUTH = "serverAuth" => "1.3.6.1.5.5.7.3.1",
    EKU_CLIENT_AUTH = "clientAuth" => "1.3.6.1.5.5.7.3.2",
    EKU_CODE_SIGNING = "codeSigning" => "1.3.6.1.5.5.7.3.3",
    EKU_EMAIL_PROTECTION = "emailProtection" => "1.3.6.1.5.5.7.3.4",
    EKU_TIME_STAMPING = "timeStamping" => "1.3.6.1.5.5.7.3.8",
    EKU_OCSP_SIGNING = "OCSPSigning" => "1.3.6.1.5.5.7.3.9",

    // Certificate policy qualifier OIDs (RFC 5280 §4.2.1.4).
    POLICY_ANY = "anyPolicy" => "2.5.29.32.0",
    QT_CPS = "id-qt-cps" => "1.3.6.1.5.5.7.2.1",
    QT_UNOTICE = "id-qt-unotice" => "1.3.6.1.5.5.7.2.2",

    // X.520 attribute types used in distinguished names.
    AT_COMMON_NAME = "commonName" => "2.5.4.3",
    AT_SURNAME = "surname" => "2.5.4.4",
    AT_SERIAL_NUMBER = "serialNumber" => "2.5.4.5",
    AT_COUNTRY_NAME = "countryName" => "2.5.4.6",
    AT_LOCALITY_NAME = "localityName" => "2.5.4.7",
    AT_STATE_OR_PROVINCE_NAME = "stateOrProvinceName" => "2.5.4.8",
    AT_ORGANIZATION_NAME = "organizationName" => "2.5.4.10",
    AT_ORGANIZATIONAL_UNIT_NAME = "organizationalUnitName" => "2.5.4.11",
    AT_TITLE = "title" => "2.5.4.12",
    AT_GIVEN_NAME = "givenName" => "2.5.4.42",
    AT_EMAIL_ADDRESS = "emailAddress" => "1.2.840.113549.1.9.1",
}

lazy_static! {
    static ref NAMES_BY_OID: HashMap<ObjectIdentifier, &'static str> = {
        let mut m = HashMap::new();
        for (name, dotted) in ALL {
            m.insert(ObjectIdentifier::from_dotted_str(dotted).unwrap(), *name);
        }
        m
    };
    static ref OIDS_BY_NAME: HashMap<&'static str, ObjectIdentifier> = {
        let mut m = HashMap::new();
        for (name, dotted) in ALL {
            m.insert(*name, ObjectIdentifier::from_dotted_str(dotted).unwrap());
        }
        m
    };
}

/// Looks up the registry name for an OID, if recognized.
pub fn name_for(oid: &ObjectIdentifier) -> Option<&'static str> {
    NAMES_BY_OID.get(oid).copied()
}

/// Looks up the OID for a registry name, if recognized.
pub fn oid_for(name: &str) -> Option<ObjectIdentifier> {
    OIDS_BY_NAME.get(name).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_extension() {
        assert_eq!(name_for(&EXT_SUBJECT_ALT_NAME), Some("subjectAltName"));
    }

    #[test]
    fn looks_up_by_name() {
        assert_eq!(oid_for("rsaEncryption").unwrap(), *RSA_ENCRYPTION);
    }

    #[test]
    fn unknown_oid_has_no_name() {
        let unknown = ObjectIdentifier::from_dotted_str("1.2.3.4.5.6.7").unwrap();
        assert_eq!(name_for(&unknown), None);
    }
}
