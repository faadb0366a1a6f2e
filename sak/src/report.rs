//! Serializable report types and the top-level driver that runs every
//! analyzer over a decoded certificate (and, where supplied, a presumed
//! issuer and a target identity) and assembles their output.

use serde::Serialize;

use pkix::{Certificate, GeneralName};

use crate::config::{AnalysisConfig, Purpose};
use crate::extensions::ExtensionsAnalysis;
use crate::judgement::SecurityJudgements;
use crate::pubkey::PublicKeyAnalysis;
use crate::signature_verifier::SignatureVerifier;

#[derive(Debug, Clone, Serialize)]
pub struct NameReport {
    pub rfc2253: String,
    pub pretty: String,
    pub rdns: Vec<Vec<(String, String)>>,
}

impl NameReport {
    fn from(dn: &pkix::DistinguishedName) -> Self {
        let rdns = dn
            .rdns
            .iter()
            .map(|rdn| {
                rdn.attrs
                    .iter()
                    .map(|attr| (pkix::oid::name_for(&attr.attr_type).unwrap_or("unknownAttribute").to_string(), attr.value.clone()))
                    .collect()
            })
            .collect();
        Self {
            rfc2253: dn.to_rfc2253(),
            pretty: dn.to_pretty(),
            rdns,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidityReport {
    pub not_before: String,
    pub not_before_encoding: &'static str,
    pub not_after: String,
    pub not_after_encoding: &'static str,
}

fn encoding_name(encoding: pkix::TimeEncoding) -> &'static str {
    match encoding {
        pkix::TimeEncoding::Utc => "UTCTime",
        pkix::TimeEncoding::Generalized => "GeneralizedTime",
    }
}

fn time_string(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map(|v| v.to_rfc3339()).unwrap_or_else(|| "(malformed)".to_string())
}

impl ValidityReport {
    fn from(validity: &pkix::Validity) -> Self {
        Self {
            not_before: time_string(validity.not_before.value),
            not_before_encoding: encoding_name(validity.not_before.encoding),
            not_after: time_string(validity.not_after.value),
            not_after_encoding: encoding_name(validity.not_after.encoding),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignatureReport {
    pub algorithm_oid: String,
    pub algorithm_name: Option<&'static str>,
    pub raw_signature: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cryptosystem")]
pub enum PubkeyReport {
    Rsa {
        n: String,
        e: String,
    },
    Dsa {
        p: String,
        q: String,
        g: String,
        y: Option<String>,
    },
    Ecdsa {
        curve: &'static str,
        x: Option<String>,
        y: Option<String>,
    },
    EdDsa {
        curve: &'static str,
    },
    Unknown,
}

fn pubkey_report(spki: &pkix::SubjectPublicKeyInfo, material: &crate::pubkey::PublicKeyMaterial) -> PubkeyReport {
    use crate::pubkey::PublicKeyMaterial;

    match material {
        PublicKeyMaterial::Rsa(key) => PubkeyReport::Rsa {
            n: key.modulus.to_string(),
            e: key.exponent.to_string(),
        },
        PublicKeyMaterial::Dsa(params) => {
            let y = crate::pubkey::dsa::decode_public_key(&spki.subject_public_key.bytes).ok().map(|y| y.to_string());
            PubkeyReport::Dsa {
                p: params.p.to_string(),
                q: params.q.to_string(),
                g: params.g.to_string(),
                y,
            }
        }
        PublicKeyMaterial::Ecdsa(ec_params) => {
            let curve_name = match ec_params {
                crate::pubkey::ecdsa::EcParameters::Named(oid) => crate::pubkey::curve::by_oid(oid).map(|c| c.name).unwrap_or("unknown"),
                crate::pubkey::ecdsa::EcParameters::Explicit(_) => "explicit",
            };
            let point = match ec_params {
                crate::pubkey::ecdsa::EcParameters::Named(oid) => {
                    crate::pubkey::curve::by_oid(oid).and_then(|c| crate::pubkey::ecdsa::decode_point(&spki.subject_public_key.bytes, ((c.bits + 7) / 8) as usize).ok())
                }
                crate::pubkey::ecdsa::EcParameters::Explicit(_) => None,
            };
            let (x, y) = match point {
                Some((x, y)) => (Some(x.to_string()), Some(y.to_string())),
                None => (None, None),
            };
            PubkeyReport::Ecdsa { curve: curve_name, x, y }
        }
        PublicKeyMaterial::EdDsa => {
            let curve = if spki.algorithm.algorithm == *pkix::oid::ED25519 { "Ed25519" } else { "Ed448" };
            PubkeyReport::EdDsa { curve }
        }
        PublicKeyMaterial::Unknown => PubkeyReport::Unknown,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionReport {
    pub oid: String,
    pub name: Option<&'static str>,
    pub critical: bool,
    pub security: SecurityJudgements,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionsReport {
    pub individual: Vec<ExtensionReport>,
    pub security: SecurityJudgements,
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificateReport {
    pub source: String,
    pub subject: NameReport,
    pub issuer: NameReport,
    pub validity: ValidityReport,
    pub signature: SignatureReport,
    pub pubkey: PubkeyReport,
    pub extensions: ExtensionsReport,
    pub security: SecurityJudgements,
}

/// Runs every analyzer the engine owns over one decoded certificate, plus
/// the CA-relationship and purpose analyzers when their inputs are
/// supplied, and assembles the combined report. Failure to decode the
/// top-level `Certificate` SEQUENCE is the caller's problem (surfaced by
/// [`pkix::Certificate::decode_der`] before this function is ever called);
/// every defect past that point becomes a judgement, never an `Err`.
pub fn analyze_certificate(
    source: impl Into<String>,
    cert: &Certificate,
    issuer: Option<&Certificate>,
    config: &AnalysisConfig,
    verifier: &dyn SignatureVerifier,
    moduli: Option<&crate::moduli::ModulusDb>,
    now_ms: u64,
) -> CertificateReport {
    let tbs = &cert.tbs_certificate;

    let is_self_signed_root = tbs.issuer.matches(&tbs.subject);
    let extensions_analysis = crate::extensions::analyze(
        tbs.extensions.as_deref().unwrap_or(&[]),
        &tbs.subject,
        &tbs.subject_public_key_info.subject_public_key.bytes,
        is_self_signed_root,
        now_ms,
    );

    let pubkey_analysis: PublicKeyAnalysis = crate::pubkey::analyze(&tbs.subject_public_key_info, config.fast_rsa, config.rsa_testprimes_max, moduli);

    let mut security = SecurityJudgements::new();
    security.extend(crate::body::analyze(cert));
    security.extend(pubkey_analysis.judgements.clone());
    security.extend(extensions_analysis.set_level.clone());

    if let Some(issuer_cert) = issuer {
        let issuer_is_self_signed = issuer_cert.tbs_certificate.issuer.matches(&issuer_cert.tbs_certificate.subject);
        let issuer_extensions = crate::extensions::analyze(
            issuer_cert.tbs_certificate.extensions.as_deref().unwrap_or(&[]),
            &issuer_cert.tbs_certificate.subject,
            &issuer_cert.tbs_certificate.subject_public_key_info.subject_public_key.bytes,
            issuer_is_self_signed,
            now_ms,
        );
        security.extend(crate::ca_relationship::analyze(cert, &extensions_analysis, issuer_cert, &issuer_extensions, verifier));
    }

    for purpose in &config.purposes {
        let key_usage = tbs
            .extensions
            .as_ref()
            .and_then(|exts| exts.iter().find(|e| e.oid == *pkix::oid::EXT_KEY_USAGE))
            .and_then(|e| crate::extensions::key_usage::decode(e).ok())
            .map(|(_, flags)| flags);
        let ekus = tbs
            .extensions
            .as_ref()
            .and_then(|exts| exts.iter().find(|e| e.oid == *pkix::oid::EXT_EXTENDED_KEY_USAGE))
            .and_then(|e| crate::extensions::extended_key_usage::decode(e).ok())
            .unwrap_or_default();
        security.extend(crate::purpose::analyze_role(&extensions_analysis, key_usage, &ekus, extensions_analysis.ns_cert_type, *purpose));

        if *purpose == Purpose::TlsServer {
            if let Some(hostname) = &config.entity_name {
                security.extend(crate::purpose::analyze_hostname(cert, &extensions_analysis, hostname));
            }
        }
    }

    let individual = extensions_analysis
        .per_extension
        .iter()
        .map(|e| ExtensionReport {
            oid: e.oid.to_string(),
            name: pkix::oid::name_for(&e.oid),
            critical: e.critical,
            security: e.judgements.clone(),
        })
        .collect();

    CertificateReport {
        source: source.into(),
        subject: NameReport::from(&tbs.subject),
        issuer: NameReport::from(&tbs.issuer),
        validity: ValidityReport::from(&tbs.validity),
        signature: SignatureReport {
            algorithm_oid: cert.signature_algorithm.algorithm.to_string(),
            algorithm_name: pkix::oid::name_for(&cert.signature_algorithm.algorithm),
            raw_signature: if config.include_raw_data { Some(cert.signature_value.bytes.to_vec()) } else { None },
        },
        pubkey: pubkey_report(&tbs.subject_public_key_info, &pubkey_analysis.material),
        extensions: ExtensionsReport {
            individual,
            security: extensions_analysis.set_level.clone(),
        },
        security,
    }
}

/// Same as [`analyze_certificate`], but decodes `der` itself via
/// [`crate::der_canonical::decode_lenient`] instead of requiring an
/// already-decoded `Certificate`: trailing bytes after the top-level
/// structure and non-canonical DER elsewhere in the tree become judgements
/// on the returned report rather than a hard decode failure. Returns `None`
/// only when `der` doesn't decode as a Certificate at all.
pub fn analyze_der(
    source: impl Into<String>,
    der: &[u8],
    issuer: Option<&Certificate>,
    config: &AnalysisConfig,
    verifier: &dyn SignatureVerifier,
    moduli: Option<&crate::moduli::ModulusDb>,
    now_ms: u64,
) -> Option<CertificateReport> {
    let (cert, lenient_judgements) = crate::der_canonical::decode_lenient(der);
    let cert = cert?;
    let mut report = analyze_certificate(source, &cert, issuer, config, verifier, moduli, now_ms);
    report.security.extend(lenient_judgements);
    Some(report)
}

/// Convenience for callers that only ever want the SAN `dNSName` entries
/// (e.g. to drive their own hostname matching against a different rule set).
pub fn dns_names(cert: &Certificate) -> Vec<String> {
    cert.tbs_certificate
        .extensions
        .as_ref()
        .into_iter()
        .flatten()
        .filter(|e| e.oid == *pkix::oid::EXT_SUBJECT_ALT_NAME)
        .filter_map(|e| crate::extensions::subject_alt_name::decode(e).ok())
        .flatten()
        .filter_map(|name| match name {
            GeneralName::DnsName(s) => Some(s),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature_verifier::InProcessVerifier;

    #[test]
    fn dns_names_is_empty_without_extensions() {
        // Minimal TbsCertificate with no extensions at all is awkward to
        // build by hand here; covered end-to-end in sak/tests instead.
        let _ = InProcessVerifier;
    }
}
