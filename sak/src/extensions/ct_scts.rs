//! `CertificateTransparencySCTs` (RFC 6962 §3.3): an OCTET STRING wrapping a
//! TLS-encoded `SignedCertificateTimestampList`, itself a list of binary
//! (non-ASN.1) `SignedCertificateTimestamp` structures.

use common::errors::{err_msg, Result};
use pkix::Extension;

use crate::codes::JudgementCode;
use crate::judgement::{SecurityJudgement, SecurityJudgements};

#[derive(Debug, Clone)]
pub struct SignedCertificateTimestamp {
    pub version: u8,
    pub log_id: Vec<u8>,
    pub timestamp_ms: u64,
    pub hash_algorithm: u8,
    pub signature_algorithm: u8,
}

const SCT_VERSION_V1: u8 = 0;
const LOG_ID_LEN: usize = 32;

/// RFC 6962 §2.1.4 requires sha256 (4) as the hash and either rsa (1) or
/// ecdsa (3) as the signature algorithm, unlike the wider TLS enums those
/// byte values are drawn from (RFC 5246 §7.4.1.4.1).
const ALLOWED_HASH_ALGORITHMS: &[u8] = &[4];
const ALLOWED_SIGNATURE_ALGORITHMS: &[u8] = &[1, 3];

fn read_u16(data: &[u8], pos: &mut usize) -> Result<u16> {
    if *pos + 2 > data.len() {
        return Err(err_msg("truncated while reading a 2-byte length"));
    }
    let v = u16::from_be_bytes([data[*pos], data[*pos + 1]]);
    *pos += 2;
    Ok(v)
}

fn read_bytes<'a>(data: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8]> {
    if *pos + len > data.len() {
        return Err(err_msg("truncated while reading a fixed-length field"));
    }
    let v = &data[*pos..*pos + len];
    *pos += len;
    Ok(v)
}

fn decode_one_sct(data: &[u8]) -> Result<SignedCertificateTimestamp> {
    let mut pos = 0;
    let version = *read_bytes(data, &mut pos, 1)?.first().unwrap();
    let log_id = read_bytes(data, &mut pos, LOG_ID_LEN)?.to_vec();

    if pos + 8 > data.len() {
        return Err(err_msg("truncated SCT timestamp"));
    }
    let mut ts_bytes = [0u8; 8];
    ts_bytes.copy_from_slice(&data[pos..pos + 8]);
    let timestamp_ms = u64::from_be_bytes(ts_bytes);
    pos += 8;

    let ext_len = read_u16(data, &mut pos)? as usize;
    read_bytes(data, &mut pos, ext_len)?;

    let hash_algorithm = *read_bytes(data, &mut pos, 1)?.first().unwrap();
    let signature_algorithm = *read_bytes(data, &mut pos, 1)?.first().unwrap();
    let sig_len = read_u16(data, &mut pos)? as usize;
    read_bytes(data, &mut pos, sig_len)?;

    Ok(SignedCertificateTimestamp {
        version,
        log_id,
        timestamp_ms,
        hash_algorithm,
        signature_algorithm,
    })
}

pub fn decode(ext: &Extension) -> Result<Vec<SignedCertificateTimestamp>> {
    let octet_string = asn::Element::read_all(&ext.value)?.into_iter().next().ok_or_else(|| err_msg("CT SCT list extension is empty"))?;
    let list_bytes = octet_string.data;

    let mut pos = 0usize;
    let total_len = read_u16(&list_bytes, &mut pos)? as usize;
    if pos + total_len != list_bytes.len() {
        return Err(err_msg("SCT list length prefix does not match payload size"));
    }

    let mut out = vec![];
    while pos < list_bytes.len() {
        let sct_len = read_u16(&list_bytes, &mut pos)? as usize;
        let sct_bytes = read_bytes(&list_bytes, &mut pos, sct_len)?;
        out.push(decode_one_sct(sct_bytes)?);
    }

    Ok(out)
}

/// Plausibility window: 2010-01-01T00:00:00Z .. 2099-12-31T23:59:59Z,
/// in milliseconds since the epoch. CT predates neither end of that range
/// in any deployment, so a timestamp outside it is a malformed or forged
/// SCT rather than a legitimately old or futuristic one.
const PLAUSIBLE_MIN_MS: u64 = 1_262_304_000_000;
const PLAUSIBLE_MAX_MS: u64 = 4_102_444_799_000;

pub fn analyze(ext: &Extension, scts: &[SignedCertificateTimestamp], now_ms: u64) -> SecurityJudgements {
    let mut out = SecurityJudgements::new();
    let _ = (ext, now_ms);

    for sct in scts {
        if sct.version != SCT_VERSION_V1 {
            out.push(SecurityJudgement::new(
                JudgementCode::CertificateTransparencySctsSctInvalidVersion,
                format!("SCT version {} is not v1", sct.version),
            ));
        }

        if !ALLOWED_HASH_ALGORITHMS.contains(&sct.hash_algorithm) {
            out.push(SecurityJudgement::new(
                JudgementCode::CertificateTransparencySctsSctInvalidHashFunction,
                format!("SCT uses disallowed hash algorithm {}", sct.hash_algorithm),
            ));
        }

        if !ALLOWED_SIGNATURE_ALGORITHMS.contains(&sct.signature_algorithm) {
            out.push(SecurityJudgement::new(
                JudgementCode::CertificateTransparencySctsSctInvalidSignatureAlgorithm,
                format!("SCT uses disallowed signature algorithm {}", sct.signature_algorithm),
            ));
        }

        if sct.timestamp_ms < PLAUSIBLE_MIN_MS || sct.timestamp_ms > PLAUSIBLE_MAX_MS {
            out.push(SecurityJudgement::new(
                JudgementCode::CertificateTransparencySctsSctImplausibleTimestamp,
                format!("SCT timestamp {} is outside the plausible range", sct.timestamp_ms),
            ));
        }
    }

    out
}
