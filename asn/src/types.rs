//! Decoders for the handful of ASN.1 built-in types a certificate can
//! contain: BIT STRING, the two time types, and INTEGER canonicalization.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use common::errors::{err_msg, Result};

/// A BIT STRING, decoded as its whole bytes plus the count of unused bits in
/// the final byte (0-7, per X.690 §8.6.2.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    pub bytes: Bytes,
    pub unused_bits: u8,
}

impl BitString {
    /// Decodes the contents octets of a primitive BIT STRING: first byte is
    /// the unused-bit count, the rest is data.
    ///
    /// DER requires the unused padding bits to be zero; a certificate whose
    /// BIT STRING values don't satisfy this is non-canonical but still
    /// interpretable, so this returns the bits rather than erroring and
    /// leaves the canonicality check to `is_canonical`.
    pub fn from_der(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(err_msg("Empty BIT STRING"));
        }

        let unused_bits = data[0];
        if unused_bits > 7 {
            return Err(err_msg("BIT STRING unused bit count out of range"));
        }
        if unused_bits > 0 && data.len() == 1 {
            return Err(err_msg("BIT STRING has unused bits but no content octets"));
        }

        Ok(Self {
            bytes: Bytes::copy_from_slice(&data[1..]),
            unused_bits,
        })
    }

    pub fn to_der(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.bytes.len());
        out.push(self.unused_bits);
        out.extend_from_slice(&self.bytes);
        out
    }

    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 - self.unused_bits as usize
    }

    /// Whether the padding bits in the final octet are all zero, as DER
    /// requires (BER permits any value there).
    pub fn is_canonical(&self) -> bool {
        if self.unused_bits == 0 {
            return true;
        }
        match self.bytes.last() {
            None => true,
            Some(&last) => {
                let mask = (1u8 << self.unused_bits) - 1;
                last & mask == 0
            }
        }
    }
}

/// Whether a DER INTEGER's contents octets use the minimal two's complement
/// encoding (no superfluous leading 0x00 or 0xff byte).
pub fn integer_is_minimal(data: &[u8]) -> bool {
    if data.len() < 2 {
        return true;
    }
    !((data[0] == 0x00 && data[1] & 0x80 == 0) || (data[0] == 0xff && data[1] & 0x80 != 0))
}

/// `UTCTime` (X.690 §11.8): two-digit year, interpreted as 1950-2049 per
/// RFC 5280 §4.1.2.5.1.
pub fn parse_utc_time(data: &[u8]) -> Result<DateTime<Utc>> {
    let s = std::str::from_utf8(data).map_err(|_| err_msg("UTCTime is not ASCII"))?;
    let s = s.strip_suffix('Z').ok_or_else(|| err_msg("UTCTime must be in UTC (trailing Z)"))?;

    let (date_part, time_part) = if s.len() == 10 {
        (&s[0..6], &s[6..10])
    } else if s.len() == 12 {
        (&s[0..6], &s[6..12])
    } else {
        return Err(err_msg("UTCTime has unexpected length"));
    };

    let yy: i32 = date_part[0..2].parse().map_err(|_| err_msg("Invalid UTCTime year"))?;
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
    let month: u32 = date_part[2..4].parse().map_err(|_| err_msg("Invalid UTCTime month"))?;
    let day: u32 = date_part[4..6].parse().map_err(|_| err_msg("Invalid UTCTime day"))?;

    let hour: u32 = time_part[0..2].parse().map_err(|_| err_msg("Invalid UTCTime hour"))?;
    let min: u32 = time_part[2..4].parse().map_err(|_| err_msg("Invalid UTCTime minute"))?;
    let sec: u32 = if time_part.len() >= 6 {
        time_part[4..6].parse().map_err(|_| err_msg("Invalid UTCTime second"))?
    } else {
        0
    };

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| err_msg("Invalid UTCTime date"))?;
    let time = NaiveTime::from_hms_opt(hour, min, sec).ok_or_else(|| err_msg("Invalid UTCTime time"))?;
    Ok(Utc.from_utc_datetime(&NaiveDateTime::new(date, time)))
}

/// `GeneralizedTime` (X.690 §11.7): four-digit year, optional fractional
/// seconds, must be UTC (`Z`) to be valid in a certificate per RFC 5280.
pub fn parse_generalized_time(data: &[u8]) -> Result<DateTime<Utc>> {
    let s = std::str::from_utf8(data).map_err(|_| err_msg("GeneralizedTime is not ASCII"))?;
    let s = s
        .strip_suffix('Z')
        .ok_or_else(|| err_msg("GeneralizedTime must be in UTC (trailing Z)"))?;

    if s.len() < 10 {
        return Err(err_msg("GeneralizedTime has unexpected length"));
    }

    let year: i32 = s[0..4].parse().map_err(|_| err_msg("Invalid GeneralizedTime year"))?;
    let month: u32 = s[4..6].parse().map_err(|_| err_msg("Invalid GeneralizedTime month"))?;
    let day: u32 = s[6..8].parse().map_err(|_| err_msg("Invalid GeneralizedTime day"))?;
    let hour: u32 = s[8..10].parse().map_err(|_| err_msg("Invalid GeneralizedTime hour"))?;

    let (min, sec) = if s.len() >= 12 {
        let min: u32 = s[10..12].parse().map_err(|_| err_msg("Invalid GeneralizedTime minute"))?;
        let sec: u32 = if s.len() >= 14 {
            s[12..14].parse().map_err(|_| err_msg("Invalid GeneralizedTime second"))?
        } else {
            0
        };
        (min, sec)
    } else {
        (0, 0)
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| err_msg("Invalid GeneralizedTime date"))?;
    let time =
        NaiveTime::from_hms_opt(hour, min, sec).ok_or_else(|| err_msg("Invalid GeneralizedTime time"))?;
    Ok(Utc.from_utc_datetime(&NaiveDateTime::new(date, time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utc_time_post_2000() {
        let dt = parse_utc_time(b"250101120000Z").unwrap();
        assert_eq!(dt.to_string(), "2025-01-01 12:00:00 UTC");
    }

    #[test]
    fn decodes_utc_time_pre_2000_pivot() {
        let dt = parse_utc_time(b"990101000000Z").unwrap();
        assert_eq!(dt.to_string(), "1999-01-01 00:00:00 UTC");
    }

    #[test]
    fn decodes_generalized_time() {
        let dt = parse_generalized_time(b"20491231235959Z").unwrap();
        assert_eq!(dt.to_string(), "2049-12-31 23:59:59 UTC");
    }

    #[test]
    fn bit_string_detects_non_canonical_padding() {
        let bs = BitString {
            bytes: Bytes::copy_from_slice(&[0b1010_0001]),
            unused_bits: 4,
        };
        assert!(!bs.is_canonical());
    }

    #[test]
    fn integer_minimal_rejects_superfluous_zero() {
        assert!(!integer_is_minimal(&[0x00, 0x7f]));
        assert!(integer_is_minimal(&[0x00, 0x80]));
    }
}
