//! A direct (non-combinator) DER reader.
//!
//! The parent project builds ASN.1 support around a notation compiler and a
//! generic `parsing` combinator crate; neither has a reason to exist here,
//! since every structure this analyzer cares about (certificates, not
//! arbitrary ASN.1 modules) is hand-coded against a fixed set of PKIX types.
//! What's kept is the concept split the parent uses: `Identifier`, `Length`
//! and `Element` are the three BER/DER primitives, read from a cursor over
//! the input bytes.
//!
//! DER (unlike the more permissive BER) requires definite lengths and the
//! shortest possible encoding of both lengths and tag numbers; `Length::read`
//! and `Identifier::read` reject the BER forms DER forbids so that
//! non-canonical input is caught at the lowest layer instead of silently
//! accepted.

use bytes::Bytes;

use common::errors::{err_msg, format_err, Result};

use crate::tag::{Tag, TagClass};

const MAX_TAG_NUMBER_BITS: usize = std::mem::size_of::<usize>() * 8;
const USIZE_OCTETS: usize = std::mem::size_of::<usize>();

/// A cursor over a byte slice. Every `asn`-level parse error is a plain
/// `Error`; it is up to callers in `pkix`/`sak` to decide whether a failure
/// here means "reject the whole file" or "this one field is malformed".
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn next_u8(&mut self) -> Result<u8> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| err_msg("Unexpected end of DER input"))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(err_msg("Unexpected end of DER input"));
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub tag: Tag,
    pub constructed: bool,
}

impl Identifier {
    pub fn read(r: &mut Reader<'_>) -> Result<Self> {
        let first = r.next_u8()?;
        let class = TagClass::from((first >> 6) & 0b11);
        let constructed = ((first >> 5) & 0b1) == 1;
        let mut number = (first & 0b1_1111) as usize;

        if number == 31 {
            number = Self::read_varint(r)?;
            if number <= 30 {
                return Err(err_msg("Tag number should have used single octet form"));
            }
        }

        Ok(Self {
            tag: Tag { class, number },
            constructed,
        })
    }

    fn read_varint(r: &mut Reader<'_>) -> Result<usize> {
        let mut number = 0usize;
        let mut finished = false;

        for i in 0..(MAX_TAG_NUMBER_BITS / 7) {
            let octet = r.next_u8()?;
            let part = octet & 0x7f;
            finished = (octet >> 7) == 0;

            number <<= 7;
            number |= part as usize;

            if finished {
                break;
            }
            if i == 0 && part == 0 {
                return Err(err_msg("Non-minimal tag number encoding"));
            }
        }

        if !finished {
            return Err(err_msg("Tag number overflows usize"));
        }

        Ok(number)
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        let first = ((self.tag.class as u8) << 6)
            | ((if self.constructed { 1 } else { 0 }) << 5)
            | (if self.tag.number <= 30 {
                self.tag.number as u8
            } else {
                31
            });
        out.push(first);

        if self.tag.number >= 31 {
            Self::write_varint(self.tag.number, out);
        }
    }

    fn write_varint(mut num: usize, out: &mut Vec<u8>) {
        let mut buf = [0u8; USIZE_OCTETS];
        let mut i = buf.len() - 1;
        loop {
            let b = (num & 0x7f) as u8;
            num >>= 7;
            buf[i] |= b;
            if num == 0 {
                break;
            }
            buf[i - 1] |= 0x80;
            i -= 1;
        }
        out.extend_from_slice(&buf[i..]);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Length {
    Short(u8),
    Long(usize),
}

impl Length {
    pub fn value(&self) -> usize {
        match self {
            Length::Short(n) => *n as usize,
            Length::Long(n) => *n,
        }
    }

    pub fn read(r: &mut Reader<'_>) -> Result<Self> {
        let first = r.next_u8()?;
        let upper = first & 0x80;
        let lower = first & 0x7f;

        if upper == 0 {
            return Ok(Self::Short(lower));
        }

        if lower == 0 {
            return Err(err_msg("Indefinite length not allowed in DER"));
        }
        if lower == 127 {
            return Err(err_msg("Reserved length form"));
        }

        let n = lower as usize;
        if n > USIZE_OCTETS {
            return Err(err_msg("Length octet count overflows usize"));
        }

        let data = r.take(n)?;
        if data[0] == 0 {
            return Err(err_msg("Non-minimal DER length encoding"));
        }

        let mut buf = [0u8; USIZE_OCTETS];
        buf[(USIZE_OCTETS - n)..].copy_from_slice(data);
        let val = usize::from_be_bytes(buf);

        if val <= 127 {
            return Err(err_msg("Length should have used short form"));
        }

        Ok(Self::Long(val))
    }

    pub fn write(len: usize, out: &mut Vec<u8>) {
        if len <= 127 {
            out.push(len as u8);
            return;
        }

        let buf = len.to_be_bytes();
        let i = buf.iter().position(|v| *v != 0).unwrap_or(buf.len() - 1);
        let nbytes = buf.len() - i;

        out.push(0x80 | (nbytes as u8));
        out.extend_from_slice(&buf[i..]);
    }
}

/// A single decoded TLV, plus the raw bytes it was read from (`outer`),
/// which callers that need to re-verify a signature over an embedded
/// structure (the TBSCertificate) must keep around verbatim.
#[derive(Debug, Clone)]
pub struct Element {
    pub ident: Identifier,
    pub len: Length,
    pub data: Bytes,
    pub outer: Bytes,
}

impl Element {
    pub fn read(r: &mut Reader<'_>) -> Result<Self> {
        let start = r.pos;
        let ident = Identifier::read(r)?;
        let len = Length::read(r)?;
        let data = r.take(len.value())?;
        let outer = &r.data[start..r.pos];

        Ok(Self {
            ident,
            len,
            data: Bytes::copy_from_slice(data),
            outer: Bytes::copy_from_slice(outer),
        })
    }

    /// Reads every top-level element of a constructed value's contents.
    pub fn read_all(data: &[u8]) -> Result<Vec<Element>> {
        let mut r = Reader::new(data);
        let mut out = vec![];
        while !r.is_empty() {
            out.push(Element::read(&mut r)?);
        }
        Ok(out)
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        self.ident.write(out);
        Length::write(self.data.len(), out);
        out.extend_from_slice(&self.data);
    }
}

/// Parses a single top-level DER value out of `data`, failing if there is
/// any trailing garbage after it (the usual entry point for a certificate
/// file, which should contain exactly one `SEQUENCE`).
pub fn parse_single(data: &[u8]) -> Result<Element> {
    let mut r = Reader::new(data);
    let el = Element::read(&mut r)?;
    if !r.is_empty() {
        return Err(err_msg("Trailing data after top-level DER value"));
    }
    Ok(el)
}

pub fn expect_tag(el: &Element, tag: Tag) -> Result<()> {
    if el.ident.tag != tag {
        return Err(format_err!(
            "Expected tag {:?}, found {:?}",
            tag,
            el.ident.tag
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TAG_NUMBER_SEQUENCE;

    #[test]
    fn reads_short_length_sequence() {
        let data = [0x30, 0x03, 0x01, 0x02, 0x03];
        let el = parse_single(&data).unwrap();
        assert_eq!(el.ident.tag, Tag::universal(TAG_NUMBER_SEQUENCE));
        assert!(el.ident.constructed);
        assert_eq!(&el.data[..], &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn rejects_non_minimal_length() {
        // Long form claiming one length octet encoding value 5, which
        // should have used the short form instead.
        let data = [0x30, 0x81, 0x05, 0, 0, 0, 0, 0];
        assert!(parse_single(&data).is_err());
    }

    #[test]
    fn rejects_indefinite_length() {
        let data = [0x30, 0x80, 0x00, 0x00];
        assert!(Element::read(&mut Reader::new(&data)).is_err());
    }

    #[test]
    fn rejects_trailing_data() {
        let data = [0x02, 0x01, 0x05, 0xff];
        assert!(parse_single(&data).is_err());
    }
}
