//! `Name` (RFC 5280 §4.1.2.4): an ordered SEQUENCE OF RelativeDistinguishedName.

use std::fmt;

use asn::tag::{
    TAG_NUMBER_BMPSTRING, TAG_NUMBER_IA5STRING, TAG_NUMBER_PRINTABLE_STRING, TAG_NUMBER_T61STRING,
    TAG_NUMBER_UNIVERSALSTRING, TAG_NUMBER_UTF8STRING,
};
use asn::{Element, ObjectIdentifier, TagClass};
use common::errors::{err_msg, Result};

/// The character-string type an attribute value was encoded as. Several are
/// legacy (T61String/UniversalString) but still appear in the wild and are
/// diagnosable rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    PrintableString,
    Utf8String,
    TeletexString,
    Ia5String,
    BmpString,
    UniversalString,
    Other(usize),
}

impl StringKind {
    pub fn from_tag_number(n: usize) -> Self {
        match n {
            TAG_NUMBER_PRINTABLE_STRING => Self::PrintableString,
            TAG_NUMBER_UTF8STRING => Self::Utf8String,
            TAG_NUMBER_T61STRING => Self::TeletexString,
            TAG_NUMBER_IA5STRING => Self::Ia5String,
            TAG_NUMBER_BMPSTRING => Self::BmpString,
            TAG_NUMBER_UNIVERSALSTRING => Self::UniversalString,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttributeTypeAndValue {
    pub attr_type: ObjectIdentifier,
    pub kind: StringKind,
    pub value: String,
    pub raw: Vec<u8>,
}

/// A non-empty set of (attribute-OID, value) pairs. DER requires SET OF
/// elements to appear in their canonical (ascending DER encoding) order;
/// this is checked by the body analyzer, not enforced here.
#[derive(Debug, Clone)]
pub struct RelativeDistinguishedName {
    pub attrs: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn is_multi_valued(&self) -> bool {
        self.attrs.len() > 1
    }
}

#[derive(Debug, Clone)]
pub struct DistinguishedName {
    pub rdns: Vec<RelativeDistinguishedName>,
}

impl DistinguishedName {
    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    pub fn common_name(&self) -> Option<&str> {
        for rdn in &self.rdns {
            for attr in &rdn.attrs {
                if attr.attr_type == *crate::oid::AT_COMMON_NAME {
                    return Some(&attr.value);
                }
            }
        }
        None
    }

    /// Byte-for-byte equality of the canonical RDN structure: same number of
    /// RDNs, same attributes in the same order, same decoded values. This is
    /// not full RFC 4518 string-prep normalization, but it is what the
    /// CA-relationship analyzer needs for subject/issuer DN matching.
    pub fn matches(&self, other: &DistinguishedName) -> bool {
        if self.rdns.len() != other.rdns.len() {
            return false;
        }
        for (a, b) in self.rdns.iter().zip(other.rdns.iter()) {
            if a.attrs.len() != b.attrs.len() {
                return false;
            }
            for (x, y) in a.attrs.iter().zip(b.attrs.iter()) {
                if x.attr_type != y.attr_type || x.value != y.value {
                    return false;
                }
            }
        }
        true
    }

    /// RFC 2253 string form, most-specific RDN first (reverse document
    /// order), escaping `,+"\<>;`, a leading `#` or space, and a trailing
    /// space.
    pub fn to_rfc2253(&self) -> String {
        let mut parts = vec![];
        for rdn in self.rdns.iter().rev() {
            let mut attr_parts = vec![];
            for attr in &rdn.attrs {
                let name = crate::oid::name_for(&attr.attr_type).unwrap_or("unknownAttribute");
                attr_parts.push(format!("{}={}", name, escape_rfc2253(&attr.value)));
            }
            parts.push(attr_parts.join("+"));
        }
        parts.join(",")
    }

    /// Line-oriented pretty form, most-specific RDN last (document order),
    /// one line per RDN, `+`-joined within a multi-valued RDN.
    pub fn to_pretty(&self) -> String {
        let mut lines = vec![];
        for rdn in &self.rdns {
            let mut attr_parts = vec![];
            for attr in &rdn.attrs {
                let name = crate::oid::name_for(&attr.attr_type).unwrap_or("unknownAttribute");
                attr_parts.push(format!("{} = {}", name, attr.value));
            }
            lines.push(attr_parts.join(" + "));
        }
        lines.join("\n")
    }
}

fn escape_rfc2253(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        let is_first = i == 0;
        let is_last = i == chars.len() - 1;

        if (is_first && (c == '#' || c == ' ')) || (is_last && c == ' ') {
            out.push('\\');
            out.push(c);
            continue;
        }

        match c {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc2253())
    }
}

fn decode_string_value(kind: StringKind, data: &[u8]) -> Result<String> {
    match kind {
        StringKind::Utf8String => {
            std::str::from_utf8(data).map(|s| s.to_string()).map_err(|_| err_msg("Invalid UTF8String"))
        }
        StringKind::PrintableString | StringKind::Ia5String => {
            std::str::from_utf8(data).map(|s| s.to_string()).map_err(|_| err_msg("Invalid ASCII string"))
        }
        StringKind::TeletexString => {
            // T61Strings are rarely used outside of Latin-1-compatible text
            // in practice; decode byte-for-byte as Latin-1.
            Ok(data.iter().map(|&b| b as char).collect())
        }
        StringKind::BmpString => {
            if data.len() % 2 != 0 {
                return Err(err_msg("BMPString has odd byte length"));
            }
            let units: Vec<u16> = data.chunks(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
            String::from_utf16(&units).map_err(|_| err_msg("Invalid BMPString"))
        }
        StringKind::UniversalString => {
            if data.len() % 4 != 0 {
                return Err(err_msg("UniversalString has non-multiple-of-4 byte length"));
            }
            let mut s = String::new();
            for chunk in data.chunks(4) {
                let cp = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                s.push(char::from_u32(cp).ok_or_else(|| err_msg("Invalid UniversalString code point"))?);
            }
            Ok(s)
        }
        StringKind::Other(_) => Err(err_msg("Unsupported DirectoryString type")),
    }
}

fn decode_attribute_type_and_value(el: &Element) -> Result<AttributeTypeAndValue> {
    let items = Element::read_all(&el.data)?;
    if items.len() != 2 {
        return Err(err_msg("AttributeTypeAndValue must have exactly 2 fields"));
    }

    let attr_type = ObjectIdentifier::from_der(&items[0].data)?;
    let value_el = &items[1];
    let kind = StringKind::from_tag_number(value_el.ident.tag.number);
    let value = decode_string_value(kind, &value_el.data)?;

    Ok(AttributeTypeAndValue {
        attr_type,
        kind,
        value,
        raw: value_el.data.to_vec(),
    })
}

/// Decodes a `Name` (a SEQUENCE of RDN SETs) from its already-unwrapped
/// SEQUENCE contents.
pub fn decode_name(data: &[u8]) -> Result<DistinguishedName> {
    let rdn_elements = Element::read_all(data)?;
    let mut rdns = vec![];

    for rdn_el in &rdn_elements {
        if rdn_el.ident.tag.class != TagClass::Universal || rdn_el.ident.tag.number != asn::tag::TAG_NUMBER_SET {
            return Err(err_msg("RelativeDistinguishedName must be a SET"));
        }

        let attr_elements = Element::read_all(&rdn_el.data)?;
        let mut attrs = vec![];
        for attr_el in &attr_elements {
            attrs.push(decode_attribute_type_and_value(attr_el)?);
        }
        rdns.push(RelativeDistinguishedName { attrs });
    }

    Ok(DistinguishedName { rdns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printable_string_tlv(s: &str) -> Vec<u8> {
        let mut out = vec![0x13, s.len() as u8];
        out.extend_from_slice(s.as_bytes());
        out
    }

    fn cn_atv(s: &str) -> Vec<u8> {
        // SEQUENCE { OID commonName, PrintableString s }
        let oid = [0x06, 0x03, 0x55, 0x04, 0x03]; // 2.5.4.3
        let val = printable_string_tlv(s);
        let mut inner = vec![];
        inner.extend_from_slice(&oid);
        inner.extend_from_slice(&val);
        let mut out = vec![0x30, inner.len() as u8];
        out.extend_from_slice(&inner);
        out
    }

    fn rdn_of(atv: &[u8]) -> Vec<u8> {
        let mut out = vec![0x31, atv.len() as u8];
        out.extend_from_slice(atv);
        out
    }

    #[test]
    fn decodes_single_cn_rdn() {
        let atv = cn_atv("example.com");
        let rdn = rdn_of(&atv);
        let dn = decode_name(&rdn).unwrap();
        assert_eq!(dn.rdns.len(), 1);
        assert_eq!(dn.common_name(), Some("example.com"));
        assert!(!dn.rdns[0].is_multi_valued());
    }

    #[test]
    fn rfc2253_escapes_special_characters() {
        assert_eq!(escape_rfc2253("a,b"), "a\\,b");
        assert_eq!(escape_rfc2253(" leading"), "\\ leading");
        assert_eq!(escape_rfc2253("trailing "), "trailing\\ ");
    }

    #[test]
    fn empty_name_has_no_rdns() {
        let dn = decode_name(&[]).unwrap();
        assert!(dn.is_empty());
    }
}
