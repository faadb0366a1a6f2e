//! `GeneralName` (RFC 5280 §4.2.1.6), a CHOICE tagged by implicit context tag.

use asn::{Element, ObjectIdentifier, TagClass};
use common::errors::{err_msg, Result};

use crate::name::{decode_name, DistinguishedName};

pub const TAG_OTHER_NAME: usize = 0;
pub const TAG_RFC822_NAME: usize = 1;
pub const TAG_DNS_NAME: usize = 2;
pub const TAG_X400_ADDRESS: usize = 3;
pub const TAG_DIRECTORY_NAME: usize = 4;
pub const TAG_EDI_PARTY_NAME: usize = 5;
pub const TAG_URI: usize = 6;
pub const TAG_IP_ADDRESS: usize = 7;
pub const TAG_REGISTERED_ID: usize = 8;

#[derive(Debug, Clone)]
pub enum GeneralName {
    Rfc822Name(String),
    DnsName(String),
    DirectoryName(DistinguishedName),
    Uri(String),
    IpAddress(Vec<u8>),
    RegisteredId(ObjectIdentifier),
    /// Any tagged form this analyzer doesn't interpret further
    /// (otherName, x400Address, ediPartyName): preserved so the extension
    /// that contains it can still be diagnosed for count/critical rules.
    Other { tag: usize, raw: Vec<u8> },
}

impl GeneralName {
    pub fn decode(el: &Element) -> Result<Self> {
        if el.ident.tag.class != TagClass::ContextSpecific {
            return Err(err_msg("GeneralName must use a context-specific tag"));
        }

        Ok(match el.ident.tag.number {
            TAG_RFC822_NAME => {
                GeneralName::Rfc822Name(ascii_string(&el.data)?)
            }
            TAG_DNS_NAME => GeneralName::DnsName(ascii_string(&el.data)?),
            TAG_DIRECTORY_NAME => {
                // directoryName is explicitly tagged over a Name (itself a
                // SEQUENCE), so el.data already contains a Name's direct
                // SEQUENCE-OF-RDN contents when read at this depth is wrong;
                // the wrapped SEQUENCE must be unwrapped first.
                let inner = Element::read_all(&el.data)?;
                let seq = inner
                    .into_iter()
                    .next()
                    .ok_or_else(|| err_msg("directoryName missing inner SEQUENCE"))?;
                GeneralName::DirectoryName(decode_name(&seq.data)?)
            }
            TAG_URI => GeneralName::Uri(ascii_string(&el.data)?),
            // Length is not validated here: a 4- or 16-octet value is the
            // well-formed case, anything else is still a constructible
            // name that the caller can diagnose (rather than a decode
            // failure for the whole GeneralNames SEQUENCE it's part of).
            TAG_IP_ADDRESS => GeneralName::IpAddress(el.data.to_vec()),
            TAG_REGISTERED_ID => GeneralName::RegisteredId(ObjectIdentifier::from_der(&el.data)?),
            other => GeneralName::Other {
                tag: other,
                raw: el.data.to_vec(),
            },
        })
    }
}

fn ascii_string(data: &[u8]) -> Result<String> {
    std::str::from_utf8(data)
        .map(|s| s.to_string())
        .map_err(|_| err_msg("GeneralName string is not valid ASCII/UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use asn::Reader;

    fn context_primitive(tag: usize, data: &[u8]) -> Element {
        let mut bytes = vec![0x80 | tag as u8, data.len() as u8];
        bytes.extend_from_slice(data);
        Element::read(&mut Reader::new(&bytes)).unwrap()
    }

    #[test]
    fn decodes_dns_name() {
        let el = context_primitive(TAG_DNS_NAME, b"example.com");
        match GeneralName::decode(&el).unwrap() {
            GeneralName::DnsName(s) => assert_eq!(s, "example.com"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn decodes_ip_address_of_bad_length_rather_than_erroring() {
        let el = context_primitive(TAG_IP_ADDRESS, &[1, 2, 3]);
        match GeneralName::decode(&el).unwrap() {
            GeneralName::IpAddress(bytes) => assert_eq!(bytes, vec![1, 2, 3]),
            _ => panic!("wrong variant"),
        }
    }
}
