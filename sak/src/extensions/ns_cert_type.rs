//! Netscape Certificate Type (`2.16.840.1.113730.1.1`): a legacy BIT STRING
//! of eight role flags, predating `KeyUsage`/`ExtendedKeyUsage` but still
//! seen in the wild and still checked by relying parties that predate
//! those extensions. No RFC defines it; this follows the original
//! Netscape certificate extension spec's bit order.

use asn::types::BitString;
use common::errors::Result;
use pkix::Extension;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NsCertTypeFlags {
    pub ssl_client: bool,
    pub ssl_server: bool,
    pub smime: bool,
    pub object_signing: bool,
    pub ssl_ca: bool,
    pub smime_ca: bool,
    pub object_signing_ca: bool,
}

pub fn decode(ext: &Extension) -> Result<NsCertTypeFlags> {
    let bs = BitString::from_der(&ext.value)?;

    let bit = |i: usize| -> bool {
        if i >= bs.bit_len() {
            return false;
        }
        let byte = bs.bytes[i / 8];
        (byte >> (7 - (i % 8))) & 1 == 1
    };

    Ok(NsCertTypeFlags {
        ssl_client: bit(0),
        ssl_server: bit(1),
        smime: bit(2),
        object_signing: bit(3),
        // bit 4 is reserved and carries no role.
        ssl_ca: bit(5),
        smime_ca: bit(6),
        object_signing_ca: bit(7),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(bits: &[u8]) -> Extension {
        let mut value = vec![0u8];
        value.extend_from_slice(bits);
        Extension {
            oid: pkix::oid::EXT_NS_CERT_TYPE.clone(),
            critical: false,
            value,
        }
    }

    #[test]
    fn decodes_ssl_server_bit() {
        let flags = decode(&ext(&[0b0100_0000])).unwrap();
        assert!(flags.ssl_server);
        assert!(!flags.ssl_client);
        assert!(!flags.ssl_ca);
    }

    #[test]
    fn decodes_ca_bits() {
        let flags = decode(&ext(&[0b0000_0100])).unwrap();
        assert!(flags.ssl_ca);
    }
}
