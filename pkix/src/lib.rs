//! The X.509 object model built on `asn`: `Certificate`, `TbsCertificate`,
//! `AlgorithmIdentifier`, `Name`/`RelativeDistinguishedName`, `GeneralName`,
//! `Extension`, `SubjectPublicKeyInfo`, and the OID registry they're built
//! from. No security judgement logic lives here — that's `sak`.

pub mod algorithm;
pub mod certificate;
pub mod extension;
pub mod general_name;
pub mod name;
pub mod oid;
pub mod spki;

pub use algorithm::AlgorithmIdentifier;
pub use certificate::{Certificate, TbsCertificate, Time, TimeEncoding, Validity};
pub use extension::Extension;
pub use general_name::GeneralName;
pub use name::{AttributeTypeAndValue, DistinguishedName, RelativeDistinguishedName};
pub use spki::SubjectPublicKeyInfo;
