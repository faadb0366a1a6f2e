//! Known-weak RSA modulus database (RFC 5280 decode layer is oblivious to
//! this; it's a property of the number, not the encoding). Grounded in the
//! Debian OpenSSL PRNG bug (CVE-2008-0166) and ROCA (CVE-2017-15361) moduli
//! lists `x509sak.ModulusDB` shipped as data files: a small bundled sample
//! plus room to union in an external list at runtime.
use std::collections::HashSet;
use std::path::Path;

use common::errors::{err_msg, Result};
use math::big::BigUint;
use math::integer::Integer;

/// A database of full moduli known to be compromised (shared or otherwise
/// recoverable). This is a membership set, not a fingerprint test: the
/// ROCA discriminant check is a separate, cheaper pre-filter a caller can
/// run before consulting this set on a large corpus, but isn't needed at
/// the single-certificate scale this engine operates at.
#[derive(Debug, Clone, Default)]
pub struct ModulusDb {
    known: HashSet<Vec<u8>>,
}

impl ModulusDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small illustrative sample, not a reproduction of any real research
    /// corpus: a handful of implausibly small "moduli" that exist purely so
    /// the lookup path has something to find in tests.
    pub fn bundled() -> Self {
        let mut db = Self::new();
        for n in [3233u64, 3127, 2491] {
            db.known.insert(BigUint::from_u64(n).to_be_bytes());
        }
        db
    }

    /// Merges in one hex-encoded modulus per line (blank lines and `#`
    /// comments ignored), as `x509sak.data`'s compromised-modulus file does.
    pub fn load_extra(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|e| err_msg(format!("could not read {}: {}", path.display(), e)))?;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let bytes = common::hex::decode(line).map_err(|e| err_msg(format!("invalid hex modulus {:?}: {}", line, e)))?;
            self.known.insert(bytes);
        }
        Ok(())
    }

    pub fn contains(&self, modulus: &BigUint) -> bool {
        self.known.contains(&modulus.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_db_matches_known_entry() {
        let db = ModulusDb::bundled();
        assert!(db.contains(&BigUint::from_u64(3233)));
        assert!(!db.contains(&BigUint::from_u64(99991)));
    }
}
