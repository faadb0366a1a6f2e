//! Analysis configuration: what the driver checks and how hard it tries.

use std::collections::HashSet;
use std::path::PathBuf;

/// The capacity a certificate is being evaluated for. Several analyzers
/// (KeyUsage, ExtendedKeyUsage, the purpose analyzer itself) only flag
/// missing capabilities the caller actually cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    TlsServer,
    TlsClient,
    Ca,
}

/// Tunables for a single analysis run. Constructed once by the driver and
/// threaded down by shared reference; analyzers never mutate it.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Skip RSA modulus primality/factorability testing above this bit
    /// length (expensive on large non-sample keys); `None` means always run
    /// it.
    pub fast_rsa: bool,

    /// How many small primes to trial-divide an RSA modulus against before
    /// falling back to (or skipping) Miller-Rabin.
    pub rsa_testprimes_max: u32,

    /// Whether the report should embed the raw DER of the certificate and
    /// its public key alongside the analysis.
    pub include_raw_data: bool,

    /// Capacities the subject certificate is being evaluated for; empty
    /// means the purpose analyzer is skipped entirely.
    pub purposes: HashSet<Purpose>,

    /// Hostname or identity the purpose analyzer should match against
    /// SubjectAltName/CN, when `purposes` includes `TlsServer`.
    pub entity_name: Option<String>,

    /// Path to a newline-separated list of hex-encoded known-compromised
    /// RSA moduli (e.g. Debian's 2008 weak-key set) to check against.
    pub compromised_moduli_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fast_rsa: false,
            rsa_testprimes_max: 5000,
            include_raw_data: false,
            purposes: HashSet::new(),
            entity_name: None,
            compromised_moduli_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_purposes() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.purposes.is_empty());
        assert!(cfg.entity_name.is_none());
    }
}
