//! The judgement algebra: `SecurityJudgement`, the ordered append-only
//! `SecurityJudgements` collection, and the lattices the driver aggregates
//! over.
//!
//! The parent project's equivalent collection type overloads `+`/`+=` on a
//! judgement-list wrapper (see `math::big::BigUint`'s use of `auto_ops` for
//! the same pattern applied to arithmetic); here the collection is a plain
//! `Vec` wrapper with `extend`/`concat`, per this project's re-architecture
//! note that accumulation should be ordinary data flow, not operator
//! overloading on a semantically different kind of value.

use serde::Serialize;

use crate::codes::JudgementCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Verdict {
    NoSecurity,
    BrokenSecurity,
    WeakSecurity,
    MediumSecurity,
    HighSecurity,
    BestInClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Commonness {
    Common,
    Unusual,
    HighlyUnusual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compatibility {
    FullyCompliant,
    LimitedSupport,
    StandardsDeviation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StandardVerb {
    Must,
    Should,
    May,
    Recommend,
}

#[derive(Debug, Clone, Serialize)]
pub struct Standard {
    pub rfcno: u32,
    pub sect: String,
    pub verb: StandardVerb,
    pub text: String,
}

/// An immutable finding. Once constructed it is never mutated; a new
/// judgement is built (not edited) if an analyzer needs to report a
/// variation of the same code with different interpolated data.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityJudgement {
    pub code: JudgementCode,
    pub text: String,
    pub verdict: Option<Verdict>,
    pub commonness: Option<Commonness>,
    pub compatibility: Option<Compatibility>,
    pub bits: Option<u32>,
    pub standard: Option<Standard>,
}

impl SecurityJudgement {
    pub fn new(code: JudgementCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
            verdict: None,
            commonness: None,
            compatibility: None,
            bits: None,
            standard: None,
        }
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    pub fn with_commonness(mut self, commonness: Commonness) -> Self {
        self.commonness = Some(commonness);
        self
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = Some(compatibility);
        self
    }

    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = Some(bits);
        self.verdict = Some(self.verdict.unwrap_or_else(|| crate::bits::bits_to_verdict(bits)));
        self
    }

    pub fn with_standard(mut self, standard: Standard) -> Self {
        self.standard = Some(standard);
        self
    }
}

/// An ordered, additive multiset of judgements. Concatenation
/// (`extend`/`concat`) is associative and analyzers never see or mutate
/// each other's output: every analyzer builds its own `SecurityJudgements`
/// and the driver concatenates them in a fixed, deterministic order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecurityJudgements {
    items: Vec<SecurityJudgement>,
}

impl SecurityJudgements {
    pub fn new() -> Self {
        Self { items: vec![] }
    }

    pub fn push(&mut self, judgement: SecurityJudgement) {
        self.items.push(judgement);
    }

    pub fn extend(&mut self, other: SecurityJudgements) {
        self.items.extend(other.items);
    }

    /// Consumes both collections and returns their concatenation.
    pub fn concat(mut self, other: SecurityJudgements) -> Self {
        self.extend(other);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &SecurityJudgement> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_code(&self, code: JudgementCode) -> bool {
        self.items.iter().any(|j| j.code == code)
    }

    /// The minimum verdict along the lattice among judgements that carry
    /// one; `None` if no judgement in the collection carries a verdict.
    pub fn aggregate_verdict(&self) -> Option<Verdict> {
        self.items.iter().filter_map(|j| j.verdict).min()
    }

    /// The minimum bit count among judgements that carry one.
    pub fn aggregate_bits(&self) -> Option<u32> {
        self.items.iter().filter_map(|j| j.bits).min()
    }

    pub fn into_vec(self) -> Vec<SecurityJudgement> {
        self.items
    }
}

impl FromIterator<SecurityJudgement> for SecurityJudgements {
    fn from_iter<T: IntoIterator<Item = SecurityJudgement>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SecurityJudgements {
    type Item = SecurityJudgement;
    type IntoIter = std::vec::IntoIter<SecurityJudgement>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::JudgementCode;

    #[test]
    fn concat_is_order_preserving() {
        let mut a = SecurityJudgements::new();
        a.push(SecurityJudgement::new(JudgementCode::CertSerialNegative, "a"));
        let mut b = SecurityJudgements::new();
        b.push(SecurityJudgement::new(JudgementCode::CertSerialZero, "b"));

        let combined = a.concat(b);
        let codes: Vec<_> = combined.iter().map(|j| j.code).collect();
        assert_eq!(
            codes,
            vec![JudgementCode::CertSerialNegative, JudgementCode::CertSerialZero]
        );
    }

    #[test]
    fn aggregate_verdict_is_minimum() {
        let mut js = SecurityJudgements::new();
        js.push(SecurityJudgement::new(JudgementCode::PublicKeyRsaModulusPrime, "x").with_verdict(Verdict::BestInClass));
        js.push(SecurityJudgement::new(JudgementCode::PublicKeyRsaExponentOne, "y").with_verdict(Verdict::BrokenSecurity));
        assert_eq!(js.aggregate_verdict(), Some(Verdict::BrokenSecurity));
    }
}
