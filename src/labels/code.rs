use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::catalog::label_name;

/// Number of land-cover labels in the catalog.
pub const LABEL_COUNT: usize = 44;

/// First character of the code alphabet; codes run contiguously from here.
const CODE_BASE: u8 = b'A';

/// Single-character code for one catalog label, assigned by catalog position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub struct LabelCode(u8);

impl LabelCode {
    /// Build the code for the label at catalog position `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < LABEL_COUNT).then(|| Self(CODE_BASE + index as u8))
    }

    /// Catalog position of this code.
    #[inline] pub fn index(self) -> usize { (self.0 - CODE_BASE) as usize }

    #[inline] pub fn as_char(self) -> char { self.0 as char }
}

impl From<LabelCode> for char {
    fn from(code: LabelCode) -> Self { code.as_char() }
}

impl TryFrom<char> for LabelCode {
    type Error = String;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        u8::try_from(ch).ok()
            .and_then(|byte| byte.checked_sub(CODE_BASE))
            .and_then(|offset| Self::from_index(offset as usize))
            .ok_or_else(|| format!("{ch:?} is not a label code"))
    }
}

impl fmt::Display for LabelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Deduplicated label codes, ordered by the alphabetical order of their label names.
///
/// Built by [`super::LabelCatalog::encode`]; deserialization rejects any other
/// sequence, so ingest and query always agree on the ordering that exact-match
/// queries compare.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<LabelCode>", try_from = "Vec<LabelCode>")]
pub struct CanonicalLabelSet(SmallVec<[LabelCode; 8]>);

impl From<CanonicalLabelSet> for Vec<LabelCode> {
    fn from(set: CanonicalLabelSet) -> Self { set.0.into_vec() }
}

impl TryFrom<Vec<LabelCode>> for CanonicalLabelSet {
    type Error = String;

    /// Accept only codes in strictly ascending label-name order (which also excludes duplicates).
    fn try_from(codes: Vec<LabelCode>) -> Result<Self, Self::Error> {
        if let Some(pair) = codes.windows(2).find(|pair| label_name(pair[0]) >= label_name(pair[1])) {
            return Err(format!(
                "label codes {} and {} are duplicated or out of canonical order",
                pair[0], pair[1],
            ))
        }
        Ok(Self(SmallVec::from_vec(codes)))
    }
}

impl CanonicalLabelSet {
    pub(super) fn from_codes(codes: SmallVec<[LabelCode; 8]>) -> Self { Self(codes) }

    #[inline] pub fn len(&self) -> usize { self.0.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline] pub fn codes(&self) -> &[LabelCode] { &self.0 }

    #[inline] pub fn contains(&self, code: LabelCode) -> bool { self.0.contains(&code) }

    pub fn iter(&self) -> impl Iterator<Item = LabelCode> + '_ { self.0.iter().copied() }

    /// True if every code of `other` is present in `self`.
    pub fn is_superset_of(&self, other: &CanonicalLabelSet) -> bool {
        other.iter().all(|code| self.contains(code))
    }

    /// True if `self` and `other` share at least one code.
    pub fn intersects(&self, other: &CanonicalLabelSet) -> bool {
        other.iter().any(|code| self.contains(code))
    }
}
