use ahash::AHashMap;
use smallvec::SmallVec;

use crate::labels::{CanonicalLabelSet, LabelCode, LABEL_COUNT};

/// CORINE land-cover labels used by the patch dataset, in code order.
const LABELS: [&str; LABEL_COUNT] = [
    "Agro-forestry areas",
    "Airports",
    "Annual crops associated with permanent crops",
    "Bare rock",
    "Beaches, dunes, sands",
    "Broad-leaved forest",
    "Burnt areas",
    "Coastal lagoons",
    "Complex cultivation patterns",
    "Coniferous forest",
    "Construction sites",
    "Continuous urban fabric",
    "Discontinuous urban fabric",
    "Dump sites",
    "Estuaries",
    "Fruit trees and berry plantations",
    "Glaciers and perpetual snow",
    "Green urban areas",
    "Industrial or commercial units",
    "Inland marshes",
    "Intertidal flats",
    "Land principally occupied by agriculture, with significant areas of natural vegetation",
    "Mineral extraction sites",
    "Mixed forest",
    "Moors and heathland",
    "Natural grassland",
    "Non-irrigated arable land",
    "Olive groves",
    "Pastures",
    "Peatbogs",
    "Permanently irrigated land",
    "Port areas",
    "Rice fields",
    "Road and rail networks and associated land",
    "Salines",
    "Salt marshes",
    "Sclerophyllous vegetation",
    "Sea and ocean",
    "Sparsely vegetated areas",
    "Sport and leisure facilities",
    "Transitional woodland/shrub",
    "Vineyards",
    "Water bodies",
    "Water courses",
];

/// Name of the label at a code's catalog position.
#[inline]
pub(super) fn label_name(code: LabelCode) -> &'static str { LABELS[code.index()] }

/// Immutable bijection between catalog label names and their single-character codes.
///
/// Built once at startup and shared read-only (by reference or `Arc`) with every
/// query and ingest path.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    labels: &'static [&'static str; LABEL_COUNT],
    index: AHashMap<&'static str, LabelCode>,
}

impl Default for LabelCatalog {
    fn default() -> Self { Self::new() }
}

impl LabelCatalog {
    pub fn new() -> Self {
        let index = LABELS.iter().enumerate()
            .filter_map(|(i, &label)| LabelCode::from_index(i).map(|code| (label, code)))
            .collect();
        Self { labels: &LABELS, index }
    }

    /// Number of labels in the catalog; a query naming all of them carries no label restriction.
    #[inline] pub const fn all_labels_count() -> usize { LABEL_COUNT }

    /// Look up the code of a single label name.
    #[inline] pub fn code(&self, label: &str) -> Option<LabelCode> { self.index.get(label).copied() }

    /// Decode a code back to its label name.
    #[inline] pub fn decode(&self, code: LabelCode) -> &'static str { self.labels[code.index()] }

    /// Label names in catalog (code) order.
    #[inline] pub fn labels(&self) -> &'static [&'static str] { self.labels }

    /// Label names in alphabetical order.
    pub fn labels_sorted(&self) -> Vec<&'static str> {
        let mut labels = self.labels.to_vec();
        labels.sort_unstable();
        labels
    }

    /// Canonicalize a label list: dedupe, sort the names, map to codes, drop unknown names.
    ///
    /// Unknown names are silently ignored; an empty or all-unknown input yields an empty set.
    pub fn encode<S: AsRef<str>>(&self, labels: &[S]) -> CanonicalLabelSet {
        let mut names = labels.iter().map(AsRef::as_ref).collect::<Vec<&str>>();
        names.sort_unstable();
        names.dedup();

        CanonicalLabelSet::from_codes(
            names.into_iter()
                .filter_map(|name| self.code(name))
                .collect::<SmallVec<_>>()
        )
    }

    /// Decode every code of a set, preserving set order.
    pub fn decode_all(&self, set: &CanonicalLabelSet) -> Vec<&'static str> {
        set.iter().map(|code| self.decode(code)).collect()
    }
}
