use std::fmt;

use crate::geom::Rectangle;
use crate::labels::{CanonicalLabelSet, LabelCatalog};
use crate::query::{ContainmentMode, GeoRelation};
use crate::store::PatchRecord;

/// Label condition evaluated against a patch's canonical label codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelPredicate {
    /// Patch labels are a superset of the set.
    ContainsAll(CanonicalLabelSet),
    /// Patch labels share at least one code with the set.
    ContainsAny(CanonicalLabelSet),
    /// Patch labels equal the set as an ordered code sequence.
    Equals(CanonicalLabelSet),
}

impl LabelPredicate {
    fn new(mode: ContainmentMode, labels: CanonicalLabelSet) -> Self {
        match mode {
            ContainmentMode::All => Self::ContainsAll(labels),
            ContainmentMode::Some => Self::ContainsAny(labels),
            ContainmentMode::Only => Self::Equals(labels),
        }
    }

    pub fn labels(&self) -> &CanonicalLabelSet {
        match self {
            Self::ContainsAll(labels) | Self::ContainsAny(labels) | Self::Equals(labels) => labels,
        }
    }

    pub fn matches(&self, patch: &CanonicalLabelSet) -> bool {
        match self {
            Self::ContainsAll(labels) => patch.is_superset_of(labels),
            Self::ContainsAny(labels) => patch.intersects(labels),
            Self::Equals(labels) => patch.codes() == labels.codes(),
        }
    }
}

/// Spatial condition evaluated against a patch's footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPredicate {
    pub relation: GeoRelation,
    pub rect: Rectangle,
}

impl GeoPredicate {
    pub fn matches(&self, footprint: &Rectangle) -> bool {
        let (query, patch) = (self.rect.envelope(), footprint.envelope());
        match self.relation {
            GeoRelation::Within => {
                patch.min().x >= query.min().x && patch.max().x <= query.max().x &&
                patch.min().y >= query.min().y && patch.max().y <= query.max().y
            }
            GeoRelation::Intersects => {
                patch.min().x <= query.max().x && patch.max().x >= query.min().x &&
                patch.min().y <= query.max().y && patch.max().y >= query.min().y
            }
        }
    }
}

/// Conjunction of an optional label condition and an optional spatial condition.
/// With neither present it selects every stored patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub labels: Option<LabelPredicate>,
    pub geometry: Option<GeoPredicate>,
}

impl Predicate {
    pub fn matches(&self, record: &PatchRecord) -> bool {
        self.labels.as_ref().is_none_or(|p| p.matches(&record.labels)) &&
        self.geometry.as_ref().is_none_or(|p| p.matches(&record.rectangle))
    }

    /// True if the predicate selects every stored patch.
    #[inline] pub fn is_unrestricted(&self) -> bool { self.labels.is_none() && self.geometry.is_none() }
}

/// Outcome of planning: either a provably empty result, or a predicate for the store.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPlan {
    /// No patch can match; the store is never consulted.
    Empty,
    Find(Predicate),
}

/// Select the predicate for a canonical label set, optional rectangle, and modes.
///
/// | labels           | mode       | rectangle | plan                              |
/// |------------------|------------|-----------|-----------------------------------|
/// | all 44           | ALL / ONLY | any       | `Empty`                           |
/// | all 44           | SOME       | absent    | every patch                       |
/// | all 44           | SOME       | present   | geometry only                     |
/// | none             | any        | absent    | every patch                       |
/// | none             | any        | present   | geometry only                     |
/// | proper subset    | any        | absent    | label predicate                   |
/// | proper subset    | any        | present   | label predicate AND geometry      |
pub fn plan(
    labels: &CanonicalLabelSet,
    rect: Option<&Rectangle>,
    mode: ContainmentMode,
    relation: GeoRelation,
) -> QueryPlan {
    let geometry = rect.map(|&rect| GeoPredicate { relation, rect });

    if labels.len() == LabelCatalog::all_labels_count() {
        // No patch carries all 44 labels, so neither a superset nor an exact match exists,
        // while every patch carries at least one of them.
        return match mode {
            ContainmentMode::All | ContainmentMode::Only => QueryPlan::Empty,
            ContainmentMode::Some => QueryPlan::Find(Predicate { labels: None, geometry }),
        }
    }

    let labels = (!labels.is_empty()).then(|| LabelPredicate::new(mode, labels.clone()));
    QueryPlan::Find(Predicate { labels, geometry })
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Find(predicate) = self else { return f.write_str("EMPTY") };

        match &predicate.labels {
            None => f.write_str("NO LABEL FILTER")?,
            Some(LabelPredicate::ContainsAll(labels)) => write!(f, "CONTAINS_ALL {} LABELS", labels.len())?,
            Some(LabelPredicate::ContainsAny(labels)) => write!(f, "CONTAINS_SOME {} LABELS", labels.len())?,
            Some(LabelPredicate::Equals(labels)) => write!(f, "CONTAINS_ONLY {} LABELS", labels.len())?,
        }

        match &predicate.geometry {
            None => f.write_str(" - NO COORDINATES"),
            Some(geometry) => write!(f, " - {}", geometry.relation),
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;

    fn rect(west: f64, south: f64, east: f64, north: f64) -> Rectangle {
        Rectangle::from_corners(Coord { x: west, y: north }, Coord { x: east, y: south })
    }

    #[test]
    fn all_labels_with_all_or_only_is_empty() {
        let catalog = LabelCatalog::new();
        let every = catalog.encode(catalog.labels());
        let r = rect(0.0, 0.0, 1.0, 1.0);

        for mode in [ContainmentMode::All, ContainmentMode::Only] {
            for relation in GeoRelation::ALL {
                assert_eq!(plan(&every, None, mode, relation), QueryPlan::Empty);
                assert_eq!(plan(&every, Some(&r), mode, relation), QueryPlan::Empty);
            }
        }
    }

    #[test]
    fn all_labels_with_some_drops_label_filter() {
        let catalog = LabelCatalog::new();
        let every = catalog.encode(catalog.labels());
        let r = rect(0.0, 0.0, 1.0, 1.0);

        assert_eq!(
            plan(&every, None, ContainmentMode::Some, GeoRelation::Within),
            QueryPlan::Find(Predicate::default()),
        );
        assert_eq!(
            plan(&every, Some(&r), ContainmentMode::Some, GeoRelation::Intersects),
            QueryPlan::Find(Predicate {
                labels: None,
                geometry: Some(GeoPredicate { relation: GeoRelation::Intersects, rect: r }),
            }),
        );
    }

    #[test]
    fn subset_builds_label_predicate_per_mode() {
        let catalog = LabelCatalog::new();
        let set = catalog.encode(&["Airports", "Pastures"]);
        let r = rect(0.0, 0.0, 1.0, 1.0);

        let cases = [
            (ContainmentMode::All, LabelPredicate::ContainsAll(set.clone())),
            (ContainmentMode::Some, LabelPredicate::ContainsAny(set.clone())),
            (ContainmentMode::Only, LabelPredicate::Equals(set.clone())),
        ];

        for (mode, expected) in cases {
            assert_eq!(
                plan(&set, None, mode, GeoRelation::Within),
                QueryPlan::Find(Predicate { labels: Some(expected.clone()), geometry: None }),
            );
            for relation in GeoRelation::ALL {
                assert_eq!(
                    plan(&set, Some(&r), mode, relation),
                    QueryPlan::Find(Predicate {
                        labels: Some(expected.clone()),
                        geometry: Some(GeoPredicate { relation, rect: r }),
                    }),
                );
            }
        }
    }

    #[test]
    fn empty_label_set_carries_no_label_filter() {
        let r = rect(0.0, 0.0, 1.0, 1.0);
        for mode in ContainmentMode::ALL {
            assert_eq!(
                plan(&CanonicalLabelSet::default(), Some(&r), mode, GeoRelation::Within),
                QueryPlan::Find(Predicate {
                    labels: None,
                    geometry: Some(GeoPredicate { relation: GeoRelation::Within, rect: r }),
                }),
            );
        }
    }

    #[test]
    fn label_predicates_match_patch_sets() {
        let catalog = LabelCatalog::new();
        let patch = catalog.encode(&["Airports", "Pastures", "Vineyards"]);

        assert!(LabelPredicate::ContainsAll(catalog.encode(&["Pastures", "Airports"])).matches(&patch));
        assert!(!LabelPredicate::ContainsAll(catalog.encode(&["Pastures", "Peatbogs"])).matches(&patch));
        assert!(LabelPredicate::ContainsAny(catalog.encode(&["Peatbogs", "Vineyards"])).matches(&patch));
        assert!(!LabelPredicate::ContainsAny(catalog.encode(&["Peatbogs"])).matches(&patch));
        assert!(LabelPredicate::Equals(catalog.encode(&["Vineyards", "Airports", "Pastures"])).matches(&patch));
        assert!(!LabelPredicate::Equals(catalog.encode(&["Airports", "Pastures"])).matches(&patch));
    }

    #[test]
    fn geo_predicates_match_footprints() {
        let query = rect(0.0, 0.0, 10.0, 10.0);
        let inside = rect(1.0, 1.0, 2.0, 2.0);
        let straddling = rect(9.0, 9.0, 11.0, 11.0);
        let touching = rect(10.0, 0.0, 12.0, 2.0);
        let outside = rect(20.0, 20.0, 21.0, 21.0);

        let within = GeoPredicate { relation: GeoRelation::Within, rect: query };
        let intersects = GeoPredicate { relation: GeoRelation::Intersects, rect: query };

        assert!(within.matches(&inside) && intersects.matches(&inside));
        assert!(!within.matches(&straddling) && intersects.matches(&straddling));
        assert!(!within.matches(&touching) && intersects.matches(&touching));
        assert!(!within.matches(&outside) && !intersects.matches(&outside));
        assert!(within.matches(&query));
    }

    #[test]
    fn plan_display_names_the_shape() {
        let catalog = LabelCatalog::new();
        let set = catalog.encode(&["Airports"]);
        let r = rect(0.0, 0.0, 1.0, 1.0);

        assert_eq!(QueryPlan::Empty.to_string(), "EMPTY");
        assert_eq!(
            plan(&set, Some(&r), ContainmentMode::Only, GeoRelation::Intersects).to_string(),
            "CONTAINS_ONLY 1 LABELS - GEO_INTERSECTS",
        );
        assert_eq!(
            plan(&set, None, ContainmentMode::All, GeoRelation::Within).to_string(),
            "CONTAINS_ALL 1 LABELS - NO COORDINATES",
        );
    }
}
