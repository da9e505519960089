use ahash::AHashMap;
use rstar::RTree;

use crate::error::{Error, Result};
use crate::geom::{aabb, BoundingBox};
use crate::query::{GeoRelation, Predicate};
use crate::store::{PatchRecord, PatchStore};

/// In-memory store: records in insertion order plus an R-tree over their footprints.
#[derive(Debug)]
pub struct MemStore {
    records: Vec<PatchRecord>,
    ids: AHashMap<String, usize>,
    rtree: RTree<BoundingBox>,
}

impl Default for MemStore {
    fn default() -> Self { Self::new() }
}

impl MemStore {
    pub fn new() -> Self {
        Self { records: Vec::new(), ids: AHashMap::new(), rtree: RTree::new() }
    }

    /// Bulk-load a store from records, rejecting duplicate ids.
    pub fn from_records(records: impl IntoIterator<Item = PatchRecord>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            if store.ids.insert(record.patch_id.clone(), store.records.len()).is_some() {
                return Err(Error::Store(format!("duplicate patch id {}", record.patch_id)))
            }
            store.records.push(record);
        }

        store.rtree = RTree::bulk_load(
            store.records.iter().enumerate()
                .map(|(i, record)| BoundingBox::new(i, record.rectangle.envelope()))
                .collect()
        );

        Ok(store)
    }

    /// Get a record by patch id.
    pub fn get(&self, patch_id: &str) -> Option<&PatchRecord> {
        self.ids.get(patch_id).map(|&i| &self.records[i])
    }

    /// Get a reference to the records in insertion order.
    #[inline] pub fn records(&self) -> &[PatchRecord] { &self.records }

    /// Indices of candidate records for a predicate, ascending.
    fn candidates(&self, predicate: &Predicate) -> Vec<usize> {
        let Some(geometry) = &predicate.geometry else { return (0..self.records.len()).collect() };

        let envelope = aabb(&geometry.rect.envelope());
        let mut hits = match geometry.relation {
            GeoRelation::Within => self.rtree.locate_in_envelope(&envelope)
                .map(|bbox| bbox.idx())
                .collect::<Vec<_>>(),
            GeoRelation::Intersects => self.rtree.locate_in_envelope_intersecting(&envelope)
                .map(|bbox| bbox.idx())
                .collect::<Vec<_>>(),
        };
        hits.sort_unstable();
        hits
    }
}

impl PatchStore for MemStore {
    fn insert(&mut self, record: PatchRecord) -> Result<()> {
        if self.ids.contains_key(&record.patch_id) {
            return Err(Error::Store(format!("duplicate patch id {}", record.patch_id)))
        }

        let idx = self.records.len();
        self.ids.insert(record.patch_id.clone(), idx);
        self.rtree.insert(BoundingBox::new(idx, record.rectangle.envelope()));
        self.records.push(record);
        Ok(())
    }

    #[inline] fn len(&self) -> usize { self.records.len() }

    fn find(&self, predicate: &Predicate) -> Result<Vec<PatchRecord>> {
        Ok(self.candidates(predicate).into_iter()
            .map(|i| &self.records[i])
            .filter(|record| predicate.matches(record))
            .cloned()
            .collect())
    }
}
