mod disk;
mod mem;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geom::Rectangle;
use crate::labels::CanonicalLabelSet;
use crate::query::Predicate;

pub use disk::DiskStore;
pub use mem::MemStore;

/// One stored patch: a unique id, its lon/lat footprint, and its canonical labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRecord {
    pub patch_id: String,
    #[serde(rename = "location")]
    pub rectangle: Rectangle,
    pub labels: CanonicalLabelSet,
}

/// Document store with a label-code array field and a 2-D indexed geometry field.
///
/// Implementations evaluate the whole [`Predicate`]; callers never re-filter.
/// Result order is store-defined but stable within one call.
pub trait PatchStore: Send + Sync {
    /// Insert a record; patch ids are unique.
    fn insert(&mut self, record: PatchRecord) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Return every record matching the predicate.
    fn find(&self, predicate: &Predicate) -> Result<Vec<PatchRecord>>;

    /// Return every stored record.
    fn all(&self) -> Result<Vec<PatchRecord>> { self.find(&Predicate::default()) }
}
