#![doc = "PatchQuery public API"]
mod error;
mod geom;
mod ingest;
mod labels;
mod query;
mod reproject;
mod store;
mod summary;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use labels::{CanonicalLabelSet, LabelCatalog, LabelCode, LABEL_COUNT};

#[doc(inline)]
pub use geom::{validate, GeometryError, RawGeometry, Rectangle, MAX_LNG_SPAN};

#[doc(inline)]
pub use reproject::{epsg_from_descriptor, round_coord, ProjectedBox, ReprojectError, Reprojector, WEB_MERCATOR, WGS84};

#[doc(inline)]
pub use query::{
    plan, ContainmentMode, GeoPredicate, GeoRelation, LabelPredicate, ModeError,
    Predicate, QueryPlan, QueryRequest, QueryService, QuerySpec,
};

#[doc(inline)]
pub use summary::{aggregate, LabelCount, PatchSummary, ResultSummary};

#[doc(inline)]
pub use store::{DiskStore, MemStore, PatchRecord, PatchStore};

#[doc(inline)]
pub use ingest::{
    build_record, ingest_dir, patch_id_from_path, read_metadata,
    IngestOptions, IngestReport, PatchMetadata, METADATA_SUFFIX,
};
