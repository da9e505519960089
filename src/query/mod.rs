mod plan;
mod service;
mod spec;

pub use plan::{plan, GeoPredicate, LabelPredicate, Predicate, QueryPlan};
pub use service::QueryService;
pub use spec::{ContainmentMode, GeoRelation, ModeError, QueryRequest, QuerySpec};
