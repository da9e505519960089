use tracing::{debug, info, warn};

use crate::error::Result;
use crate::geom::validate;
use crate::labels::LabelCatalog;
use crate::query::{plan, QueryPlan, QueryRequest};
use crate::store::PatchStore;
use crate::summary::{aggregate, ResultSummary};

/// Request handler: validate, plan, run against the store, and aggregate.
#[derive(Debug)]
pub struct QueryService<'a, S: PatchStore> {
    catalog: &'a LabelCatalog,
    store: &'a S,
}

impl<'a, S: PatchStore> QueryService<'a, S> {
    pub fn new(catalog: &'a LabelCatalog, store: &'a S) -> Self {
        Self { catalog, store }
    }

    #[inline] pub fn catalog(&self) -> &'a LabelCatalog { self.catalog }

    /// Answer a request, mapping every rejection or store failure to an empty result.
    pub fn execute(&self, request: &QueryRequest) -> ResultSummary {
        match self.try_execute(request) {
            Ok(summary) => summary,
            Err(err) if err.is_rejection() => {
                debug!("rejected query: {err}");
                ResultSummary::default()
            }
            Err(err) => {
                warn!("query failed: {err}");
                ResultSummary::default()
            }
        }
    }

    /// Answer a request, surfacing why it was rejected.
    pub fn try_execute(&self, request: &QueryRequest) -> Result<ResultSummary> {
        let spec = request.parse()?;

        // Unknown names are dropped here, so an all-unknown list behaves like an empty one.
        let labels = self.catalog.encode(&spec.labels);
        let rect = validate(spec.rectangle.as_ref(), !labels.is_empty())?;

        let plan = plan(&labels, rect.as_ref(), spec.mode, spec.relation);
        debug!("query plan: {plan}");

        let records = match &plan {
            QueryPlan::Empty => return Ok(ResultSummary::default()),
            QueryPlan::Find(predicate) => self.store.find(predicate)?,
        };

        let summary = aggregate(self.catalog, &records);
        info!(matched = summary.total(), "query answered");
        Ok(summary)
    }
}
