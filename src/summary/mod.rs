//! Reduce a matched record set to patch ids, per-patch details, and label frequencies.

use std::cmp::Reverse;

use rayon::prelude::*;
use serde::Serialize;

use crate::labels::{LabelCatalog, LABEL_COUNT};
use crate::store::PatchRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: &'static str,
    pub count: usize,
}

/// One matched patch: its id, anchor vertex `[lng, lat]`, and decoded labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchSummary {
    pub patch_id: String,
    pub anchor: [f64; 2],
    pub labels: Vec<&'static str>,
}

/// Outcome of a query. `patches[i]` always describes `matched_patch_ids[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSummary {
    pub matched_patch_ids: Vec<String>,
    /// Descending by count, ties ascending by label name.
    pub label_frequency: Vec<LabelCount>,
    pub patches: Vec<PatchSummary>,
}

impl ResultSummary {
    #[inline] pub fn total(&self) -> usize { self.matched_patch_ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.matched_patch_ids.is_empty() }

    /// Count recorded for a label, zero if it never occurred.
    pub fn count_of(&self, label: &str) -> usize {
        self.label_frequency.iter()
            .find(|entry| entry.label == label)
            .map_or(0, |entry| entry.count)
    }
}

/// Per-record partial: the decoded patch plus its contribution to the histogram.
struct Partial {
    patch: PatchSummary,
    histogram: [usize; LABEL_COUNT],
}

impl Partial {
    fn new(catalog: &LabelCatalog, record: &PatchRecord) -> Self {
        let mut histogram = [0; LABEL_COUNT];
        for code in record.labels.iter() {
            histogram[code.index()] += 1;
        }

        let anchor = record.rectangle.anchor();
        Self {
            patch: PatchSummary {
                patch_id: record.patch_id.clone(),
                anchor: [anchor.x, anchor.y],
                labels: catalog.decode_all(&record.labels),
            },
            histogram,
        }
    }
}

/// Aggregate matched records, preserving their order in every per-record list.
pub fn aggregate(catalog: &LabelCatalog, records: &[PatchRecord]) -> ResultSummary {
    if records.is_empty() { return ResultSummary::default() }

    // Indexed collect keeps result order regardless of how rayon splits the work.
    let partials: Vec<Partial> = records.par_iter()
        .map(|record| Partial::new(catalog, record))
        .collect();

    let mut histogram = [0usize; LABEL_COUNT];
    let mut patches = Vec::with_capacity(partials.len());
    for partial in partials {
        histogram.iter_mut().zip(partial.histogram).for_each(|(total, n)| *total += n);
        patches.push(partial.patch);
    }

    let mut label_frequency: Vec<LabelCount> = catalog.labels().iter()
        .zip(histogram)
        .filter(|&(_, count)| count > 0)
        .map(|(&label, count)| LabelCount { label, count })
        .collect();
    label_frequency.sort_by_key(|entry| (Reverse(entry.count), entry.label));

    ResultSummary {
        matched_patch_ids: patches.iter().map(|p| p.patch_id.clone()).collect(),
        label_frequency,
        patches,
    }
}
