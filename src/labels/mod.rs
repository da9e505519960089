mod catalog;
mod code;

pub use catalog::LabelCatalog;
pub use code::{CanonicalLabelSet, LabelCode, LABEL_COUNT};
