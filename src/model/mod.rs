//! Dataset model: bug records and the classification taxonomy.
//!
//! Both documents are loaded once and never mutated afterwards; every view
//! over them (filtered lists, labels, counts) is derived.

mod bug;
pub mod taxonomy;

pub use bug::{BugRecord, FieldValue};
pub use taxonomy::{FlagGroup, Label, Taxonomy, TaxonomyEntry};
