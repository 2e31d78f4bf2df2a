// src/extractors/mod.rs
pub mod document;
pub mod entities;
pub mod summary;
pub mod tables;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use document::{Document, Occurrence, SectionBoundary, SectionRule};
#[allow(unused_imports)]
pub use entities::{IndustryMatch, IndustryTaxonomy};
#[allow(unused_imports)]
pub use tables::{ParsedTable, TocTable};
