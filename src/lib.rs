//! Near-duplicate detection for filed PDF documents.
//!
//! The comparator lives in [`similarity`]; everything else feeds it text
//! from disk and acts on its scores.

pub mod config;
pub mod documents;
pub mod ops;
pub mod report;
pub mod similarity;

pub use similarity::{similarity, Comparison, DuplicateDetector, StopwordPolicy};
