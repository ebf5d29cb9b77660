//! formscan-analysis: the detection engine.
//!
//! - Patterns: text matchers for inline tags, blocks, builder tags, addon heuristics,
//!   and rendered-HTML fingerprints
//! - Metadata: normalization of builder metadata (JSON text, PHP-serialized text,
//!   or pre-decoded trees) into one tree representation
//! - Walker: bounded pre-order traversal over builder layout trees
//! - Extractors: one `Extractor` per embedding convention, held in a registry
//! - Scanner: per-document orchestration and the corpus loop

pub mod extractors;
pub mod metadata;
pub mod patterns;
pub mod scanner;
pub mod walker;

pub use extractors::{Extraction, ExtractionContext, Extractor, ExtractorRegistry};
pub use scanner::{CorpusScanner, DocumentScanner};
pub use walker::{WalkOutcome, WidgetWalker};
