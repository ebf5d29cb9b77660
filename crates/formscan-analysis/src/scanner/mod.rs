//! Scanning: per-document orchestration and the corpus loop.

pub mod corpus;
pub mod document;
pub mod fallback;

pub use corpus::CorpusScanner;
pub use document::DocumentScanner;
pub use fallback::{FallbackOutcome, RenderedFallback};
