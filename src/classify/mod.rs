// Content classification
//
// An optional enrichment step before publishing: an external service infers
// the item kind, cleans up the text and may add a one-line summary. The
// service is treated as unreliable; any failure degrades to the local
// heuristic and is never surfaced to the publisher.

// Public API - what other modules can use
pub use heuristic::detect_kind;
pub use http::HttpClassifier;
pub use types::{Classification, ClassifyError, ContentClassifier, NoopClassifier};

// Internal modules
mod heuristic;
mod http;
mod types;
