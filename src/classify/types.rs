use async_trait::async_trait;
use thiserror::Error;

use crate::item::models::ItemKind;

/// What the classifier inferred about a piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: ItemKind,
    pub cleaned_content: String,
    pub summary: Option<String>,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// No classifier is configured (e.g. missing API key)
    #[error("Classifier unavailable")]
    Unavailable,

    #[error("Classifier request failed: {0}")]
    Request(String),

    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),
}

/// External content classification service.
///
/// Callers must treat every error as "use the local heuristic instead";
/// a ClassifyError never fails a publish.
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Classification, ClassifyError>;
}

/// Classifier standing in for "not configured" - always unavailable
pub struct NoopClassifier;

#[async_trait]
impl ContentClassifier for NoopClassifier {
    async fn analyze(&self, _text: &str) -> Result<Classification, ClassifyError> {
        Err(ClassifyError::Unavailable)
    }
}
