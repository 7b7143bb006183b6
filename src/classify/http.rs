use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::types::{Classification, ClassifyError, ContentClassifier};
use crate::item::models::ItemKind;

/// Longest prefix of the input that is sent to the service.
const MAX_ANALYZED_CHARS: usize = 5000;

#[derive(Debug, Serialize)]
struct ClassifierRequest<'a> {
    text: &'a str,
}

/// Wire shape of the service response. `formattedContent` is required;
/// a response without it counts as a failure.
#[derive(Debug, Deserialize)]
struct ClassifierResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "formattedContent")]
    formatted_content: Option<String>,
    summary: Option<String>,
}

/// HTTP client for the external content classification service
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifyError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn parse_response(text: &str, response: ClassifierResponse) -> Result<Classification, ClassifyError> {
        let cleaned_content = match response.formatted_content {
            Some(content) => content,
            None => {
                return Err(ClassifyError::MalformedResponse(
                    "missing formattedContent".to_string(),
                ))
            }
        };

        let kind = ItemKind::from_str(&response.kind).map_err(|_| {
            ClassifyError::MalformedResponse(format!("unknown kind '{}'", response.kind))
        })?;

        // The service classifies text; FILE only ever comes from an upload
        if kind == ItemKind::File {
            return Err(ClassifyError::MalformedResponse(
                "classifier returned FILE".to_string(),
            ));
        }

        let summary = response.summary.filter(|s| !s.trim().is_empty());

        debug!(kind = %kind, has_summary = summary.is_some(), "Content classified");

        Ok(Classification {
            kind,
            cleaned_content: if cleaned_content.is_empty() {
                text.to_string()
            } else {
                cleaned_content
            },
            summary,
        })
    }
}

#[async_trait]
impl ContentClassifier for HttpClassifier {
    #[instrument(skip(self, text))]
    async fn analyze(&self, text: &str) -> Result<Classification, ClassifyError> {
        let truncated: String = if text.chars().count() > MAX_ANALYZED_CHARS {
            text.chars().take(MAX_ANALYZED_CHARS).collect()
        } else {
            text.to_string()
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&ClassifierRequest { text: &truncated });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Classifier request failed");
            ClassifyError::Request(e.to_string())
        })?;

        let response = response.error_for_status().map_err(|e| {
            warn!(error = %e, "Classifier returned error status");
            ClassifyError::Request(e.to_string())
        })?;

        let parsed: ClassifierResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Classifier response failed to parse");
            ClassifyError::MalformedResponse(e.to_string())
        })?;

        Self::parse_response(text, parsed)
    }
}
