//! Wire types of the backend HTTP contract.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/ai-indexing/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// An API key is configured on the server
    pub available: bool,
    /// The last connection test to the AI provider succeeded
    pub connection: bool,
    /// Human-readable reason when unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceStatus {
    /// Status used when the status endpoint itself could not be reached.
    pub fn unreachable() -> Self {
        Self {
            available: false,
            connection: false,
            message: Some("Could not reach the AI indexing service".to_string()),
        }
    }
}

/// Body of `POST /api/ai-indexing/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Physical filenames to analyse
    pub images: Vec<String>,
    /// Document the images belong to
    pub document_name: String,
}

/// Per-image analysis outcome.
///
/// Depending on the server version the title arrives as `suggested_name` or
/// as `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Analysed image
    pub filename: String,
    /// Explicit success flag (absent on older servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Suggested title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_name: Option<String>,
    /// Suggested title (older field name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Descriptive tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Suggested title from whichever field carries it.
    pub fn suggested_title(&self) -> Option<&str> {
        self.suggested_name
            .as_deref()
            .or(self.title.as_deref())
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }

    /// Whether the analysis produced a usable title.
    pub fn is_success(&self) -> bool {
        let flagged = self.success.unwrap_or(self.error.is_none());
        flagged && self.suggested_title().is_some()
    }
}

/// Response of `POST /api/ai-indexing/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Whether the batch was processed at all
    pub success: bool,
    /// Per-image outcomes
    #[serde(default)]
    pub results: Vec<AnalysisResult>,
    /// Number of images analysed successfully
    #[serde(default)]
    pub successful: usize,
    /// Number of images processed
    #[serde(default)]
    pub total_processed: usize,
    /// Batch-level failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /api/save-edited-image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveImageRequest {
    /// Image that was edited
    pub original_filename: String,
    /// Document the image belongs to
    pub document_name: String,
    /// Rendered raster as a `data:` URL
    pub edited_image_data: String,
    /// Overwrite the original instead of creating a copy
    pub replace_original: bool,
}

/// Response of `POST /api/save-edited-image`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveImageResponse {
    /// Filename the edited raster was stored under
    pub filename: String,
    /// Success flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Server message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_title_aliases() {
        let new_style: AnalysisResult =
            serde_json::from_str(r#"{"filename":"a.jpg","suggested_name":"Panel"}"#).unwrap();
        let old_style: AnalysisResult =
            serde_json::from_str(r#"{"filename":"a.jpg","title":"Panel","tags":["x"]}"#).unwrap();

        assert_eq!(new_style.suggested_title(), Some("Panel"));
        assert_eq!(old_style.suggested_title(), Some("Panel"));
        assert!(new_style.is_success());
        assert_eq!(old_style.tags, vec!["x".to_string()]);
    }

    #[test]
    fn test_analysis_failure() {
        let failed: AnalysisResult =
            serde_json::from_str(r#"{"filename":"a.jpg","error":"timeout"}"#).unwrap();
        assert!(!failed.is_success());

        let flagged: AnalysisResult = serde_json::from_str(
            r#"{"filename":"a.jpg","success":false,"title":"Panel"}"#,
        )
        .unwrap();
        assert!(!flagged.is_success());

        let blank: AnalysisResult =
            serde_json::from_str(r#"{"filename":"a.jpg","title":"   "}"#).unwrap();
        assert!(!blank.is_success());
    }

    #[test]
    fn test_analyze_response_defaults() {
        let response: AnalyzeResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.total_processed, 0);
    }

    #[test]
    fn test_save_request_wire_names() {
        let request = SaveImageRequest {
            original_filename: "a.jpg".to_string(),
            document_name: "DOC".to_string(),
            edited_image_data: "data:image/png;base64,AAAA".to_string(),
            replace_original: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["original_filename"], "a.jpg");
        assert_eq!(json["replace_original"], true);
    }
}
