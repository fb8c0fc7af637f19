//! Image record data model.

use serde::{Deserialize, Serialize};

/// One image extracted from a document.
///
/// `filename` is the physical identifier on the server. The naming subsystem
/// never rewrites it; AI analysis only attaches metadata next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Physical filename (stable identifier)
    #[serde(default)]
    pub filename: String,

    /// Set once the AI indexing workflow has assigned a title
    #[serde(default, rename = "isAIRenamed")]
    pub is_ai_renamed: bool,

    /// Human-readable title from AI analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggested_name: Option<String>,

    /// Tags from AI analysis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Source page in the original document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ImageRecord {
    /// Create a standard (non AI-named) image record.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Attach an AI title (builder style).
    pub fn with_ai_name(mut self, title: impl Into<String>) -> Self {
        self.set_ai_metadata(title, Vec::new());
        self
    }

    /// Set the source page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Whether the record carries a usable filename.
    pub fn is_valid(&self) -> bool {
        !self.filename.trim().is_empty()
    }

    /// The AI title, if the image is AI-renamed and the title is not blank.
    pub fn ai_title(&self) -> Option<&str> {
        if !self.is_ai_renamed {
            return None;
        }
        self.ai_suggested_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Store AI metadata. The physical filename is left alone.
    pub fn set_ai_metadata(&mut self, title: impl Into<String>, tags: Vec<String>) {
        self.is_ai_renamed = true;
        self.ai_suggested_name = Some(title.into());
        self.tags = tags;
    }

    /// Drop AI metadata, turning the record back into a standard image.
    pub fn clear_ai_metadata(&mut self) {
        self.is_ai_renamed = false;
        self.ai_suggested_name = None;
        self.tags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_title_requires_flag() {
        let mut image = ImageRecord::new("a.jpg");
        image.ai_suggested_name = Some("Front".to_string());
        assert_eq!(image.ai_title(), None);

        image.is_ai_renamed = true;
        assert_eq!(image.ai_title(), Some("Front"));

        image.ai_suggested_name = Some(String::new());
        assert_eq!(image.ai_title(), None);

        image.ai_suggested_name = Some("  \t ".to_string());
        assert_eq!(image.ai_title(), None);
    }

    #[test]
    fn test_clear_ai_metadata() {
        let mut image = ImageRecord::new("a.jpg").with_ai_name("Panel");
        image.tags.push("wiring".to_string());
        image.clear_ai_metadata();

        assert!(!image.is_ai_renamed);
        assert!(image.ai_suggested_name.is_none());
        assert!(image.tags.is_empty());
        assert_eq!(image.filename, "a.jpg");
    }

    #[test]
    fn test_serde_field_names() {
        let json = r#"{"filename":"p1.png","isAIRenamed":true,"aiSuggestedName":"Cover"}"#;
        let image: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(image.filename, "p1.png");
        assert_eq!(image.ai_title(), Some("Cover"));

        let out = serde_json::to_string(&image).unwrap();
        assert!(out.contains("\"isAIRenamed\":true"));
        assert!(out.contains("\"aiSuggestedName\":\"Cover\""));
    }

    #[test]
    fn test_invalid_record() {
        assert!(!ImageRecord::default().is_valid());
        assert!(!ImageRecord::new("   ").is_valid());
        assert!(ImageRecord::new("x.jpg").is_valid());
    }
}
