//! Section data model.

use serde::{Deserialize, Deserializer, Serialize};

use super::ImageRecord;

/// An ordered group of images under one nomenclature number.
///
/// Depending on when a section was created its number lives under
/// `nomenclatureNumber`, `sectionNumber` or `number`. All three are kept and
/// [`Section::matches`] checks each of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Number assigned by nomenclature detection
    #[serde(
        default,
        deserialize_with = "deserialize_number_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub nomenclature_number: Option<String>,

    /// Number assigned by manual section creation
    #[serde(
        default,
        deserialize_with = "deserialize_number_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub section_number: Option<String>,

    /// Legacy number field
    #[serde(
        default,
        deserialize_with = "deserialize_number_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,

    /// Section heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Images in display and export order
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

impl Section {
    /// Create an empty section with the given number.
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            section_number: Some(number.into()),
            ..Self::default()
        }
    }

    /// Set the section title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append an image (builder style).
    pub fn with_image(mut self, image: ImageRecord) -> Self {
        self.images.push(image);
        self
    }

    /// The first populated numbering field.
    pub fn key(&self) -> Option<&str> {
        self.nomenclature_number
            .as_deref()
            .or(self.section_number.as_deref())
            .or(self.number.as_deref())
    }

    /// Whether any numbering alias equals `number`.
    pub fn matches(&self, number: &str) -> bool {
        [&self.nomenclature_number, &self.section_number, &self.number]
            .into_iter()
            .any(|alias| alias.as_deref() == Some(number))
    }

    /// Position of an image in this section.
    pub fn position_of(&self, filename: &str) -> Option<usize> {
        self.images.iter().position(|img| img.filename == filename)
    }
}

/// Section numbers arrive either as strings ("2.1") or bare JSON numbers (3).
fn deserialize_number_key<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberKey {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(
        Option::<NumberKey>::deserialize(deserializer)?.map(|key| match key {
            NumberKey::Text(text) => text,
            NumberKey::Integer(n) => n.to_string(),
            NumberKey::Float(f) => f.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_any_alias() {
        let mut section = Section::default();
        section.nomenclature_number = Some("1.2".to_string());
        assert!(section.matches("1.2"));
        assert!(!section.matches("1.3"));

        let mut legacy = Section::default();
        legacy.number = Some("4".to_string());
        assert!(legacy.matches("4"));
        assert_eq!(legacy.key(), Some("4"));
    }

    #[test]
    fn test_key_prefers_nomenclature() {
        let mut section = Section::new("3");
        section.nomenclature_number = Some("3.1".to_string());
        assert_eq!(section.key(), Some("3.1"));
    }

    #[test]
    fn test_numeric_number_deserializes() {
        let json = r#"{"number": 7, "images": [{"filename": "a.png"}]}"#;
        let section: Section = serde_json::from_str(json).unwrap();
        assert!(section.matches("7"));
        assert_eq!(section.images.len(), 1);
        assert_eq!(section.position_of("a.png"), Some(0));
    }

    #[test]
    fn test_missing_fields_default() {
        let section: Section = serde_json::from_str("{}").unwrap();
        assert_eq!(section.key(), None);
        assert!(section.images.is_empty());
    }
}
