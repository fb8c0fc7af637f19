//! Document state store.
//!
//! Replaces the browser-global `appState` with an explicit object passed by
//! reference to whoever needs it. Every mutation that can change a resolved
//! image name bumps [`DocumentState::revision`], which is what lets the name
//! resolver detect stale cache entries on its own.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::{ImageRecord, Section};
use crate::error::{Error, Result};

/// Global naming configuration consumed by export name derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingContext<'a> {
    /// Figure prefix (e.g. "FIG")
    pub prefix: &'a str,
    /// Document name used in every export filename
    pub document_name: &'a str,
}

/// Where an image lives inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLocation {
    /// `sections[section].images[index]`
    Section {
        /// Index into the section list
        section: usize,
        /// Index into that section's images
        index: usize,
    },
    /// `unassigned_images[index]`
    Unassigned(usize),
}

/// Sections, unassigned images and naming configuration of one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    document_name: Option<String>,

    #[serde(default)]
    sections: Vec<Section>,

    #[serde(default)]
    unassigned_images: Vec<ImageRecord>,

    #[serde(skip, default = "next_revision")]
    revision: u64,
}

/// Revisions are drawn from one process-wide sequence, so two documents (a
/// reload, a diverged clone) never share a revision unless they share content.
static REVISION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    REVISION_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

impl Default for DocumentState {
    fn default() -> Self {
        Self {
            prefix: None,
            document_name: None,
            sections: Vec::new(),
            unassigned_images: Vec::new(),
            revision: next_revision(),
        }
    }
}

impl DocumentState {
    /// Create an empty document without naming configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the naming configuration (builder style).
    pub fn with_naming(mut self, prefix: impl Into<String>, document_name: impl Into<String>) -> Self {
        self.set_naming(prefix, document_name);
        self
    }

    /// Append a section (builder style). See [`DocumentState::add_section`].
    pub fn with_section(mut self, section: Section) -> Result<Self> {
        self.add_section(section)?;
        Ok(self)
    }

    /// Parse a serialized state snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)?;
        state.check_unique()?;
        Ok(state)
    }

    /// Serialize the state.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stamp replaced by every name-relevant mutation. Unique across all
    /// documents of the process and increasing within one document.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Naming configuration, if both prefix and document name are set.
    pub fn naming(&self) -> Option<NamingContext<'_>> {
        Some(NamingContext {
            prefix: self.prefix.as_deref()?,
            document_name: self.document_name.as_deref()?,
        })
    }

    /// Name of the loaded document.
    pub fn document_name(&self) -> Option<&str> {
        self.document_name.as_deref()
    }

    /// Replace the naming configuration.
    pub fn set_naming(&mut self, prefix: impl Into<String>, document_name: impl Into<String>) {
        self.prefix = Some(prefix.into());
        self.document_name = Some(document_name.into());
        self.bump();
    }

    /// Sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Images not yet assigned to a section.
    pub fn unassigned_images(&self) -> &[ImageRecord] {
        &self.unassigned_images
    }

    /// Every image in the document, sections first.
    pub fn images(&self) -> impl Iterator<Item = &ImageRecord> {
        self.sections
            .iter()
            .flat_map(|section| section.images.iter())
            .chain(self.unassigned_images.iter())
    }

    /// Append a section. Fails if one of its images is already in the document.
    pub fn add_section(&mut self, section: Section) -> Result<()> {
        for image in &section.images {
            if self.contains(&image.filename) {
                return Err(Error::duplicate_image(&image.filename));
            }
        }
        self.sections.push(section);
        self.bump();
        Ok(())
    }

    /// Add an image to the unassigned list.
    pub fn add_unassigned(&mut self, image: ImageRecord) -> Result<()> {
        if self.contains(&image.filename) {
            return Err(Error::duplicate_image(&image.filename));
        }
        self.unassigned_images.push(image);
        self.bump();
        Ok(())
    }

    /// Find a section by any of its numbering aliases.
    pub fn find_section(&self, number: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.matches(number))
    }

    /// Number of images in the section with this number.
    pub fn section_image_count(&self, number: &str) -> Option<usize> {
        self.find_section(number).map(|section| section.images.len())
    }

    /// Whether an image with this filename exists anywhere in the document.
    pub fn contains(&self, filename: &str) -> bool {
        self.locate(filename).is_some()
    }

    /// Locate an image by filename.
    pub fn locate(&self, filename: &str) -> Option<ImageLocation> {
        for (section_idx, section) in self.sections.iter().enumerate() {
            if let Some(index) = section.position_of(filename) {
                return Some(ImageLocation::Section {
                    section: section_idx,
                    index,
                });
            }
        }
        self.unassigned_images
            .iter()
            .position(|img| img.filename == filename)
            .map(ImageLocation::Unassigned)
    }

    /// Look up an image by filename.
    pub fn find_image(&self, filename: &str) -> Option<&ImageRecord> {
        match self.locate(filename)? {
            ImageLocation::Section { section, index } => self.sections[section].images.get(index),
            ImageLocation::Unassigned(index) => self.unassigned_images.get(index),
        }
    }

    /// AI titles currently assigned anywhere in the document.
    pub fn ai_names(&self) -> Vec<&str> {
        self.images().filter_map(ImageRecord::ai_title).collect()
    }

    /// Attach AI metadata to an image.
    pub fn apply_ai_metadata(
        &mut self,
        filename: &str,
        title: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<()> {
        let image = self.image_mut(filename)?;
        image.set_ai_metadata(title, tags);
        log::debug!("🏷️ AI metadata applied to {}", filename);
        self.bump();
        Ok(())
    }

    /// Remove AI metadata from an image.
    pub fn clear_ai_metadata(&mut self, filename: &str) -> Result<()> {
        self.image_mut(filename)?.clear_ai_metadata();
        self.bump();
        Ok(())
    }

    /// Change the physical filename of an image (server-side rename or replace).
    pub fn rename_image(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return self.touch_image(old);
        }
        if self.contains(new) {
            return Err(Error::duplicate_image(new));
        }
        self.image_mut(old)?.filename = new.to_string();
        log::info!("✏️ Renamed image {} -> {}", old, new);
        self.bump();
        Ok(())
    }

    /// Mark an image as changed in place (content replaced, same filename).
    pub fn touch_image(&mut self, filename: &str) -> Result<()> {
        if !self.contains(filename) {
            return Err(Error::unknown_image(filename));
        }
        self.bump();
        Ok(())
    }

    /// Insert a copy of `original` named `new_filename` right after it, in the
    /// same container.
    ///
    /// Returns `Ok(false)` without changing anything when `new_filename` is
    /// already present.
    pub fn insert_copy_after(&mut self, original: &str, new_filename: &str) -> Result<bool> {
        if self.contains(new_filename) {
            log::debug!("Copy {} already present, skipping insert", new_filename);
            return Ok(false);
        }
        let location = self
            .locate(original)
            .ok_or_else(|| Error::unknown_image(original))?;

        let container = match location {
            ImageLocation::Section { section, index } => (&mut self.sections[section].images, index),
            ImageLocation::Unassigned(index) => (&mut self.unassigned_images, index),
        };
        let (images, index) = container;
        let mut copy = images[index].clone();
        copy.filename = new_filename.to_string();
        images.insert(index + 1, copy);

        log::info!("➕ Inserted {} after {}", new_filename, original);
        self.bump();
        Ok(true)
    }

    /// Move an image to the end of a section.
    pub fn assign_to_section(&mut self, filename: &str, number: &str) -> Result<()> {
        let target = self
            .sections
            .iter()
            .position(|section| section.matches(number))
            .ok_or_else(|| Error::unknown_section(number))?;
        let image = self.take_image(filename)?;
        self.sections[target].images.push(image);
        self.bump();
        Ok(())
    }

    /// Move an image out of its section into the unassigned list.
    pub fn unassign(&mut self, filename: &str) -> Result<()> {
        let image = self.take_image(filename)?;
        self.unassigned_images.push(image);
        self.bump();
        Ok(())
    }

    /// Delete an image from the document.
    pub fn remove_image(&mut self, filename: &str) -> Result<ImageRecord> {
        let image = self.take_image(filename)?;
        self.bump();
        Ok(image)
    }

    fn take_image(&mut self, filename: &str) -> Result<ImageRecord> {
        match self.locate(filename) {
            Some(ImageLocation::Section { section, index }) => {
                Ok(self.sections[section].images.remove(index))
            }
            Some(ImageLocation::Unassigned(index)) => Ok(self.unassigned_images.remove(index)),
            None => Err(Error::unknown_image(filename)),
        }
    }

    fn image_mut(&mut self, filename: &str) -> Result<&mut ImageRecord> {
        match self.locate(filename) {
            Some(ImageLocation::Section { section, index }) => {
                Ok(&mut self.sections[section].images[index])
            }
            Some(ImageLocation::Unassigned(index)) => Ok(&mut self.unassigned_images[index]),
            None => Err(Error::unknown_image(filename)),
        }
    }

    fn check_unique(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for image in self.images() {
            if !seen.insert(image.filename.as_str()) {
                return Err(Error::duplicate_image(&image.filename));
            }
        }
        Ok(())
    }

    fn bump(&mut self) {
        self.revision = next_revision();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentState {
        DocumentState::new()
            .with_naming("FIG", "DOC")
            .with_section(
                Section::new("1")
                    .with_image(ImageRecord::new("a.jpg"))
                    .with_image(ImageRecord::new("b.jpg")),
            )
            .unwrap()
            .with_section(Section::new("2"))
            .unwrap()
    }

    #[test]
    fn test_naming_requires_both_fields() {
        let mut doc = DocumentState::new();
        assert!(doc.naming().is_none());

        doc.set_naming("FIG", "DOC");
        let naming = doc.naming().unwrap();
        assert_eq!(naming.prefix, "FIG");
        assert_eq!(naming.document_name, "DOC");
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut doc = sample();
        let start = doc.revision();

        doc.apply_ai_metadata("a.jpg", "Panel", Vec::new()).unwrap();
        assert!(doc.revision() > start);

        let before = doc.revision();
        doc.rename_image("b.jpg", "c.jpg").unwrap();
        assert!(doc.revision() > before);
    }

    #[test]
    fn test_reload_gets_fresh_revision() {
        let mut doc = sample();
        doc.apply_ai_metadata("a.jpg", "Panel", Vec::new()).unwrap();
        let reloaded = DocumentState::from_json(&doc.to_json().unwrap()).unwrap();
        assert_ne!(reloaded.revision(), doc.revision());

        let mut copy = doc.clone();
        assert_eq!(copy.revision(), doc.revision());
        copy.remove_image("b.jpg").unwrap();
        doc.rename_image("b.jpg", "c.jpg").unwrap();
        assert_ne!(copy.revision(), doc.revision());
    }

    #[test]
    fn test_failed_mutation_keeps_revision() {
        let mut doc = sample();
        let start = doc.revision();
        assert!(doc.apply_ai_metadata("missing.jpg", "x", Vec::new()).is_err());
        assert!(doc.rename_image("a.jpg", "b.jpg").is_err());
        assert_eq!(doc.revision(), start);
    }

    #[test]
    fn test_assign_is_a_move() {
        let mut doc = sample();
        doc.assign_to_section("a.jpg", "2").unwrap();

        assert_eq!(doc.section_image_count("1"), Some(1));
        assert_eq!(doc.section_image_count("2"), Some(1));
        assert_eq!(doc.images().filter(|img| img.filename == "a.jpg").count(), 1);

        doc.unassign("a.jpg").unwrap();
        assert_eq!(doc.section_image_count("2"), Some(0));
        assert_eq!(doc.unassigned_images().len(), 1);
    }

    #[test]
    fn test_assign_unknown_section_leaves_image() {
        let mut doc = sample();
        let err = doc.assign_to_section("a.jpg", "9").unwrap_err();
        assert!(matches!(err, Error::UnknownSection { .. }));
        assert!(doc.find_section("1").unwrap().position_of("a.jpg").is_some());
    }

    #[test]
    fn test_insert_copy_after_original() {
        let mut doc = sample();
        doc.apply_ai_metadata("a.jpg", "Panel", Vec::new()).unwrap();

        assert!(doc.insert_copy_after("a.jpg", "a_edited.jpg").unwrap());
        let section = doc.find_section("1").unwrap();
        let names: Vec<_> = section.images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "a_edited.jpg", "b.jpg"]);
        assert_eq!(section.images[1].ai_title(), Some("Panel"));

        // Second insert of the same name is a no-op
        assert!(!doc.insert_copy_after("a.jpg", "a_edited.jpg").unwrap());
        assert_eq!(doc.section_image_count("1"), Some(3));
    }

    #[test]
    fn test_insert_copy_in_unassigned() {
        let mut doc = DocumentState::new();
        doc.add_unassigned(ImageRecord::new("x.png")).unwrap();
        doc.add_unassigned(ImageRecord::new("y.png")).unwrap();
        doc.insert_copy_after("x.png", "x_edited.png").unwrap();

        let names: Vec<_> = doc
            .unassigned_images()
            .iter()
            .map(|i| i.filename.as_str())
            .collect();
        assert_eq!(names, vec!["x.png", "x_edited.png", "y.png"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut doc = sample();
        let err = doc.add_unassigned(ImageRecord::new("a.jpg")).unwrap_err();
        assert!(matches!(err, Error::DuplicateImage { .. }));
    }

    #[test]
    fn test_ai_names() {
        let mut doc = sample();
        doc.apply_ai_metadata("b.jpg", "Wiring", Vec::new()).unwrap();
        assert_eq!(doc.ai_names(), vec!["Wiring"]);
    }

    #[test]
    fn test_json_roundtrip_of_app_state() {
        let json = r#"{
            "prefix": "FIG",
            "documentName": "DOC",
            "sections": [
                {"nomenclatureNumber": "2.1", "images": [{"filename": "a.jpg"}]}
            ],
            "unassignedImages": [{"filename": "z.png"}]
        }"#;
        let doc = DocumentState::from_json(json).unwrap();
        assert_eq!(doc.section_image_count("2.1"), Some(1));
        assert_eq!(doc.unassigned_images().len(), 1);
        assert_eq!(doc.naming().unwrap().document_name, "DOC");

        let again = DocumentState::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(again.section_image_count("2.1"), Some(1));
    }

    #[test]
    fn test_from_json_rejects_shared_image() {
        let json = r#"{
            "sections": [{"number": "1", "images": [{"filename": "a.jpg"}]}],
            "unassignedImages": [{"filename": "a.jpg"}]
        }"#;
        assert!(DocumentState::from_json(json).is_err());
    }
}
