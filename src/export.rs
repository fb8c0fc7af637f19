//! Custom export of a document's images into a ZIP archive.
//!
//! The plan pairs every sectioned image with its export name; the archive
//! copies the source files under those names. Unassigned images are left out.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};
use crate::model::DocumentState;
use crate::naming::{NameContext, NameResolver};

/// One file to export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    /// Stored filename
    #[serde(rename = "originalFilename")]
    pub original: String,
    /// Name inside the archive
    #[serde(rename = "newFilename")]
    pub export_name: String,
}

/// Export entries of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSection {
    /// Section number, if the section has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Entries in section order
    pub images: Vec<ExportEntry>,
}

/// What goes into the archive. Serializes to the `/export-custom` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    /// Document the images belong to
    pub document_name: String,
    /// Sections in document order
    pub sections: Vec<ExportSection>,
}

/// Outcome of writing an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Entries written
    pub written: usize,
    /// Sources that did not exist
    pub missing: Vec<String>,
    /// Entries skipped because an earlier entry used the same export name
    pub duplicates: Vec<String>,
}

impl ExportPlan {
    /// Resolve the export name of every sectioned image.
    pub fn build(doc: &DocumentState, resolver: &mut NameResolver) -> Result<Self> {
        let document_name = doc.document_name().ok_or(Error::NoDocument)?.to_string();

        let sections: Vec<ExportSection> = doc
            .sections()
            .iter()
            .map(|section| {
                let number = section.key();
                let images = section
                    .images
                    .iter()
                    .enumerate()
                    .map(|(i, image)| ExportEntry {
                        original: image.filename.clone(),
                        export_name: resolver.resolve_name(
                            doc,
                            Some(image),
                            NameContext::Export,
                            number,
                            Some(i + 1),
                        ),
                    })
                    .collect();
                ExportSection {
                    number: number.map(str::to_string),
                    images,
                }
            })
            .collect();

        let plan = Self {
            document_name,
            sections,
        };
        log::info!("📦 Export plan for {}: {} image(s)", plan.document_name, plan.len());
        Ok(plan)
    }

    /// All entries in archive order.
    pub fn entries(&self) -> impl Iterator<Item = &ExportEntry> {
        self.sections.iter().flat_map(|section| section.images.iter())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.images.len()).sum()
    }

    /// Whether there is nothing to export.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Download name of the archive.
    pub fn archive_name(&self) -> String {
        archive_name(&self.document_name)
    }

    /// Serialize as the `/export-custom` request body.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Download name of a document's custom export.
pub fn archive_name(document_name: &str) -> String {
    format!("{document_name}_custom.zip")
}

/// Write the planned files from `source_dir` into a deflate ZIP.
///
/// Missing sources are skipped. A second entry with an export name already
/// in the archive is skipped as well.
pub fn write_zip<W: Write + Seek>(plan: &ExportPlan, source_dir: &Path, writer: W) -> Result<ExportSummary> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut summary = ExportSummary::default();
    let mut seen = HashSet::new();

    for entry in plan.entries() {
        let source = source_dir.join(&entry.original);
        if !source.is_file() {
            log::warn!("⚠️ Export source missing: {}", source.display());
            summary.missing.push(entry.original.clone());
            continue;
        }
        if !seen.insert(entry.export_name.as_str()) {
            log::warn!(
                "⚠️ Export name {} already used, skipping {}",
                entry.export_name,
                entry.original
            );
            summary.duplicates.push(entry.original.clone());
            continue;
        }

        zip.start_file(entry.export_name.as_str(), options)?;
        let mut file = File::open(&source)?;
        io::copy(&mut file, &mut zip)?;
        summary.written += 1;
        log::debug!("Exported {} as {}", entry.original, entry.export_name);
    }

    zip.finish()?;
    log::info!(
        "✅ Exported {} file(s) to {} ({} missing)",
        summary.written,
        plan.archive_name(),
        summary.missing.len()
    );
    Ok(summary)
}

/// Write the archive to `output_dir` under [`ExportPlan::archive_name`].
pub fn export_to_dir(plan: &ExportPlan, source_dir: &Path, output_dir: &Path) -> Result<ExportSummary> {
    std::fs::create_dir_all(output_dir)?;
    let file = File::create(output_dir.join(plan.archive_name()))?;
    write_zip(plan, source_dir, file)
}
