//! Memoizing name resolver.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::clean::{clean_display_name, clean_for_export, export_fallback, extract_extension};
use crate::model::{DocumentState, ImageRecord};

/// Where a resolved name is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NameContext {
    /// Overlay name in the interactive view
    Display,
    /// Filename materialized into the export archive
    Export,
}

impl NameContext {
    /// Identifier used in logs and in serialized requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            NameContext::Display => "display",
            NameContext::Export => "export",
        }
    }

    /// Parse a context name. Unknown names fall back to [`NameContext::Display`].
    pub fn parse(name: &str) -> Self {
        match name {
            "export" => NameContext::Export,
            "display" => NameContext::Display,
            other => {
                log::warn!("Unknown naming context '{}', using display", other);
                NameContext::Display
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    filename: String,
    context: NameContext,
    section_number: Option<String>,
    image_index: Option<usize>,
}

/// Callback run whenever the cache is wiped, with the number of dropped entries.
pub type InvalidationHook = Box<dyn FnMut(usize)>;

/// Snapshot of resolver and document state for troubleshooting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverDiagnostics {
    /// Entries currently memoized
    pub cached_entries: usize,
    /// Cache hits since creation
    pub hits: u64,
    /// Cache misses since creation
    pub misses: u64,
    /// Document revision the cache was filled at
    pub cached_revision: Option<u64>,
    /// Current document revision
    pub document_revision: u64,
    /// Whether prefix and document name are configured
    pub has_naming_context: bool,
    /// Number of sections
    pub section_count: usize,
    /// Number of unassigned images
    pub unassigned_count: usize,
}

/// Derives display and export names for images and memoizes them.
///
/// Entries are keyed by `(filename, context, section, index)` and stamped with
/// the [`DocumentState::revision`] they were computed at. A resolution against
/// a newer revision drops the whole cache first, so mutations made through
/// `DocumentState` never yield stale names. Mutations made elsewhere (e.g. on
/// a detached [`ImageRecord`]) still need an explicit [`NameResolver::clear_cache`].
///
/// One resolver serves one document.
pub struct NameResolver {
    cache: HashMap<CacheKey, String>,
    revision: Option<u64>,
    on_invalidate: Option<InvalidationHook>,
    hits: u64,
    misses: u64,
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameResolver")
            .field("entries", &self.cache.len())
            .field("revision", &self.revision)
            .field("has_hook", &self.on_invalidate.is_some())
            .finish_non_exhaustive()
    }
}

impl NameResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            revision: None,
            on_invalidate: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Create a resolver that notifies `hook` whenever cached names are dropped,
    /// typically to schedule a re-render.
    pub fn with_invalidation_hook(hook: impl FnMut(usize) + 'static) -> Self {
        Self {
            on_invalidate: Some(Box::new(hook)),
            ..Self::new()
        }
    }

    /// Number of memoized names.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop every memoized name.
    pub fn clear_cache(&mut self) {
        let dropped = self.cache.len();
        self.cache.clear();
        log::debug!("🗑️ Name cache cleared ({} entries)", dropped);
        if let Some(hook) = self.on_invalidate.as_mut() {
            hook(dropped);
        }
    }

    /// Resolve the name of `image` for `context`.
    ///
    /// `image` may be absent or carry no filename: export then yields a
    /// fallback name and display an empty string. Never fails.
    pub fn resolve_name(
        &mut self,
        doc: &DocumentState,
        image: Option<&ImageRecord>,
        context: NameContext,
        section_number: Option<&str>,
        image_index: Option<usize>,
    ) -> String {
        let Some(image) = image.filter(|img| img.is_valid()) else {
            log::debug!("⚠️ Invalid image for {} naming", context.as_str());
            return match context {
                NameContext::Export => export_fallback(section_number, image_index),
                NameContext::Display => String::new(),
            };
        };

        self.sync_revision(doc.revision());

        let key = CacheKey {
            filename: image.filename.clone(),
            context,
            section_number: section_number.map(str::to_string),
            image_index,
        };

        if let Some(cached) = self.cache.get(&key) {
            self.hits += 1;
            log::trace!("📦 Cache hit: {} -> {}", image.filename, cached);
            return cached.clone();
        }

        self.misses += 1;
        let name = match context {
            NameContext::Display => display_name(image),
            NameContext::Export => export_name(doc, image, section_number, image_index),
        };
        log::debug!(
            "🔍 Resolved {} name for {}: '{}'",
            context.as_str(),
            image.filename,
            name
        );
        self.cache.insert(key, name.clone());
        name
    }

    /// Shorthand for [`NameContext::Display`] resolution.
    pub fn display_name(&mut self, doc: &DocumentState, image: &ImageRecord) -> String {
        self.resolve_name(doc, Some(image), NameContext::Display, None, None)
    }

    /// Shorthand for [`NameContext::Export`] resolution.
    pub fn export_name(
        &mut self,
        doc: &DocumentState,
        image: &ImageRecord,
        section_number: &str,
        image_index: usize,
    ) -> String {
        self.resolve_name(
            doc,
            Some(image),
            NameContext::Export,
            Some(section_number),
            Some(image_index),
        )
    }

    /// Report cache and document state.
    pub fn diagnose(&self, doc: &DocumentState) -> ResolverDiagnostics {
        ResolverDiagnostics {
            cached_entries: self.cache.len(),
            hits: self.hits,
            misses: self.misses,
            cached_revision: self.revision,
            document_revision: doc.revision(),
            has_naming_context: doc.naming().is_some(),
            section_count: doc.sections().len(),
            unassigned_count: doc.unassigned_images().len(),
        }
    }

    fn sync_revision(&mut self, revision: u64) {
        if self.revision == Some(revision) {
            return;
        }
        if !self.cache.is_empty() {
            log::debug!(
                "Document revision {:?} -> {}, dropping cached names",
                self.revision,
                revision
            );
            self.clear_cache();
        }
        self.revision = Some(revision);
    }
}

fn display_name(image: &ImageRecord) -> String {
    // Standard images show no overlay name
    image.ai_title().map(clean_display_name).unwrap_or_default()
}

fn export_name(
    doc: &DocumentState,
    image: &ImageRecord,
    section_number: Option<&str>,
    image_index: Option<usize>,
) -> String {
    let section = section_number.filter(|s| !s.is_empty());
    let index = image_index.filter(|&i| i > 0);
    let (Some(section), Some(index), Some(naming)) = (section, index, doc.naming()) else {
        log::debug!("⚠️ Missing export parameters, using fallback");
        return export_fallback(section_number, image_index);
    };

    let prefix = naming.prefix;
    let document = naming.document_name;
    let ext = extract_extension(&image.filename);

    if let Some(title) = image.ai_title() {
        let title = clean_for_export(title);
        return format!("{prefix}-{document}-{section}-{index} {title}.{ext}");
    }

    match doc.section_image_count(section) {
        Some(0 | 1) => format!("{prefix}-{document}-{section}.{ext}"),
        Some(_) => format!("{prefix}-{document}-{section}-{index}.{ext}"),
        None => {
            log::warn!(
                "Section {} not found while naming {}, keeping image index",
                section,
                image.filename
            );
            format!("{prefix}-{document}-{section}-{index}.{ext}")
        }
    }
}
