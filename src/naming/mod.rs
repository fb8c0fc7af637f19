//! Image name resolution.
//!
//! Images keep their physical filename forever. What the user sees, and what
//! ends up in the export archive, is derived on demand from the image's AI
//! metadata, its section and the document naming configuration:
//!
//! | Image | Display | Export |
//! |-------|---------|--------|
//! | AI-named | cleaned title | `{prefix}-{doc}-{section}-{index} {title}.{ext}` |
//! | standard, alone in section | empty | `{prefix}-{doc}-{section}.{ext}` |
//! | standard, with siblings | empty | `{prefix}-{doc}-{section}-{index}.{ext}` |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use doculens::naming::{NameContext, NameResolver};
//!
//! let mut resolver = NameResolver::new();
//! let name = resolver.resolve_name(&doc, Some(&image), NameContext::Export, Some("2.1"), Some(1));
//! ```

mod clean;
mod resolver;

#[cfg(test)]
mod tests;

pub use clean::{
    DEFAULT_EXTENSION, FORBIDDEN_CHARS, MAX_TITLE_LEN, RASTER_EXTENSIONS, clean_display_name,
    clean_for_export, clean_suggested_title, export_fallback, extract_extension,
};
pub use resolver::{InvalidationHook, NameContext, NameResolver, ResolverDiagnostics};
