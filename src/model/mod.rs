//! Data models for DocuLens documents.

mod document;
mod image;
mod section;

pub use document::{DocumentState, ImageLocation, NamingContext};
pub use image::ImageRecord;
pub use section::Section;
