//! Image editor.
//!
//! An editing session draws shapes over an image, keeps a bounded snapshot
//! history for undo/redo, tracks zoom and pan, and uploads the flattened
//! result as a PNG `data:` URL. The server either replaces the original or
//! stores a copy; [`EditorSession::apply_save_result`] folds that answer back
//! into the [`crate::model::DocumentState`], which invalidates cached names.

mod data_url;
mod history;
mod session;
mod surface;
mod viewport;

pub use data_url::{DecodedImage, PNG_MIME, decode_data_url, encode_data_url};
pub use history::History;
pub use session::EditorSession;
pub use surface::{Color, DrawingObject, DrawingSurface, ObjectId, RasterSurface, Shape};
pub use viewport::{DEFAULT_MIN_ZOOM, Viewport, WHEEL_ZOOM_BASE};
