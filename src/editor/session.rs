//! Editing session for one image.

use super::data_url::{PNG_MIME, encode_data_url};
use super::history::History;
use super::surface::{DrawingObject, DrawingSurface, ObjectId};
use super::viewport::Viewport;
use crate::backend::{Backend, RequestGate, SaveImageRequest, SaveImageResponse};
use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::model::DocumentState;

/// Ties a drawing surface to its undo history and viewport.
///
/// Every change made through the session records a snapshot. Changes made
/// directly on the surface must be followed by [`EditorSession::record`].
#[derive(Debug)]
pub struct EditorSession<S: DrawingSurface> {
    filename: String,
    surface: S,
    history: History,
    viewport: Viewport,
    gate: RequestGate,
}

impl<S: DrawingSurface> EditorSession<S> {
    /// Open `filename` on `surface`. The initial state is the first snapshot.
    pub fn new(filename: impl Into<String>, surface: S, config: &EditorConfig) -> Result<Self> {
        let mut session = Self {
            filename: filename.into(),
            surface,
            history: History::new(config.history_limit),
            viewport: Viewport::new(config),
            gate: RequestGate::new(),
        };
        session.record()?;
        log::info!("🎨 Editing {}", session.filename);
        Ok(session)
    }

    /// Image being edited.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface. Call [`EditorSession::record`] afterwards.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Snapshot history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Zoom and pan state.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable zoom and pan state.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Fit the surface into a container of the given size.
    pub fn fit_to_container(&mut self, width: f32, height: f32) {
        let (image_width, image_height) = self.surface.size();
        self.viewport.fit(image_width, image_height, width, height);
    }

    /// Snapshot the current surface into the history.
    pub fn record(&mut self) -> Result<()> {
        let snapshot = self.surface.to_json()?;
        self.history.record(snapshot);
        Ok(())
    }

    /// Add an object and record the change.
    pub fn add_object(&mut self, object: DrawingObject) -> Result<ObjectId> {
        let id = self.surface.add_object(object);
        self.record()?;
        Ok(id)
    }

    /// Remove an object and record the change. Unknown ids change nothing.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Option<DrawingObject>> {
        let removed = self.surface.remove_object(id);
        if removed.is_some() {
            self.record()?;
        }
        Ok(removed)
    }

    /// Remove the topmost object under a point given in screen coordinates.
    pub fn erase_at(&mut self, screen_x: f32, screen_y: f32) -> Result<Option<DrawingObject>> {
        let (x, y) = self.viewport.to_image(screen_x, screen_y);
        match self.surface.hit_test(x, y) {
            Some(id) => self.remove_object(id),
            None => Ok(None),
        }
    }

    /// Go back one snapshot. Returns whether anything changed.
    pub fn undo(&mut self) -> Result<bool> {
        match self.history.undo() {
            Some(snapshot) => {
                self.surface.load_json(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Go forward one snapshot. Returns whether anything changed.
    pub fn redo(&mut self) -> Result<bool> {
        match self.history.redo() {
            Some(snapshot) => {
                self.surface.load_json(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether a save request is outstanding.
    pub fn is_saving(&self) -> bool {
        self.gate.is_busy()
    }

    /// Render the surface and build the upload body.
    pub fn save_request(&self, doc: &DocumentState, replace_original: bool) -> Result<SaveImageRequest> {
        let document_name = doc.document_name().ok_or(Error::NoDocument)?;
        if !doc.contains(&self.filename) {
            return Err(Error::unknown_image(&self.filename));
        }
        let png = self.surface.render_png()?;
        log::debug!("Rendered {} ({} bytes)", self.filename, png.len());

        Ok(SaveImageRequest {
            original_filename: self.filename.clone(),
            document_name: document_name.to_string(),
            edited_image_data: encode_data_url(PNG_MIME, &png),
            replace_original,
        })
    }

    /// Fold the server's answer into the document.
    ///
    /// Replace mode renames the image when the server stored it under a new
    /// name and otherwise marks it as changed. Copy mode inserts the new file
    /// right after the original. Returns the filename the edit ended up under.
    pub fn apply_save_result(
        &mut self,
        doc: &mut DocumentState,
        response: &SaveImageResponse,
        replace_original: bool,
    ) -> Result<String> {
        if response.success == Some(false) || response.filename.trim().is_empty() {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "save rejected".to_string());
            return Err(Error::backend(0, message));
        }

        if replace_original {
            if response.filename == self.filename {
                doc.touch_image(&self.filename)?;
            } else {
                doc.rename_image(&self.filename, &response.filename)?;
                self.filename = response.filename.clone();
            }
            log::info!("💾 Replaced {}", self.filename);
        } else if doc.insert_copy_after(&self.filename, &response.filename)? {
            log::info!("💾 Saved copy {} of {}", response.filename, self.filename);
        }
        Ok(response.filename.clone())
    }

    /// Upload the edit and apply the result, blocking the calling thread.
    pub fn save(
        &mut self,
        doc: &mut DocumentState,
        backend: &dyn Backend,
        replace_original: bool,
    ) -> Result<String> {
        let request = self.save_request(doc, replace_original)?;
        self.gate.begin()?;
        let response = backend.save_edited_image(&request);
        self.gate.finish();

        match response {
            Ok(response) => self.apply_save_result(doc, &response, replace_original),
            Err(e) => {
                log::error!("❌ Saving {} failed: {}", self.filename, e);
                Err(e)
            }
        }
    }
}
