//! DocuLens client core
//!
//! Document images extracted from a PDF are grouped into numbered sections.
//! This crate holds the client-side state of that workflow: the document
//! model, display and export name resolution with caching, the AI indexing
//! session, the image editor session, dialogs and notifications, and the
//! custom ZIP export.

pub mod backend;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod indexing;
pub mod modal;
pub mod model;
pub mod naming;

pub use error::{Error, Result};
