//! AI indexing workflow.
//!
//! A session walks the selected images through confirmation, batched
//! analysis and review, then writes the accepted titles into the document
//! as AI metadata. Physical filenames never change; the new titles reach
//! the user through [`crate::naming::NameResolver`].

mod session;
mod titles;

pub use session::{
    FailedAnalysis, IndexingSession, IndexingStep, RefreshHook, ServiceAvailability, Suggestion,
    check_service,
};
pub use titles::ensure_unique_titles;
