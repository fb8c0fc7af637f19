//! Backend HTTP contract.
//!
//! The server owns image storage and AI analysis. This module describes the
//! three calls the client makes, a [`Backend`] trait so workflows can be
//! driven by any implementation (tests use an in-memory one), a blocking HTTP
//! client, and [`Pending`] to run calls off the event-loop thread.

mod http;
mod pending;
mod types;

pub use http::HttpBackend;
pub use pending::{Pending, RequestGate};
pub use types::{
    AnalysisResult, AnalyzeRequest, AnalyzeResponse, SaveImageRequest, SaveImageResponse,
    ServiceStatus,
};

use crate::error::Result;

/// Calls the client makes against the server.
pub trait Backend: Send + Sync {
    /// `GET /api/ai-indexing/status`
    fn status(&self) -> Result<ServiceStatus>;

    /// `POST /api/ai-indexing/analyze`
    fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse>;

    /// `POST /api/save-edited-image`
    fn save_edited_image(&self, request: &SaveImageRequest) -> Result<SaveImageResponse>;
}
