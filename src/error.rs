//! Error types for DocuLens operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the backend or mutating document state.
///
/// Name resolution never produces an error; it degrades to fallback strings instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (connection refused, TLS, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status or `success: false`
    #[error("Backend error {status}: {message}")]
    Backend {
        /// HTTP status code (0 when the status was 2xx but the payload reported failure)
        status: u16,
        /// Message returned by the backend
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raster decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Archive writing error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed `data:` URL
    #[error("Invalid data URL: {message}")]
    InvalidDataUrl {
        /// Description of what is wrong with the URL
        message: String,
    },

    /// No image with this filename exists in the document
    #[error("Image not found: {filename}")]
    UnknownImage {
        /// The missing filename
        filename: String,
    },

    /// An image with this filename already exists in the document
    #[error("Image already exists: {filename}")]
    DuplicateImage {
        /// The conflicting filename
        filename: String,
    },

    /// No section matches this numbering key
    #[error("Section not found: {number}")]
    UnknownSection {
        /// The section number that was looked up
        number: String,
    },

    /// An operation that needs a selection was started with none
    #[error("No image selected")]
    NothingSelected,

    /// The AI indexing service reported itself unavailable
    #[error("AI indexing service unavailable: {0}")]
    ServiceUnavailable(String),

    /// A request of the same kind is already in flight
    #[error("Operation already in progress")]
    Busy,

    /// No document has been loaded yet
    #[error("No document loaded")]
    NoDocument,
}

impl Error {
    /// Create a backend error from a status and message.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid data URL error.
    pub fn invalid_data_url(message: impl Into<String>) -> Self {
        Self::InvalidDataUrl {
            message: message.into(),
        }
    }

    /// Create an unknown image error.
    pub fn unknown_image(filename: impl Into<String>) -> Self {
        Self::UnknownImage {
            filename: filename.into(),
        }
    }

    /// Create a duplicate image error.
    pub fn duplicate_image(filename: impl Into<String>) -> Self {
        Self::DuplicateImage {
            filename: filename.into(),
        }
    }

    /// Create an unknown section error.
    pub fn unknown_section(number: impl Into<String>) -> Self {
        Self::UnknownSection {
            number: number.into(),
        }
    }

    /// Short message suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not reach the server. Please check your connection.".to_string(),
            Self::Backend { status, .. } if *status == 0 => "The server rejected the request.".to_string(),
            Self::Backend { status, .. } => format!("Server error ({status})."),
            Self::NothingSelected => "No image selected.".to_string(),
            Self::ServiceUnavailable(_) => "AI indexing service is unavailable.".to_string(),
            Self::Busy => "Please wait for the current operation to finish.".to_string(),
            Self::NoDocument => "Load a document first.".to_string(),
            Self::UnknownImage { filename } => format!("Image '{filename}' no longer exists."),
            Self::DuplicateImage { filename } => format!("Image '{filename}' already exists."),
            Self::UnknownSection { number } => format!("Section '{number}' does not exist."),
            Self::Json(_)
            | Self::Io(_)
            | Self::Image(_)
            | Self::Zip(_)
            | Self::InvalidDataUrl { .. } => "An unexpected error occurred.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = Error::backend(500, "boom");
        assert_eq!(err.to_string(), "Backend error 500: boom");
        assert_eq!(err.user_message(), "Server error (500).");
    }

    #[test]
    fn test_user_message_for_selection() {
        assert_eq!(Error::NothingSelected.user_message(), "No image selected.");
        assert!(
            Error::unknown_image("a.jpg")
                .user_message()
                .contains("a.jpg")
        );
    }
}
