//! AI indexing session state machine.

use std::fmt;
use std::sync::Arc;

use super::titles::ensure_unique_titles;
use crate::backend::{AnalysisResult, AnalyzeRequest, AnalyzeResponse, Backend, Pending, RequestGate, ServiceStatus};
use crate::config::IndexingConfig;
use crate::error::{Error, Result};
use crate::model::DocumentState;
use crate::naming::clean_suggested_title;

/// What the status endpoint says about the AI service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceAvailability {
    /// Configured and reachable
    Available,
    /// Configured but the last connection test failed; indexing is still allowed
    Unstable,
    /// Not configured or unreachable
    Unavailable(String),
}

impl ServiceAvailability {
    /// Whether the indexing button should be enabled.
    pub fn can_index(&self) -> bool {
        !matches!(self, ServiceAvailability::Unavailable(_))
    }

    /// Short status line for the UI.
    pub fn label(&self) -> &str {
        match self {
            ServiceAvailability::Available => "AI service available",
            ServiceAvailability::Unstable => "AI connection unstable",
            ServiceAvailability::Unavailable(message) => message,
        }
    }
}

impl From<&ServiceStatus> for ServiceAvailability {
    fn from(status: &ServiceStatus) -> Self {
        match (status.available, status.connection) {
            (true, true) => ServiceAvailability::Available,
            (true, false) => ServiceAvailability::Unstable,
            (false, _) => ServiceAvailability::Unavailable(
                status
                    .message
                    .clone()
                    .unwrap_or_else(|| "AI service unavailable".to_string()),
            ),
        }
    }
}

/// Query the status endpoint. An unreachable endpoint counts as unavailable.
pub fn check_service(backend: &dyn Backend) -> ServiceAvailability {
    match backend.status() {
        Ok(status) => ServiceAvailability::from(&status),
        Err(e) => {
            log::error!("AI status check failed: {}", e);
            ServiceAvailability::from(&ServiceStatus::unreachable())
        }
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexingStep {
    /// Waiting for the user to confirm sending images out
    Confirmation,
    /// Batches are being analysed
    Processing {
        /// Images analysed so far
        processed: usize,
        /// Images selected
        total: usize,
    },
    /// Suggestions are ready for review
    Results,
    /// Suggestions were written to the document
    Applied {
        /// Number of images that received metadata
        count: usize,
    },
    /// A batch failed; earlier batches are kept
    Failed(String),
}

/// A reviewed AI title for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Image the title is for
    pub filename: String,
    /// Title, editable by the user
    pub title: String,
    /// Tags returned with the title
    pub tags: Vec<String>,
    /// Whether the suggestion will be applied
    pub selected: bool,
}

/// An image the AI could not analyse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAnalysis {
    /// Image that failed
    pub filename: String,
    /// Reason reported by the server
    pub error: String,
}

/// Callback run after suggestions are applied, with the number applied.
pub type RefreshHook = Box<dyn FnMut(usize)>;

/// One run of the AI indexing workflow over a selection of images.
///
/// The session does not talk to the network itself. The caller asks for the
/// next request, sends it (blocking via [`IndexingSession::run`] or off-thread
/// via [`IndexingSession::spawn_batch`]) and feeds the response back with
/// [`IndexingSession::record_batch`].
pub struct IndexingSession {
    document_name: String,
    selection: Vec<String>,
    batch_size: usize,
    existing_titles: Vec<String>,
    step: IndexingStep,
    cursor: usize,
    in_flight: Option<usize>,
    gate: RequestGate,
    raw_results: Vec<AnalysisResult>,
    suggestions: Vec<Suggestion>,
    failures: Vec<FailedAnalysis>,
    on_applied: Option<RefreshHook>,
}

impl fmt::Debug for IndexingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexingSession")
            .field("document_name", &self.document_name)
            .field("selection", &self.selection.len())
            .field("step", &self.step)
            .field("suggestions", &self.suggestions.len())
            .field("failures", &self.failures.len())
            .finish_non_exhaustive()
    }
}

impl IndexingSession {
    /// Prepare a session for the selected filenames.
    ///
    /// Filenames that are not in the document are dropped.
    pub fn new(doc: &DocumentState, selection: Vec<String>, config: &IndexingConfig) -> Result<Self> {
        let document_name = doc.document_name().ok_or(Error::NoDocument)?.to_string();

        let selection: Vec<String> = selection
            .into_iter()
            .filter(|filename| {
                let known = doc.contains(filename);
                if !known {
                    log::warn!("Ignoring unknown image in selection: {}", filename);
                }
                known
            })
            .collect();
        if selection.is_empty() {
            return Err(Error::NothingSelected);
        }

        Ok(Self {
            document_name,
            selection,
            batch_size: config.batch_size.max(1),
            existing_titles: doc.ai_names().into_iter().map(str::to_string).collect(),
            step: IndexingStep::Confirmation,
            cursor: 0,
            in_flight: None,
            gate: RequestGate::new(),
            raw_results: Vec::new(),
            suggestions: Vec::new(),
            failures: Vec::new(),
            on_applied: None,
        })
    }

    /// Register a callback run after suggestions are applied.
    pub fn with_refresh_hook(mut self, hook: impl FnMut(usize) + 'static) -> Self {
        self.on_applied = Some(Box::new(hook));
        self
    }

    /// Current step.
    pub fn step(&self) -> &IndexingStep {
        &self.step
    }

    /// Images selected for analysis.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Whether a batch request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Progress through the selection, 0 to 100.
    pub fn progress_percent(&self) -> u8 {
        let total = self.selection.len();
        if total == 0 {
            return 100;
        }
        let percent = (self.cursor as f64 / total as f64 * 100.0).round();
        percent.clamp(0.0, 100.0) as u8
    }

    /// Leave the confirmation step. Refused when the service is unavailable.
    pub fn confirm(&mut self, availability: &ServiceAvailability) -> Result<()> {
        if let ServiceAvailability::Unavailable(message) = availability {
            return Err(Error::ServiceUnavailable(message.clone()));
        }
        if self.step != IndexingStep::Confirmation {
            return Err(Error::Busy);
        }
        log::info!(
            "🧠 Indexing {} image(s) of {}",
            self.selection.len(),
            self.document_name
        );
        self.step = IndexingStep::Processing {
            processed: 0,
            total: self.selection.len(),
        };
        Ok(())
    }

    /// The next batch to send, or `None` when nothing is left to send.
    pub fn next_request(&self) -> Option<AnalyzeRequest> {
        if !matches!(self.step, IndexingStep::Processing { .. }) || self.in_flight.is_some() {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(self.selection.len());
        if self.cursor >= end {
            return None;
        }
        Some(AnalyzeRequest {
            images: self.selection[self.cursor..end].to_vec(),
            document_name: self.document_name.clone(),
        })
    }

    /// Send the next batch on a worker thread.
    pub fn spawn_batch(&mut self, backend: Arc<dyn Backend>) -> Result<Option<Pending<AnalyzeResponse>>> {
        let Some(request) = self.next_request() else {
            return Ok(None);
        };
        self.gate.begin()?;
        self.in_flight = Some(request.images.len());
        Ok(Some(Pending::spawn("ai-analyze", move || {
            backend.analyze(&request)
        })))
    }

    /// Feed back the response for the batch returned by the last
    /// [`IndexingSession::next_request`].
    ///
    /// On failure the session moves to [`IndexingStep::Failed`], keeps earlier
    /// results and returns the error.
    pub fn record_batch(&mut self, response: Result<AnalyzeResponse>) -> Result<()> {
        let batch_len = match self.in_flight.take() {
            Some(len) => len,
            None => self
                .next_request()
                .map(|request| request.images.len())
                .unwrap_or(0),
        };
        self.gate.finish();

        if !matches!(self.step, IndexingStep::Processing { .. }) {
            log::warn!("Ignoring analysis response outside of processing ({:?})", self.step);
            return Ok(());
        }

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                log::error!("❌ AI analysis batch failed: {}", e);
                self.step = IndexingStep::Failed(e.user_message());
                return Err(e);
            }
        };
        if !response.success {
            let message = response
                .error
                .unwrap_or_else(|| "Invalid API response".to_string());
            log::error!("❌ AI analysis batch rejected: {}", message);
            self.step = IndexingStep::Failed(message.clone());
            return Err(Error::backend(0, message));
        }

        self.raw_results.extend(response.results);
        self.cursor = (self.cursor + batch_len).min(self.selection.len());
        log::info!(
            "AI analysis progress: {}% ({}/{})",
            self.progress_percent(),
            self.cursor,
            self.selection.len()
        );

        if self.cursor >= self.selection.len() {
            self.finish_processing();
        } else {
            self.step = IndexingStep::Processing {
                processed: self.cursor,
                total: self.selection.len(),
            };
        }
        Ok(())
    }

    /// Analyse every remaining batch on the calling thread.
    pub fn run(&mut self, backend: &dyn Backend) -> Result<()> {
        while let Some(request) = self.next_request() {
            self.in_flight = Some(request.images.len());
            let response = backend.analyze(&request);
            self.record_batch(response)?;
        }
        Ok(())
    }

    fn finish_processing(&mut self) {
        let existing: Vec<&str> = self.existing_titles.iter().map(String::as_str).collect();
        let results = ensure_unique_titles(std::mem::take(&mut self.raw_results), &existing);

        for result in results {
            if result.is_success() {
                let title = result.suggested_title().unwrap_or_default().to_string();
                self.suggestions.push(Suggestion {
                    filename: result.filename,
                    title,
                    tags: result.tags,
                    selected: true,
                });
            } else {
                self.failures.push(FailedAnalysis {
                    filename: result.filename,
                    error: result
                        .error
                        .unwrap_or_else(|| "No title returned".to_string()),
                });
            }
        }
        log::info!(
            "✅ Analysis finished: {}/{} images with suggestions",
            self.suggestions.len(),
            self.selection.len()
        );
        self.step = IndexingStep::Results;
    }

    /// Suggestions ready for review.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Images the AI could not analyse.
    pub fn failures(&self) -> &[FailedAnalysis] {
        &self.failures
    }

    /// Select every suggestion.
    pub fn select_all(&mut self) {
        self.suggestions.iter_mut().for_each(|s| s.selected = true);
    }

    /// Deselect every suggestion.
    pub fn unselect_all(&mut self) {
        self.suggestions.iter_mut().for_each(|s| s.selected = false);
    }

    /// Flip the selection of one suggestion. Returns the new state.
    pub fn toggle(&mut self, filename: &str) -> Option<bool> {
        let suggestion = self.suggestions.iter_mut().find(|s| s.filename == filename)?;
        suggestion.selected = !suggestion.selected;
        Some(suggestion.selected)
    }

    /// Replace the title of one suggestion.
    pub fn edit_title(&mut self, filename: &str, title: impl Into<String>) -> Result<()> {
        let suggestion = self
            .suggestions
            .iter_mut()
            .find(|s| s.filename == filename)
            .ok_or_else(|| Error::unknown_image(filename))?;
        suggestion.title = title.into();
        Ok(())
    }

    /// Write the selected suggestions into the document as AI metadata.
    ///
    /// Physical filenames are not touched. Suggestions whose image vanished
    /// in the meantime are skipped; what was applied stays applied.
    pub fn apply(&mut self, doc: &mut DocumentState) -> Result<usize> {
        let selected: Vec<&Suggestion> = self.suggestions.iter().filter(|s| s.selected).collect();
        if selected.is_empty() {
            return Err(Error::NothingSelected);
        }

        let mut applied = 0;
        let mut last_error = None;
        for suggestion in selected {
            let title = clean_suggested_title(&suggestion.title);
            if title.is_empty() {
                log::warn!("Skipping empty title for {}", suggestion.filename);
                continue;
            }
            match doc.apply_ai_metadata(&suggestion.filename, title, suggestion.tags.clone()) {
                Ok(()) => applied += 1,
                Err(e) => {
                    log::warn!("Could not apply suggestion to {}: {}", suggestion.filename, e);
                    last_error = Some(e);
                }
            }
        }

        if applied == 0 {
            return Err(last_error.unwrap_or(Error::NothingSelected));
        }

        log::info!("🏷️ Applied {} AI suggestion(s)", applied);
        self.step = IndexingStep::Applied { count: applied };
        if let Some(hook) = self.on_applied.as_mut() {
            hook(applied);
        }
        Ok(applied)
    }
}
