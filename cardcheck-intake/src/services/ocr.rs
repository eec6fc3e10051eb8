//! OCR collaborator boundary
//!
//! The submission workflow only ever sees `dyn OcrEngine`. Production wires
//! in the Tesseract-backed client; tests substitute a scripted mock.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;

/// OCR engine errors
#[derive(Debug, Error)]
pub enum OcrError {
    /// Tesseract binary not found in PATH
    #[error("Tesseract binary not found in PATH")]
    BinaryNotFound,

    /// Failed to execute the OCR process
    #[error("Failed to execute OCR: {0}")]
    ExecutionError(String),

    /// OCR process ran but could not produce text
    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    /// I/O error (temp file write/read)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Best-effort text extraction from one card image.
///
/// Implementations may be slow and may return an empty string for an
/// unreadable image; both are valid outcomes. Any `Err` fails the whole
/// submission it belongs to.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// Scripted OCR engine for tests.
///
/// Returns the text paired with an exact image payload, falling back to a
/// fixed default when nothing matches. Counts recognition attempts so tests
/// can assert OCR never ran on a rejected submission.
pub struct MockOcrEngine {
    responses: Vec<(Vec<u8>, String)>,
    default_text: String,
    fail: bool,
    calls: AtomicUsize,
}

impl MockOcrEngine {
    pub fn new(default_text: &str) -> Self {
        Self {
            responses: Vec::new(),
            default_text: default_text.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Engine whose every recognition fails.
    pub fn failing() -> Self {
        Self {
            responses: Vec::new(),
            default_text: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Pair an exact image payload with the text to return for it.
    pub fn with_response(mut self, image: &[u8], text: &str) -> Self {
        self.responses.push((image.to_vec(), text.to_string()));
        self
    }

    /// Number of recognitions attempted so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(OcrError::RecognitionFailed("scripted failure".to_string()));
        }

        let text = self
            .responses
            .iter()
            .find(|(payload, _)| payload.as_slice() == image)
            .map(|(_, text)| text.clone())
            .unwrap_or_else(|| self.default_text.clone());

        Ok(text)
    }
}
