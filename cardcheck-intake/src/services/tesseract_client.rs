//! Tesseract OCR client
//!
//! Extracts text from card images by shelling out to the `tesseract`
//! command-line tool. One client is created at startup and shared across
//! requests; each recognition writes its image to a uniquely named temp
//! file, so concurrent calls never collide.

use std::path::PathBuf;
use std::process::Command;

use async_trait::async_trait;

use crate::services::{OcrEngine, OcrError};

/// OCR client backed by the `tesseract` CLI
pub struct TesseractClient {
    binary_path: String,
    language: String,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractClient {
    /// Create a new Tesseract client
    ///
    /// Runs `tesseract --version` so a missing install is reported before
    /// the server starts accepting submissions.
    pub fn new(language: &str, tessdata_dir: Option<PathBuf>) -> Result<Self, OcrError> {
        Self::with_binary("tesseract", language, tessdata_dir)
    }

    fn with_binary(
        binary_path: &str,
        language: &str,
        tessdata_dir: Option<PathBuf>,
    ) -> Result<Self, OcrError> {
        match Command::new(binary_path).arg("--version").output() {
            Ok(_) => Ok(Self {
                binary_path: binary_path.to_string(),
                language: language.to_string(),
                tessdata_dir,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::BinaryNotFound),
            Err(e) => Err(OcrError::ExecutionError(e.to_string())),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractClient {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let temp_input =
            std::env::temp_dir().join(format!("cardcheck_{}.img", uuid::Uuid::new_v4()));

        tokio::fs::write(&temp_input, image).await?;

        tracing::debug!(
            image_file = %temp_input.display(),
            image_bytes = image.len(),
            language = %self.language,
            "Running Tesseract recognition"
        );

        // Spawn tesseract
        // Usage: tesseract input.img stdout -l eng [--tessdata-dir DIR]
        let output = tokio::task::spawn_blocking({
            let binary = self.binary_path.clone();
            let input = temp_input.clone();
            let language = self.language.clone();
            let tessdata_dir = self.tessdata_dir.clone();

            move || {
                let mut command = Command::new(&binary);
                command.arg(&input).arg("stdout").arg("-l").arg(&language);
                if let Some(dir) = &tessdata_dir {
                    command.arg("--tessdata-dir").arg(dir);
                }
                command.output()
            }
        })
        .await
        .map_err(|e| {
            let _ = std::fs::remove_file(&temp_input);
            OcrError::ExecutionError(format!("Task join error: {}", e))
        })?
        .map_err(|e| {
            let _ = std::fs::remove_file(&temp_input);
            OcrError::ExecutionError(e.to_string())
        })?;

        // Input file is ours to clean up on every path
        let _ = std::fs::remove_file(&temp_input);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::RecognitionFailed(format!(
                "Exit code: {:?}, stderr: {}",
                output.status.code(),
                stderr
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();

        tracing::debug!(
            image_bytes = image.len(),
            extracted_chars = text.len(),
            "Tesseract recognition completed"
        );

        Ok(text)
    }
}
