//! External collaborators for the intake service
//!
//! The only collaborator is the OCR engine: a trait seam with a
//! Tesseract-CLI production implementation and a scripted mock for tests.

pub mod ocr;
pub mod tesseract_client;

pub use ocr::{MockOcrEngine, OcrEngine, OcrError};
pub use tesseract_client::TesseractClient;
