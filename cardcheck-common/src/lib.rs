//! # cardcheck common library
//!
//! Shared classification core for the cardcheck services:
//! - Text normalization of raw OCR output
//! - Lexical plan-type classification and eligibility rules
//!
//! Everything here is pure computation with no I/O, so the same card text
//! always produces the same result. The only source of nondeterminism in the
//! system is the OCR output itself, which is handled upstream in
//! cardcheck-intake.

pub mod normalize;
pub mod plan;

pub use normalize::NormalizedText;
pub use plan::{classify, classify_raw, ClassificationResult, PlanType};
