//! AI provider implementations.

pub mod gemini;

pub use gemini::GeminiAI;
