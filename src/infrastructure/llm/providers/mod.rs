//! LLM Providers

pub mod gemini;

pub use gemini::GeminiProvider;
