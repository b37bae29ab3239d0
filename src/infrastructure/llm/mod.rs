//! LLM integration - Streamed assistant sessions

pub mod traits;
pub mod config;
pub mod sse;
pub mod providers;


pub use traits::{ChatOptions, FragmentStream, LLMChat, LLMError, LLMMessage, LLMResult, LLM};
pub use config::LLMConfig;
pub use providers::GeminiProvider;
