//! Provider client implementations

mod gemini;
mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
