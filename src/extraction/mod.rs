pub mod client;
pub mod parser;
pub mod prompt;

pub use client::OpenAiExtractor;
pub use parser::{parse, ParseError};

use anyhow::Result;
use async_trait::async_trait;

/// Boundary to the external natural-language extraction service.
///
/// Implementations return the raw model reply verbatim; it is untrusted
/// input (free text, fenced code blocks and malformed JSON all happen) and
/// must go through [`parser::parse`] before anything downstream touches it.
#[async_trait]
pub trait AdExtractor: Send + Sync {
    async fn extract(&self, title: &str, text: &str) -> Result<String>;
}
