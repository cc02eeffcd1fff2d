//! Answer synthesis trait and the default snippet-concatenation
//! implementation.
//!
//! The boundary is exactly "ordered snippets + question in → answer text
//! out". The default joins the retrieved snippets verbatim; a hosted
//! language model can be substituted behind the same trait, chosen once
//! at startup rather than branched on inside query logic.

use anyhow::Result;
use async_trait::async_trait;

/// Turns ranked snippets into answer text.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, question: &str, snippets: &[&str]) -> Result<String>;
}

/// Default synthesizer: trimmed snippets joined by a blank line, in
/// ranked order. Ignores the question.
pub struct ConcatSynthesizer;

#[async_trait]
impl Synthesizer for ConcatSynthesizer {
    async fn synthesize(&self, _question: &str, snippets: &[&str]) -> Result<String> {
        Ok(snippets
            .iter()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
