//! Track title generation
//!
//! Titles come from the generative text model when a key is configured,
//! falling back to the genre word banks otherwise. Every failure path
//! lands on the word banks too, so title generation never sinks a run.

use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::presets::{fallback_titles, title_prompt, GenrePreset};
use tracing::{info, warn};

/// Generates per-track titles for a run
pub struct TitleGenerator {
    gemini: Option<GeminiClient>,
}

impl TitleGenerator {
    /// Create a generator; without a client every call uses the word banks
    pub fn new(gemini: Option<GeminiClient>) -> Self {
        Self { gemini }
    }

    /// Generate exactly `count` track titles for a genre
    ///
    /// A short answer from the model is padded from the word banks and a
    /// long one is trimmed, so callers always get `count` titles back.
    pub async fn generate(&self, preset: &GenrePreset, count: usize) -> Vec<String> {
        let Some(client) = &self.gemini else {
            warn!("no generative API key configured, using word-bank titles");
            return fallback_titles(preset.key, count);
        };

        info!(genre = preset.name, count, "generating track titles");
        match self.ask_model(client, preset, count).await {
            Ok(titles) => titles,
            Err(e) => {
                warn!(error = %e, genre = preset.name, "title generation failed, using word banks");
                fallback_titles(preset.key, count)
            }
        }
    }

    async fn ask_model(
        &self,
        client: &GeminiClient,
        preset: &GenrePreset,
        count: usize,
    ) -> Result<Vec<String>> {
        let prompt = title_prompt(preset.name, preset.style, count);
        let text = client.generate_text(&prompt).await?;

        let mut titles = parse_title_lines(&text);
        if titles.len() < count {
            warn!(
                received = titles.len(),
                needed = count,
                "model returned too few titles, padding from word banks"
            );
            titles.extend(fallback_titles(preset.key, count - titles.len()));
        }
        titles.truncate(count);
        Ok(titles)
    }
}

/// One title per non-blank line, trimmed
pub(crate) fn parse_title_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
