//! # Article Generation
//!
//! Orchestrates one generation request:
//!
//! 1. the primary completion is requested with [`build_prompt`]
//! 2. the reply is truncated with [`enforce_length`]
//! 3. when no conclusion heading survives, a second completion is requested
//!    and appended under `## Заключение`
//! 4. the article is rendered into a [`DocumentSink`]
//!
//! Calls are strictly sequential. Any provider or sink failure aborts the
//! request; rejected style spans only produce warnings.

pub mod chat;
pub mod prompt;
pub mod request;

use crate::error::{GenerateError, ProviderError};
use crate::markup::{CONCLUSION_HEADING, OffsetMode, enforce_length, has_conclusion};
use crate::render::{DocumentRenderer, DocumentSink, Rendered};

pub use chat::{ChatMessage, ChatRequest, completion_from_response};
pub use prompt::{build_prompt, conclusion_prompt, style_hint};
pub use request::{GenerationInput, GenerationRequest, LengthInput, clamp_target_length};

/// Text-generation collaborator: prompt in, text out.
pub trait CompletionProvider {
    fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for &P {
    fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        (**self).complete(prompt, model)
    }
}

/// The outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArticle {
    /// Final article text as rendered.
    pub markdown: String,
    /// Whether a follow-up completion supplied the conclusion.
    pub conclusion_added: bool,
    pub rendered: Rendered,
}

/// Appends `conclusion` to `article` under the conclusion heading.
pub fn append_conclusion(article: &str, conclusion: &str) -> String {
    format!(
        "{}\n\n## {CONCLUSION_HEADING}\n{}",
        article.trim(),
        conclusion.trim()
    )
}

pub struct Generator<P> {
    provider: P,
    renderer: DocumentRenderer,
}

impl<P: CompletionProvider> Generator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            renderer: DocumentRenderer::default(),
        }
    }

    pub fn with_offset_mode(mut self, mode: OffsetMode) -> Self {
        self.renderer = DocumentRenderer::new(mode);
        self
    }

    /// Requests the article text, truncated and with a conclusion section.
    ///
    /// Returns the text and whether the conclusion had to be requested
    /// separately.
    pub fn compose(&self, request: &GenerationRequest) -> Result<(String, bool), ProviderError> {
        log::info!(
            "Requesting {} ({} chars) from {}",
            request.format(),
            request.target_length(),
            request.model()
        );
        let raw = self
            .provider
            .complete(&build_prompt(request), request.model())?;
        let article = enforce_length(&raw, request.target_length());

        if has_conclusion(&article) {
            return Ok((article, false));
        }

        log::info!("Article has no conclusion, requesting one");
        let extra = self
            .provider
            .complete(&conclusion_prompt(&article), request.model())?;
        Ok((append_conclusion(&article, &extra), true))
    }

    /// Composes the article and renders it into `sink`.
    pub fn generate<S: DocumentSink>(
        &self,
        request: &GenerationRequest,
        sink: &mut S,
    ) -> Result<GeneratedArticle, GenerateError> {
        let (markdown, conclusion_added) = self.compose(request)?;
        let rendered = self.renderer.render(&markdown, request.title(), sink)?;
        log::info!(
            "Created document {:?} at {}",
            rendered.document.name,
            rendered.document.url
        );

        Ok(GeneratedArticle {
            markdown,
            conclusion_added,
            rendered,
        })
    }
}
