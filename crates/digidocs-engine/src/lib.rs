pub mod error;
pub mod generate;
pub mod markup;
pub mod render;
pub mod settings;
pub mod uniqueness;

// Re-export key types for easier usage
pub use error::*;
pub use generate::{
    CompletionProvider, GeneratedArticle, GenerationInput, GenerationRequest, Generator,
};
pub use markup::{
    Block, HeadingLevel, OffsetMode, SpanKind, StyleSpan, StyledText, enforce_length,
    has_conclusion, parse_blocks, style_line,
};
pub use render::{DocumentHandle, DocumentRenderer, DocumentSink, ListGlyph, RichDocument};
pub use settings::{MemorySettings, SettingsStore};
pub use uniqueness::{
    Sleeper, ThreadSleeper, UniquenessReport, UniquenessService, check_uniqueness,
};
