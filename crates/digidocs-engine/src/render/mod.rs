//! # Document Rendering
//!
//! Feeds a block sequence into a [`DocumentSink`], one append call per block,
//! followed by that block's style spans.
//!
//! A span the sink rejects is logged and skipped; only sink failures to
//! append or persist abort rendering.

pub mod rich;
pub mod title;

use serde::Serialize;

use crate::error::{RenderError, SinkError};
use crate::markup::{Block, HeadingLevel, OffsetMode, StyleSpan, StyledText, parse_blocks};

pub use rich::{BODY_SLOT, RichBlock, RichBlockKind, RichDocument, TITLE_SLOT};
pub use title::{DEFAULT_TITLE, resolve_title, sanitize_title};

/// Marker style of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListGlyph {
    Bullet,
    Number,
}

/// A persisted document as reported by the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentHandle {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Rich-text document construction collaborator.
pub trait DocumentSink {
    /// Identifies an appended block for later styling.
    type BlockId: Copy;

    fn append_heading(
        &mut self,
        level: HeadingLevel,
        text: &str,
    ) -> Result<Self::BlockId, SinkError>;
    fn append_list_item(&mut self, glyph: ListGlyph, text: &str)
    -> Result<Self::BlockId, SinkError>;
    fn append_paragraph(&mut self, text: &str) -> Result<Self::BlockId, SinkError>;
    fn append_empty_paragraph(&mut self) -> Result<Self::BlockId, SinkError>;

    /// Applies one span to the text of `block`.
    fn apply_style(&mut self, block: Self::BlockId, span: &StyleSpan) -> Result<(), RenderError>;

    /// Names and persists the document once every block is appended.
    fn finish(&mut self, name: &str) -> Result<DocumentHandle, SinkError>;
}

/// Result of a render: the persisted document and how many spans were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub document: DocumentHandle,
    pub skipped_spans: usize,
}

/// Drives a [`DocumentSink`] from raw markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRenderer {
    pub mode: OffsetMode,
}

impl DocumentRenderer {
    pub fn new(mode: OffsetMode) -> Self {
        Self { mode }
    }

    /// Parses `markdown` and puts `title` on top as a level-1 heading when the
    /// first non-blank block is not one already.
    pub fn prepare(&self, markdown: &str, title: &str) -> Vec<Block> {
        let mut blocks = parse_blocks(markdown, self.mode);

        let first = blocks.iter().find(|b| !b.is_blank());
        let has_h1 = first.and_then(Block::heading_level) == Some(HeadingLevel::TOP);
        if !has_h1 && !title.is_empty() {
            let leading_blanks = blocks.iter().take_while(|b| b.is_blank()).count();
            blocks.drain(..leading_blanks);
            blocks.insert(
                0,
                Block::Heading {
                    level: HeadingLevel::TOP,
                    content: StyledText::plain(title),
                },
            );
        }

        blocks
    }

    /// Renders `markdown` into `sink` and persists it.
    ///
    /// The document name is the sanitized title resolved from `title`, the
    /// first `# ` heading of `markdown`, or [`DEFAULT_TITLE`].
    pub fn render<S: DocumentSink>(
        &self,
        markdown: &str,
        title: Option<&str>,
        sink: &mut S,
    ) -> Result<Rendered, SinkError> {
        let name = sanitize_title(&resolve_title(title, markdown));
        let blocks = self.prepare(markdown, &name);
        log::debug!("rendering {} blocks as {name:?}", blocks.len());

        let mut skipped_spans = 0;
        for block in &blocks {
            skipped_spans += emit_block(sink, block)?;
        }
        if skipped_spans > 0 {
            log::warn!("{skipped_spans} style spans could not be applied");
        }

        let document = sink.finish(&name)?;
        Ok(Rendered {
            document,
            skipped_spans,
        })
    }
}

/// Appends one block and its spans; returns the number of rejected spans.
pub fn emit_block<S: DocumentSink>(sink: &mut S, block: &Block) -> Result<usize, SinkError> {
    let (id, content) = match block {
        Block::Heading { level, content } => (sink.append_heading(*level, &content.text)?, content),
        Block::BulletItem(content) => (
            sink.append_list_item(ListGlyph::Bullet, &content.text)?,
            content,
        ),
        Block::NumberedItem(content) => (
            sink.append_list_item(ListGlyph::Number, &content.text)?,
            content,
        ),
        Block::Paragraph(content) => (sink.append_paragraph(&content.text)?, content),
        Block::Blank => {
            sink.append_empty_paragraph()?;
            return Ok(0);
        }
    };

    let mut skipped = 0;
    for span in &content.spans {
        if let Err(e) = sink.apply_style(id, span) {
            log::warn!("Skipping {:?} span: {e}", span.kind);
            skipped += 1;
        }
    }
    Ok(skipped)
}
