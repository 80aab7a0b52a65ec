//! # Markup Pipeline
//!
//! Turns model-generated Markdown-flavoured text into an ordered list of
//! [`Block`]s. Only a narrow dialect is recognised: `#`–`######` headings,
//! `*`/`-` bullets, `N.` numbered items, `**bold**`, `*italic*` and
//! `[label](https://…)` links.
//!
//! ## Stages
//!
//! 1. **Length** (`length`): optional truncation to a target size, keeping a
//!    conclusion section intact where possible
//! 2. **Normalization** (`normalize`): line splitting, blank-run collapsing and
//!    removal of blanks adjacent to headings
//! 3. **Classification** (`classify`): each line becomes a heading, list item,
//!    paragraph or blank
//! 4. **Inline styling** (`inline`): markup is stripped and recorded as spans
//!
//! Every stage is a pure function over owned strings; nothing here performs
//! I/O or fails.

pub mod classify;
pub mod conclusion;
pub mod inline;
pub mod length;
pub mod normalize;
pub mod types;

#[cfg(test)]
mod tests;

pub use classify::{LineClass, LineKind, MarkdownLineClassifier};
pub use conclusion::{CONCLUSION_HEADING, CONCLUSION_KEYWORDS, has_conclusion};
pub use inline::{InlineStyler, OffsetMode, style_line};
pub use length::enforce_length;
pub use normalize::normalize_lines;
pub use types::{Block, HeadingLevel, SpanKind, StyleSpan, StyledText};

/// Builds the block for one already trimmed line.
pub fn line_to_block(line: &str, styler: &InlineStyler) -> Block {
    let class = MarkdownLineClassifier.classify(line);
    match class.kind {
        LineKind::Blank => Block::Blank,
        LineKind::Heading(level) => Block::Heading {
            level,
            content: styler.style(class.remainder),
        },
        LineKind::Bullet => Block::BulletItem(styler.style(class.remainder)),
        LineKind::Numbered => Block::NumberedItem(styler.style(class.remainder)),
        LineKind::Paragraph => Block::Paragraph(styler.style(class.remainder)),
    }
}

/// Parses raw text into its normalized block sequence.
pub fn parse_blocks(text: &str, mode: OffsetMode) -> Vec<Block> {
    let styler = InlineStyler::new(mode);
    normalize_lines(text)
        .iter()
        .map(|line| line_to_block(line, &styler))
        .collect()
}
