use serde::Serialize;

/// Heading depth, `1` (`#`) through `6` (`######`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const TOP: HeadingLevel = HeadingLevel(1);

    /// Returns `None` for levels outside `1..=6`.
    pub fn new(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// The style carried by a [`StyleSpan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SpanKind {
    Bold,
    Italic,
    Link { url: String },
}

/// An inline style over the character range `[start, end)` of a block's plain text.
///
/// Offsets count Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleSpan {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl StyleSpan {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Plain text with the style spans extracted from its markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyledText {
    pub text: String,
    pub spans: Vec<StyleSpan>,
}

impl StyledText {
    /// Text without any styling.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }
}

/// One structural unit of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        content: StyledText,
    },
    BulletItem(StyledText),
    NumberedItem(StyledText),
    Paragraph(StyledText),
    Blank,
}

impl Block {
    pub fn is_blank(&self) -> bool {
        matches!(self, Block::Blank)
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// The heading level, if this block is a heading.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            Block::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// The styled content of the block; `None` for blanks.
    pub fn content(&self) -> Option<&StyledText> {
        match self {
            Block::Heading { content, .. }
            | Block::BulletItem(content)
            | Block::NumberedItem(content)
            | Block::Paragraph(content) => Some(content),
            Block::Blank => None,
        }
    }

    /// The plain text of the block; empty for blanks.
    pub fn text(&self) -> &str {
        self.content().map_or("", |c| c.text.as_str())
    }
}
