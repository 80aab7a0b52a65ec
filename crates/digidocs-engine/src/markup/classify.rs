use std::sync::OnceLock;

use regex::Regex;

use super::types::HeadingLevel;

/// Block shape of a single line, before inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(HeadingLevel),
    Bullet,
    Numbered,
    Paragraph,
    Blank,
}

/// A classified line: its kind plus the markup still to be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass<'a> {
    pub kind: LineKind,
    /// Text after the block prefix (`## `, `- `, `1. `); the whole line for paragraphs.
    pub remainder: &'a str,
}

fn heading_regex() -> &'static Regex {
    static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();
    HEADING_REGEX.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("Invalid heading regex"))
}

fn bullet_regex() -> &'static Regex {
    static BULLET_REGEX: OnceLock<Regex> = OnceLock::new();
    BULLET_REGEX.get_or_init(|| Regex::new(r"^[*-]\s+(.*)$").expect("Invalid bullet regex"))
}

fn numbered_regex() -> &'static Regex {
    static NUMBERED_REGEX: OnceLock<Regex> = OnceLock::new();
    NUMBERED_REGEX.get_or_init(|| Regex::new(r"^\d+\.\s+(.*)$").expect("Invalid numbered regex"))
}

/// Classifies lines using only local facts; neighbouring lines are never consulted.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    /// Classifies an already trimmed line.
    pub fn classify<'a>(&self, line: &'a str) -> LineClass<'a> {
        if line.is_empty() {
            return LineClass {
                kind: LineKind::Blank,
                remainder: line,
            };
        }

        if let Some(caps) = heading_regex().captures(line)
            && let Some(level) = HeadingLevel::new(caps[1].len() as u8)
        {
            return LineClass {
                kind: LineKind::Heading(level),
                remainder: caps.get(2).map_or("", |m| m.as_str()),
            };
        }

        if let Some(caps) = bullet_regex().captures(line) {
            return LineClass {
                kind: LineKind::Bullet,
                remainder: caps.get(1).map_or("", |m| m.as_str()),
            };
        }

        if let Some(caps) = numbered_regex().captures(line) {
            return LineClass {
                kind: LineKind::Numbered,
                remainder: caps.get(1).map_or("", |m| m.as_str()),
            };
        }

        LineClass {
            kind: LineKind::Paragraph,
            remainder: line,
        }
    }

    /// Whether the line opens a heading.
    pub fn is_heading(&self, line: &str) -> bool {
        matches!(self.classify(line).kind, LineKind::Heading(_))
    }
}
