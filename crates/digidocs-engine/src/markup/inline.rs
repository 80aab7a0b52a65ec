//! # Inline Styling
//!
//! Extracts links, bold and italic runs from one line of markup, producing
//! the bare text plus [`StyleSpan`]s.
//!
//! ## Pass Order
//!
//! Three passes run in a fixed order, each consuming the previous pass's
//! output: links `[label](https://…)`, then bold `**text**`, then italic
//! `*text*`. A link label may therefore still pick up emphasis.
//!
//! ## Offset Modes
//!
//! - [`OffsetMode::Compatible`] reproduces the legacy rewrite: each match is
//!   located by the *first occurrence* of its markup in the current string,
//!   a pass resumes searching where the previous match ended in the string
//!   as it was *before* that replacement, and earlier spans are never
//!   shifted by later passes. Identical runs on one line can have their style
//!   attributed to the wrong occurrence, and the resulting offsets may point
//!   past the final text.
//! - [`OffsetMode::Corrected`] replaces every match positionally and remaps
//!   earlier spans through later removals, so every offset indexes the final
//!   text. Spans come back sorted by start.
//!
//! Mixed delimiters such as `*a **b* c**` yield whatever span set the pass
//! order produces; no attempt is made to pick a "correct" parse.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::types::{SpanKind, StyleSpan, StyledText};

/// How span offsets are resolved while markup is stripped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetMode {
    /// First-occurrence lookup, matching the legacy output byte for byte.
    #[default]
    Compatible,
    /// Positional tracking against the final text.
    Corrected,
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Link,
    Bold,
    Italic,
}

impl Pass {
    const ORDER: [Pass; 3] = [Pass::Link, Pass::Bold, Pass::Italic];

    fn regex(self) -> &'static Regex {
        static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
        static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
        static ITALIC_REGEX: OnceLock<Regex> = OnceLock::new();

        match self {
            Pass::Link => LINK_REGEX.get_or_init(|| {
                Regex::new(r"\[([^\]]+)\]\((https?://[^\s)]+)\)").expect("Invalid link regex")
            }),
            Pass::Bold => BOLD_REGEX
                .get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex")),
            // A lone `*` (not followed by another `*`) up to the next `*`.
            Pass::Italic => ITALIC_REGEX
                .get_or_init(|| Regex::new(r"\*([^*].*?)\*").expect("Invalid italic regex")),
        }
    }

    fn kind(self, caps: &Captures<'_>) -> SpanKind {
        match self {
            Pass::Link => SpanKind::Link {
                url: caps.get(2).map_or_else(String::new, |m| m.as_str().to_string()),
            },
            Pass::Bold => SpanKind::Bold,
            Pass::Italic => SpanKind::Italic,
        }
    }
}

/// Strips inline markup from single lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStyler {
    pub mode: OffsetMode,
}

impl InlineStyler {
    pub fn new(mode: OffsetMode) -> Self {
        Self { mode }
    }

    /// Returns the line's plain text and its style spans.
    pub fn style(&self, line: &str) -> StyledText {
        match self.mode {
            OffsetMode::Compatible => style_compatible(line),
            OffsetMode::Corrected => style_corrected(line),
        }
    }
}

/// Styles a line with the given offset mode.
pub fn style_line(line: &str, mode: OffsetMode) -> StyledText {
    InlineStyler::new(mode).style(line)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of char index `n`; `None` once `n` runs past the end.
fn byte_at(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    match s.char_indices().nth(n) {
        Some((i, _)) => Some(i),
        None if char_len(s) == n => Some(s.len()),
        None => None,
    }
}

fn style_compatible(line: &str) -> StyledText {
    let mut plain = line.to_string();
    let mut spans = Vec::new();

    for pass in Pass::ORDER {
        let re = pass.regex();
        // Char index into the string as it was before the last replacement.
        let mut resume = 0;

        loop {
            let Some(from) = byte_at(&plain, resume) else {
                break;
            };
            let Some(caps) = re.captures_at(&plain, from) else {
                break;
            };

            let markup = caps[0].to_string();
            let inner = caps[1].to_string();
            let kind = pass.kind(&caps);
            let matched_end = caps.get(0).map_or(plain.len(), |m| m.end());
            resume = char_len(&plain[..matched_end]);

            let first = plain.find(&markup).unwrap_or(0);
            let start = char_len(&plain[..first]);
            spans.push(StyleSpan {
                kind,
                start,
                end: start + char_len(&inner),
            });

            plain = plain.replacen(&markup, &inner, 1);
        }
    }

    StyledText { text: plain, spans }
}

/// Char position `pos` after deleting the (sorted, disjoint) char ranges in `removed`.
fn shift(pos: usize, removed: &[(usize, usize)]) -> usize {
    let gone: usize = removed
        .iter()
        .map(|&(start, end)| end.min(pos).saturating_sub(start))
        .sum();
    pos - gone
}

fn style_corrected(line: &str) -> StyledText {
    let mut plain = line.to_string();
    let mut spans: Vec<StyleSpan> = Vec::new();

    for pass in Pass::ORDER {
        let mut out = String::with_capacity(plain.len());
        let mut removed = Vec::new();
        let mut added = Vec::new();
        let mut copied_to = 0;
        let mut in_pos = 0;
        let mut out_pos = 0;

        for caps in pass.regex().captures_iter(&plain) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let gap = char_len(&plain[copied_to..whole.start()]);
            out.push_str(&plain[copied_to..whole.start()]);
            in_pos += gap;
            out_pos += gap;

            let open = char_len(&plain[whole.start()..inner.start()]);
            let inner_len = char_len(inner.as_str());
            let close = char_len(&plain[inner.end()..whole.end()]);
            removed.push((in_pos, in_pos + open));
            removed.push((in_pos + open + inner_len, in_pos + open + inner_len + close));
            in_pos += open + inner_len + close;

            added.push(StyleSpan {
                kind: pass.kind(&caps),
                start: out_pos,
                end: out_pos + inner_len,
            });
            out.push_str(inner.as_str());
            out_pos += inner_len;
            copied_to = whole.end();
        }
        out.push_str(&plain[copied_to..]);

        for span in &mut spans {
            span.start = shift(span.start, &removed);
            span.end = shift(span.end, &removed);
        }
        spans.extend(added);
        plain = out;
    }

    spans.sort_by_key(|s| s.start);
    StyledText { text: plain, spans }
}
