use super::conclusion::find_conclusion_marker;

/// How far past the target the enforcer looks for a clean cut point.
pub const LOOKAHEAD_CHARS: usize = 400;

/// Appended when the text had to be cut outside a conclusion section.
pub const TRUNCATION_MARKER: char = '…';

const SENTENCE_END: char = '.';

/// Character count with every run of spaces and tabs counted once.
pub fn normalized_len(text: &str) -> usize {
    let mut len = 0;
    let mut in_run = false;
    for c in text.chars() {
        let is_gap = c == ' ' || c == '\t';
        if !(is_gap && in_run) {
            len += 1;
        }
        in_run = is_gap;
    }
    len
}

/// Byte offset of the `n`-th character, or `text.len()` when `text` is shorter.
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}

/// Trims `text` to roughly `target` characters.
///
/// Text whose normalized length fits is returned untouched. Otherwise the
/// first `target + LOOKAHEAD_CHARS` characters are inspected: a conclusion
/// section is kept up to the end of its first sentence, and anything else is
/// cut at the last sentence end past 80% of the target (or hard at the
/// target) and marked with [`TRUNCATION_MARKER`].
///
/// A cut result never exceeds `target + LOOKAHEAD_CHARS` characters. Text
/// returned untouched keeps all of its whitespace and may be longer.
pub fn enforce_length(text: &str, target: usize) -> String {
    if normalized_len(text) <= target {
        return text.to_string();
    }

    let window = &text[..byte_offset(text, target + LOOKAHEAD_CHARS)];

    if let Some(marker) = find_conclusion_marker(window)
        && let Some(dot) = window[marker..].find(SENTENCE_END)
    {
        let cut = marker + dot + SENTENCE_END.len_utf8();
        log::debug!("cutting after first sentence of conclusion at byte {cut}");
        return window[..cut].trim().to_string();
    }

    // Leave room for the marker inside the window.
    let searchable = &window[..byte_offset(window, target + LOOKAHEAD_CHARS - 1)];
    let cut = match searchable.rfind(SENTENCE_END) {
        Some(dot) if searchable[..dot].chars().count() * 5 > target * 4 => {
            dot + SENTENCE_END.len_utf8()
        }
        _ => byte_offset(window, target),
    };
    log::debug!("truncating to byte {cut} of {}", text.len());

    let mut out = window[..cut].trim().to_string();
    out.push(TRUNCATION_MARKER);
    out
}
