use super::classify::MarkdownLineClassifier;

/// Splits raw text into trimmed lines, collapsing blank runs to a single blank.
///
/// `\r\n` and lone `\r` count as line breaks.
pub fn source_lines(text: &str) -> Vec<String> {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();
    for line in unified.split('\n').map(str::trim) {
        if line.is_empty() && lines.last().is_some_and(|prev| prev.is_empty()) {
            continue;
        }
        lines.push(line.to_string());
    }
    lines
}

/// Produces the canonical line sequence for rendering.
///
/// A single left-to-right pass over [`source_lines`]: a blank directly above
/// a heading is dropped, and one blank directly below a heading is skipped.
/// Lines are never reordered and every other blank survives. The output is a
/// fixed point: normalizing it again changes nothing.
pub fn normalize_lines(text: &str) -> Vec<String> {
    let classifier = MarkdownLineClassifier;
    let source = source_lines(text);
    let mut cleaned: Vec<String> = Vec::with_capacity(source.len());

    let mut lines = source.into_iter().peekable();
    while let Some(line) = lines.next() {
        let heading = classifier.is_heading(&line);
        if heading && cleaned.last().is_some_and(String::is_empty) {
            cleaned.pop();
        }
        cleaned.push(line);
        if heading {
            lines.next_if(String::is_empty);
        }
    }

    cleaned
}
