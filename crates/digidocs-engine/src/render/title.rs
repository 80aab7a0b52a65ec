use std::sync::OnceLock;

use regex::Regex;

/// Name used when neither the caller nor the text provides a title.
pub const DEFAULT_TITLE: &str = "Сгенерированная статья";

/// Longest document name handed to the sink.
pub const MAX_TITLE_CHARS: usize = 180;

fn h1_regex() -> &'static Regex {
    static H1_REGEX: OnceLock<Regex> = OnceLock::new();
    // CRLF mode: `^` also matches after a lone `\r` and `.` stops at it.
    H1_REGEX.get_or_init(|| Regex::new(r"(?mR)^#\s+(.*)").expect("Invalid h1 regex"))
}

fn newline_regex() -> &'static Regex {
    static NEWLINE_REGEX: OnceLock<Regex> = OnceLock::new();
    NEWLINE_REGEX.get_or_init(|| Regex::new(r"[\r\n]+").expect("Invalid newline regex"))
}

fn forbidden_regex() -> &'static Regex {
    static FORBIDDEN_REGEX: OnceLock<Regex> = OnceLock::new();
    FORBIDDEN_REGEX
        .get_or_init(|| Regex::new(r#"[/\\:*?"<>|#]+"#).expect("Invalid forbidden chars regex"))
}

/// Text of the first `# ` heading in raw markup.
pub fn first_h1(markdown: &str) -> Option<&str> {
    h1_regex()
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
}

/// Picks the document title: explicit title, then the first `# ` heading, then [`DEFAULT_TITLE`].
pub fn resolve_title(explicit: Option<&str>, markdown: &str) -> String {
    explicit
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| first_h1(markdown))
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

/// Makes a title safe to use as a document name.
///
/// Newline runs become a space, runs of `/ \ : * ? " < > | #` become `—`,
/// and the result is trimmed and capped at [`MAX_TITLE_CHARS`] characters.
pub fn sanitize_title(title: &str) -> String {
    let single_line = newline_regex().replace_all(title, " ");
    let safe = forbidden_regex().replace_all(&single_line, "—");
    safe.trim().chars().take(MAX_TITLE_CHARS).collect()
}
