use std::sync::OnceLock;

use regex::Regex;

/// Keywords that mark a summary section heading.
pub const CONCLUSION_KEYWORDS: [&str; 4] = ["Заключение", "Вывод", "Итоги", "Резюме"];

/// Heading text used when a conclusion section has to be appended.
pub const CONCLUSION_HEADING: &str = "Заключение";

fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX.get_or_init(|| {
        let pattern = format!(r"(?i)##\s*(?:{})", CONCLUSION_KEYWORDS.join("|"));
        Regex::new(&pattern).expect("Invalid conclusion marker regex")
    })
}

/// Byte offset of the first conclusion heading marker (`##` + keyword) in `text`.
pub fn find_conclusion_marker(text: &str) -> Option<usize> {
    marker_regex().find(text).map(|m| m.start())
}

/// Whether `text` already carries a conclusion section heading.
pub fn has_conclusion(text: &str) -> bool {
    find_conclusion_marker(text).is_some()
}
