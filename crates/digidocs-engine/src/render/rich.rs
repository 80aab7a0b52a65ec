use std::fmt::Write;

use uuid::Uuid;

use super::{DocumentHandle, DocumentSink, ListGlyph};
use crate::error::{RenderError, SinkError};
use crate::markup::{HeadingLevel, SpanKind, StyleSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RichBlockKind {
    Heading(HeadingLevel),
    ListItem(ListGlyph),
    Paragraph,
}

/// A block of the in-memory document with the styles applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichBlock {
    pub kind: RichBlockKind,
    pub text: String,
    pub styles: Vec<StyleSpan>,
}

/// Replaced by the escaped document name in a page template.
pub const TITLE_SLOT: &str = "{{title}}";
/// Replaced by the rendered blocks in a page template.
pub const BODY_SLOT: &str = "{{body}}";

/// In-memory rich-text document, exportable as HTML.
#[derive(Debug, Clone)]
pub struct RichDocument {
    id: Uuid,
    name: String,
    blocks: Vec<RichBlock>,
    template: Option<String>,
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RichDocument {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            blocks: Vec::new(),
            template: None,
        }
    }

    /// A document exported through `template`, an HTML page containing
    /// [`TITLE_SLOT`] and [`BODY_SLOT`].
    pub fn from_template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::new()
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[RichBlock] {
        &self.blocks
    }

    fn push(&mut self, kind: RichBlockKind, text: &str) -> usize {
        self.blocks.push(RichBlock {
            kind,
            text: text.to_string(),
            styles: Vec::new(),
        });
        self.blocks.len() - 1
    }

    /// Serializes the document as an HTML page: the template when one was
    /// given, a minimal standalone page otherwise.
    pub fn to_html(&self) -> String {
        let title = html_escape::encode_text(&self.name);
        let body = self.body_html();
        if let Some(template) = &self.template {
            return template
                .replace(TITLE_SLOT, &title)
                .replace(BODY_SLOT, &body);
        }

        let mut out = String::new();
        let _ = writeln!(out, "<!DOCTYPE html>");
        let _ = writeln!(out, "<html>");
        let _ = writeln!(out, "<head>");
        let _ = writeln!(out, "<meta charset=\"utf-8\">");
        let _ = writeln!(out, "<title>{title}</title>");
        let _ = writeln!(out, "</head>");
        let _ = writeln!(out, "<body>");
        out.push_str(&body);
        let _ = writeln!(out, "</body>");
        let _ = writeln!(out, "</html>");
        out
    }

    /// One line per block; consecutive list items with the same glyph share
    /// one `<ul>`/`<ol>`.
    fn body_html(&self) -> String {
        let mut out = String::new();
        let mut open_list: Option<ListGlyph> = None;
        for block in &self.blocks {
            let glyph = match block.kind {
                RichBlockKind::ListItem(glyph) => Some(glyph),
                _ => None,
            };
            if open_list != glyph {
                if let Some(prev) = open_list {
                    let _ = writeln!(out, "</{}>", list_tag(prev));
                }
                if let Some(next) = glyph {
                    let _ = writeln!(out, "<{}>", list_tag(next));
                }
                open_list = glyph;
            }

            let inner = styled_html(&block.text, &block.styles);
            let _ = match block.kind {
                RichBlockKind::Heading(level) => {
                    writeln!(out, "<h{0}>{inner}</h{0}>", level.get())
                }
                RichBlockKind::ListItem(_) => writeln!(out, "<li>{inner}</li>"),
                RichBlockKind::Paragraph => writeln!(out, "<p>{inner}</p>"),
            };
        }
        if let Some(prev) = open_list {
            let _ = writeln!(out, "</{}>", list_tag(prev));
        }
        out
    }
}

fn list_tag(glyph: ListGlyph) -> &'static str {
    match glyph {
        ListGlyph::Bullet => "ul",
        ListGlyph::Number => "ol",
    }
}

/// Escapes `text` and wraps each run of uniformly styled characters in
/// `<a>`, `<strong>` and `<em>` (outermost first).
fn styled_html(text: &str, styles: &[StyleSpan]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut bounds: Vec<usize> = vec![0, chars.len()];
    for span in styles {
        bounds.push(span.start);
        bounds.push(span.end);
    }
    bounds.sort_unstable();
    bounds.dedup();

    let mut out = String::new();
    for pair in bounds.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let run: String = chars[start..end].iter().collect();
        let active = |pred: fn(&SpanKind) -> bool| {
            styles
                .iter()
                .find(|s| s.start <= start && end <= s.end && pred(&s.kind))
        };

        let mut piece = html_escape::encode_text(&run).into_owned();
        if active(|k| matches!(k, SpanKind::Italic)).is_some() {
            piece = format!("<em>{piece}</em>");
        }
        if active(|k| matches!(k, SpanKind::Bold)).is_some() {
            piece = format!("<strong>{piece}</strong>");
        }
        if let Some(StyleSpan {
            kind: SpanKind::Link { url },
            ..
        }) = active(|k| matches!(k, SpanKind::Link { .. }))
        {
            piece = format!(
                "<a href=\"{}\">{piece}</a>",
                html_escape::encode_double_quoted_attribute(url)
            );
        }
        out.push_str(&piece);
    }
    out
}

impl DocumentSink for RichDocument {
    type BlockId = usize;

    fn append_heading(&mut self, level: HeadingLevel, text: &str) -> Result<usize, SinkError> {
        Ok(self.push(RichBlockKind::Heading(level), text))
    }

    fn append_list_item(&mut self, glyph: ListGlyph, text: &str) -> Result<usize, SinkError> {
        Ok(self.push(RichBlockKind::ListItem(glyph), text))
    }

    fn append_paragraph(&mut self, text: &str) -> Result<usize, SinkError> {
        Ok(self.push(RichBlockKind::Paragraph, text))
    }

    fn append_empty_paragraph(&mut self) -> Result<usize, SinkError> {
        Ok(self.push(RichBlockKind::Paragraph, ""))
    }

    fn apply_style(&mut self, block: usize, span: &StyleSpan) -> Result<(), RenderError> {
        let target = self
            .blocks
            .get_mut(block)
            .ok_or(RenderError::UnknownBlock { block })?;

        if span.is_empty() {
            return Err(RenderError::EmptySpan {
                start: span.start,
                end: span.end,
            });
        }
        let len = target.text.chars().count();
        if span.end > len {
            return Err(RenderError::SpanOutOfRange {
                start: span.start,
                end: span.end,
                len,
            });
        }

        target.styles.push(span.clone());
        Ok(())
    }

    fn finish(&mut self, name: &str) -> Result<DocumentHandle, SinkError> {
        self.name = name.to_string();
        Ok(DocumentHandle {
            id: self.id.to_string(),
            name: self.name.clone(),
            url: format!("memory://documents/{}", self.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span(kind: SpanKind, start: usize, end: usize) -> StyleSpan {
        StyleSpan { kind, start, end }
    }

    #[test]
    fn rejects_bad_spans() {
        let mut doc = RichDocument::new();
        let id = doc.append_paragraph("abc").unwrap();

        assert_eq!(
            doc.apply_style(id, &span(SpanKind::Bold, 2, 5)),
            Err(RenderError::SpanOutOfRange {
                start: 2,
                end: 5,
                len: 3
            })
        );
        assert_eq!(
            doc.apply_style(id, &span(SpanKind::Bold, 1, 1)),
            Err(RenderError::EmptySpan { start: 1, end: 1 })
        );
        assert_eq!(
            doc.apply_style(7, &span(SpanKind::Bold, 0, 1)),
            Err(RenderError::UnknownBlock { block: 7 })
        );
        assert!(doc.blocks()[0].styles.is_empty());
    }

    #[test]
    fn finish_names_the_document() {
        let mut doc = RichDocument::new();
        let handle = doc.finish("Отчёт").unwrap();

        assert_eq!(doc.name(), "Отчёт");
        assert_eq!(handle.id, doc.id().to_string());
        assert!(handle.url.ends_with(&handle.id));
    }

    #[test]
    fn styled_runs_nest_link_outermost() {
        let styles = vec![
            span(
                SpanKind::Link {
                    url: "https://x.y/?a=1&b=2".into(),
                },
                0,
                3,
            ),
            span(SpanKind::Bold, 0, 1),
        ];
        assert_eq!(
            styled_html("a<b rest", &styles),
            "<a href=\"https://x.y/?a=1&amp;b=2\"><strong>a</strong></a>\
             <a href=\"https://x.y/?a=1&amp;b=2\">&lt;b</a> rest"
        );
    }

    #[test]
    fn template_receives_title_and_body() {
        let mut doc = RichDocument::from_template(
            "<html><head><title>{{title}}</title></head>\n<main>\n{{body}}</main></html>\n",
        );
        doc.append_heading(HeadingLevel::TOP, "Чай & кофе").unwrap();
        doc.append_paragraph("Текст").unwrap();
        doc.finish("Чай & кофе").unwrap();

        insta::assert_snapshot!(doc.to_html().trim_end(), @r"
        <html><head><title>Чай &amp; кофе</title></head>
        <main>
        <h1>Чай &amp; кофе</h1>
        <p>Текст</p>
        </main></html>
        ");
    }

    #[test]
    fn html_groups_list_items() {
        let mut doc = RichDocument::new();
        doc.append_heading(HeadingLevel::TOP, "T").unwrap();
        doc.append_list_item(ListGlyph::Bullet, "a").unwrap();
        doc.append_list_item(ListGlyph::Bullet, "b").unwrap();
        doc.append_list_item(ListGlyph::Number, "c").unwrap();
        doc.append_empty_paragraph().unwrap();
        doc.finish("T").unwrap();

        let html = doc.to_html();
        insta::assert_snapshot!(html.trim_end(), @r#"
        <!DOCTYPE html>
        <html>
        <head>
        <meta charset="utf-8">
        <title>T</title>
        </head>
        <body>
        <h1>T</h1>
        <ul>
        <li>a</li>
        <li>b</li>
        </ul>
        <ol>
        <li>c</li>
        </ol>
        <p></p>
        </body>
        </html>
        "#);
    }
}
