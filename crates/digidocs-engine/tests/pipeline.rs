use std::cell::{Cell, RefCell};
use std::time::Duration;

use digidocs_engine::error::{ProviderError, UniquenessError};
use digidocs_engine::generate::{CompletionProvider, GenerationInput, GenerationRequest, Generator};
use digidocs_engine::markup::{
    Block, HeadingLevel, OffsetMode, SpanKind, StyledText, enforce_length, parse_blocks,
    style_line,
};
use digidocs_engine::render::{DocumentRenderer, RichBlockKind, RichDocument};
use digidocs_engine::settings::{MemorySettings, OPENROUTER_MODEL};
use digidocs_engine::uniqueness::{Sleeper, StatusReply, UniquenessService, check_uniqueness};
use pretty_assertions::assert_eq;

#[test]
fn fixture_article() {
    assert_fixture("article");
}

#[test]
fn fixture_titled_crlf() {
    assert_fixture("titled_crlf");
}

fn assert_fixture(name: &str) {
    let dir = format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{dir}/{name}.md")).unwrap();
    let expected = std::fs::read_to_string(format!("{dir}/{name}.html")).unwrap();

    let mut doc = RichDocument::new();
    let rendered = DocumentRenderer::default()
        .render(&md, None, &mut doc)
        .unwrap();

    assert_eq!(rendered.skipped_spans, 0);
    assert_eq!(doc.to_html(), expected);
}

#[test]
fn blank_runs_before_conclusion_collapse() {
    let blocks = parse_blocks("Intro line\n\n\n\n## Заключение\nDone.", OffsetMode::default());

    assert_eq!(
        blocks,
        vec![
            Block::Paragraph(StyledText::plain("Intro line")),
            Block::Heading {
                level: HeadingLevel::new(2).unwrap(),
                content: StyledText::plain("Заключение"),
            },
            Block::Paragraph(StyledText::plain("Done.")),
        ]
    );
}

#[test]
fn mixed_inline_markup_yields_one_span_per_kind() {
    for mode in [OffsetMode::Compatible, OffsetMode::Corrected] {
        let styled = style_line("**bold** and *italic* and [x](http://a)", mode);

        assert_eq!(styled.text, "bold and italic and x");
        let count = |pred: fn(&SpanKind) -> bool| styled.spans.iter().filter(|s| pred(&s.kind)).count();
        assert_eq!(count(|k| matches!(k, SpanKind::Bold)), 1);
        assert_eq!(count(|k| matches!(k, SpanKind::Italic)), 1);
        assert!(
            styled
                .spans
                .iter()
                .any(|s| s.kind == SpanKind::Link { url: "http://a".into() })
        );
    }
}

#[test]
fn short_text_passes_length_enforcement_untouched() {
    let text = "Короткий   текст.\n\n## Итоги\nВсё.";
    assert_eq!(enforce_length(text, 300), text);
}

/// Returns a long article without a conclusion, then a conclusion.
struct TwoStepProvider {
    calls: Cell<usize>,
    models: RefCell<Vec<String>>,
}

impl CompletionProvider for TwoStepProvider {
    fn complete(&self, _prompt: &str, model: &str) -> Result<String, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        self.models.borrow_mut().push(model.to_string());
        Ok(match self.calls.get() {
            1 => "Предложение номер. ".repeat(200),
            _ => "Итог.".to_string(),
        })
    }
}

#[test]
fn generation_truncates_patches_and_renders() {
    let input: GenerationInput =
        serde_json::from_str(r#"{"prompt":"Тест","length":"100"}"#).unwrap();
    let settings = MemorySettings::new().with(OPENROUTER_MODEL, "stored");
    let request = GenerationRequest::from_input(Some(&input), &settings).unwrap();
    assert_eq!(request.target_length(), 300);

    let provider = TwoStepProvider {
        calls: Cell::new(0),
        models: RefCell::new(Vec::new()),
    };
    let mut doc = RichDocument::new();
    let article = Generator::new(&provider)
        .generate(&request, &mut doc)
        .unwrap();

    assert!(article.conclusion_added);
    assert_eq!(*provider.models.borrow(), vec!["stored", "stored"]);
    assert!(article.markdown.ends_with(".…\n\n## Заключение\nИтог."));
    assert_eq!(article.rendered.document.name, "Сгенерированная статья");

    let kinds: Vec<_> = doc.blocks().iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RichBlockKind::Heading(HeadingLevel::TOP),
            RichBlockKind::Paragraph,
            RichBlockKind::Heading(HeadingLevel::new(2).unwrap()),
            RichBlockKind::Paragraph,
        ]
    );
}

struct InstantService;

impl UniquenessService for InstantService {
    fn submit(&self, _text: &str) -> Result<String, UniquenessError> {
        Ok("t-1".into())
    }

    fn status(&self, _uid: &str) -> Result<StatusReply, UniquenessError> {
        Ok(StatusReply::Checked {
            unique: "73.456".into(),
        })
    }
}

struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

#[test]
fn uniqueness_report_lands_in_the_document() {
    let mut doc = RichDocument::new();
    DocumentRenderer::default()
        .render(&"Текст для проверки. ".repeat(15), Some("Статья"), &mut doc)
        .unwrap();
    let before = doc.blocks().len();

    let text: Vec<&str> = doc.blocks().iter().map(|b| b.text.as_str()).collect();
    let report = check_uniqueness(&InstantService, &NoSleep, &text.join("\n")).unwrap();
    report.append_to(&mut doc).unwrap();

    assert_eq!(doc.blocks().len(), before + 3);
    assert_eq!(
        doc.blocks()[before + 1].text,
        "✅ Уникальность текста: 73.46%"
    );
    assert_eq!(report.report_url(), "https://text.ru/antiplagiat/t-1");
}
