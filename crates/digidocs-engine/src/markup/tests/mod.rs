//! Pipeline-level tests for the markup module.
//!
//! Block dumps are compared with `insta` inline snapshots.


use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::markup::{Block, HeadingLevel, OffsetMode, StyledText, parse_blocks};

fn heading(level: u8, text: &str) -> Block {
    Block::Heading {
        level: HeadingLevel::new(level).unwrap(),
        content: StyledText::plain(text),
    }
}

fn paragraph(text: &str) -> Block {
    Block::Paragraph(StyledText::plain(text))
}

#[test]
fn blank_run_before_conclusion_collapses_away() {
    let blocks = parse_blocks("Intro line\n\n\n\n## Заключение\nDone.", OffsetMode::Compatible);

    assert_eq!(
        blocks,
        vec![
            paragraph("Intro line"),
            heading(2, "Заключение"),
            paragraph("Done."),
        ]
    );
}

#[test]
fn article_snapshot() {
    let md = "# Статья\n\nВступление с **важным** словом.\n\n\n## Раздел\n\n- пункт *один*\n* пункт [два](https://example.com/2)\n\n1. первый\n2. второй\n\nКонец.";
    let blocks = parse_blocks(md, OffsetMode::Corrected);
    invariants::check(&blocks);
    invariants::check_spans_in_bounds(&blocks);

    insta::assert_snapshot!(dump::dump(&blocks), @r"
    H1 Статья
    P Вступление с важным словом. [b 13..19]
    H2 Раздел
    * пункт один [i 6..10]
    * пункт два [a https://example.com/2 6..9]
    ~
    1. первый
    1. второй
    ~
    P Конец.
    ");
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("# A\n\n\n\n# B\n\n\n\n# C")]
#[case("text\n\n\n\n\n\nmore\n\n\n")]
#[case("## H\n\n\n\n- a\n\n\n\n## H2\n\n\n")]
#[case("\r\n\r\n## H\r\n\r\nbody\r\n")]
fn block_invariants_hold(#[case] md: &str) {
    let blocks = parse_blocks(md, OffsetMode::Compatible);
    invariants::check(&blocks);
}

#[test]
fn corrected_mode_keeps_spans_in_bounds() {
    let md = "**a** [b](http://b) *c* **a** [b](http://b) *c*\n- [**x**](https://x) and *y*";
    let blocks = parse_blocks(md, OffsetMode::Corrected);
    invariants::check_spans_in_bounds(&blocks);
}

#[test]
fn headings_carry_styled_text() {
    let blocks = parse_blocks("## Про **главное**", OffsetMode::Compatible);

    let content = blocks[0].content().unwrap();
    assert_eq!(blocks[0].heading_level().map(HeadingLevel::get), Some(2));
    assert_eq!(content.text, "Про главное");
    assert_eq!(content.spans.len(), 1);
}
