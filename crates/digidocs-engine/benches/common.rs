// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_article(sections: usize) -> String {
    let mut content = String::from("# Заголовок статьи\n\nВступление с **важной** мыслью.\n\n");

    for section in 0..sections {
        content.push_str(&format!("## Раздел {section}\n\n"));
        content.push_str(
            "Абзац с *курсивом*, **жирным** текстом и [ссылкой](https://example.com/page). \
             Ещё одно предложение для объёма.\n\n",
        );
        for item in 0..3 {
            content.push_str(&format!("- Пункт {item} с **акцентом**\n"));
        }
        content.push('\n');
        content.push_str("1. Первый шаг\n2. Второй шаг\n\n\n\n");
    }

    content.push_str("## Заключение\nИтоговый вывод статьи.\n");
    content
}

#[allow(dead_code)]
pub fn generate_styled_line(repeats: usize) -> String {
    "**bold** and *italic* and [link](https://example.com) ".repeat(repeats)
}
