use super::request::GenerationRequest;

/// Persona sent as the system message of every completion.
pub const SYSTEM_PROMPT: &str =
    "Ты профессиональный копирайтер. Пиши строго по ТЗ, структурировано, без воды.";

/// Prefix of the follow-up request for a missing conclusion.
pub const CONCLUSION_PROMPT: &str = "Напиши короткое заключение к следующей статье:\n\n";

/// Structural guidance for a given text format.
pub fn style_hint(format: &str) -> &'static str {
    match format {
        "лонгрид" => {
            "Напиши развёрнутый лонгрид: вступление, блоки с подзаголовками, отдельное заключение. Каждый блок логически завершён."
        }
        "карточка" => {
            "Продающая карточка товара: сначала выгода, затем особенности и преимущества. Короткие абзацы, без воды."
        }
        "новость" => {
            "Новостная заметка: заголовок, короткий лид, основной текст. Чётко, фактологично, без клише."
        }
        "страница интернет-магазина" => {
            "SEO-текст для категории магазина: подзаголовки, списки, преимущества ассортимента, в конце вывод/CTA."
        }
        _ => "Тематическая статья: ввод, 2–4 смысловых раздела и отдельное заключение с выводами.",
    }
}

/// Builds the user prompt for the primary completion.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let headings = if request.use_subheadings() {
        "Используй подзаголовки в формате Markdown (## Название)."
    } else {
        "Подзаголовки по усмотрению."
    };

    [
        style_hint(request.format()).to_string(),
        format!("Тональность: {}.", request.tone()),
        headings.to_string(),
        format!("Объём: не менее {} знаков.", request.target_length()),
        format!("ТЗ: {}", request.prompt()),
    ]
    .join("\n")
}

/// Builds the follow-up prompt asking for a conclusion to `article`.
pub fn conclusion_prompt(article: &str) -> String {
    format!("{CONCLUSION_PROMPT}{article}")
}
