use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::settings::{SettingsStore, default_model};

pub const MIN_TARGET_LENGTH: usize = 300;
pub const MAX_TARGET_LENGTH: usize = 20_000;
pub const DEFAULT_TARGET_LENGTH: usize = 1500;
pub const DEFAULT_FORMAT: &str = "статья";
pub const DEFAULT_TONE: &str = "информативный";

/// A length as submitted by a form: either a number or free text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LengthInput {
    Number(f64),
    Text(String),
}

impl LengthInput {
    /// Leading integer of the value, if it has one.
    fn leading_integer(&self) -> Option<i64> {
        match self {
            LengthInput::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            LengthInput::Number(_) => None,
            LengthInput::Text(s) => parse_leading_integer(s),
        }
    }
}

/// Parses an optional sign followed by digits, ignoring leading whitespace and
/// anything after the digits. Digit runs too long for `i64` saturate.
fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Loosely typed generation parameters as submitted by a caller.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationInput {
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub format: Option<String>,
    pub tone: Option<String>,
    pub length: Option<LengthInput>,
    pub use_subheadings: Option<bool>,
    pub title: Option<String>,
}

/// Validated, immutable generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    prompt: String,
    model: String,
    format: String,
    tone: String,
    target_length: usize,
    use_subheadings: bool,
    title: String,
}

/// Clamps a requested length into the supported range.
pub fn clamp_target_length(length: i64) -> usize {
    length.clamp(MIN_TARGET_LENGTH as i64, MAX_TARGET_LENGTH as i64) as usize
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl GenerationRequest {
    /// A request with default format, tone and length.
    pub fn new(prompt: &str, model: &str) -> Result<Self, InputError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(InputError::EmptyPrompt);
        }
        Ok(Self {
            prompt: prompt.to_string(),
            model: model.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            tone: DEFAULT_TONE.to_string(),
            target_length: DEFAULT_TARGET_LENGTH,
            use_subheadings: true,
            title: String::new(),
        })
    }

    /// Validates caller input, filling gaps from `settings`.
    ///
    /// A missing or unparseable length (or zero) becomes
    /// [`DEFAULT_TARGET_LENGTH`]; every length is clamped to
    /// [`MIN_TARGET_LENGTH`]..=[`MAX_TARGET_LENGTH`].
    pub fn from_input(
        input: Option<&GenerationInput>,
        settings: &dyn SettingsStore,
    ) -> Result<Self, InputError> {
        let input = input.ok_or(InputError::Missing)?;

        let model = match non_empty(input.model.as_deref()) {
            Some(model) => model.to_string(),
            None => default_model(settings),
        };
        let length = input
            .length
            .as_ref()
            .and_then(LengthInput::leading_integer)
            .filter(|n| *n != 0)
            .unwrap_or(DEFAULT_TARGET_LENGTH as i64);

        let request = Self::new(input.prompt.as_deref().unwrap_or_default(), &model)?
            .with_format(non_empty(input.format.as_deref()).unwrap_or(DEFAULT_FORMAT))
            .with_tone(non_empty(input.tone.as_deref()).unwrap_or(DEFAULT_TONE))
            .with_target_length(length)
            .with_subheadings(input.use_subheadings != Some(false))
            .with_title(input.title.as_deref().unwrap_or_default());
        Ok(request)
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    pub fn with_tone(mut self, tone: &str) -> Self {
        self.tone = tone.to_string();
        self
    }

    /// Sets the target length, clamped to the supported range.
    pub fn with_target_length(mut self, length: i64) -> Self {
        self.target_length = clamp_target_length(length);
        self
    }

    pub fn with_subheadings(mut self, use_subheadings: bool) -> Self {
        self.use_subheadings = use_subheadings;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.trim().to_string();
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn use_subheadings(&self) -> bool {
        self.use_subheadings
    }

    /// The caller-supplied title, if any.
    pub fn title(&self) -> Option<&str> {
        non_empty(Some(self.title.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemorySettings, OPENROUTER_MODEL};
    use rstest::rstest;

    fn input_with_length(length: Option<LengthInput>) -> GenerationInput {
        GenerationInput {
            prompt: Some("Про котов".into()),
            length,
            ..Default::default()
        }
    }

    #[rstest]
    #[case(None, 1500)]
    #[case(Some(LengthInput::Number(100.0)), 300)]
    #[case(Some(LengthInput::Number(2500.9)), 2500)]
    #[case(Some(LengthInput::Number(99_999.0)), 20_000)]
    #[case(Some(LengthInput::Number(0.0)), 1500)]
    #[case(Some(LengthInput::Text("4000 знаков".into())), 4000)]
    #[case(Some(LengthInput::Text("  -5".into())), 300)]
    #[case(Some(LengthInput::Text("много".into())), 1500)]
    #[case(Some(LengthInput::Text("99999999999999999999".into())), 20_000)]
    #[case(Some(LengthInput::Text("-99999999999999999999".into())), 300)]
    fn target_length_is_parsed_and_clamped(
        #[case] length: Option<LengthInput>,
        #[case] expected: usize,
    ) {
        let settings = MemorySettings::new();
        let request =
            GenerationRequest::from_input(Some(&input_with_length(length)), &settings).unwrap();
        assert_eq!(request.target_length(), expected);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let settings = MemorySettings::new().with(OPENROUTER_MODEL, "stored-model");
        let request =
            GenerationRequest::from_input(Some(&input_with_length(None)), &settings).unwrap();

        assert_eq!(request.prompt(), "Про котов");
        assert_eq!(request.model(), "stored-model");
        assert_eq!(request.format(), DEFAULT_FORMAT);
        assert_eq!(request.tone(), DEFAULT_TONE);
        assert!(request.use_subheadings());
        assert_eq!(request.title(), None);
    }

    #[test]
    fn subheadings_only_disabled_explicitly() {
        let settings = MemorySettings::new();
        let mut input = input_with_length(None);
        input.use_subheadings = Some(false);
        let request = GenerationRequest::from_input(Some(&input), &settings).unwrap();
        assert!(!request.use_subheadings());
    }

    #[test]
    fn rejects_missing_input_and_blank_prompt() {
        let settings = MemorySettings::new();
        assert_eq!(
            GenerationRequest::from_input(None, &settings),
            Err(InputError::Missing)
        );

        let blank = GenerationInput {
            prompt: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(
            GenerationRequest::from_input(Some(&blank), &settings),
            Err(InputError::EmptyPrompt)
        );
    }

    #[test]
    fn deserializes_form_payload() {
        let input: GenerationInput = serde_json::from_str(
            r#"{"prompt":" Тема ","length":"2000","useSubheadings":false,"title":" Заголовок "}"#,
        )
        .unwrap();
        let request = GenerationRequest::from_input(Some(&input), &MemorySettings::new()).unwrap();

        assert_eq!(request.prompt(), "Тема");
        assert_eq!(request.target_length(), 2000);
        assert!(!request.use_subheadings());
        assert_eq!(request.title(), Some("Заголовок"));
    }
}
