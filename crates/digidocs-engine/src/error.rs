use thiserror::Error;

/// Invalid or missing generation parameters. Fatal to the request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Generation input is missing")]
    Missing,
    #[error("Prompt is empty")]
    EmptyPrompt,
}

/// A completion call that did not yield text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Completion provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Completion response is empty or malformed: {body}")]
    Malformed { body: String },
    #[error("Completion provider is not configured: {0}")]
    NotConfigured(String),
}

/// A single style span the document sink refused. Never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Block {block} does not exist")]
    UnknownBlock { block: usize },
    #[error("Span {start}..{end} is empty")]
    EmptySpan { start: usize, end: usize },
    #[error("Span {start}..{end} exceeds text length {len}")]
    SpanOutOfRange { start: usize, end: usize, len: usize },
}

/// The document sink could not build or persist the document.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Document sink failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any failure of the generation workflow.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A uniqueness check that produced no score.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UniquenessError {
    #[error("Text is too short for a uniqueness check ({len} of at least {min} characters)")]
    TooShort { len: usize, min: usize },
    #[error("Uniqueness service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Uniqueness service reply is not valid JSON: {body}")]
    Malformed { body: String },
    #[error("Uniqueness service rejected the text: {description}")]
    Rejected { code: Option<i64>, description: String },
    #[error("Uniqueness check did not finish within {}s", elapsed.as_secs())]
    TimedOut { elapsed: std::time::Duration },
}
