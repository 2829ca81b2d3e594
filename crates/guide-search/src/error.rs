use guide_common::fetch::FetchError;
use guide_common::gemini::GeminiClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Gemini(#[from] GeminiClientError),

    #[error("invalid model JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("model returned an empty response")]
    EmptyModelResponse,

    #[error("config error: {0}")]
    Config(String),
}
