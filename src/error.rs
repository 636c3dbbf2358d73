#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("typing animation needs at least one text")]
    EmptyTypingTexts,
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("particles error: {0}")]
    Particles(String),
}

impl AppError {
    pub fn missing(selector: &str) -> Self {
        Self::MissingElement(selector.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("submission rejected")]
    Rejected,
    #[error("submission interrupted before completion")]
    Interrupted,
}
