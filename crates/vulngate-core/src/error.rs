use std::path::PathBuf;

/// Errors that can occur while scanning a diff.
///
/// Library crates use this type directly; the binary converts to a
/// `miette` diagnostic at the boundary.
///
/// # Examples
///
/// ```
/// use vulngate_core::VulngateError;
///
/// let err = VulngateError::Config("missing HF_TOKEN".into());
/// assert!(err.to_string().contains("missing HF_TOKEN"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum VulngateError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(
        code(vulngate::config),
        help("set HF_TOKEN, and check HF_MODEL, MAX_DIFF_CHARS and .vulngate.toml")
    )]
    Config(String),

    /// Inference API transport failure or service-reported error.
    #[error("LLM error: {0}")]
    #[diagnostic(code(vulngate::llm))]
    Llm(String),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
