//! CLI error types.

use rv_config::ConfigError;
use rv_odf::OdfError;
use rv_review::ConvertError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Odf(#[from] OdfError),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Validation(String),
}
