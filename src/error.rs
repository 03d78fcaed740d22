use miette::Diagnostic;
use thiserror::Error;

/// Main error type for iconsmith operations.
///
/// Only fatal conditions appear here. Malformed instructions,
/// unresolvable colour tokens and empty shape sets are absorbed by the
/// pipeline itself and never become errors.
#[derive(Error, Diagnostic, Debug)]
pub enum IconError {
    #[error("IO error: {0}")]
    #[diagnostic(code(iconsmith::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(iconsmith::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(iconsmith::image))]
    Image {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(iconsmith::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("No usable icon source")]
    #[diagnostic(code(iconsmith::missing_source))]
    MissingSource {
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, IconError>;
