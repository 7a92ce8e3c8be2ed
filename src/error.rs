use miette::Diagnostic;
use thiserror::Error;

/// Main error type for bitviz operations
#[derive(Error, Diagnostic, Debug)]
pub enum VizError {
    #[error("IO error: {0}")]
    #[diagnostic(code(bitviz::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(bitviz::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    /// Disallowed characters, orphan hex letters, oversized literals.
    #[error("Lexical error: {message}")]
    #[diagnostic(code(bitviz::lex))]
    Lexical {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Mismatched parentheses, empty equation, dangling operators.
    #[error("Syntax error: {message}")]
    #[diagnostic(code(bitviz::parse))]
    Syntax {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Constructs the equation language forbids outright.
    #[error("{message}")]
    #[diagnostic(
        code(bitviz::policy),
        help("Only integer bitwise arithmetic is supported: + - * ~ & | ^ << >> ROL ROR")
    )]
    Policy { message: String },

    /// The compiled program and the evaluator disagree. Never caused by user input.
    #[error("Internal consistency failure: {message}")]
    #[diagnostic(code(bitviz::internal))]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(bitviz::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Worker is busy with another generation")]
    #[diagnostic(
        code(bitviz::worker),
        help("Wait for the in-flight job to finish or use a separate worker")
    )]
    Busy,

    #[error("Worker thread is no longer running")]
    #[diagnostic(code(bitviz::worker))]
    WorkerGone,
}

impl VizError {
    pub(crate) fn lexical(message: impl Into<String>) -> Self {
        VizError::Lexical {
            message: message.into(),
            help: None,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        VizError::Syntax {
            message: message.into(),
            help: None,
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        VizError::Internal {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>, help: Option<String>) -> Self {
        VizError::Config {
            message: message.into(),
            help,
        }
    }
}

pub type Result<T> = std::result::Result<T, VizError>;
