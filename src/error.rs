use thiserror::Error;

/// Unified error type for run-ci operations
#[derive(Error, Debug)]
pub enum CiError {
    /// User input (git tag, package name) that can never be valid
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version bump failed: {0}")]
    Bump(String),

    #[error("`{program}` exited with code {code}")]
    ToolFailed { program: String, code: i32 },

    #[error("Could not launch `{program}`: {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tests failed")]
    TestsFailed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in run-ci
pub type Result<T> = std::result::Result<T, CiError>;

impl CiError {
    /// Create a malformed-input error with context
    pub fn malformed(msg: impl Into<String>) -> Self {
        CiError::MalformedInput(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        CiError::Config(msg.into())
    }

    /// Create a bump error with context
    pub fn bump(msg: impl Into<String>) -> Self {
        CiError::Bump(msg.into())
    }

    /// Process exit code to report for this error.
    ///
    /// Tool failures pass the tool's own code through; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CiError::ToolFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}
