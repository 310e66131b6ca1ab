use std::io;

/// Errors that can occur while preparing or launching a PIT run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid options file {path}: {source}")]
    OptionsFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Invalid override '{0}', expected name=value")]
    InvalidOverride(String),

    #[error("Cannot read library directory {path}: {source}")]
    LibDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Classpath entry is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, Error>;
