use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid rule `{0}`, expected something like B3/S23")]
    InvalidRule(String),

    #[error("invalid argument `{0}`, expected key=value")]
    InvalidArgument(String),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("shape `{0}` not found")]
    UnknownShape(String),

    #[error("shape `{0}` has no live cells")]
    EmptyShape(String),

    #[error("could not determine the terminal size")]
    TerminalSize,

    #[error("terminal: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("backend `{0}` is not available in this build")]
    BackendUnavailable(&'static str),

    #[error("sdl: {0}")]
    Sdl(String),
}
