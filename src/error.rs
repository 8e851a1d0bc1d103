use crate::parser::ParsingError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort the current line.
///
/// None of these end the session: the interpreter prints the message and
/// prompts again.
#[derive(Debug, Error)]
pub enum ShellError {
    /// `!N` where `N` is not a retained history index.
    #[error("Invalid command number.")]
    InvalidRecall,

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error("{0}: Command not found.")]
    CommandNotFound(String),

    /// A redirection target could not be opened.
    #[error("{}: {}", .path.display(), .source)]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Process or pipe creation failed.
    #[error("msh: fork failed: {0}")]
    Spawn(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Builtin(#[from] anyhow::Error),
}
