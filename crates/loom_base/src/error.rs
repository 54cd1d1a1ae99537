//! Non-diagnostic error type for the Loom front end.
//!
//! [`LoomError`] covers failures outside the user's source text — I/O
//! failures loading a file, a file exceeding the size ceiling. Errors
//! *in* the user's source are [`Diagnostic`](crate::Diagnostic)s collected
//! on a [`DiagnosticContext`](crate::DiagnosticContext), never
//! `LoomError`; the two are kept distinct on purpose so that "the compiler
//! couldn't run" and "your program has a syntax error" are never confused.

use std::fmt;
use std::path::PathBuf;

/// An error that prevents the front end from running at all.
#[derive(Debug)]
pub enum LoomError {
    /// Reading the file at `path` failed.
    Io { path: PathBuf, source: std::io::Error },
    /// The file at `path` exceeds [`crate::MAX_FILE_SIZE`].
    FileTooLarge { path: PathBuf, size: u64 },
}

impl fmt::Display for LoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoomError::Io { path, source } => {
                write!(f, "could not read '{}': {}", path.display(), source)
            }
            LoomError::FileTooLarge { path, size } => write!(
                f,
                "'{}' is {} bytes, exceeding the {} byte limit",
                path.display(),
                size,
                crate::MAX_FILE_SIZE
            ),
        }
    }
}

impl std::error::Error for LoomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoomError::Io { source, .. } => Some(source),
            LoomError::FileTooLarge { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_large_display_mentions_path_and_size() {
        let err = LoomError::FileTooLarge { path: PathBuf::from("big.lm"), size: 99 };
        let msg = err.to_string();
        assert!(msg.contains("big.lm"));
        assert!(msg.contains("99"));
    }
}
