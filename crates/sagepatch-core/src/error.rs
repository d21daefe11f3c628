use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("{path:?} not found")]
    NotFound { path: PathBuf },

    #[error("no replacements made in {path:?}; the patterns may depend on exact spacing")]
    NoMatch { path: PathBuf, excerpt: String },

    #[error("I/O failure on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load config {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PatchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PatchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this failure. Every variant is non-zero and
    /// `NotFound` / `NoMatch` stay distinguishable from a plain crash.
    pub fn exit_code(&self) -> i32 {
        match self {
            PatchError::Io { .. } | PatchError::Config { .. } | PatchError::InvalidConfig(_) => 1,
            PatchError::NotFound { .. } => 2,
            PatchError::NoMatch { .. } => 3,
        }
    }
}

pub type Result<T, E = PatchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let not_found = PatchError::NotFound {
            path: PathBuf::from("setup.py"),
        };
        let no_match = PatchError::NoMatch {
            path: PathBuf::from("setup.py"),
            excerpt: String::new(),
        };
        let io_err = PatchError::io("setup.py", io::Error::from(io::ErrorKind::PermissionDenied));

        assert_eq!(io_err.exit_code(), 1);
        assert_eq!(not_found.exit_code(), 2);
        assert_eq!(no_match.exit_code(), 3);
        assert_eq!(PatchError::InvalidConfig("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = PatchError::io("setup.py", io::Error::new(io::ErrorKind::Other, "disk full"));
        let msg = err.to_string();
        assert!(msg.contains("setup.py"));
        assert!(msg.contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
