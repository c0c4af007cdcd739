use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// File I/O failures surfaced to the user as an "Error" dialog.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DocumentError {
    /// Text shown in the dialog body.
    pub fn user_message(&self) -> &'static str {
        match self {
            DocumentError::Open { .. } => "Failed to open file",
            DocumentError::Save { .. } => "Failed to save file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_text_matches_kind() {
        let open = DocumentError::Open {
            path: PathBuf::from("/nope.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let save = DocumentError::Save {
            path: PathBuf::from("/nope.txt"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(open.user_message(), "Failed to open file");
        assert_eq!(save.user_message(), "Failed to save file");
        assert!(open.to_string().contains("/nope.txt"));
    }
}
