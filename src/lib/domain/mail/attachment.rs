//! Attachment

use std::{fmt, path::PathBuf};

/// A file to attach to a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attachment {
    /// A file on disk, read by the transport when the message is sent
    File(PathBuf),

    /// Content supplied in memory
    Inline {
        /// The raw content
        content: Vec<u8>,

        /// The filename presented to the recipient
        filename: String,
    },
}

impl Attachment {
    /// Create an attachment from a path
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Create an attachment from in-memory content
    pub fn inline(content: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self::Inline {
            content: content.into(),
            filename: filename.into(),
        }
    }
}

/// Files render as their path. Inline content renders as
/// `content;filename=name` with no escaping.
impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline { content, filename } => {
                write!(f, "{};filename={}", String::from_utf8_lossy(content), filename)
            }
        }
    }
}
