//! File payloads submitted for upload

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Where the bytes of a file come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Content already in memory
    Memory(Arc<[u8]>),
    /// Content on local disk, read when needed
    Path(PathBuf),
}

impl FileSource {
    /// Read the complete content
    ///
    /// # Errors
    /// Propagates I/O errors from disk-backed sources
    pub async fn read_all(&self) -> io::Result<Vec<u8>> {
        match self {
            Self::Memory(bytes) => Ok(bytes.to_vec()),
            Self::Path(path) => {
                let mut file = tokio::fs::File::open(path).await?;
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).await?;
                Ok(buf)
            }
        }
    }
}

/// A named file with a declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    /// File name as chosen by the user; used as the slug when stored
    pub name: String,
    /// Declared MIME type
    pub content_type: String,
    /// Content source
    pub source: FileSource,
}

impl FilePayload {
    /// In-memory payload
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// Disk-backed payload
    pub fn from_path(
        name: impl Into<String>,
        content_type: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            source: FileSource::Path(path.into()),
        }
    }
}
