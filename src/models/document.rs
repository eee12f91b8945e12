//! Uploaded document handed to the pipeline by the host

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// A single uploaded file.
///
/// Bytes are shared and immutable; adapters always see them from offset zero.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    bytes: Arc<[u8]>,
    declared_type: String,
    name: String,
}

impl UploadedDocument {
    pub fn new(
        bytes: impl Into<Arc<[u8]>>,
        declared_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            declared_type: declared_type.into(),
            name: name.into(),
        }
    }

    /// Read a document from a stream, rewinding it first so a previously
    /// consumed upload can be handed over again.
    pub fn from_reader<R: Read + Seek>(
        mut reader: R,
        declared_type: impl Into<String>,
        name: impl Into<String>,
    ) -> std::io::Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(Self::new(buffer, declared_type, name))
    }

    /// Load a document from disk. The declared type is guessed from the
    /// extension and left empty when nothing matches.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let declared_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_default();

        tracing::debug!(
            name = %name,
            declared_type = %declared_type,
            size = bytes.len(),
            "Loaded document from disk"
        );

        Ok(Self::new(bytes, declared_type, name))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same bytes and name under a different declared type
    pub fn with_declared_type(self, declared_type: impl Into<String>) -> Self {
        Self {
            declared_type: declared_type.into(),
            ..self
        }
    }

    /// MIME type to attach when uploading the raw bytes.
    ///
    /// The declared type when it already is one, otherwise a guess from the
    /// declared extension or the file name.
    pub fn mime_type(&self) -> String {
        let declared = self.declared_type.trim();
        if declared.contains('/') {
            return declared.to_string();
        }

        let ext = declared.trim_start_matches('.');
        let guessed = if ext.is_empty() {
            None
        } else {
            mime_guess::from_ext(ext).first()
        };

        guessed
            .or_else(|| mime_guess::from_path(&self.name).first())
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
