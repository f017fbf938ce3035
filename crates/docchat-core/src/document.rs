//! The document payload a user selects before uploading

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;

use crate::error::Result;

/// A selected, not-yet-uploaded document.
///
/// Type and size are not checked here; the document service decides what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedDocument {
    pub name: String,
    pub media_type: String,
    #[serde(skip)]
    pub bytes: Bytes,
}

impl SelectedDocument {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk, inferring its media type from the extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let media_type = infer_media_type(&name);
        Ok(Self::new(name, media_type, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Infer a MIME type from a file name, falling back to `application/octet-stream`
pub fn infer_media_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_infer_media_type() {
        assert_eq!(infer_media_type("report.pdf"), "application/pdf");
        assert_eq!(infer_media_type("notes.txt"), "text/plain");
        assert_eq!(infer_media_type("blob"), "application/octet-stream");
    }

    #[test]
    fn test_from_path_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handbook.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 fake").unwrap();

        let doc = SelectedDocument::from_path(&path).unwrap();
        assert_eq!(doc.name, "handbook.pdf");
        assert_eq!(doc.media_type, "application/pdf");
        assert_eq!(doc.len(), 13);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_from_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SelectedDocument::from_path(dir.path().join("missing.pdf"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
