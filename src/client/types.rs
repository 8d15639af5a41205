use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

/// File extensions accepted by the image picker, with the MIME type sent upstream.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
];

/// Opaque, locally generated handle for an attached image.
///
/// Messages only keep this handle; the bytes travel with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub id: Uuid,
    pub file_name: String,
    pub mime: String,
    pub byte_len: usize,
}

/// An image picked in the composer: its handle plus the raw file contents.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub image_ref: ImageRef,
    pub bytes: Arc<[u8]>,
}

// Bytes are omitted so action logs stay readable.
impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("image_ref", &self.image_ref)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Why a file could not be attached.
#[derive(Debug)]
pub enum PickError {
    /// The extension is not one of the accepted image types.
    NotAnImage(String),
    Io(std::io::Error),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::NotAnImage(name) => write!(f, "not an image file: {name}"),
            PickError::Io(e) => write!(f, "could not read image: {e}"),
        }
    }
}

impl std::error::Error for PickError {}

/// Returns the MIME type for an image path, or `None` if the extension isn't accepted.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

impl ImageAttachment {
    /// Builds an attachment from in-memory bytes, minting a fresh handle.
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            image_ref: ImageRef {
                id: Uuid::new_v4(),
                file_name: file_name.into(),
                mime: mime.into(),
                byte_len: bytes.len(),
            },
            bytes,
        }
    }

    /// Reads an image file from disk. The extension decides whether it is accepted.
    pub fn load(path: &Path) -> Result<Self, PickError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_for_path(path).ok_or_else(|| PickError::NotAnImage(file_name.clone()))?;
        let bytes = std::fs::read(path).map_err(PickError::Io)?;
        Ok(Self::new(file_name, mime, bytes))
    }
}

/// Everything the endpoint receives for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// The typed text, sent verbatim (may be empty).
    pub query: String,
    pub image: Option<ImageAttachment>,
}

/// Success body of the query endpoint. Only `response` is required.
#[derive(Deserialize, Debug)]
pub(crate) struct QueryResponse {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mime_for_path_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("cat.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("a/b/photo.jpeg")), Some("image/jpeg"));
    }

    #[test]
    fn mime_for_path_rejects_non_images() {
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn load_reads_bytes_and_mints_handle() {
        let mut file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();
        file.write_all(b"GIF89a").unwrap();

        let attachment = ImageAttachment::load(file.path()).unwrap();
        assert_eq!(&*attachment.bytes, b"GIF89a");
        assert_eq!(attachment.image_ref.mime, "image/gif");
        assert_eq!(attachment.image_ref.byte_len, 6);
        assert!(attachment.image_ref.file_name.ends_with(".gif"));
    }

    #[test]
    fn load_rejects_wrong_extension_before_reading() {
        let err = ImageAttachment::load(Path::new("/definitely/missing/readme.md")).unwrap_err();
        assert!(matches!(err, PickError::NotAnImage(name) if name == "readme.md"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ImageAttachment::load(Path::new("/definitely/missing/cat.png")).unwrap_err();
        assert!(matches!(err, PickError::Io(_)));
    }

    #[test]
    fn each_attachment_gets_a_distinct_handle() {
        let a = ImageAttachment::new("a.png", "image/png", vec![1]);
        let b = ImageAttachment::new("a.png", "image/png", vec![1]);
        assert_ne!(a.image_ref.id, b.image_ref.id);
    }

    #[test]
    fn debug_omits_raw_bytes() {
        let a = ImageAttachment::new("a.png", "image/png", vec![0; 1024]);
        let rendered = format!("{a:?}");
        assert!(rendered.contains("<1024 bytes>"));
    }

    #[test]
    fn response_requires_response_field() {
        assert!(serde_json::from_str::<QueryResponse>(r#"{"answer":"x"}"#).is_err());
        let ok: QueryResponse = serde_json::from_str(r#"{"response":"Hello","extra":1}"#).unwrap();
        assert_eq!(ok.response, "Hello");
    }
}
