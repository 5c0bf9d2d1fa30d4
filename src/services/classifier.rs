use std::fmt;

/// File kinds the merge pipeline understands, detected from content only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Jpeg,
    Png,
    Unsupported,
}

const PDF_MAGIC: &[u8] = b"%PDF";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

impl FileKind {
    /// Sniffs the leading magic number. The file name is never consulted.
    pub fn classify(data: &[u8]) -> Self {
        if data.starts_with(PDF_MAGIC) {
            FileKind::Pdf
        } else if data.starts_with(PNG_MAGIC) {
            FileKind::Png
        } else if data.starts_with(JPEG_MAGIC) {
            FileKind::Jpeg
        } else {
            FileKind::Unsupported
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Jpeg => "image/jpeg",
            FileKind::Png => "image/png",
            FileKind::Unsupported => "application/octet-stream",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, FileKind::Jpeg | FileKind::Png)
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Pdf => "pdf",
            FileKind::Jpeg => "jpg",
            FileKind::Png => "png",
            FileKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}
