use serde::Serialize;
use std::path::Path;

use super::extraction::ExtractionMethod;

/// Mail attachment types worth sending through extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Pdf,
    Image,
}

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "heic"];

impl AttachmentKind {
    /// Classify by extension, case-insensitively. `None` means the
    /// attachment is not an invoice candidate.
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        if ext == "pdf" {
            Some(Self::Pdf)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else {
            None
        }
    }

    /// First extraction attempt for this kind. PDFs fall back to OCR when
    /// their text layer is too thin.
    pub fn extraction_method(&self) -> ExtractionMethod {
        match self {
            Self::Pdf => ExtractionMethod::PdfText,
            Self::Image => ExtractionMethod::Ocr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_candidates() {
        assert_eq!(AttachmentKind::from_filename("Factura-0142.PDF"), Some(AttachmentKind::Pdf));
        assert_eq!(AttachmentKind::from_filename("ticket.jpeg"), Some(AttachmentKind::Image));
        assert_eq!(AttachmentKind::from_filename("IMG_1234.HEIC"), Some(AttachmentKind::Image));
    }

    #[test]
    fn other_files_ignored() {
        assert_eq!(AttachmentKind::from_filename("notes.docx"), None);
        assert_eq!(AttachmentKind::from_filename("pdf"), None);
        assert_eq!(AttachmentKind::from_filename(""), None);
    }
}
