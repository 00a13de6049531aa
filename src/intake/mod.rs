//! Records handed over by the document extractor, the mailbox watcher and
//! the meeting scheduler, and their conversion into ledger drafts.
//!
//! OCR, the language-model call and the third-party APIs themselves live
//! outside this crate; only their outputs are modelled here.

mod attachment;
mod calendar;
mod extraction;

pub use attachment::AttachmentKind;
pub use calendar::{EventStatus, MeetingEvent, income_draft};
pub use extraction::{
    ClassifiedDocument, DocumentType, ExtractedDocument, ExtractionMethod, ExtractionOutcome,
    MIN_LEGIBLE_CHARS, MIN_PDF_TEXT_CHARS, VAT_DISCREPANCY_TOLERANCE, classify_document,
    ensure_legible, pdf_text_is_usable,
};
