use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::money::{self, parse_amount};
use crate::core::{
    AutonomoError, Confidence, LedgerEntry, Origin, TransactionBuilder, TxStatus, UserProfile,
    VatRate, parse_iso_date,
};
use crate::rules::{
    DeductibilityClassification, RuleTable, VatClassification, classify_deductibility,
    classify_vat,
};

/// Extracted text shorter than this (after trimming) is treated as unreadable.
pub const MIN_LEGIBLE_CHARS: usize = 20;

/// Embedded PDF text shorter than this should be re-read with OCR.
pub const MIN_PDF_TEXT_CHARS: usize = 50;

/// Largest tolerated gap between the extractor's VAT amount and ours.
pub const VAT_DISCREPANCY_TOLERANCE: Decimal = dec!(0.05);

/// How the document text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Embedded PDF text layer.
    PdfText,
    /// Optical character recognition on an image or rasterised PDF.
    Ocr,
}

impl ExtractionMethod {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PdfText => "pdf_text",
            Self::Ocr => "ocr",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Factura.
    Invoice,
    /// Simplified receipt (ticket).
    Ticket,
    /// Recibo.
    Receipt,
    #[default]
    Other,
}

impl DocumentType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Ticket => "ticket",
            Self::Receipt => "receipt",
            Self::Other => "other",
        }
    }

    /// Accepts English and Spanish names; anything else is `Other`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "invoice" | "factura" => Self::Invoice,
            "ticket" => Self::Ticket,
            "receipt" | "recibo" => Self::Receipt,
            _ => Self::Other,
        }
    }
}

/// Fail early when OCR produced (next to) nothing.
pub fn ensure_legible(text: &str) -> Result<&str, AutonomoError> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_LEGIBLE_CHARS {
        return Err(AutonomoError::Extraction(format!(
            "document text too short to read ({} chars)",
            trimmed.chars().count()
        )));
    }
    Ok(trimmed)
}

/// Whether a PDF's own text layer is long enough to skip OCR.
pub fn pdf_text_is_usable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_PDF_TEXT_CHARS
}

/// Fields the language model pulled out of a document. Everything is
/// best-effort; derived amounts are recomputed during classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedDocument {
    pub counterparty: String,
    pub tax_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub taxable_base: Decimal,
    /// Rate the extractor read, if it was a whole number.
    pub vat_rate: Option<u8>,
    /// VAT amount printed on the document, if any.
    pub vat_amount: Option<Decimal>,
    pub total: Option<Decimal>,
    pub description: String,
    pub document_type: DocumentType,
}

/// Result of parsing the extractor's reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExtractionOutcome {
    Parsed(ExtractedDocument),
    /// The reply was not a JSON object; `raw` is kept for review.
    Failed { raw: String },
}

impl ExtractionOutcome {
    /// Parse the model's JSON reply. Spanish and English keys are both
    /// accepted, as are numbers written as strings (`"1.234,56"`).
    /// Markdown code fences around the JSON are ignored.
    pub fn from_llm_response(text: &str) -> Self {
        let body = strip_code_fence(text);
        let obj = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(obj)) => obj,
            Ok(_) => {
                log::warn!("extractor reply is JSON but not an object");
                return Self::Failed { raw: text.to_string() };
            }
            Err(e) => {
                log::warn!("extractor reply is not valid JSON: {e}");
                return Self::Failed { raw: text.to_string() };
            }
        };

        let date_text = text_field(&obj, &["fecha", "date"]).unwrap_or_default();
        let date = parse_iso_date(&date_text);
        if date.is_none() && !date_text.is_empty() {
            log::warn!("extractor returned unreadable date '{date_text}'");
        }

        Self::Parsed(ExtractedDocument {
            counterparty: text_field(&obj, &["proveedor", "counterparty", "supplier"])
                .unwrap_or_default(),
            tax_id: text_field(&obj, &["nif_proveedor", "nif", "tax_id"]),
            date,
            invoice_number: text_field(&obj, &["numero_factura", "invoice_number"]),
            taxable_base: amount_field(&obj, &["base_imponible", "taxable_base"])
                .unwrap_or_default(),
            vat_rate: amount_field(&obj, &["tipo_iva", "vat_rate"])
                .filter(|r| r.fract().is_zero())
                .and_then(|r| r.to_u8()),
            vat_amount: amount_field(&obj, &["cuota_iva", "vat_amount"]),
            total: amount_field(&obj, &["total"]),
            description: text_field(&obj, &["concepto", "description"]).unwrap_or_default(),
            document_type: text_field(&obj, &["tipo_documento", "document_type"])
                .map(|t| DocumentType::from_code(&t))
                .unwrap_or_default(),
        })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline.
    let inner = inner.split_once('\n').map_or(inner, |(_, rest)| rest);
    inner.trim_end().strip_suffix("```").unwrap_or(inner).trim()
}

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let text = match lookup(obj, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn amount_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<Decimal> {
    match lookup(obj, keys)? {
        Value::Number(n) => {
            let text = n.to_string();
            text.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&text).ok())
                .filter(|amount| amount.abs() <= money::MAX_AMOUNT)
        }
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// A scanned or mailed expense document after both classifiers ran.
///
/// VAT amount, total, and deductible VAT are recomputed from the taxable
/// base and the classified rate; the extractor's own arithmetic is only
/// compared, never used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedDocument {
    pub counterparty: String,
    pub tax_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub invoice_number: Option<String>,
    pub description: String,
    pub document_type: DocumentType,
    pub taxable_base: Decimal,
    pub vat: VatClassification,
    pub vat_amount: Decimal,
    pub total: Decimal,
    pub deduction: DeductibilityClassification,
    pub deductible_vat_amount: Decimal,
    /// The extractor's VAT amount differs from ours by more than
    /// [`VAT_DISCREPANCY_TOLERANCE`], or is missing while ours is not.
    pub vat_discrepancy: bool,
    /// The extractor read a different rate than the classifier chose.
    pub rate_mismatch: bool,
    /// The extractor read a negative base; it was replaced by zero.
    pub negative_base: bool,
    pub extraction_method: ExtractionMethod,
    /// The extractor's reply could not be parsed; all fields are defaults.
    pub parse_error: bool,
    /// Unparsed reply, kept when `parse_error` is set.
    pub raw_response: Option<String>,
}

impl ClassifiedDocument {
    /// Any signal that a person should look at this document.
    pub fn needs_review(&self) -> bool {
        self.parse_error
            || self.vat_discrepancy
            || self.rate_mismatch
            || self.negative_base
            || self.vat.confidence == Confidence::Low
            || self.deduction.confidence == Confidence::Low
    }

    /// Expense draft for the ledger, pending payment.
    pub fn to_ledger_entry(&self, origin: Origin) -> Result<LedgerEntry, AutonomoError> {
        let mut builder = TransactionBuilder::expense(&self.counterparty, self.taxable_base)
            .description(&self.description)
            .classified(&self.vat, &self.deduction)
            .status(TxStatus::Pending)
            .origin(origin);
        if let Some(date) = self.date {
            builder = builder.date(date);
        }
        if let Some(tax_id) = &self.tax_id {
            builder = builder.tax_id(tax_id);
        }
        if let Some(number) = &self.invoice_number {
            builder = builder.invoice_number(number);
        }
        builder.build()
    }
}

/// Classify an extracted document.
///
/// A failed extraction yields a safe default record (general rate, zero
/// base, type other, low confidence, not deductible) flagged with
/// `parse_error`, never an error.
pub fn classify_document(
    outcome: ExtractionOutcome,
    method: ExtractionMethod,
    profile: &UserProfile,
    rules: &RuleTable,
) -> ClassifiedDocument {
    let doc = match outcome {
        ExtractionOutcome::Parsed(doc) => doc,
        ExtractionOutcome::Failed { raw } => {
            log::warn!("extraction failed ({}); storing defaults", method.code());
            return ClassifiedDocument {
                counterparty: String::new(),
                tax_id: None,
                date: None,
                invoice_number: None,
                description: String::new(),
                document_type: DocumentType::Other,
                taxable_base: Decimal::ZERO,
                vat: VatClassification {
                    rate: VatRate::General,
                    label: String::new(),
                    article: String::new(),
                    exempt: false,
                    confidence: Confidence::Low,
                    matched_keyword: None,
                },
                vat_amount: Decimal::ZERO,
                total: Decimal::ZERO,
                deduction: DeductibilityClassification::unassessed(),
                deductible_vat_amount: Decimal::ZERO,
                vat_discrepancy: false,
                rate_mismatch: false,
                negative_base: false,
                extraction_method: method,
                parse_error: true,
                raw_response: Some(raw),
            };
        }
    };

    let vat = classify_vat(&doc.description, &doc.counterparty, rules);
    let deduction =
        classify_deductibility(&doc.description, vat.rate, vat.exempt, profile, rules);

    let negative_base = doc.taxable_base.is_sign_negative() && !doc.taxable_base.is_zero();
    if negative_base {
        log::warn!(
            "negative base {} on '{}' document; storing zero",
            doc.taxable_base,
            doc.counterparty
        );
    }
    let taxable_base = doc.taxable_base.max(Decimal::ZERO);

    let vat_amount = money::vat_amount(taxable_base, vat.rate);
    let total = money::gross_total(taxable_base, vat_amount);
    let deductible_vat_amount = money::deductible_vat(vat_amount, deduction.deduction_pct);

    let vat_discrepancy = (doc.vat_amount.unwrap_or_default() - vat_amount).abs()
        > VAT_DISCREPANCY_TOLERANCE;
    if vat_discrepancy {
        log::warn!(
            "VAT on '{}' invoice differs from recomputed {vat_amount}: extractor said {:?}",
            doc.counterparty,
            doc.vat_amount
        );
    }
    let rate_mismatch = doc.vat_rate.is_some_and(|r| r != vat.rate.percent());

    ClassifiedDocument {
        counterparty: doc.counterparty,
        tax_id: doc.tax_id,
        date: doc.date,
        invoice_number: doc.invoice_number,
        description: doc.description,
        document_type: doc.document_type,
        taxable_base,
        vat,
        vat_amount,
        total,
        deduction,
        deductible_vat_amount,
        vat_discrepancy,
        rate_mismatch,
        negative_base,
        extraction_method: method,
        parse_error: false,
        raw_response: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn spanish_keys() {
        let outcome = ExtractionOutcome::from_llm_response(
            r#"{"proveedor":"Iberdrola","fecha":"2025-04-15","base_imponible":"89,99","tipo_iva":21,"cuota_iva":18.9,"concepto":"Electricidad","tipo_documento":"factura","nif_proveedor":null}"#,
        );
        let ExtractionOutcome::Parsed(doc) = outcome else {
            panic!("expected parsed document");
        };
        assert_eq!(doc.counterparty, "Iberdrola");
        assert_eq!(doc.taxable_base, dec!(89.99));
        assert_eq!(doc.vat_rate, Some(21));
        assert_eq!(doc.vat_amount, Some(dec!(18.9)));
        assert_eq!(doc.document_type, DocumentType::Invoice);
        assert_eq!(doc.tax_id, None);
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2025, 4, 15));
    }

    #[test]
    fn non_object_fails() {
        assert!(ExtractionOutcome::from_llm_response("[1,2]").is_failed());
        assert!(ExtractionOutcome::from_llm_response("Lo siento, no puedo").is_failed());
    }

    #[test]
    fn fractional_rate_is_dropped() {
        let ExtractionOutcome::Parsed(doc) =
            ExtractionOutcome::from_llm_response(r#"{"tipo_iva": 10.5}"#)
        else {
            panic!("expected parsed document");
        };
        assert_eq!(doc.vat_rate, None);
    }

    #[test]
    fn legibility() {
        assert!(ensure_legible("   abc   ").is_err());
        assert!(ensure_legible("FACTURA 2025-001 Iberdrola SA").is_ok());
        assert!(!pdf_text_is_usable("short"));
    }
}
