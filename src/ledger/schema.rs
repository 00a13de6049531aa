use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;

use crate::core::money;
use crate::core::{
    AutonomoError, FiscalQuarter, Origin, Transaction, TxKind, TxStatus, VatRate, parse_iso_date,
};

/// Column order of the ledger file, as written.
pub const LEDGER_COLUMNS: [&str; 18] = [
    "id",
    "date",
    "kind",
    "counterparty",
    "tax_id",
    "description",
    "invoice_number",
    "taxable_base",
    "vat_rate",
    "vat_amount",
    "total",
    "deductible",
    "deduction_pct",
    "deductible_vat_amount",
    "legal_article",
    "fiscal_quarter",
    "status",
    "origin",
];

/// Spanish header names of older ledgers, position for position.
pub const LEGACY_COLUMNS: [&str; 18] = [
    "id",
    "fecha",
    "tipo",
    "proveedor_cliente",
    "nif",
    "concepto",
    "numero_factura",
    "base_imponible",
    "tipo_iva",
    "cuota_iva",
    "total",
    "deducible",
    "porcentaje_deduccion",
    "cuota_iva_deducible",
    "aeat_articulo",
    "trimestre",
    "estado",
    "origen",
];

const COL_ID: usize = 0;
const COL_DATE: usize = 1;
const COL_KIND: usize = 2;
const COL_COUNTERPARTY: usize = 3;
const COL_TAX_ID: usize = 4;
const COL_DESCRIPTION: usize = 5;
const COL_INVOICE_NUMBER: usize = 6;
const COL_TAXABLE_BASE: usize = 7;
const COL_VAT_RATE: usize = 8;
const COL_VAT_AMOUNT: usize = 9;
const COL_TOTAL: usize = 10;
const COL_DEDUCTIBLE: usize = 11;
const COL_DEDUCTION_PCT: usize = 12;
const COL_DEDUCTIBLE_VAT: usize = 13;
const COL_LEGAL_ARTICLE: usize = 14;
const COL_QUARTER: usize = 15;
const COL_STATUS: usize = 16;
const COL_ORIGIN: usize = 17;

/// Position of each known column in a ledger file's header row.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    positions: [Option<usize>; 18],
}

impl HeaderMap {
    /// Resolve columns by English or legacy Spanish name, in any order.
    /// A header without a kind column is not a ledger.
    pub fn from_header(header: &csv::StringRecord) -> Result<Self, AutonomoError> {
        let mut positions = [None; 18];
        for (idx, name) in header.iter().enumerate() {
            let name = name.trim();
            if let Some(col) = LEDGER_COLUMNS
                .iter()
                .zip(LEGACY_COLUMNS.iter())
                .position(|(en, es)| name.eq_ignore_ascii_case(en) || name.eq_ignore_ascii_case(es))
            {
                positions[col].get_or_insert(idx);
            }
        }
        if positions[COL_KIND].is_none() {
            return Err(AutonomoError::Ledger(format!(
                "header has no '{}' column",
                LEDGER_COLUMNS[COL_KIND]
            )));
        }
        Ok(Self { positions })
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, col: usize) -> &'r str {
        self.positions[col]
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}

/// Decode one data row. Malformed cells are coerced (numbers to zero,
/// flags to false, unknown codes to defaults); only a row whose kind is
/// unrecognised is dropped.
pub fn decode_row(header: &HeaderMap, record: &csv::StringRecord) -> Option<Transaction> {
    let cell = |col| header.cell(record, col);
    let id = cell(COL_ID);

    let Some(kind) = TxKind::from_code(cell(COL_KIND)) else {
        log::warn!("skipping ledger row '{id}': unknown kind '{}'", cell(COL_KIND));
        return None;
    };

    let date_text = cell(COL_DATE);
    let date = parse_iso_date(date_text);
    if date.is_none() && !date_text.is_empty() {
        log::warn!("ledger row '{id}': unreadable date '{date_text}'");
    }

    let quarter_text = cell(COL_QUARTER);
    let quarter = quarter_text.parse::<FiscalQuarter>().ok();
    if quarter.is_none() && !quarter_text.is_empty() {
        log::warn!("ledger row '{id}': unreadable quarter '{quarter_text}'");
    }

    let vat_rate = match parse_whole(cell(COL_VAT_RATE)).and_then(VatRate::from_percent) {
        Some(rate) => rate,
        None => {
            log::warn!("ledger row '{id}': unsupported VAT rate '{}'", cell(COL_VAT_RATE));
            VatRate::Exempt
        }
    };

    let deduction_pct = match parse_whole(cell(COL_DEDUCTION_PCT)) {
        Some(pct) if pct <= 100 => pct,
        _ => {
            if !cell(COL_DEDUCTION_PCT).is_empty() {
                log::warn!(
                    "ledger row '{id}': invalid deduction percentage '{}'",
                    cell(COL_DEDUCTION_PCT)
                );
            }
            0
        }
    };

    Some(Transaction {
        id: id.to_string(),
        date,
        kind,
        counterparty: cell(COL_COUNTERPARTY).to_string(),
        tax_id: optional(cell(COL_TAX_ID)),
        description: cell(COL_DESCRIPTION).to_string(),
        invoice_number: optional(cell(COL_INVOICE_NUMBER)),
        taxable_base: coerce_amount(id, "taxable_base", cell(COL_TAXABLE_BASE)),
        vat_rate,
        vat_amount: coerce_amount(id, "vat_amount", cell(COL_VAT_AMOUNT)),
        total: coerce_amount(id, "total", cell(COL_TOTAL)),
        deductible: parse_flag(cell(COL_DEDUCTIBLE)),
        deduction_pct,
        deductible_vat_amount: coerce_amount(
            id,
            "deductible_vat_amount",
            cell(COL_DEDUCTIBLE_VAT),
        ),
        legal_article: cell(COL_LEGAL_ARTICLE).to_string(),
        quarter,
        status: TxStatus::from_code(cell(COL_STATUS)).unwrap_or_default(),
        origin: Origin::from_code(cell(COL_ORIGIN)).unwrap_or_default(),
    })
}

/// Encode a row in [`LEDGER_COLUMNS`] order.
pub fn encode_row(tx: &Transaction) -> [String; 18] {
    [
        tx.id.clone(),
        tx.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        tx.kind.code().to_string(),
        tx.counterparty.clone(),
        tx.tax_id.clone().unwrap_or_default(),
        tx.description.clone(),
        tx.invoice_number.clone().unwrap_or_default(),
        format_amount(tx.taxable_base),
        tx.vat_rate.percent().to_string(),
        format_amount(tx.vat_amount),
        format_amount(tx.total),
        format_flag(tx.deductible).to_string(),
        tx.deduction_pct.to_string(),
        format_amount(tx.deductible_vat_amount),
        tx.legal_article.clone(),
        tx.quarter.map(|q| q.to_string()).unwrap_or_default(),
        tx.status.code().to_string(),
        tx.origin.code().to_string(),
    ]
}

/// Read every row of a ledger document. Fails only when the header is
/// missing or unusable, or the CSV framing itself is broken.
pub fn read_transactions<R: io::Read>(reader: R) -> Result<Vec<Transaction>, AutonomoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header = rdr.headers()?.clone();
    if header.is_empty() {
        return Ok(Vec::new());
    }
    let map = HeaderMap::from_header(&header)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        if let Some(tx) = decode_row(&map, &record) {
            rows.push(tx);
        }
    }
    Ok(rows)
}

/// Amounts are written with exactly two decimals.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// `True` / `False`, as older ledgers expect.
pub fn format_flag(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}

/// Accepts `True`/`true`/`1`; anything else is false.
pub fn parse_flag(text: &str) -> bool {
    match text.trim() {
        "True" | "true" | "1" => true,
        "False" | "false" | "0" | "" => false,
        other => {
            log::warn!("unrecognised flag '{other}', treating as False");
            false
        }
    }
}

fn optional(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
        .filter(|amount| amount.abs() <= money::MAX_AMOUNT)
}

fn coerce_amount(id: &str, column: &str, text: &str) -> Decimal {
    if text.is_empty() {
        return Decimal::ZERO;
    }
    parse_decimal(text).unwrap_or_else(|| {
        log::warn!("ledger row '{id}': non-numeric {column} '{text}', using 0");
        Decimal::ZERO
    })
}

// Whole number cells; "21.0" is accepted, "21.5" is not.
fn parse_whole(text: &str) -> Option<u8> {
    let value = parse_decimal(text)?;
    if !value.fract().is_zero() {
        return None;
    }
    value.to_u8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn header(cols: &[&str]) -> HeaderMap {
        HeaderMap::from_header(&csv::StringRecord::from(cols.to_vec())).unwrap()
    }

    #[test]
    fn header_line() {
        insta::assert_snapshot!(
            LEDGER_COLUMNS.join(","),
            @"id,date,kind,counterparty,tax_id,description,invoice_number,taxable_base,vat_rate,vat_amount,total,deductible,deduction_pct,deductible_vat_amount,legal_article,fiscal_quarter,status,origin"
        );
    }

    #[test]
    fn flags() {
        assert!(parse_flag("True"));
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
        assert_eq!(format_flag(true), "True");
    }

    #[test]
    fn amounts_have_two_decimals() {
        assert_eq!(format_amount(dec!(100)), "100.00");
        assert_eq!(format_amount(dec!(18.9)), "18.90");
        assert_eq!(format_amount(dec!(0.005)), "0.00");
    }

    #[test]
    fn whole_numbers() {
        assert_eq!(parse_whole("21"), Some(21));
        assert_eq!(parse_whole("21.0"), Some(21));
        assert_eq!(parse_whole("21.5"), None);
        assert_eq!(parse_whole("-4"), None);
        assert_eq!(parse_whole("abc"), None);
    }

    #[test]
    fn corrupt_cells_are_coerced() {
        let map = header(&LEDGER_COLUMNS);
        let record = csv::StringRecord::from(vec![
            "a1", "2025-04-15", "expense", "Shop", "", "thing", "", "abc", "seven", "1,5",
            "", "maybe", "250", "x", "", "2025-Q2", "unknown", "fax",
        ]);
        let tx = decode_row(&map, &record).unwrap();
        assert_eq!(tx.taxable_base, Decimal::ZERO);
        assert_eq!(tx.vat_rate, VatRate::Exempt);
        assert_eq!(tx.vat_amount, Decimal::ZERO);
        assert!(!tx.deductible);
        assert_eq!(tx.deduction_pct, 0);
        assert_eq!(tx.status, TxStatus::Pending);
        assert_eq!(tx.origin, Origin::Manual);
        assert_eq!(tx.tax_id, None);
    }

    #[test]
    fn unknown_kind_is_dropped() {
        let map = header(&LEDGER_COLUMNS);
        let mut cells = vec![""; 18];
        cells[2] = "transfer";
        assert!(decode_row(&map, &csv::StringRecord::from(cells)).is_none());
    }

    #[test]
    fn header_without_kind_is_rejected() {
        let err = HeaderMap::from_header(&csv::StringRecord::from(vec!["a", "b"]));
        assert!(matches!(err, Err(AutonomoError::Ledger(_))));
    }
}
