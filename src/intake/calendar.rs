use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{
    AutonomoError, LedgerEntry, Origin, TransactionBuilder, TxStatus, VatRate, parse_iso_date,
};
use crate::rules::RuleTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Scheduled, not yet held.
    Active,
    Completed,
    Canceled,
}

impl EventStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Accepts the scheduler's English codes and the Spanish ones.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "active" | "activo" => Some(Self::Active),
            "completed" | "completado" => Some(Self::Completed),
            "canceled" | "cancelled" | "cancelado" => Some(Self::Canceled),
            _ => None,
        }
    }
}

/// A booked meeting as reported by the scheduling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingEvent {
    pub id: String,
    /// Event type name, used as the invoice description.
    pub name: String,
    pub client_name: String,
    pub client_email: String,
    /// ISO-8601 timestamp.
    pub start_time: String,
    pub end_time: String,
    pub status: EventStatus,
    /// Agreed fee before VAT, when the scheduler knows it.
    pub price: Option<Decimal>,
}

/// Income draft for a completed meeting at the general VAT rate.
///
/// Returns `None` for meetings that are still scheduled or were canceled.
pub fn income_draft(
    event: &MeetingEvent,
    rules: &RuleTable,
) -> Result<Option<LedgerEntry>, AutonomoError> {
    if event.status != EventStatus::Completed {
        return Ok(None);
    }

    let mut builder =
        TransactionBuilder::income(&event.client_name, event.price.unwrap_or_default())
            .description(&event.name)
            .vat_rate(VatRate::General)
            .legal_article(&rules.vat_rule(VatRate::General).article)
            .status(TxStatus::Pending)
            .origin(Origin::Calendly);
    if let Some(date) = parse_iso_date(&event.start_time) {
        builder = builder.date(date);
    }

    let entry = builder.build()?;
    log::debug!("drafted income for meeting {} with {}", event.id, event.client_name);
    Ok(Some(entry))
}
