use serde::Serialize;

use super::normalize::{find_keyword, normalize};
use super::table::RuleTable;
use crate::core::{Confidence, VatRate};

/// Order in which rates are tried. Narrow categories come first so a
/// generic keyword cannot mask a lower rate.
pub const VAT_PRECEDENCE: [VatRate; 4] = [
    VatRate::SuperReduced,
    VatRate::Reduced,
    VatRate::Exempt,
    VatRate::General,
];

/// Outcome of [`classify_vat`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VatClassification {
    pub rate: VatRate,
    pub label: String,
    pub article: String,
    /// True only for the 0% rate.
    pub exempt: bool,
    pub confidence: Confidence,
    /// The keyword that triggered the rate, as written in the rule table.
    /// `None` for the low-confidence default.
    pub matched_keyword: Option<String>,
}

impl VatClassification {
    pub fn needs_review(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

/// Classify the IVA rate of a transaction from its description and
/// counterparty name.
///
/// Rates are tried in [`VAT_PRECEDENCE`] order against the concatenated
/// text; the first keyword hit wins with high confidence. Without any hit
/// the general rate is returned with [`Confidence::Low`].
///
/// ```
/// use autonomo::core::{Confidence, VatRate};
/// use autonomo::rules::{RuleTable, classify_vat};
///
/// let rules = RuleTable::spain_2025();
/// let result = classify_vat("Compra de pan", "Panadería", &rules);
/// assert_eq!(result.rate, VatRate::SuperReduced);
/// assert_eq!(result.confidence, Confidence::High);
/// ```
pub fn classify_vat(description: &str, counterparty: &str, rules: &RuleTable) -> VatClassification {
    let text = normalize(&format!("{description} {counterparty}"));

    for rate in VAT_PRECEDENCE {
        let rule = rules.vat_rule(rate);
        if let Some(keyword) = find_keyword(&text, &rule.keywords) {
            log::debug!("VAT {rate} for '{description}' (keyword '{keyword}')");
            return VatClassification {
                rate,
                label: rule.label.clone(),
                article: rule.article.clone(),
                exempt: rate == VatRate::Exempt,
                confidence: Confidence::High,
                matched_keyword: Some(keyword.to_string()),
            };
        }
    }

    log::debug!("no VAT keyword for '{description}'; defaulting to general rate");
    let general = rules.vat_rule(VatRate::General);
    VatClassification {
        rate: VatRate::General,
        label: general.label.clone(),
        article: general.article.clone(),
        exempt: false,
        confidence: Confidence::Low,
        matched_keyword: None,
    }
}
