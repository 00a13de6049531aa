//! Spanish VAT and deductibility rules.
//!
//! A [`RuleTable`] holds keyword triggers and legal citations for the four
//! IVA rates and the four deductibility categories. The classifiers are pure
//! functions over a table passed in by the caller.
//!
//! ```
//! use autonomo::core::{UserProfile, VatRate, WorkLocation};
//! use autonomo::rules::{RuleTable, classify_deductibility, classify_vat};
//!
//! let rules = RuleTable::spain_2025();
//! let profile = UserProfile::new(WorkLocation::Home, 30);
//!
//! let vat = classify_vat("Factura electricidad", "Iberdrola", &rules);
//! assert_eq!(vat.rate, VatRate::General);
//!
//! let ded = classify_deductibility("Factura electricidad", vat.rate, vat.exempt, &profile, &rules);
//! assert_eq!(ded.deduction_pct, 30);
//! ```

mod deductibility;
mod normalize;
mod table;
mod vat;

pub use deductibility::{
    DeductibilityClassification, DeductionCategory, VEHICLE_DEDUCTION_PCT,
    classify_deductibility,
};
pub use normalize::{keyword_match, normalize};
pub use table::{DeductionRule, HomeOfficeRule, RuleTable, SPAIN_2025_RULES, VatRule};
pub use vat::{VAT_PRECEDENCE, VatClassification, classify_vat};
