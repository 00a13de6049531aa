use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::{AutonomoError, VatRate, WorkLocation};

/// The 2025 rule table shipped with the crate.
pub const SPAIN_2025_RULES: &str = include_str!("tax_rules_2025.json");

/// Keyword triggers for one IVA rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatRule {
    /// Checked in list order; the first hit is reported.
    pub keywords: Vec<String>,
    pub label: String,
    pub article: String,
}

/// Keyword triggers for one deductibility category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionRule {
    pub keywords: Vec<String>,
    pub article: String,
}

/// The home-office category: keywords plus the work locations that qualify.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeOfficeRule {
    pub keywords: Vec<String>,
    pub article: String,
    pub eligible_locations: Vec<WorkLocation>,
}

impl HomeOfficeRule {
    pub fn applies_to(&self, location: WorkLocation) -> bool {
        self.eligible_locations.contains(&location)
    }
}

/// Validated VAT and deductibility rules with their legal citations.
///
/// Every rate in [`VatRate::ALL`] and every deductibility category is
/// guaranteed present, so lookups never miss. Pass the table explicitly
/// to the classifiers; there is no process-wide cache.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    version: Option<String>,
    exempt: VatRule,
    super_reduced: VatRule,
    reduced: VatRule,
    general: VatRule,
    vehicle: DeductionRule,
    home_office: HomeOfficeRule,
    non_deductible: DeductionRule,
    professional: DeductionRule,
}

// Document layout: two sections keyed by rate string and category name.
#[derive(Deserialize)]
struct RawTable {
    #[serde(default)]
    version: Option<String>,
    iva_rates: BTreeMap<String, VatRule>,
    deductibility_rules: BTreeMap<String, RawCategory>,
}

#[derive(Deserialize)]
struct RawCategory {
    keywords: Vec<String>,
    article: String,
    #[serde(default)]
    condition: Option<RawCondition>,
}

#[derive(Deserialize)]
struct RawCondition {
    work_location: Vec<String>,
}

const CATEGORY_VEHICLE: &str = "partial_50";
const CATEGORY_HOME: &str = "partial_home";
const CATEGORY_NON_DEDUCTIBLE: &str = "zero_0";
const CATEGORY_PROFESSIONAL: &str = "full_100";
const CATEGORIES: [&str; 4] = [
    CATEGORY_VEHICLE,
    CATEGORY_HOME,
    CATEGORY_NON_DEDUCTIBLE,
    CATEGORY_PROFESSIONAL,
];

impl RuleTable {
    /// The embedded 2025 table.
    pub fn spain_2025() -> Self {
        Self::from_json(SPAIN_2025_RULES).expect("embedded 2025 rule table is valid")
    }

    /// Parse and validate a rule table document.
    pub fn from_json(text: &str) -> Result<Self, AutonomoError> {
        let raw: RawTable = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Read a rule table document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AutonomoError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_json(&text)?;
        log::info!(
            "loaded rule table {} from {}",
            table.version().unwrap_or("(unversioned)"),
            path.as_ref().display()
        );
        Ok(table)
    }

    fn from_raw(mut raw: RawTable) -> Result<Self, AutonomoError> {
        if let Some(key) = raw
            .iva_rates
            .keys()
            .find(|k| !VatRate::ALL.iter().any(|r| r.key() == k.as_str()))
        {
            return Err(AutonomoError::RuleTable(format!(
                "unsupported VAT rate key '{key}'"
            )));
        }
        if let Some(name) = raw
            .deductibility_rules
            .keys()
            .find(|k| !CATEGORIES.contains(&k.as_str()))
        {
            return Err(AutonomoError::RuleTable(format!(
                "unknown deductibility category '{name}'"
            )));
        }

        let mut take_rate = |rate: VatRate| {
            raw.iva_rates.remove(rate.key()).ok_or_else(|| {
                AutonomoError::RuleTable(format!("missing VAT rate '{}'", rate.key()))
            })
        };
        let exempt = take_rate(VatRate::Exempt)?;
        let super_reduced = take_rate(VatRate::SuperReduced)?;
        let reduced = take_rate(VatRate::Reduced)?;
        let general = take_rate(VatRate::General)?;

        let mut take_category = |name: &str| {
            raw.deductibility_rules.remove(name).ok_or_else(|| {
                AutonomoError::RuleTable(format!("missing deductibility category '{name}'"))
            })
        };
        let vehicle = take_category(CATEGORY_VEHICLE)?;
        let home = take_category(CATEGORY_HOME)?;
        let non_deductible = take_category(CATEGORY_NON_DEDUCTIBLE)?;
        let professional = take_category(CATEGORY_PROFESSIONAL)?;

        let condition = home.condition.ok_or_else(|| {
            AutonomoError::RuleTable(format!("category '{CATEGORY_HOME}' has no condition"))
        })?;
        let eligible_locations = condition
            .work_location
            .iter()
            .map(|code| {
                WorkLocation::from_code(code).ok_or_else(|| {
                    AutonomoError::RuleTable(format!("unknown work location '{code}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: raw.version,
            exempt,
            super_reduced,
            reduced,
            general,
            vehicle: vehicle.into_rule(),
            home_office: HomeOfficeRule {
                keywords: home.keywords,
                article: home.article,
                eligible_locations,
            },
            non_deductible: non_deductible.into_rule(),
            professional: professional.into_rule(),
        })
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn vat_rule(&self, rate: VatRate) -> &VatRule {
        match rate {
            VatRate::Exempt => &self.exempt,
            VatRate::SuperReduced => &self.super_reduced,
            VatRate::Reduced => &self.reduced,
            VatRate::General => &self.general,
        }
    }

    /// Mixed-use vehicle expenses (50%).
    pub fn vehicle(&self) -> &DeductionRule {
        &self.vehicle
    }

    /// Home utilities, deductible at the user's declared share.
    pub fn home_office(&self) -> &HomeOfficeRule {
        &self.home_office
    }

    /// Personal expenses (0%).
    pub fn non_deductible(&self) -> &DeductionRule {
        &self.non_deductible
    }

    /// Professional expenses (100%).
    pub fn professional(&self) -> &DeductionRule {
        &self.professional
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::spain_2025()
    }
}

impl RawCategory {
    fn into_rule(self) -> DeductionRule {
        DeductionRule {
            keywords: self.keywords,
            article: self.article,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded_value() -> serde_json::Value {
        serde_json::from_str(SPAIN_2025_RULES).unwrap()
    }

    #[test]
    fn embedded_table_is_complete() {
        let table = RuleTable::spain_2025();
        assert_eq!(table.version(), Some("2025.1"));
        for rate in VatRate::ALL {
            assert!(!table.vat_rule(rate).keywords.is_empty(), "{rate}");
        }
        assert_eq!(table.vat_rule(VatRate::General).article, "Art. 90.Uno Ley 37/1992");
        assert!(table.home_office().applies_to(WorkLocation::Home));
        assert!(table.home_office().applies_to(WorkLocation::Mixed));
        assert!(!table.home_office().applies_to(WorkLocation::Office));
    }

    #[test]
    fn missing_rate_is_integrity_fault() {
        let mut doc = embedded_value();
        doc["iva_rates"].as_object_mut().unwrap().remove("10");
        let err = RuleTable::from_json(&doc.to_string()).unwrap_err();
        assert!(matches!(err, AutonomoError::RuleTable(ref m) if m.contains("'10'")));
    }

    #[test]
    fn unknown_rate_is_rejected() {
        let mut doc = embedded_value();
        doc["iva_rates"]["7"] = doc["iva_rates"]["21"].clone();
        assert!(matches!(
            RuleTable::from_json(&doc.to_string()),
            Err(AutonomoError::RuleTable(_))
        ));
    }

    #[test]
    fn missing_category_is_rejected() {
        let mut doc = embedded_value();
        doc["deductibility_rules"]
            .as_object_mut()
            .unwrap()
            .remove("zero_0");
        assert!(matches!(
            RuleTable::from_json(&doc.to_string()),
            Err(AutonomoError::RuleTable(_))
        ));
    }

    #[test]
    fn home_condition_required() {
        let mut doc = embedded_value();
        doc["deductibility_rules"]["partial_home"]
            .as_object_mut()
            .unwrap()
            .remove("condition");
        assert!(RuleTable::from_json(&doc.to_string()).is_err());
    }

    #[test]
    fn legacy_condition_codes() {
        let mut doc = embedded_value();
        doc["deductibility_rules"]["partial_home"]["condition"]["work_location"] =
            serde_json::json!(["casa", "mixto"]);
        let table = RuleTable::from_json(&doc.to_string()).unwrap();
        assert!(table.home_office().applies_to(WorkLocation::Home));
    }

    #[test]
    fn malformed_document_is_json_error() {
        assert!(matches!(
            RuleTable::from_json("{not json"),
            Err(AutonomoError::Json(_))
        ));
    }
}
