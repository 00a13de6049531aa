use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::AutonomoError;

/// Where the self-employed person does their work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkLocation {
    /// Works from home (casa).
    Home,
    /// Rented office or coworking (oficina).
    #[default]
    Office,
    /// Part home, part office (mixto).
    Mixed,
}

impl WorkLocation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Office => "office",
            Self::Mixed => "mixed",
        }
    }

    /// Parse from the profile encoding. Legacy Spanish values are accepted.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "home" | "casa" => Some(Self::Home),
            "office" | "oficina" => Some(Self::Office),
            "mixed" | "mixto" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// IVA regime declared at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VatRegime {
    #[default]
    General,
    /// Régimen simplificado (módulos).
    Simplified,
    /// Activity exempt from IVA (e.g. healthcare, education).
    Exempt,
}

/// Smallest and largest declarable share of home expenses.
pub const HOME_OFFICE_PCT_RANGE: std::ops::RangeInclusive<u8> = 5..=50;

/// IRPF withholding percentages a client may apply to an invoice.
pub const WITHHOLDING_OPTIONS: [u8; 4] = [0, 7, 15, 19];

/// The user's fiscal profile.
///
/// Owned by the onboarding flow; the classifiers only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    /// Declared activity (e.g. "Consultoría de marketing digital").
    pub activity: String,
    pub vat_regime: VatRegime,
    pub work_location: WorkLocation,
    /// Share of home utilities attributed to the activity, 5–50.
    pub home_office_pct: u8,
    /// IRPF withholding applied by clients on issued invoices.
    pub withholding_pct: u8,
    /// Enrolled in the flat-rate (tarifa plana) Social Security scheme.
    pub flat_rate_enrolled: bool,
    /// Last day the flat rate applies. `None` means still open-ended.
    pub flat_rate_end_date: Option<NaiveDate>,
    /// Date of registration as self-employed (alta).
    pub registration_date: Option<NaiveDate>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            activity: String::new(),
            vat_regime: VatRegime::General,
            work_location: WorkLocation::Office,
            home_office_pct: 30,
            withholding_pct: 15,
            flat_rate_enrolled: false,
            flat_rate_end_date: None,
            registration_date: None,
        }
    }
}

impl UserProfile {
    /// Profile with the given work location and home-office share.
    pub fn new(work_location: WorkLocation, home_office_pct: u8) -> Self {
        Self {
            work_location,
            home_office_pct,
            ..Default::default()
        }
    }

    /// Check that user-declared percentages are in range.
    pub fn validate(&self) -> Result<(), AutonomoError> {
        if self.work_location != WorkLocation::Office
            && !HOME_OFFICE_PCT_RANGE.contains(&self.home_office_pct)
        {
            return Err(AutonomoError::Profile(format!(
                "home office percentage {} must be between {} and {}",
                self.home_office_pct,
                HOME_OFFICE_PCT_RANGE.start(),
                HOME_OFFICE_PCT_RANGE.end()
            )));
        }
        if !WITHHOLDING_OPTIONS.contains(&self.withholding_pct) {
            return Err(AutonomoError::Profile(format!(
                "withholding percentage {} must be one of {:?}",
                self.withholding_pct, WITHHOLDING_OPTIONS
            )));
        }
        Ok(())
    }

    /// Whether the flat-rate scheme still applies on `date`.
    pub fn flat_rate_active_on(&self, date: NaiveDate) -> bool {
        self.flat_rate_enrolled && self.flat_rate_end_date.is_none_or(|end| date <= end)
    }
}
