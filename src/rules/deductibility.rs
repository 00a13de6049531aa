use serde::Serialize;

use super::normalize::{find_keyword, normalize};
use super::table::RuleTable;
use crate::core::{Confidence, UserProfile, VatRate};

/// Deduction share for mixed-use vehicle expenses.
pub const VEHICLE_DEDUCTION_PCT: u8 = 50;

/// Which branch of the deductibility policy decided the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    /// VAT-exempt purchase: no input VAT to reclaim.
    Exempt,
    Vehicle,
    /// Home utilities for an eligible work location.
    HomeOffice,
    /// Home utilities, but the user works from an office.
    HomeOfficeIneligible,
    /// Personal expense.
    NonDeductible,
    Professional,
    /// No keyword matched; defaulted to fully deductible.
    Unmatched,
    /// Not classified at all (e.g. the source document could not be read).
    Unassessed,
}

/// Outcome of [`classify_deductibility`].
///
/// Carries the percentage only. The deductible VAT amount is computed by
/// the caller once the VAT amount is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductibilityClassification {
    pub deductible: bool,
    pub deduction_pct: u8,
    pub article: String,
    /// Human-readable explanation (Spanish) with keyword and article.
    pub justification: String,
    pub category: DeductionCategory,
    pub confidence: Confidence,
    pub matched_keyword: Option<String>,
}

impl DeductibilityClassification {
    fn new(
        category: DeductionCategory,
        deduction_pct: u8,
        article: &str,
        justification: String,
        matched_keyword: Option<&str>,
    ) -> Self {
        Self {
            deductible: deduction_pct > 0,
            deduction_pct,
            article: article.to_string(),
            justification,
            category,
            confidence: if category == DeductionCategory::Unmatched
                || category == DeductionCategory::Unassessed
            {
                Confidence::Low
            } else {
                Confidence::High
            },
            matched_keyword: matched_keyword.map(str::to_string),
        }
    }

    /// Placeholder for a document that was never classified.
    pub fn unassessed() -> Self {
        Self::new(DeductionCategory::Unassessed, 0, "", String::new(), None)
    }
}

/// Decide how much of an expense's input VAT may be deducted.
///
/// Policy, first match wins:
/// 1. exempt purchase (flag or 0% rate): 0%
/// 2. vehicle keyword: 50%
/// 3. home-utility keyword: the profile's home-office share if the work
///    location qualifies, otherwise 0%
/// 4. personal-expense keyword: 0%
/// 5. professional keyword: 100%
/// 6. nothing matched: 100% with [`Confidence::Low`]
pub fn classify_deductibility(
    description: &str,
    vat_rate: VatRate,
    exempt: bool,
    profile: &UserProfile,
    rules: &RuleTable,
) -> DeductibilityClassification {
    use DeductionCategory::*;

    if exempt || vat_rate == VatRate::Exempt {
        let article = &rules.vat_rule(VatRate::Exempt).article;
        return DeductibilityClassification::new(
            Exempt,
            0,
            article,
            format!("No deducible: operación exenta de IVA ({article})"),
            None,
        );
    }

    let text = normalize(description);

    let vehicle = rules.vehicle();
    if let Some(kw) = find_keyword(&text, &vehicle.keywords) {
        return decided(
            Vehicle,
            VEHICLE_DEDUCTION_PCT,
            &vehicle.article,
            format!(
                "{VEHICLE_DEDUCTION_PCT}% deducible: vehículo de uso mixto ({kw}), {}",
                vehicle.article
            ),
            kw,
            description,
        );
    }

    let home = rules.home_office();
    if let Some(kw) = find_keyword(&text, &home.keywords) {
        if home.applies_to(profile.work_location) {
            let pct = profile.home_office_pct.min(100);
            return decided(
                HomeOffice,
                pct,
                &home.article,
                format!("{pct}% deducible: suministro del hogar ({kw}), {}", home.article),
                kw,
                description,
            );
        }
        return decided(
            HomeOfficeIneligible,
            0,
            &home.article,
            format!(
                "No deducible: trabajas en oficina, no aplica la deducción de suministros del hogar ({kw}), {}",
                home.article
            ),
            kw,
            description,
        );
    }

    let personal = rules.non_deductible();
    if let Some(kw) = find_keyword(&text, &personal.keywords) {
        return decided(
            NonDeductible,
            0,
            &personal.article,
            format!("No deducible: gasto personal ({kw}), {}", personal.article),
            kw,
            description,
        );
    }

    let professional = rules.professional();
    if let Some(kw) = find_keyword(&text, &professional.keywords) {
        return decided(
            Professional,
            100,
            &professional.article,
            format!("100% deducible: gasto profesional ({kw}), {}", professional.article),
            kw,
            description,
        );
    }

    log::debug!("no deductibility keyword for '{description}'; defaulting to 100%");
    DeductibilityClassification::new(
        Unmatched,
        100,
        &professional.article,
        format!(
            "100% deducible (clasificación automática, verificar), {}",
            professional.article
        ),
        None,
    )
}

fn decided(
    category: DeductionCategory,
    pct: u8,
    article: &str,
    justification: String,
    keyword: &str,
    description: &str,
) -> DeductibilityClassification {
    log::debug!("{pct}% deductible ({category:?}) for '{description}' (keyword '{keyword}')");
    DeductibilityClassification::new(category, pct, article, justification, Some(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorkLocation;

    fn classify(description: &str, profile: &UserProfile) -> DeductibilityClassification {
        classify_deductibility(
            description,
            VatRate::General,
            false,
            profile,
            &RuleTable::spain_2025(),
        )
    }

    #[test]
    fn exempt_is_never_deductible() {
        let r = classify_deductibility(
            "médico",
            VatRate::Exempt,
            true,
            &UserProfile::default(),
            &RuleTable::spain_2025(),
        );
        assert_eq!(r.deduction_pct, 0);
        assert!(!r.deductible);
        assert_eq!(r.category, DeductionCategory::Exempt);
        assert_eq!(r.article, "Art. 20 Ley 37/1992");
    }

    #[test]
    fn exempt_gate_precedes_home_office() {
        let profile = UserProfile::new(WorkLocation::Home, 30);
        let r = classify_deductibility(
            "electricidad",
            VatRate::General,
            true,
            &profile,
            &RuleTable::spain_2025(),
        );
        assert_eq!(r.category, DeductionCategory::Exempt);
        assert_eq!(r.deduction_pct, 0);
    }

    #[test]
    fn zero_rate_alone_closes_the_gate() {
        let profile = UserProfile::new(WorkLocation::Home, 30);
        let r = classify_deductibility(
            "electricidad",
            VatRate::Exempt,
            false,
            &profile,
            &RuleTable::spain_2025(),
        );
        assert_eq!(r.category, DeductionCategory::Exempt);
        assert_eq!(r.deduction_pct, 0);
        assert!(!r.deductible);
    }

    #[test]
    fn vehicle_is_half() {
        let r = classify("gasolina", &UserProfile::default());
        assert_eq!(r.deduction_pct, 50);
        assert_eq!(r.article, "Art. 95.Tres Ley 37/1992");
        assert_eq!(r.matched_keyword.as_deref(), Some("gasolina"));
    }

    #[test]
    fn home_utilities_for_home_worker() {
        let r = classify("electricidad", &UserProfile::new(WorkLocation::Home, 30));
        assert_eq!(r.deduction_pct, 30);
        assert!(r.deductible);
        assert_eq!(r.category, DeductionCategory::HomeOffice);
    }

    #[test]
    fn home_utilities_for_office_worker() {
        let r = classify("internet", &UserProfile::new(WorkLocation::Office, 50));
        assert_eq!(r.deduction_pct, 0);
        assert!(!r.deductible);
        assert_eq!(r.category, DeductionCategory::HomeOfficeIneligible);
        assert!(r.justification.contains("oficina"));
    }

    #[test]
    fn mixed_uses_declared_share() {
        let r = classify("agua", &UserProfile::new(WorkLocation::Mixed, 25));
        assert_eq!(r.deduction_pct, 25);
    }

    #[test]
    fn personal_expense() {
        let r = classify("ropa", &UserProfile::default());
        assert_eq!(r.deduction_pct, 0);
        assert_eq!(r.category, DeductionCategory::NonDeductible);
    }

    #[test]
    fn professional_expense() {
        let r = classify("software", &UserProfile::default());
        assert_eq!(r.deduction_pct, 100);
        assert_eq!(r.confidence, Confidence::High);
    }

    #[test]
    fn unmatched_defaults_to_full_low_confidence() {
        let r = classify("cosa rara", &UserProfile::default());
        assert_eq!(r.deduction_pct, 100);
        assert_eq!(r.category, DeductionCategory::Unmatched);
        assert_eq!(r.confidence, Confidence::Low);
        assert!(r.justification.contains("verificar"));
    }
}
