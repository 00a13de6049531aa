use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Monthly contribution under the flat-rate (tarifa plana) scheme.
pub const FLAT_RATE_MONTHLY: Decimal = dec!(80);

/// One RETA 2025 income bracket: `[low, high)` of net monthly income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionBracket {
    pub low: Decimal,
    /// `None` for the open top bracket.
    pub high: Option<Decimal>,
    pub monthly_contribution: Decimal,
}

impl ContributionBracket {
    const fn new(low: Decimal, high: Decimal, monthly_contribution: Decimal) -> Self {
        Self {
            low,
            high: Some(high),
            monthly_contribution,
        }
    }

    pub fn contains(&self, income: Decimal) -> bool {
        self.low <= income && self.high.is_none_or(|high| income < high)
    }
}

/// RETA 2025 contribution table by net monthly income.
pub const RETA_2025_BRACKETS: [ContributionBracket; 15] = [
    ContributionBracket::new(dec!(0), dec!(670), dec!(200)),
    ContributionBracket::new(dec!(670), dec!(900), dec!(275)),
    ContributionBracket::new(dec!(900), dec!(1166.70), dec!(291)),
    ContributionBracket::new(dec!(1166.70), dec!(1300), dec!(294)),
    ContributionBracket::new(dec!(1300), dec!(1500), dec!(350)),
    ContributionBracket::new(dec!(1500), dec!(1700), dec!(370)),
    ContributionBracket::new(dec!(1700), dec!(1850), dec!(390)),
    ContributionBracket::new(dec!(1850), dec!(2030), dec!(415)),
    ContributionBracket::new(dec!(2030), dec!(2330), dec!(490)),
    ContributionBracket::new(dec!(2330), dec!(2760), dec!(530)),
    ContributionBracket::new(dec!(2760), dec!(3190), dec!(610)),
    ContributionBracket::new(dec!(3190), dec!(3620), dec!(700)),
    ContributionBracket::new(dec!(3620), dec!(4050), dec!(850)),
    ContributionBracket::new(dec!(4050), dec!(6000), dec!(1000)),
    ContributionBracket {
        low: dec!(6000),
        high: None,
        monthly_contribution: dec!(1267),
    },
];

/// Monthly Social Security contribution for a self-employed worker.
///
/// The flat rate applies only when enrolled and still active. Otherwise the
/// bracket containing `net_monthly_income` decides; a loss (negative income)
/// pays the lowest bracket.
///
/// Income is clamped at zero before the lookup, so a loss never falls
/// through to the top bracket.
pub fn social_security_contribution(
    net_monthly_income: Decimal,
    flat_rate_enrolled: bool,
    flat_rate_active: bool,
) -> Decimal {
    if flat_rate_enrolled && flat_rate_active {
        return FLAT_RATE_MONTHLY;
    }
    let income = net_monthly_income.max(Decimal::ZERO);
    RETA_2025_BRACKETS
        .iter()
        .find(|b| b.contains(income))
        .unwrap_or(&RETA_2025_BRACKETS[RETA_2025_BRACKETS.len() - 1])
        .monthly_contribution
}
