use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::core::money::round_cents;

/// 2025 IRPF bracket: income above `from` up to `to` taxed at `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeTaxBracket {
    pub from: Decimal,
    /// `None` for the top bracket.
    pub to: Option<Decimal>,
    pub rate: Decimal,
}

/// Combined state and regional scale used for the annual estimate.
pub const IRPF_2025_BRACKETS: [IncomeTaxBracket; 5] = [
    IncomeTaxBracket { from: dec!(0), to: Some(dec!(12450)), rate: dec!(0.19) },
    IncomeTaxBracket { from: dec!(12450), to: Some(dec!(20200)), rate: dec!(0.24) },
    IncomeTaxBracket { from: dec!(20200), to: Some(dec!(35200)), rate: dec!(0.30) },
    IncomeTaxBracket { from: dec!(35200), to: Some(dec!(60000)), rate: dec!(0.37) },
    IncomeTaxBracket { from: dec!(60000), to: None, rate: dec!(0.45) },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTax {
    pub rate: Decimal,
    /// Portion of the base taxed in this bracket.
    pub taxable: Decimal,
    pub tax: Decimal,
}

/// Annual income-tax estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeTaxEstimate {
    pub taxable_base: Decimal,
    pub total_tax: Decimal,
    /// `total_tax / taxable_base`, 4 decimals; zero for a zero base.
    pub effective_rate: Decimal,
    /// Only brackets the base reaches.
    pub brackets: Vec<BracketTax>,
}

/// Progressive IRPF over the 2025 scale. A non-positive base owes nothing.
pub fn annual_income_tax(taxable_base: Decimal) -> IncomeTaxEstimate {
    let base = taxable_base.max(Decimal::ZERO);
    let mut brackets = Vec::new();

    for bracket in &IRPF_2025_BRACKETS {
        if base <= bracket.from {
            break;
        }
        let upper = bracket.to.map_or(base, |to| base.min(to));
        let taxable = upper - bracket.from;
        brackets.push(BracketTax {
            rate: bracket.rate,
            taxable,
            tax: round_cents(taxable * bracket.rate),
        });
    }

    let total_tax: Decimal = brackets.iter().map(|b| b.tax).sum();
    let effective_rate = if base.is_zero() {
        Decimal::ZERO
    } else {
        (total_tax / base).round_dp(4)
    };

    IncomeTaxEstimate {
        taxable_base: base,
        total_tax,
        effective_rate,
        brackets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_bracket_only() {
        let e = annual_income_tax(dec!(10000));
        assert_eq!(e.total_tax, dec!(1900.00));
        assert_eq!(e.effective_rate, dec!(0.19));
        assert_eq!(e.brackets.len(), 1);
    }

    #[test]
    fn spans_brackets() {
        // 12450×19% + 7750×24% + 9800×30%
        let e = annual_income_tax(dec!(30000));
        assert_eq!(e.total_tax, dec!(7165.50));
        assert_eq!(e.brackets.len(), 3);
        assert_eq!(e.brackets[2].taxable, dec!(9800));
    }

    #[test]
    fn top_bracket_is_open() {
        let e = annual_income_tax(dec!(100000));
        // 2365.50 + 1860 + 4500 + 9176 + 18000
        assert_eq!(e.total_tax, dec!(35901.50));
        assert_eq!(e.brackets.len(), 5);
    }

    #[test]
    fn nothing_owed_on_loss() {
        let e = annual_income_tax(dec!(-5000));
        assert_eq!(e.total_tax, Decimal::ZERO);
        assert_eq!(e.effective_rate, Decimal::ZERO);
        assert!(e.brackets.is_empty());
    }
}
