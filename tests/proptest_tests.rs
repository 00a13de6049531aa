//! Property-based tests for amounts, quarters, classifiers and reports.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "core")]

use autonomo::core::*;
use autonomo::report::*;
use autonomo::rules::*;
use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ── Proptest Strategies ─────────────────────────────────────────────────────

fn arb_base() -> impl Strategy<Value = Decimal> {
    (0u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn arb_rate() -> impl Strategy<Value = VatRate> {
    prop_oneof![
        Just(VatRate::Exempt),
        Just(VatRate::SuperReduced),
        Just(VatRate::Reduced),
        Just(VatRate::General),
    ]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_location() -> impl Strategy<Value = WorkLocation> {
    prop_oneof![
        Just(WorkLocation::Home),
        Just(WorkLocation::Office),
        Just(WorkLocation::Mixed),
    ]
}

fn arb_transaction() -> impl Strategy<Value = Transaction> {
    (any::<bool>(), arb_base(), arb_rate(), 0u8..=100, arb_date()).prop_map(
        |(is_income, base, rate, pct, date)| {
            let builder = if is_income {
                TransactionBuilder::income("C", base)
            } else {
                TransactionBuilder::expense("S", base).deduction_pct(pct)
            };
            builder
                .vat_rate(rate)
                .date(date)
                .build()
                .unwrap()
                .into_transaction("p")
        },
    )
}

// ── Amounts ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn derived_amounts_are_consistent(
        base in arb_base(),
        rate in arb_rate(),
        pct in 0u8..=100,
    ) {
        let entry = TransactionBuilder::expense("S", base)
            .vat_rate(rate)
            .deduction_pct(pct)
            .build()
            .unwrap();

        prop_assert_eq!(entry.vat_amount, (base * rate.as_decimal() / dec!(100)).round_dp(2));
        prop_assert_eq!(entry.total, entry.taxable_base + entry.vat_amount);
        prop_assert!(entry.deductible_vat_amount >= Decimal::ZERO);
        prop_assert!(entry.deductible_vat_amount <= entry.vat_amount);
        prop_assert_eq!(entry.deductible, pct > 0);
        prop_assert!(entry.vat_amount.scale() <= 2);
    }

    #[test]
    fn income_never_carries_deduction(base in arb_base(), rate in arb_rate()) {
        let entry = TransactionBuilder::income("C", base).vat_rate(rate).build().unwrap();
        prop_assert!(!entry.deductible);
        prop_assert_eq!(entry.deduction_pct, 0);
        prop_assert_eq!(entry.deductible_vat_amount, Decimal::ZERO);
    }

    #[test]
    fn parse_amount_reads_spanish_format(cents in 0u64..100_000_000u64) {
        let amount = Decimal::new(cents as i64, 2);
        let euros = cents / 100;
        let spanish = format!("{},{:02} €", euros, cents % 100);
        prop_assert_eq!(money::parse_amount(&spanish), Some(amount));
    }
}

// ── Quarters ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn quarter_contains_its_date(date in arb_date()) {
        let q = FiscalQuarter::from_date(date);
        prop_assert!(q.contains(date));
        prop_assert!((1..=4).contains(&q.quarter()));
        prop_assert!(q.first_month() <= date.month() && date.month() < q.first_month() + 3);
        prop_assert_eq!(q.year(), date.year());
    }

    #[test]
    fn next_and_previous_are_inverse(date in arb_date()) {
        let q = FiscalQuarter::from_date(date);
        prop_assert_eq!(q.next().previous(), q);
        prop_assert!(q.next() > q);
    }

    #[test]
    fn filing_deadline_is_after_quarter(date in arb_date()) {
        let q = FiscalQuarter::from_date(date);
        let due = filing_due_date(q);
        prop_assert!(due > date);
        prop_assert_eq!(due.day(), FILING_DAY);
    }
}

// ── Classifiers ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn vat_confidence_tracks_keyword(description in "\\PC{0,60}", counterparty in "\\PC{0,30}") {
        let rules = RuleTable::spain_2025();
        let r = classify_vat(&description, &counterparty, &rules);
        prop_assert_eq!(r.confidence == Confidence::Low, r.matched_keyword.is_none());
        prop_assert_eq!(r.exempt, r.rate == VatRate::Exempt);
        if r.confidence == Confidence::Low {
            prop_assert_eq!(r.rate, VatRate::General);
        }
    }

    #[test]
    fn deduction_within_bounds(
        description in "\\PC{0,60}",
        rate in arb_rate(),
        location in arb_location(),
        pct in 5u8..=50,
    ) {
        let rules = RuleTable::spain_2025();
        let profile = UserProfile::new(location, pct);
        let exempt = rate == VatRate::Exempt;
        let r = classify_deductibility(&description, rate, exempt, &profile, &rules);
        prop_assert!(r.deduction_pct <= 100);
        prop_assert_eq!(r.deductible, r.deduction_pct > 0);
        if rate == VatRate::Exempt {
            prop_assert_eq!(r.deduction_pct, 0);
        }
    }

    #[test]
    fn keywords_match_regardless_of_case(word in "[a-z]{3,12}") {
        let upper = word.to_uppercase();
        let keywords = [word.as_str()];
        prop_assert_eq!(keyword_match(&upper, &keywords), Some(word.as_str()));
    }
}

// ── Reports ─────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn settlement_is_due_or_carried(rows in prop::collection::vec(arb_transaction(), 0..20)) {
        let m = vat_settlement(&rows);
        prop_assert_eq!(m.amount_due - m.amount_to_carry_forward, m.result);
        prop_assert!(m.amount_due.is_zero() || m.amount_to_carry_forward.is_zero());
        prop_assert!(m.vat_paid_deductible <= m.vat_paid_total);
    }

    #[test]
    fn monthly_breakdown_covers_year(
        rows in prop::collection::vec(arb_transaction(), 0..20),
        year in 2000i32..2100,
    ) {
        let months = monthly_breakdown(&rows, year);
        prop_assert_eq!(months.len(), 12);

        let income: Decimal = months.iter().map(|m| m.income).sum();
        let expected: Decimal = rows
            .iter()
            .filter(|tx| tx.is_income() && tx.date.is_some_and(|d| d.year() == year))
            .map(|tx| tx.taxable_base)
            .sum();
        prop_assert_eq!(income, expected);
        prop_assert!(months.iter().all(|m| m.tax_provision >= Decimal::ZERO));
    }

    #[test]
    fn quarter_summaries_add_up_to_ytd(rows in prop::collection::vec(arb_transaction(), 0..20)) {
        let year = 2050;
        let rows: Vec<Transaction> = rows
            .into_iter()
            .map(|mut tx| {
                let d = tx.date.unwrap();
                let d = NaiveDate::from_ymd_opt(year, d.month(), d.day()).unwrap();
                tx.date = Some(d);
                tx.quarter = Some(FiscalQuarter::from_date(d));
                tx
            })
            .collect();

        let ytd = ytd_summary(&rows, year, 4);
        let by_quarter: Decimal = (1..=4)
            .map(|n| quarterly_summary(&rows, FiscalQuarter::new(year, n).unwrap()).net_profit)
            .sum();
        prop_assert_eq!(ytd.net_profit, by_quarter);
        prop_assert_eq!(ytd.invoice_count + ytd.expense_count, rows.len());
    }

    #[test]
    fn contribution_grows_with_income(a in 0u64..1_000_000u64, b in 0u64..1_000_000u64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = Decimal::new(lo as i64, 2);
        let hi = Decimal::new(hi as i64, 2);
        prop_assert!(
            social_security_contribution(lo, false, false)
                <= social_security_contribution(hi, false, false)
        );
    }

    #[test]
    fn income_tax_is_bounded(base in arb_base()) {
        let est = annual_income_tax(base);
        prop_assert!(est.total_tax >= Decimal::ZERO);
        prop_assert!(est.total_tax <= (base * dec!(0.45)).round_dp(2) + dec!(0.05));
        let taxed: Decimal = est.brackets.iter().map(|b| b.taxable).sum();
        prop_assert_eq!(taxed, base);
    }
}
