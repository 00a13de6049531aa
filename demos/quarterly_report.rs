use autonomo::config::Config;
use autonomo::core::*;
use autonomo::report::*;
use rust_decimal::Decimal;

fn main() -> Result<(), AutonomoError> {
    // AUTONOMO_LEDGER_PATH overrides data/ledger.csv
    let config = Config::from_env();
    let store = config.open_ledger();
    let snapshot = store.load()?;
    let quarter = FiscalQuarter::current().previous();

    println!("Ledger: {} ({} rows)", store.path().display(), snapshot.len());
    println!("=== {quarter} ===");

    let summary = quarterly_summary(&snapshot, quarter);
    println!("Income:              {:>10}", summary.total_income);
    println!("Deductible expenses: {:>10}", summary.total_deductible_expense_base);
    println!("Net profit:          {:>10}", summary.net_profit);

    let m303 = modelo_303(&snapshot, quarter);
    if m303.is_payable() {
        println!("Modelo 303 to pay:   {:>10}", m303.amount_due);
    } else {
        println!("Modelo 303 to carry: {:>10}", m303.amount_to_carry_forward);
    }

    let m130 = modelo_130(&snapshot, quarter.year(), quarter.quarter(), Decimal::ZERO);
    println!("Modelo 130 to pay:   {:>10}", m130.net_prepayment);

    let deadline = next_filing_deadline(quarter, today());
    println!("Due {} ({} days)", deadline.due_date, deadline.days_remaining);

    let overdue: Vec<_> = ar_aging(&snapshot)
        .into_iter()
        .filter(|row| row.bucket != AgingBucket::Current)
        .collect();
    for row in &overdue {
        println!(
            "  unpaid {} {} [{}]",
            row.transaction.counterparty, row.transaction.total, row.bucket
        );
    }
    Ok(())
}
