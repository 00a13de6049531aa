#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Hand-edited ledgers: errors are fine, panics are bugs.
    if let Ok(rows) = autonomo::ledger::read_transactions(data) {
        let _ = autonomo::report::ytd_summary(&rows, 2025, 4);
        let _ = autonomo::report::monthly_breakdown(&rows, 2025);
    }
});
