#![no_main]

use autonomo::core::{UserProfile, WorkLocation};
use autonomo::rules::{RuleTable, classify_deductibility, classify_vat, normalize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let rules = RuleTable::spain_2025();
        let profile = UserProfile::new(WorkLocation::Mixed, 20);
        let _ = normalize(s);
        let vat = classify_vat(s, s, &rules);
        let ded = classify_deductibility(s, vat.rate, vat.exempt, &profile, &rules);
        assert!(ded.deduction_pct <= 100);
    }
});
