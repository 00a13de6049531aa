#![no_main]

use autonomo::core::{Origin, UserProfile};
use autonomo::intake::{ExtractionMethod, ExtractionOutcome, classify_document};
use autonomo::rules::RuleTable;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let outcome = ExtractionOutcome::from_llm_response(s);
        let doc = classify_document(
            outcome,
            ExtractionMethod::Ocr,
            &UserProfile::default(),
            &RuleTable::spain_2025(),
        );
        let _ = doc.to_ledger_entry(Origin::Scanner);
    }
});
