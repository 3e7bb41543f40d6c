//! Accepted spellings of canonical units.

/// Known canonical units and the case-folded spellings accepted for each.
const SPELLINGS: &[(&str, &[&str])] = &[
    ("V", &["v", "volt", "volts"]),
    ("A", &["a", "amp", "amps", "ampere", "amperes"]),
    ("Ω", &["ω", "ohm", "ohms"]),
    ("W", &["w", "watt", "watts"]),
];

/// Spellings accepted for `canonical`, if it is a known unit.
pub fn accepted_spellings(canonical: &str) -> Option<&'static [&'static str]> {
    SPELLINGS
        .iter()
        .find(|(symbol, _)| *symbol == canonical)
        .map(|(_, spellings)| *spellings)
}

/// Whether a submitted unit string names the canonical unit.
///
/// The submission is trimmed and case-folded first. Unknown canonical units
/// accept only their own case-folded symbol.
pub fn unit_matches(submitted: &str, canonical: &str) -> bool {
    let folded = submitted.trim().to_lowercase();
    match accepted_spellings(canonical) {
        Some(spellings) => spellings.contains(&folded.as_str()),
        None => folded == canonical.trim().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volts_are_case_and_space_insensitive() {
        for unit in ["V", " volts ", "Volt", "v", "VOLTS"] {
            assert!(unit_matches(unit, "V"), "{unit:?} should match");
        }
        assert!(!unit_matches("A", "V"));
        assert!(!unit_matches("mV", "V"));
        assert!(!unit_matches("", "V"));
    }

    #[test]
    fn ohm_symbol_folds() {
        assert!(unit_matches("Ω", "Ω"));
        assert!(unit_matches("Ohms", "Ω"));
    }

    #[test]
    fn unknown_units_compare_symbol() {
        assert!(unit_matches(" Hz", "Hz"));
        assert!(!unit_matches("kHz", "Hz"));
        assert!(accepted_spellings("Hz").is_none());
    }
}
