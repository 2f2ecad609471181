use chrono::{Duration, Utc};
use proptest::prelude::*;

use taric_official::domain::models::{
    CacheEntry, FreshnessWindow, LanguageTag, TaricCode, EU_TARIC_WSDL_SOURCE,
};
use taric_official::services::is_fresh;

fn entry_aged(minutes: i64) -> CacheEntry {
    CacheEntry::fetched_now(
        TaricCode::parse("8517120000").unwrap(),
        LanguageTag::default(),
        "",
        EU_TARIC_WSDL_SOURCE,
        None,
    )
    .with_fetched_at(Utc::now() - Duration::minutes(minutes))
}

proptest! {
    /// Property: language normalization ignores case and surrounding whitespace
    #[test]
    fn prop_language_case_insensitive(
        tag in "[a-zA-Z]{2,3}",
        left in "[ \t]{0,3}",
        right in "[ \t]{0,3}",
    ) {
        let padded = format!("{left}{tag}{right}");
        let normalized = LanguageTag::normalize(Some(&padded), "DE");
        prop_assert_eq!(normalized.as_str(), tag.to_uppercase());
        prop_assert_eq!(
            normalized.clone(),
            LanguageTag::normalize(Some(&tag.to_lowercase()), "DE")
        );
    }

    /// Property: normalizing twice changes nothing
    #[test]
    fn prop_language_idempotent(raw in "\\PC{0,8}") {
        let once = LanguageTag::normalize(Some(&raw), "DE");
        let twice = LanguageTag::normalize(Some(once.as_str()), "DE");
        prop_assert_eq!(once, twice);
    }

    /// Property: blank language falls back to the default
    #[test]
    fn prop_blank_language_uses_default(blank in "[ \t\n]{0,5}") {
        let normalized = LanguageTag::normalize(Some(&blank), "en");
        prop_assert_eq!(normalized.as_str(), "EN");
    }

    /// Property: codes are trimmed and blank codes rejected
    #[test]
    fn prop_code_trimmed(code in "[0-9]{2,10}", pad in "[ \t]{0,3}") {
        let parsed = TaricCode::parse(&format!("{pad}{code}{pad}")).unwrap();
        prop_assert_eq!(parsed.as_str(), code.as_str());
        prop_assert!(TaricCode::parse(&pad).is_none());
    }

    /// Property: an entry fresh under a window stays fresh under any wider window
    #[test]
    fn prop_freshness_monotonic(age_minutes in 0i64..10_000, hours in 0u32..200, extra in 0u32..200) {
        let entry = entry_aged(age_minutes);
        let now = Utc::now();
        if is_fresh(&entry, FreshnessWindow::Hours(hours), now) {
            prop_assert!(is_fresh(&entry, FreshnessWindow::Hours(hours + extra), now));
        }
        prop_assert!(is_fresh(&entry, FreshnessWindow::NoExpiry, now));
    }
}
