use crate::types::guessed_value::{GuessQuality, GuessedValue};

fn non_empty(value: &String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[test]
fn test_default_is_invalid_and_accepts_anything() {
    let mut name: GuessedValue<String> = GuessedValue::default();
    assert_eq!(name.quality(), GuessQuality::Invalid);

    assert!(name.update("from file".into(), GuessQuality::Fallback));
    assert_eq!(name.as_str(), "from file");
}

#[test]
fn test_lower_tier_never_regresses_value() {
    let mut name: GuessedValue<String> = GuessedValue::default();
    name.update("Meta Name".into(), GuessQuality::Meta);
    name.update("Good Name".into(), GuessQuality::Good);

    assert!(!name.update("Fallback".into(), GuessQuality::Fallback));
    assert!(!name.update("Meta Again".into(), GuessQuality::Meta));
    assert_eq!(name.as_str(), "Good Name");
    assert_eq!(name.quality(), GuessQuality::Good);
}

#[test]
fn test_equal_tier_replaces() {
    let mut name = GuessedValue::new("first".to_string(), GuessQuality::Meta);
    assert!(name.update("second".into(), GuessQuality::Meta));
    assert_eq!(name.as_str(), "second");
}

#[test]
fn test_user_update_always_wins() {
    let mut name = GuessedValue::new("typed".to_string(), GuessQuality::User);
    assert!(name.update("retyped".into(), GuessQuality::User));
    assert_eq!(name.as_str(), "retyped");

    let mut name = GuessedValue::new("good".to_string(), GuessQuality::Good);
    assert!(name.update("explicit".into(), GuessQuality::User));
    assert_eq!(name.quality(), GuessQuality::User);
}

#[test]
fn test_filter_rejects_empty_values() {
    let mut name: GuessedValue<String> = GuessedValue::default();
    name.set_filter(non_empty);

    assert!(name.update("  Kept  ".into(), GuessQuality::Fallback));
    assert!(!name.update("   ".into(), GuessQuality::Good));
    assert_eq!(name.as_str(), "Kept");
    assert_eq!(name.quality(), GuessQuality::Fallback);
}

#[test]
fn test_tier_ordering() {
    assert!(GuessQuality::Fallback < GuessQuality::Preset);
    assert!(GuessQuality::Preset < GuessQuality::Meta);
    assert!(GuessQuality::Meta < GuessQuality::Good);
    assert!(GuessQuality::Good < GuessQuality::User);
}
