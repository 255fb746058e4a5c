use super::*;

#[test]
fn flags_override_loaded_settings() {
    let args = Args::try_parse_from([
        "trustweave",
        "--api-key",
        "cli-key",
        "--model",
        "gemini-pro",
        "--min-display-ms",
        "0",
        "--json",
    ])
    .expect("parse");
    let mut settings = Settings {
        api_key: Some("file-key".into()),
        ..Settings::default()
    };

    args.apply_to(&mut settings);

    assert!(args.json);
    assert_eq!(settings.api_key.as_deref(), Some("cli-key"));
    assert_eq!(settings.model, "gemini-pro");
    assert_eq!(settings.min_display_ms, 0);
    assert_eq!(settings.phase_interval_ms, 1500);
}

#[test]
fn absent_flags_leave_settings_alone() {
    let args = Args::try_parse_from(["trustweave"]).expect("parse");
    let mut settings = Settings::default();
    args.apply_to(&mut settings);
    assert_eq!(settings, Settings::default());
    assert!(!args.json);
}
