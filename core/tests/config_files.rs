// core/tests/config_files.rs
//
// Integration tests for loading field configuration and placeholder text
// from TOML files.
//
// Tests cover:
// - Config save/load round trip through a file
// - Missing keys fall back to defaults
// - Unreadable and malformed files surface as errors
// - LocaleText files override only the keys they name

use sectionfield_core::{Config, FieldKind, LocaleText, SectionType, ContentType};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sectionfield-{}-{}", std::process::id(), name))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config.toml");
    let mut config = Config::default().with_format("dd.MM.yyyy HH:mm");
    config.kind = FieldKind::Date;
    config.min_date = Some("2020-01-01".to_string());
    config.set_page_step(10);
    config.set_read_only(true);

    config.save_toml(&path).expect("save config");
    let loaded = Config::load_toml(&path).expect("load config");
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    assert_eq!(loaded.page_step, 10);
    assert!(loaded.is_read_only());
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = Config::from_toml_str(
        r#"
kind = "time"
disable_past = true
"#,
    )
    .expect("parse config");

    assert_eq!(config.kind, FieldKind::Time);
    assert!(config.disable_past);
    assert!(!config.disable_future);
    assert_eq!(config.format, None);
    assert_eq!(config.format_cache_size, 64);
}

#[test]
fn test_bad_config_files_are_errors() {
    assert!(Config::load_toml(temp_path("does-not-exist.toml")).is_err());

    let path = temp_path("broken.toml");
    std::fs::write(&path, "page_step = \"five\"\n").expect("write file");
    let result = Config::load_toml(&path);
    std::fs::remove_file(&path).ok();
    assert!(result.is_err());
}

#[test]
fn test_locale_text_file_overrides() {
    let path = temp_path("locale.toml");
    std::fs::write(&path, "year = \"J\"\nday = \"TT\"\nmonth_digit = \"MM\"\n").expect("write file");
    let text = LocaleText::load_toml(&path).expect("load locale text");
    std::fs::remove_file(&path).ok();

    assert_eq!(text.placeholder(SectionType::Year, ContentType::Digit, 4), "JJJJ");
    assert_eq!(text.placeholder(SectionType::Day, ContentType::Digit, 2), "TT");
    assert_eq!(text.placeholder(SectionType::Meridiem, ContentType::Letter, 0), "aa");
}
