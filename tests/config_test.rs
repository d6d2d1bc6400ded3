//! Settings loading tests

use std::path::PathBuf;

use sitetree::application::MissingDeletePolicy;
use sitetree::config::{Settings, DEFAULT_SEPARATOR};

#[test]
fn given_no_sources_when_loading_then_compiled_defaults_apply() {
    let settings = Settings::load(None).unwrap();
    assert_eq!(settings.breadcrumb_separator, DEFAULT_SEPARATOR);
    assert_eq!(settings.missing_delete, MissingDeletePolicy::Ignore);
    assert!(!settings.store_dir.as_os_str().is_empty());
}

#[test]
fn given_cli_override_when_loading_then_store_dir_wins() {
    let settings = Settings::load(Some(PathBuf::from("/tmp/trees"))).unwrap();
    assert_eq!(settings.store_dir, PathBuf::from("/tmp/trees"));
}

#[test]
fn given_settings_when_rendering_toml_then_policy_is_lowercase() {
    let settings = Settings::default();
    let rendered = toml::to_string_pretty(&settings).unwrap();
    assert!(rendered.contains("missing_delete = \"ignore\""));
    assert!(rendered.contains("breadcrumb_separator"));
}
