use std::io::Write;
use tempfile::NamedTempFile;

use veraclaim::api::models::{SearchField, SortOrder};
use veraclaim::layout::Mode;
use veraclaim::util::config::AppConfig;

fn write_config(toml: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(toml.as_bytes()).unwrap();
    f
}

#[test]
fn test_load_full_config() {
    let f = write_config(
        r#"
[api]
base_url = "https://patents.example.com"
timeout_secs = 10

[search]
page_size = 25
fields = ["title", "claims"]
sort_by = "relevance"

[layout]
left_width_percent = 40
min_width_percent = 25
max_width_percent = 60
nudge_columns = 4
default_mode = "chat"

[session]
persist = false
dir = "/tmp/veraclaim-session"
max_age_secs = 3600
"#,
    );

    let config = AppConfig::load(Some(f.path())).unwrap();
    assert_eq!(config.api.base_url, "https://patents.example.com");
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.search.page_size, 25);
    assert_eq!(
        config.search.search_fields(),
        vec![SearchField::Title, SearchField::Claims]
    );
    assert_eq!(config.search.sort_by, SortOrder::Relevance);
    assert_eq!(config.layout.nudge_columns, 4);
    assert_eq!(config.layout.default_mode, Mode::Chat);
    assert!(!config.session.persist);
    assert_eq!(config.session.max_age_secs, 3600);
    assert_eq!(
        config.session_dir(),
        std::path::PathBuf::from("/tmp/veraclaim-session")
    );

    let bounds = config.layout.bounds().unwrap();
    assert_eq!(bounds.min, 25.0);
    assert_eq!(bounds.max, 60.0);
    assert_eq!(bounds.default, 40.0);
}

#[test]
fn test_load_partial_config_uses_defaults() {
    let f = write_config(
        r#"
[api]
base_url = "http://10.0.0.5:8000"
"#,
    );

    let config = AppConfig::load(Some(f.path())).unwrap();
    assert_eq!(config.api.base_url, "http://10.0.0.5:8000");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.search.page_size, 10);
    assert_eq!(config.layout.left_width_percent, 34.0);
    assert_eq!(config.layout.default_mode, Mode::Split);
    assert!(config.session.persist);
}

#[test]
fn test_load_empty_config_uses_all_defaults() {
    let f = write_config("");

    let config = AppConfig::load(Some(f.path())).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.search.search_fields(), SearchField::ALL.to_vec());
    assert_eq!(config.search.sort_by, SortOrder::DateDesc);
}

#[test]
fn test_unknown_search_fields_fall_back_to_all() {
    let f = write_config(
        r#"
[search]
fields = ["inventor"]
"#,
    );

    let config = AppConfig::load(Some(f.path())).unwrap();
    assert_eq!(config.search.search_fields(), SearchField::ALL.to_vec());
}

#[test]
fn test_inverted_layout_bounds_rejected() {
    let f = write_config(
        r#"
[layout]
min_width_percent = 70
max_width_percent = 20
"#,
    );

    assert!(AppConfig::load(Some(f.path())).is_err());
}

#[test]
fn test_default_outside_bounds_rejected() {
    let f = write_config(
        r#"
[layout]
left_width_percent = 80
"#,
    );

    assert!(AppConfig::load(Some(f.path())).is_err());
}

#[test]
fn test_load_nonexistent_file_fails() {
    let result = AppConfig::load(Some(std::path::Path::new("/nonexistent/path/config.toml")));
    assert!(result.is_err());
}

#[test]
fn test_load_invalid_toml_fails() {
    let f = write_config("this is not [valid toml {{");
    assert!(AppConfig::load(Some(f.path())).is_err());
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.search.page_size, 10);
    assert_eq!(config.layout.min_width_percent, 20.0);
    assert_eq!(config.layout.max_width_percent, 70.0);
    assert_eq!(config.layout.nudge_columns, 2);
    assert!(config.session.dir.is_none());
    assert_eq!(config.session.max_age_secs, 86_400);
    assert!(config.layout.bounds().is_ok());
}
