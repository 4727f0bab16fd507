use super::*;

use crate::backend::HttpBackend;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn temp_settings_file(tag: &str, contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("biaslens_settings_{tag}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/biaslens.toml"), env_from(&[]));
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.api_base_url, "http://127.0.0.1:8000/api");
    assert_eq!(settings.search_route, SearchRoute::Primary);
}

#[test]
fn file_values_are_overridden_by_env() {
    let path = temp_settings_file(
        "layered",
        r#"
api_base_url = "http://news.internal:9000/api"
search_route = "legacy"
request_timeout_secs = 5
"#,
    );

    let from_file = load_settings_from(&path, env_from(&[]));
    assert_eq!(from_file.api_base_url, "http://news.internal:9000/api");
    assert_eq!(from_file.search_route, SearchRoute::Legacy);
    assert_eq!(from_file.request_timeout_secs, 5);

    let overridden = load_settings_from(
        &path,
        env_from(&[
            ("BIASLENS_API_BASE_URL", "http://ignored:1/api"),
            ("APP__API_BASE_URL", "https://biaslens.example/api"),
            ("APP__SEARCH_ROUTE", "primary"),
        ]),
    );
    assert_eq!(overridden.api_base_url, "https://biaslens.example/api");
    assert_eq!(overridden.search_route, SearchRoute::Primary);
    assert_eq!(overridden.request_timeout_secs, 5);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn invalid_env_overrides_are_ignored() {
    let settings = load_settings_from(
        Path::new("/nonexistent/biaslens.toml"),
        env_from(&[
            ("APP__SEARCH_ROUTE", "sideways"),
            ("APP__REQUEST_TIMEOUT_SECS", "0"),
        ]),
    );
    assert_eq!(settings.search_route, SearchRoute::Primary);
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn unparsable_settings_file_falls_back_to_defaults() {
    let path = temp_settings_file("broken", "api_base_url = [not toml");
    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings, ClientSettings::default());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn normalizes_trailing_slashes_and_whitespace() {
    assert_eq!(
        normalize_base_url("  http://127.0.0.1:8000/api//  "),
        Ok("http://127.0.0.1:8000/api".to_string())
    );
    assert_eq!(normalize_base_url(""), Ok(DEFAULT_API_BASE_URL.to_string()));
}

#[test]
fn rejects_base_urls_without_http_scheme() {
    assert_eq!(
        normalize_base_url("127.0.0.1:8000/api"),
        Err(SettingsError::InvalidBaseUrl("127.0.0.1:8000/api".to_string()))
    );
    assert!(normalize_base_url("ftp://news.example/api").is_err());
}

#[test]
fn validated_rejects_zero_timeout() {
    let settings = ClientSettings {
        request_timeout_secs: 0,
        ..ClientSettings::default()
    };
    assert_eq!(settings.validated(), Err(SettingsError::InvalidTimeout));
}

#[test]
fn blank_or_schemeless_base_urls_do_not_survive_loading() {
    let blank = load_settings_from(
        Path::new("/nonexistent/biaslens.toml"),
        env_from(&[("APP__API_BASE_URL", "  ")]),
    );
    assert_eq!(blank.api_base_url, DEFAULT_API_BASE_URL);

    let path = temp_settings_file("schemeless", "api_base_url = \"news.internal/api/\"\n");
    let from_file = load_settings_from(&path, env_from(&[]));
    assert_eq!(from_file.api_base_url, DEFAULT_API_BASE_URL);

    let kept = load_settings_from(
        &path,
        env_from(&[
            ("BIASLENS_API_BASE_URL", "https://news.example/api/"),
            ("APP__API_BASE_URL", "localhost:8000"),
        ]),
    );
    assert_eq!(kept.api_base_url, "https://news.example/api");
    assert!(HttpBackend::from_settings(&kept).is_ok());

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn zero_timeout_in_settings_file_is_ignored() {
    let path = temp_settings_file("zero_timeout", "request_timeout_secs = 0\n");
    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.clone().validated(), Ok(settings));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}
