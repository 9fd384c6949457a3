use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_unset() {
    let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_CSV));
    assert_eq!(config.dist_dir, None);
    assert_eq!(config.cors_origins, [DEFAULT_CORS_ORIGINS]);
    assert!(config.protected_routes.is_empty());
}

#[test]
fn explicit_values_are_used() {
    let config = AppConfig::from_lookup(lookup_from(&[
        ("PORT", "8080"),
        ("CATALOG_CSV", "/data/products.csv"),
        ("DIST_DIR", "frontend/dist"),
        ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ("PROTECTED_ROUTES", "recommendation,search"),
    ]))
    .unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.catalog_path, PathBuf::from("/data/products.csv"));
    assert_eq!(config.dist_dir, Some(PathBuf::from("frontend/dist")));
    assert_eq!(config.cors_origins, ["https://a.example", "https://b.example"]);
    assert_eq!(config.protected_routes, ["recommendation", "search"]);
}

#[test]
fn invalid_port_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("PORT", "70000")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "PORT", value: "70000".into() });
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = AppConfig::from_lookup(lookup_from(&[("PORT", "  "), ("CATALOG_CSV", ""), ("DIST_DIR", " ")])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_CSV));
    assert_eq!(config.dist_dir, None);
}

#[test]
fn parse_list_drops_empty_entries() {
    assert_eq!(parse_list(" a, ,b,, c "), ["a", "b", "c"]);
    assert!(parse_list("").is_empty());
}
