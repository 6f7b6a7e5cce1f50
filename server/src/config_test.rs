use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_bind_all_interfaces_on_3000() {
    let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.addr().to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.site_root, None);
}

#[test]
fn overrides_are_applied() {
    let cfg = ServerConfig::from_lookup(lookup(&[
        ("HOST", "127.0.0.1"),
        ("PORT", " 8080 "),
        ("SITE_ROOT", "/srv/site"),
    ]))
    .unwrap();
    assert_eq!(cfg.addr().to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.site_root, Some(PathBuf::from("/srv/site")));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = ServerConfig::from_lookup(lookup(&[("PORT", ""), ("SITE_ROOT", "  ")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.site_root, None);
}

#[test]
fn invalid_port_is_rejected() {
    assert_eq!(
        ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])),
        Err(ConfigError::Invalid { var: "PORT", value: "eighty".into() })
    );
}
