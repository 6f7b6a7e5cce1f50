use super::*;

#[tokio::test]
async fn healthz_returns_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[test]
fn site_root_prefers_config_override() {
    let mut config = ServerConfig::from_lookup(|_| None).unwrap();
    assert_eq!(site_root(&config, "target/site"), PathBuf::from("target/site"));

    config.site_root = Some(PathBuf::from("/srv/console"));
    assert_eq!(site_root(&config, "target/site"), PathBuf::from("/srv/console"));
}
