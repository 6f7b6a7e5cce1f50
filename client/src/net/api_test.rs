use super::*;
use serde_json::json;

#[test]
fn tenant_detail_decodes_api_key() {
    let body = json!({"ok": true, "data": {"_id": "t1", "nombre": "North", "apiKey": "k-1"}});
    let tenant = decode_tenant(&body).unwrap();
    assert_eq!(tenant.id, "t1");
    assert_eq!(tenant.api_key.as_deref(), Some("k-1"));
    assert!(decode_tenant(&json!({"ok": true})).is_err());
}

#[test]
fn lists_treat_missing_data_as_empty() {
    let folders: Vec<Folder> = decode_list(json!({"ok": true})).unwrap();
    assert!(folders.is_empty());
    let err = decode_list::<Folder>(json!({"ok": false, "error": "nope"})).unwrap_err();
    assert_eq!(err, FleetError::Api("nope".into()));
}

#[test]
fn endpoints_use_configured_base() {
    assert_eq!(endpoints().base(), api_base().trim().trim_end_matches('/'));
}
