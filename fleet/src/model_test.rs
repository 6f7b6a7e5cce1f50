use super::*;
use serde_json::json;

// =============================================================
// Timestamps
// =============================================================

#[test]
fn parse_timestamp_accepts_rfc3339_with_millis() {
    assert_eq!(parse_timestamp("1970-01-01T00:00:01.500Z"), Some(1500));
    assert_eq!(parse_timestamp("2024-05-01T10:00:00+02:00"), Some(1_714_550_400_000));
}

#[test]
fn parse_timestamp_rejects_garbage() {
    assert_eq!(parse_timestamp("yesterday"), None);
    assert_eq!(parse_timestamp(""), None);
}

#[test]
fn telemetry_treats_malformed_timestamps_as_absent() {
    let telemetry: Telemetry = serde_json::from_value(json!({
        "lastSeenAt": "not a date",
        "lastCutDate": 17,
        "online": null
    }))
    .unwrap();
    assert_eq!(telemetry.last_seen_at, None);
    assert_eq!(telemetry.last_cut_date, Some(17));
    assert_eq!(telemetry.online, None);
}

// =============================================================
// PrinterRecord
// =============================================================

#[test]
fn printer_record_decodes_backend_shape() {
    let record: PrinterRecord = serde_json::from_value(json!({
        "_id": "p1",
        "printerName": "Front desk",
        "host": "10.0.0.5",
        "latest": {
            "lastSeenAt": "1970-01-01T00:00:02Z",
            "online": true,
            "lowToner": 1,
            "lastPageCount": 1200,
            "lastPageMono": 1000.0,
            "lastPageColor": "200",
            "lastSupplies": [{"name": "Black", "level": 40, "max": 80}, "junk"]
        }
    }))
    .unwrap();
    assert_eq!(record.id, "p1");
    assert_eq!(record.label(), "Front desk");
    let latest = record.latest.as_ref().unwrap();
    assert_eq!(latest.last_seen_at, Some(2000));
    assert!(latest.low_toner);
    assert_eq!(
        latest.page_counters(),
        PageCounters { total: Some(1200), mono: Some(1000), color: Some(200) }
    );
    assert_eq!(latest.supplies.len(), 1);
    assert_eq!(record.reported_online(), Some(true));
}

#[test]
fn printer_label_falls_back_through_names() {
    let mut record = PrinterRecord::bare("p9");
    assert_eq!(record.label(), "p9");
    record.host = Some("10.1.1.1".to_owned());
    assert_eq!(record.label(), "10.1.1.1");
    record.sys_name = Some("HP-LJ".to_owned());
    assert_eq!(record.label(), "HP-LJ");
    record.display_name = Some("  ".to_owned());
    assert_eq!(record.label(), "HP-LJ");
}

#[test]
fn non_object_latest_means_never_reported() {
    let record: PrinterRecord = serde_json::from_value(json!({"_id": "p1", "latest": "oops"})).unwrap();
    assert!(record.latest.is_none());
}

// =============================================================
// decode_printer_batch
// =============================================================

#[test]
fn decode_printer_batch_rejects_records_without_id() {
    let batch = decode_printer_batch(vec![
        json!({"_id": "a"}),
        json!({"printerName": "no id"}),
        json!({"_id": "   "}),
        json!({"id": 42}),
    ]);
    let ids: Vec<_> = batch.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "42"]);
    assert_eq!(
        batch.rejected,
        vec![
            RejectedRecord { index: 1, reason: RejectReason::MissingId },
            RejectedRecord { index: 2, reason: RejectReason::MissingId },
        ]
    );
}

#[test]
fn decode_printer_batch_reports_malformed_records() {
    let batch = decode_printer_batch(vec![json!({"_id": "a", "host": 5})]);
    assert!(batch.records.is_empty());
    assert_eq!(batch.rejected.len(), 1);
    assert!(matches!(batch.rejected[0].reason, RejectReason::Malformed(_)));
}

// =============================================================
// Supplies
// =============================================================

#[test]
fn supply_percent_rounds_and_clamps() {
    let supply = |level: Option<f64>, max: Option<f64>| Supply { name: "k".to_owned(), level, max };
    assert_eq!(supply(Some(1.0), Some(3.0)).percent(), 33);
    assert_eq!(supply(Some(150.0), Some(100.0)).percent(), 100);
    assert_eq!(supply(Some(-5.0), Some(100.0)).percent(), 0);
    assert_eq!(supply(Some(5.0), Some(0.0)).percent(), 0);
    assert_eq!(supply(None, Some(100.0)).percent(), 0);
}

// =============================================================
// Envelopes and replies
// =============================================================

#[test]
fn envelope_into_result_maps_failure_to_api_error() {
    let env: ApiEnvelope<Vec<Tenant>> =
        serde_json::from_value(json!({"ok": false, "error": "sin permisos"})).unwrap();
    assert_eq!(env.into_result(), Err(FleetError::Api("sin permisos".to_owned())));
}

#[test]
fn envelope_default_treats_missing_data_as_empty() {
    let env: ApiEnvelope<Vec<Tenant>> = serde_json::from_value(json!({"ok": true})).unwrap();
    assert_eq!(env.into_result_or_default(), Ok(Vec::new()));
}

#[test]
fn tenant_list_decodes_spanish_field_names() {
    let env: ApiEnvelope<Vec<Tenant>> = serde_json::from_value(json!({
        "ok": true,
        "data": [{"_id": "t1", "nombre": "Acme", "ciudad": "Tijuana"}]
    }))
    .unwrap();
    let tenants = env.into_result().unwrap();
    assert_eq!(tenants[0].name, "Acme");
    assert_eq!(tenants[0].region.as_deref(), Some("Tijuana"));
    assert_eq!(tenants[0].api_key, None);
}

#[test]
fn cut_reply_reads_nested_total() {
    let reply = CutReply::from_body(&json!({"ok": true, "datos": {"totalPaginas": 321}})).unwrap();
    assert_eq!(reply.total_pages, 321);
    assert_eq!(CutReply::from_body(&json!({"ok": true})).unwrap().total_pages, 0);
    assert_eq!(
        CutReply::from_body(&json!({"ok": false, "error": "sin lecturas"})),
        Err(FleetError::Api("sin lecturas".to_owned()))
    );
}

#[test]
fn folder_and_assignment_accept_aliases() {
    let folder: Folder = serde_json::from_value(json!({"id": "f1", "nombre": "Norte", "parent_id": null})).unwrap();
    assert_eq!(folder, Folder::new("f1", "Norte", None));
    let assignment: Assignment =
        serde_json::from_value(json!({"empresaId": "t1", "carpetaId": "f1"})).unwrap();
    assert_eq!(assignment.folder_id.as_deref(), Some("f1"));
}

#[test]
fn printer_response_unwraps_data_list() {
    let batch = decode_printer_response(json!({"ok": true, "data": [{"_id": "p1"}, {"nope": 1}]})).unwrap();
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.rejected.len(), 1);
    assert_eq!(decode_printer_response(json!({"ok": true})).unwrap(), PrinterBatch::default());
    assert!(matches!(
        decode_printer_response(json!({"ok": true, "data": {"_id": "p1"}})),
        Err(FleetError::Decode(_))
    ));
    assert_eq!(
        decode_printer_response(json!({"ok": false, "error": "tenant desconocido"})),
        Err(FleetError::Api("tenant desconocido".to_owned()))
    );
}

#[test]
fn created_tenant_reads_top_level_fields() {
    let created = CreatedTenant::from_body(&json!({"ok": true, "empresaId": "e9", "apiKey": "k"})).unwrap();
    assert_eq!(created, CreatedTenant { tenant_id: "e9".to_owned(), api_key: "k".to_owned() });
    assert!(matches!(
        CreatedTenant::from_body(&json!({"ok": true, "empresaId": "e9"})),
        Err(FleetError::Decode(_))
    ));
}
