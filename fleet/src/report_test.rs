use super::*;

// 2024-03-05T12:00:00Z
const NOON: i64 = 1_709_640_000_000;

fn created() -> CreatedTenant {
    CreatedTenant {
        tenant_id: "emp-42".into(),
        api_key: "k3y".into(),
    }
}

#[test]
fn dates_are_utc_calendar_days() {
    assert_eq!(format_date(NOON), "2024-03-05");
    assert_eq!(format_date(0), "1970-01-01");
}

#[test]
fn pdf_name_uses_label_and_date() {
    assert_eq!(pdf_file_name("Front Desk", NOON), "reporte-Front Desk-2024-03-05.pdf");
}

#[test]
fn report_label_prefers_display_name_then_host() {
    let mut printer = PrinterRecord::bare("p1");
    assert_eq!(report_label(&printer), "printer");
    printer.host = Some("10.0.0.7".into());
    assert_eq!(report_label(&printer), "10.0.0.7");
    printer.display_name = Some("Lobby".into());
    assert_eq!(report_label(&printer), "Lobby");
}

#[test]
fn pdf_content_type_detection() {
    assert!(is_pdf_content_type("application/pdf"));
    assert!(is_pdf_content_type("Application/PDF; charset=binary"));
    assert!(!is_pdf_content_type("application/json"));
}

#[test]
fn env_file_lists_agent_settings() {
    let cfg = AgentConfig::for_created("https://api.example.com/", "North Plant", &created());
    assert_eq!(
        cfg.render_env(),
        "API_URL=https://api.example.com/api/metrics/impresoras\n\
         SITE_API_KEY=k3y\n\
         EMPRESA_ID=emp-42\n\
         SNMP_COMMUNITY=public\n\
         INTERVAL_MS=300000\n\
         AGENT_VERSION=1.0.0\n"
    );
    assert_eq!(cfg.env_file_name(), "North_Plant.env");
    assert_eq!(cfg.json_file_name(), "config_North_Plant.json");
}

#[test]
fn json_config_has_expected_keys() {
    let cfg = AgentConfig::for_created("https://api.example.com", "Acme", &created());
    let json: serde_json::Value = serde_json::from_str(&cfg.render_json().unwrap()).unwrap();
    assert_eq!(json["apiUrl"], "https://api.example.com/api/metrics/impresoras");
    assert_eq!(json["siteApiKey"], "k3y");
    assert_eq!(json["empresaId"], "emp-42");
    assert_eq!(json["community"], "public");
    assert_eq!(json["intervalMs"], 300_000);
    assert_eq!(json["printers"], serde_json::json!([]));
}

#[test]
fn pdf_response_checks_status_and_content_type() {
    assert_eq!(check_pdf_response(200, Some("application/pdf")), Ok(()));
    assert!(matches!(
        check_pdf_response(200, Some("text/html; charset=utf-8")),
        Err(FleetError::Decode(_))
    ));
    assert!(matches!(check_pdf_response(200, None), Err(FleetError::Decode(_))));
    assert_eq!(check_pdf_response(403, None), Err(FleetError::Unauthorized));
    assert!(matches!(check_pdf_response(500, Some("application/pdf")), Err(FleetError::Api(_))));
}
