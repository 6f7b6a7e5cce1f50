use super::*;

#[test]
fn unauthorized_reads_as_bad_credentials() {
    assert_eq!(login_error_text(&FleetError::Unauthorized), "Invalid email or password.");
}

#[test]
fn backend_message_is_shown_verbatim() {
    assert_eq!(
        login_error_text(&FleetError::Api("Empresa no encontrada".into())),
        "Empresa no encontrada"
    );
}

#[test]
fn transport_failures_get_a_retry_hint() {
    assert_eq!(
        login_error_text(&FleetError::Network("timeout".into())),
        "Could not reach the server. Try again."
    );
}
