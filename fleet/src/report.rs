//! Download helpers: PDF report names and site-agent config files.

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;

use serde::Serialize;
use time::OffsetDateTime;

use crate::error::FleetError;
use crate::model::{CreatedTenant, PrinterRecord};

/// Backend path the site agent posts telemetry to.
pub const METRICS_PATH: &str = "/api/metrics/impresoras";
/// SNMP community written into new agent configs.
pub const DEFAULT_COMMUNITY: &str = "public";
/// Agent reporting interval written into new agent configs.
pub const DEFAULT_AGENT_INTERVAL_MS: u64 = 300_000;
/// Agent version written into the `.env` file.
pub const AGENT_VERSION: &str = "1.0.0";

/// Whether a `Content-Type` header denotes a PDF body.
#[must_use]
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/pdf")
}

/// Check a PDF download response before reading its bytes.
///
/// # Errors
///
/// [`FleetError::Unauthorized`] on 401/403, [`FleetError::Api`] on another
/// failure status, [`FleetError::Decode`] when the body is not a PDF.
pub fn check_pdf_response(status: u16, content_type: Option<&str>) -> Result<(), FleetError> {
    if status == 401 || status == 403 {
        return Err(FleetError::Unauthorized);
    }
    if !(200..300).contains(&status) {
        return Err(FleetError::Api(format!("report generation failed ({status})")));
    }
    if !content_type.is_some_and(is_pdf_content_type) {
        return Err(FleetError::Decode("the server did not return a PDF".to_owned()));
    }
    Ok(())
}

/// UTC calendar date of an epoch-millisecond instant as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(epoch_ms: i64) -> String {
    let nanos = i128::from(epoch_ms) * 1_000_000;
    let date = OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .date();
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

/// Name used for a printer in report file names.
#[must_use]
pub fn report_label(printer: &PrinterRecord) -> &str {
    [printer.display_name.as_deref(), printer.host.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or("printer")
}

/// `reporte-{label}-{YYYY-MM-DD}.pdf`.
#[must_use]
pub fn pdf_file_name(label: &str, epoch_ms: i64) -> String {
    format!("reporte-{label}-{}.pdf", format_date(epoch_ms))
}

/// Replace each whitespace run with `_`.
fn file_stem(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Settings handed to the site agent of a newly created tenant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    pub tenant_name: String,
    pub api_url: String,
    pub site_api_key: String,
    pub tenant_id: String,
    pub community: String,
    pub interval_ms: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentConfigJson<'a> {
    api_url: &'a str,
    site_api_key: &'a str,
    empresa_id: &'a str,
    community: &'a str,
    interval_ms: u64,
    printers: [(); 0],
}

impl AgentConfig {
    /// Config for a tenant just created against `api_base`.
    #[must_use]
    pub fn for_created(api_base: &str, tenant_name: &str, created: &CreatedTenant) -> Self {
        Self {
            tenant_name: tenant_name.trim().to_owned(),
            api_url: format!("{}{METRICS_PATH}", api_base.trim_end_matches('/')),
            site_api_key: created.api_key.clone(),
            tenant_id: created.tenant_id.clone(),
            community: DEFAULT_COMMUNITY.to_owned(),
            interval_ms: DEFAULT_AGENT_INTERVAL_MS,
        }
    }

    /// `.env` file contents, newline terminated.
    #[must_use]
    pub fn render_env(&self) -> String {
        format!(
            "API_URL={}\nSITE_API_KEY={}\nEMPRESA_ID={}\nSNMP_COMMUNITY={}\nINTERVAL_MS={}\nAGENT_VERSION={AGENT_VERSION}\n",
            self.api_url, self.site_api_key, self.tenant_id, self.community, self.interval_ms,
        )
    }

    /// Pretty-printed JSON config.
    ///
    /// # Errors
    ///
    /// Only if serialization fails, which plain strings never do.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&AgentConfigJson {
            api_url: &self.api_url,
            site_api_key: &self.site_api_key,
            empresa_id: &self.tenant_id,
            community: &self.community,
            interval_ms: self.interval_ms,
            printers: [],
        })
    }

    #[must_use]
    pub fn env_file_name(&self) -> String {
        format!("{}.env", file_stem(&self.tenant_name))
    }

    #[must_use]
    pub fn json_file_name(&self) -> String {
        format!("config_{}.json", file_stem(&self.tenant_name))
    }
}
