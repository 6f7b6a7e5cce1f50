//! Wire DTOs for the fleet backend REST API.
//!
//! DESIGN
//! ======
//! Field names on the wire follow the backend (`_id`, `nombre`, `printerName`,
//! `lastSeenAt`, ...). Decoding is lenient where the backend is known to be
//! sloppy: unparseable timestamps and non-numeric counters become `None`
//! instead of failing the whole record, and printer batches are decoded one
//! element at a time so a single bad record cannot sink a poll.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::FleetError;

/// A customer organization ("empresa") owning a set of printers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "nombre", alias = "name", default)]
    pub name: String,
    /// Agent API key. Only returned by the create and detail endpoints.
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "ciudad", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// A monitored printer as returned by `GET /api/empresas/:id/impresoras`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrinterRecord {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    /// Human label assigned in the console.
    #[serde(rename = "printerName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// SNMP `sysName` reported by the agent.
    #[serde(rename = "sysName", default, skip_serializing_if = "Option::is_none")]
    pub sys_name: Option<String>,
    /// Network host the agent polls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Latest telemetry snapshot. `None` means the printer never reported.
    #[serde(default, deserialize_with = "deserialize_telemetry")]
    pub latest: Option<Telemetry>,
}

impl PrinterRecord {
    /// Record with no telemetry, mostly for tests and placeholders.
    #[must_use]
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            sys_name: None,
            host: None,
            latest: None,
        }
    }

    /// Display label: console name, then system name, then host, then id.
    #[must_use]
    pub fn label(&self) -> &str {
        [&self.display_name, &self.sys_name, &self.host]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
            .unwrap_or(&self.id)
    }

    /// Last-seen time reported in this snapshot, if any.
    #[must_use]
    pub fn reported_last_seen(&self) -> Option<i64> {
        self.latest.as_ref().and_then(|latest| latest.last_seen_at)
    }

    /// Explicit online flag reported by the backend, if any.
    #[must_use]
    pub fn reported_online(&self) -> Option<bool> {
        self.latest.as_ref().and_then(|latest| latest.online)
    }
}

/// Telemetry snapshot collected by the site agent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    /// Milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_seen_at: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_bool")]
    pub online: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub low_toner: bool,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub last_page_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub last_page_mono: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub last_page_color: Option<u64>,
    #[serde(rename = "lastSupplies", default, deserialize_with = "deserialize_supplies")]
    pub supplies: Vec<Supply>,
    /// Date of the last billing cut, milliseconds since the Unix epoch.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_cut_date: Option<i64>,
}

impl Telemetry {
    #[must_use]
    pub fn page_counters(&self) -> PageCounters {
        PageCounters {
            total: self.last_page_count,
            mono: self.last_page_mono,
            color: self.last_page_color,
        }
    }
}

/// Page counters read from the printer MIB.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageCounters {
    pub total: Option<u64>,
    pub mono: Option<u64>,
    pub color: Option<u64>,
}

impl PageCounters {
    /// Whether the printer reports any color pages.
    #[must_use]
    pub fn has_color(&self) -> bool {
        self.color.is_some_and(|count| count > 0)
    }
}

/// A consumable (toner, drum, waste box) with its current and maximum level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_level")]
    pub level: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_level")]
    pub max: Option<f64>,
}

impl Supply {
    /// Remaining level as a whole percentage clamped into `0..=100`.
    ///
    /// A missing or non-positive maximum yields 0.
    #[must_use]
    pub fn percent(&self) -> u8 {
        let (Some(level), Some(max)) = (self.level, self.max) else {
            return 0;
        };
        if max <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (level / max * 100.0).round().clamp(0.0, 100.0) as u8;
        pct
    }
}

/// A client-side folder used to group tenants in the sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(rename = "_id", alias = "id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(rename = "parentId", alias = "parent_id", default)]
    pub parent_id: Option<String>,
}

impl Folder {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(str::to_owned),
        }
    }
}

/// Tenant to folder assignment as stored by `/api/asignaciones`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "empresaId", alias = "tenantId")]
    pub tenant_id: String,
    #[serde(rename = "carpetaId", alias = "folderId", default)]
    pub folder_id: Option<String>,
}

/// Standard `{ ok, data, error }` response envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap `data`, mapping `ok: false` to [`FleetError::Api`].
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the backend reports failure and
    /// [`FleetError::Decode`] when a successful envelope carries no data.
    pub fn into_result(self) -> Result<T, FleetError> {
        if !self.ok {
            return Err(FleetError::Api(
                self.error.unwrap_or_else(|| "request failed".to_owned()),
            ));
        }
        self.data
            .ok_or_else(|| FleetError::Decode("missing `data` in response".to_owned()))
    }

    /// Like [`ApiEnvelope::into_result`] but treats missing data as empty.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the backend reports failure.
    pub fn into_result_or_default(self) -> Result<T, FleetError>
    where
        T: Default,
    {
        if !self.ok {
            return Err(FleetError::Api(
                self.error.unwrap_or_else(|| "request failed".to_owned()),
            ));
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// Check an arbitrary JSON body for `ok: true`.
///
/// # Errors
///
/// Returns [`FleetError::Api`] with the backend message when `ok` is not true.
pub fn check_ok(body: &Value) -> Result<(), FleetError> {
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }
    let message = crate::error::error_message(body).unwrap_or("request failed");
    Err(FleetError::Api(message.to_owned()))
}

/// Response of `POST /api/empresas`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedTenant {
    #[serde(rename = "empresaId", deserialize_with = "deserialize_id")]
    pub tenant_id: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

impl CreatedTenant {
    /// Decode `{ ok, empresaId, apiKey }`.
    ///
    /// # Errors
    ///
    /// [`FleetError::Api`] when not `ok`, [`FleetError::Decode`] on a bad shape.
    pub fn from_body(body: &Value) -> Result<Self, FleetError> {
        check_ok(body)?;
        Ok(Self::deserialize(body)?)
    }
}

/// Successful response of `POST /login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginReply {
    #[serde(rename = "empresaId", deserialize_with = "deserialize_id")]
    pub tenant_id: String,
}

/// Response of `POST /api/impresoras/:id/registrar-corte`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CutReply {
    /// Pages printed during the period closed by this cut.
    pub total_pages: u64,
}

impl CutReply {
    /// Decode from the raw body (`{ ok, datos: { totalPaginas } }`).
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the body is not `ok`.
    pub fn from_body(body: &Value) -> Result<Self, FleetError> {
        check_ok(body)?;
        let total_pages = body
            .pointer("/datos/totalPaginas")
            .and_then(count_from_value)
            .unwrap_or(0);
        Ok(Self { total_pages })
    }
}

/// Why a printer element was dropped from a poll batch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("record has no usable id")]
    MissingId,
    #[error("duplicate id {0} in batch")]
    DuplicateId(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A printer element rejected from a batch, by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: RejectReason,
}

/// Result of decoding a raw printer list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrinterBatch {
    pub records: Vec<PrinterRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Decode each element of a raw printer list independently.
#[must_use]
pub fn decode_printer_batch(values: Vec<Value>) -> PrinterBatch {
    let mut batch = PrinterBatch::default();
    for (index, value) in values.into_iter().enumerate() {
        if raw_id(&value).is_none() {
            batch.rejected.push(RejectedRecord { index, reason: RejectReason::MissingId });
            continue;
        }
        match serde_json::from_value::<PrinterRecord>(value) {
            Ok(record) => batch.records.push(record),
            Err(e) => batch.rejected.push(RejectedRecord {
                index,
                reason: RejectReason::Malformed(e.to_string()),
            }),
        }
    }
    batch
}

/// Decode a `{ ok, data: [...] }` printer list response.
///
/// # Errors
///
/// [`FleetError::Api`] when not `ok`, [`FleetError::Decode`] when `data` is
/// present but not a list. Bad elements are rejected, not fatal.
pub fn decode_printer_response(body: Value) -> Result<PrinterBatch, FleetError> {
    check_ok(&body)?;
    let Value::Object(mut map) = body else {
        return Err(FleetError::Decode("expected a JSON object".to_owned()));
    };
    match map.remove("data") {
        Some(Value::Array(items)) => Ok(decode_printer_batch(items)),
        None | Some(Value::Null) => Ok(PrinterBatch::default()),
        Some(_) => Err(FleetError::Decode("`data` is not a list".to_owned())),
    }
}

/// Parse an RFC 3339 timestamp into epoch milliseconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let parsed = OffsetDateTime::parse(raw.trim(), &Rfc3339).ok()?;
    i64::try_from(parsed.unix_timestamp_nanos() / 1_000_000).ok()
}

fn raw_id(value: &Value) -> Option<String> {
    let raw = value.get("_id").or_else(|| value.get("id"))?;
    id_from_value(raw)
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(float_to_i64)),
        _ => None,
    }
}

fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(float_to_u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_i64(value: f64) -> i64 {
    value as i64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_u64(value: f64) -> u64 {
    value as u64
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| D::Error::custom("expected a non-empty string or numeric id"))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(timestamp_from_value(&value))
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn deserialize_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    })
}

fn deserialize_supplies<'de, D>(deserializer: D) -> Result<Vec<Supply>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

fn deserialize_telemetry<'de, D>(deserializer: D) -> Result<Option<Telemetry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
