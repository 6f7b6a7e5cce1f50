//! HTTP client for the fleet backend.

use fleet::auth::{LoginForm, RegistrationPayload};
use fleet::endpoints::{self, Endpoints};
use fleet::error::{FleetError, classify_response};
use fleet::folders::FolderBackend;
use fleet::model::{
    ApiEnvelope, Assignment, CreatedTenant, CutReply, Folder, LoginReply, PrinterBatch, Tenant, check_ok,
    decode_printer_response,
};
use fleet::scope::Scope;
use reqwest::{Method, RequestBuilder};
use serde_json::Value;

fn network(error: reqwest::Error) -> FleetError {
    FleetError::Network(error.to_string())
}

/// Decode a `{ ok, data }` list, treating missing data as empty.
pub(crate) fn decode_list<T: serde::de::DeserializeOwned>(body: Value) -> Result<Vec<T>, FleetError> {
    let envelope: ApiEnvelope<Vec<T>> = serde_json::from_value(body)?;
    envelope.into_result_or_default()
}

/// Decode a `{ ok, data }` single object.
pub(crate) fn decode_one<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, FleetError> {
    let envelope: ApiEnvelope<T> = serde_json::from_value(body)?;
    envelope.into_result()
}

#[derive(Debug, Clone)]
pub struct FleetClient {
    http: reqwest::Client,
    api: Endpoints,
}

impl FleetClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fleet-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api: Endpoints::new(base_url),
        })
    }

    #[must_use]
    pub fn api(&self) -> &Endpoints {
        &self.api
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, FleetError> {
        let response = request.send().await.map_err(network)?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.ok();
        tracing::debug!(status, "backend response");
        classify_response(status, body)
    }

    async fn call(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, FleetError> {
        tracing::debug!(%method, url, "backend request");
        let request = self.http.request(method, url);
        let request = match body {
            Some(json) => request.json(json),
            None => request,
        };
        self.send(request).await
    }

    pub async fn login(&self, form: &LoginForm) -> Result<LoginReply, FleetError> {
        let body = serde_json::to_value(form)?;
        let reply = self.call(Method::POST, &self.api.login(), Some(&body)).await?;
        Ok(serde_json::from_value(reply)?)
    }

    pub async fn register(&self, payload: &RegistrationPayload) -> Result<(), FleetError> {
        let body = serde_json::to_value(payload)?;
        self.call(Method::POST, &self.api.register(), Some(&body)).await?;
        Ok(())
    }

    pub async fn tenants(&self, scope: &Scope) -> Result<Vec<Tenant>, FleetError> {
        decode_list(self.call(Method::GET, &self.api.tenants(scope), None).await?)
    }

    pub async fn tenant(&self, tenant_id: &str) -> Result<Tenant, FleetError> {
        decode_one(self.call(Method::GET, &self.api.tenant(tenant_id), None).await?)
    }

    pub async fn create_tenant(&self, name: &str, scope: &Scope) -> Result<CreatedTenant, FleetError> {
        let body = endpoints::create_tenant_body(name, scope);
        let reply = self.call(Method::POST, &self.api.create_tenant(), Some(&body)).await?;
        CreatedTenant::from_body(&reply)
    }

    pub async fn rename_tenant(&self, tenant_id: &str, name: &str) -> Result<(), FleetError> {
        let body = endpoints::rename_tenant_body(name);
        check_ok(&self.call(Method::PUT, &self.api.tenant(tenant_id), Some(&body)).await?)
    }

    pub async fn delete_tenant(&self, tenant_id: &str) -> Result<(), FleetError> {
        check_ok(&self.call(Method::DELETE, &self.api.tenant(tenant_id), None).await?)
    }

    pub async fn printers(&self, tenant_id: &str, region: &str) -> Result<PrinterBatch, FleetError> {
        let url = self.api.tenant_printers(tenant_id, region);
        decode_printer_response(self.call(Method::GET, &url, None).await?)
    }

    pub async fn rename_printer(&self, printer_id: &str, name: &str) -> Result<(), FleetError> {
        let body = endpoints::rename_printer_body(name);
        check_ok(&self.call(Method::PUT, &self.api.printer(printer_id), Some(&body)).await?)
    }

    pub async fn delete_printer(&self, printer_id: &str) -> Result<(), FleetError> {
        check_ok(&self.call(Method::DELETE, &self.api.printer(printer_id), None).await?)
    }

    pub async fn register_cut(&self, printer_id: &str) -> Result<CutReply, FleetError> {
        let reply = self.call(Method::POST, &self.api.register_cut(printer_id), None).await?;
        CutReply::from_body(&reply)
    }

    pub async fn printer_pdf(&self, printer_id: &str) -> Result<Vec<u8>, FleetError> {
        let response = self
            .http
            .get(self.api.printer_pdf(printer_id))
            .send()
            .await
            .map_err(network)?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        fleet::report::check_pdf_response(response.status().as_u16(), content_type.as_deref())?;
        let bytes = response.bytes().await.map_err(network)?;
        Ok(bytes.to_vec())
    }

    pub async fn folders(&self) -> Result<Vec<Folder>, FleetError> {
        decode_list(self.call(Method::GET, &self.api.folders(), None).await?)
    }

    pub async fn assignments(&self) -> Result<Vec<Assignment>, FleetError> {
        decode_list(self.call(Method::GET, &self.api.assignments(), None).await?)
    }
}

impl FolderBackend for FleetClient {
    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<Folder, FleetError> {
        let body = endpoints::create_folder_body(name, parent_id);
        decode_one(self.call(Method::POST, &self.api.folders(), Some(&body)).await?)
    }

    async fn rename_folder(&self, id: &str, name: &str) -> Result<(), FleetError> {
        let body = endpoints::rename_folder_body(name);
        check_ok(&self.call(Method::PUT, &self.api.folder(id), Some(&body)).await?)
    }

    async fn delete_folder(&self, id: &str) -> Result<(), FleetError> {
        check_ok(&self.call(Method::DELETE, &self.api.folder(id), None).await?)
    }

    async fn move_folder(&self, id: &str, parent_id: Option<&str>) -> Result<(), FleetError> {
        let body = endpoints::move_folder_body(parent_id);
        check_ok(&self.call(Method::PUT, &self.api.folder(id), Some(&body)).await?)
    }

    async fn assign_tenant(&self, tenant_id: &str, folder_id: Option<&str>) -> Result<(), FleetError> {
        let body = endpoints::assignment_body(tenant_id, folder_id);
        check_ok(&self.call(Method::PUT, &self.api.assignments(), Some(&body)).await?)
    }
}
