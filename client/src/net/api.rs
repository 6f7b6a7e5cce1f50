//! REST helpers for the fleet backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning an error, since the backend is only
//! reached from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, FleetError>`. HTTP 401/403 surface as
//! [`FleetError::Unauthorized`] so pages can drop the cached scope; other
//! failures carry the backend's `error` string when it sent one.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use fleet::auth::{LoginForm, RegistrationPayload};
use fleet::endpoints::{DEFAULT_API_BASE, Endpoints};
use fleet::error::FleetError;
use fleet::folders::FolderBackend;
use fleet::model::{Assignment, CreatedTenant, CutReply, Folder, LoginReply, PrinterBatch, Tenant};
use fleet::scope::Scope;
#[cfg(any(test, feature = "hydrate"))]
use serde_json::Value;

/// Backend base URL, fixed at build time through `FLEET_API_BASE`.
#[must_use]
pub fn api_base() -> &'static str {
    option_env!("FLEET_API_BASE").unwrap_or(DEFAULT_API_BASE)
}

#[must_use]
pub fn endpoints() -> Endpoints {
    Endpoints::new(api_base())
}

#[cfg(any(test, feature = "hydrate"))]
fn decode_tenant(body: &Value) -> Result<Tenant, FleetError> {
    fleet::model::check_ok(body)?;
    let data = body
        .get("data")
        .cloned()
        .ok_or_else(|| FleetError::Decode("missing `data` in response".to_owned()))?;
    Ok(serde_json::from_value(data)?)
}

#[cfg(any(test, feature = "hydrate"))]
fn decode_list<T: serde::de::DeserializeOwned>(body: Value) -> Result<Vec<T>, FleetError> {
    let envelope: fleet::model::ApiEnvelope<Vec<T>> = serde_json::from_value(body)?;
    envelope.into_result_or_default()
}

#[cfg(feature = "hydrate")]
mod http {
    use fleet::error::FleetError;
    use gloo_net::http::{RequestBuilder, Response};
    use serde_json::Value;

    pub fn network(error: gloo_net::Error) -> FleetError {
        FleetError::Network(error.to_string())
    }

    pub async fn read(resp: Response) -> Result<Value, FleetError> {
        let status = resp.status();
        let body = resp.json::<Value>().await.ok();
        fleet::error::classify_response(status, body)
    }

    pub async fn send(builder: RequestBuilder) -> Result<Value, FleetError> {
        let resp = builder.send().await.map_err(network)?;
        read(resp).await
    }

    pub async fn send_json(builder: RequestBuilder, body: &Value) -> Result<Value, FleetError> {
        let resp = builder
            .json(body)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read(resp).await
    }
}

#[cfg(not(feature = "hydrate"))]
fn unavailable<T>() -> Result<T, FleetError> {
    Err(FleetError::Network("not available on server".to_owned()))
}

/// Sign in via `POST /login`.
///
/// # Errors
///
/// The backend's rejection message, or a transport error.
pub async fn login(form: &LoginForm) -> Result<LoginReply, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = serde_json::to_value(form)?;
        let reply = http::send_json(gloo_net::http::Request::post(&endpoints().login()), &body).await?;
        Ok(serde_json::from_value(reply)?)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = form;
        unavailable()
    }
}

/// Create an account via `POST /api/registro`.
///
/// # Errors
///
/// The backend's rejection message, or a transport error.
pub async fn register(payload: &RegistrationPayload) -> Result<(), FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = serde_json::to_value(payload)?;
        http::send_json(gloo_net::http::Request::post(&endpoints().register()), &body).await?;
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = payload;
        unavailable()
    }
}

/// List tenants visible in `scope`.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn fetch_tenants(scope: &Scope) -> Result<Vec<Tenant>, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = http::send(gloo_net::http::Request::get(&endpoints().tenants(scope))).await?;
        decode_list(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = scope;
        unavailable()
    }
}

/// Create a tenant; the reply carries the new id and site API key.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn create_tenant(name: &str, scope: &Scope) -> Result<CreatedTenant, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let api = endpoints();
        let body = fleet::endpoints::create_tenant_body(name, scope);
        let reply = http::send_json(gloo_net::http::Request::post(&api.create_tenant()), &body).await?;
        CreatedTenant::from_body(&reply)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (name, scope);
        unavailable()
    }
}

/// Fetch one tenant, including its API key.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn fetch_tenant(tenant_id: &str) -> Result<Tenant, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = http::send(gloo_net::http::Request::get(&endpoints().tenant(tenant_id))).await?;
        decode_tenant(&body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = tenant_id;
        unavailable()
    }
}

/// Rename a tenant.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn rename_tenant(tenant_id: &str, name: &str) -> Result<(), FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = fleet::endpoints::rename_tenant_body(name);
        let reply = http::send_json(gloo_net::http::Request::put(&endpoints().tenant(tenant_id)), &body).await?;
        fleet::model::check_ok(&reply)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (tenant_id, name);
        unavailable()
    }
}

/// Delete a tenant.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn delete_tenant(tenant_id: &str) -> Result<(), FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let reply = http::send(gloo_net::http::Request::delete(&endpoints().tenant(tenant_id))).await?;
        fleet::model::check_ok(&reply)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = tenant_id;
        unavailable()
    }
}

/// Fetch the printer list of a tenant. Bad elements are rejected
/// individually.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn fetch_printers(tenant_id: &str, region: &str) -> Result<PrinterBatch, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let url = endpoints().tenant_printers(tenant_id, region);
        let body = http::send(gloo_net::http::Request::get(&url)).await?;
        fleet::model::decode_printer_response(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (tenant_id, region);
        unavailable()
    }
}

/// Set a printer's display name.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn rename_printer(printer_id: &str, name: &str) -> Result<(), FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = fleet::endpoints::rename_printer_body(name);
        let reply = http::send_json(gloo_net::http::Request::put(&endpoints().printer(printer_id)), &body).await?;
        fleet::model::check_ok(&reply)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (printer_id, name);
        unavailable()
    }
}

/// Remove a printer from its tenant.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn delete_printer(printer_id: &str) -> Result<(), FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let reply = http::send(gloo_net::http::Request::delete(&endpoints().printer(printer_id))).await?;
        fleet::model::check_ok(&reply)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = printer_id;
        unavailable()
    }
}

/// Close the current counter period of a printer.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn register_cut(printer_id: &str) -> Result<CutReply, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let reply = http::send(gloo_net::http::Request::post(&endpoints().register_cut(printer_id))).await?;
        CutReply::from_body(&reply)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = printer_id;
        unavailable()
    }
}

/// Download the usage report PDF of a printer.
///
/// # Errors
///
/// Transport or authorization failure, or a response that is not a PDF.
pub async fn download_pdf(printer_id: &str) -> Result<Vec<u8>, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&endpoints().printer_pdf(printer_id))
            .send()
            .await
            .map_err(http::network)?;
        let content_type = resp.headers().get("content-type");
        fleet::report::check_pdf_response(resp.status(), content_type.as_deref())?;
        resp.binary().await.map_err(http::network)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = printer_id;
        unavailable()
    }
}

/// Fetch the folder list.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn fetch_folders() -> Result<Vec<Folder>, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = http::send(gloo_net::http::Request::get(&endpoints().folders())).await?;
        decode_list(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        unavailable()
    }
}

/// Fetch tenant-to-folder assignments.
///
/// # Errors
///
/// Transport, authorization or backend failure.
pub async fn fetch_assignments() -> Result<Vec<Assignment>, FleetError> {
    #[cfg(feature = "hydrate")]
    {
        let body = http::send(gloo_net::http::Request::get(&endpoints().assignments())).await?;
        decode_list(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        unavailable()
    }
}

/// Folder backend over the REST API.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpFolders;

impl FolderBackend for HttpFolders {
    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<Folder, FleetError> {
        #[cfg(feature = "hydrate")]
        {
            let body = fleet::endpoints::create_folder_body(name, parent_id);
            let reply = http::send_json(gloo_net::http::Request::post(&endpoints().folders()), &body).await?;
            let envelope: fleet::model::ApiEnvelope<Folder> = serde_json::from_value(reply)?;
            envelope.into_result()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (name, parent_id);
            unavailable()
        }
    }

    async fn rename_folder(&self, id: &str, name: &str) -> Result<(), FleetError> {
        #[cfg(feature = "hydrate")]
        {
            let body = fleet::endpoints::rename_folder_body(name);
            let reply = http::send_json(gloo_net::http::Request::put(&endpoints().folder(id)), &body).await?;
            fleet::model::check_ok(&reply)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, name);
            unavailable()
        }
    }

    async fn delete_folder(&self, id: &str) -> Result<(), FleetError> {
        #[cfg(feature = "hydrate")]
        {
            let reply = http::send(gloo_net::http::Request::delete(&endpoints().folder(id))).await?;
            fleet::model::check_ok(&reply)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = id;
            unavailable()
        }
    }

    async fn move_folder(&self, id: &str, parent_id: Option<&str>) -> Result<(), FleetError> {
        #[cfg(feature = "hydrate")]
        {
            let body = fleet::endpoints::move_folder_body(parent_id);
            let reply = http::send_json(gloo_net::http::Request::put(&endpoints().folder(id)), &body).await?;
            fleet::model::check_ok(&reply)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, parent_id);
            unavailable()
        }
    }

    async fn assign_tenant(&self, tenant_id: &str, folder_id: Option<&str>) -> Result<(), FleetError> {
        #[cfg(feature = "hydrate")]
        {
            let body = fleet::endpoints::assignment_body(tenant_id, folder_id);
            let reply = http::send_json(gloo_net::http::Request::put(&endpoints().assignments()), &body).await?;
            fleet::model::check_ok(&reply)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (tenant_id, folder_id);
            unavailable()
        }
    }
}
