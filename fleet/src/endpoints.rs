//! URL builders for the fleet backend REST API.
//!
//! The base URL is configuration; path segments and query values are
//! percent-encoded here so callers can pass raw ids. Request bodies use the
//! backend's field names.

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod endpoints_test;

use serde_json::{Value, json};
use urlencoding::encode;

use crate::scope::Scope;

/// Backend used when no base URL is configured.
pub const DEFAULT_API_BASE: &str = "https://grape-monitor-production.up.railway.app";

/// Absolute URLs for every backend route the console calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl Endpoints {
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim().trim_end_matches('/').to_owned(),
        }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// `POST /login`
    #[must_use]
    pub fn login(&self) -> String {
        self.url("/login")
    }

    /// `POST /api/registro`
    #[must_use]
    pub fn register(&self) -> String {
        self.url("/api/registro")
    }

    /// `GET /api/empresas?empresaId&ciudad`
    #[must_use]
    pub fn tenants(&self, scope: &Scope) -> String {
        self.url(&format!(
            "/api/empresas?empresaId={}&ciudad={}",
            encode(&scope.tenant_id),
            encode(&scope.region)
        ))
    }

    /// `POST /api/empresas`
    #[must_use]
    pub fn create_tenant(&self) -> String {
        self.url("/api/empresas")
    }

    /// `GET/PUT/DELETE /api/empresas/:id`
    #[must_use]
    pub fn tenant(&self, id: &str) -> String {
        self.url(&format!("/api/empresas/{}", encode(id)))
    }

    /// `GET /api/empresas/:id/impresoras?ciudad`
    #[must_use]
    pub fn tenant_printers(&self, id: &str, region: &str) -> String {
        self.url(&format!("/api/empresas/{}/impresoras?ciudad={}", encode(id), encode(region)))
    }

    /// `PUT/DELETE /api/impresoras/:id`
    #[must_use]
    pub fn printer(&self, id: &str) -> String {
        self.url(&format!("/api/impresoras/{}", encode(id)))
    }

    /// `POST /api/impresoras/:id/registrar-corte`
    #[must_use]
    pub fn register_cut(&self, id: &str) -> String {
        self.url(&format!("/api/impresoras/{}/registrar-corte", encode(id)))
    }

    /// `GET /api/impresoras/:id/generar-pdf`
    #[must_use]
    pub fn printer_pdf(&self, id: &str) -> String {
        self.url(&format!("/api/impresoras/{}/generar-pdf", encode(id)))
    }

    /// `GET/POST /api/carpetas`
    #[must_use]
    pub fn folders(&self) -> String {
        self.url("/api/carpetas")
    }

    /// `PUT/DELETE /api/carpetas/:id`
    #[must_use]
    pub fn folder(&self, id: &str) -> String {
        self.url(&format!("/api/carpetas/{}", encode(id)))
    }

    /// `GET/POST /api/asignaciones`
    #[must_use]
    pub fn assignments(&self) -> String {
        self.url("/api/asignaciones")
    }
}

// =============================================================
// Request bodies
// =============================================================

/// Body of `POST /api/empresas`.
#[must_use]
pub fn create_tenant_body(name: &str, scope: &Scope) -> Value {
    json!({ "nombre": name, "empresaId": scope.tenant_id, "ciudad": scope.region })
}

/// Body of `PUT /api/empresas/:id`.
#[must_use]
pub fn rename_tenant_body(name: &str) -> Value {
    json!({ "nombre": name })
}

/// Body of `PUT /api/impresoras/:id`.
#[must_use]
pub fn rename_printer_body(name: &str) -> Value {
    json!({ "printerName": name })
}

/// Body of `POST /api/carpetas`.
#[must_use]
pub fn create_folder_body(name: &str, parent_id: Option<&str>) -> Value {
    json!({ "nombre": name, "parentId": parent_id })
}

/// Body of `PUT /api/carpetas/:id` for a rename.
#[must_use]
pub fn rename_folder_body(name: &str) -> Value {
    json!({ "nombre": name })
}

/// Body of `PUT /api/carpetas/:id` for a move. `None` moves to the root.
#[must_use]
pub fn move_folder_body(parent_id: Option<&str>) -> Value {
    json!({ "parentId": parent_id })
}

/// Body of `POST /api/asignaciones`. `None` unfiles the tenant.
#[must_use]
pub fn assignment_body(tenant_id: &str, folder_id: Option<&str>) -> Value {
    json!({ "empresaId": tenant_id, "carpetaId": folder_id })
}
