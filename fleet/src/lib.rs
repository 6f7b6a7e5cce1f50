//! Shared fleet-console core used by both `client` and `cli`.
//!
//! This crate owns the backend wire model and every piece of console logic
//! that does not touch the network or the DOM: printer freshness tracking,
//! the folder organizer, the session gate contract, tenant polling tokens and
//! form validation. Everything here is a pure function of its inputs (the
//! caller supplies `now`), which keeps it testable on the host target.

pub mod auth;
pub mod command;
pub mod endpoints;
pub mod error;
pub mod folders;
pub mod freshness;
pub mod model;
pub mod poll;
pub mod report;
pub mod scope;

pub use error::{FleetError, ValidationError};
pub use folders::{FolderBackend, FolderError, FolderLedger, FolderOp, FolderOrganizer, FolderTree};
pub use freshness::{FreshnessConfig, FreshnessTracker, PrinterStatus, TrackedPrinterState};
pub use model::{Folder, PrinterRecord, Telemetry, Tenant};
pub use scope::{Scope, SessionContext};
