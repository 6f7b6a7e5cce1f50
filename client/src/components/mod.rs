//! UI components for the monitor console.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages compose these components; shared state comes from the context
//! signals provided by `App`.

pub mod agent_dialog;
pub mod banner;
pub mod confirm_dialog;
pub mod printer_card;
pub mod route_gate;
pub mod tenant_sidebar;
