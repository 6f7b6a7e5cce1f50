//! Networking: REST calls against the fleet backend.

pub mod api;
