//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, downloads, wall clock)
//! from page and component logic. Each helper no-ops or falls back on the
//! server so SSR stays deterministic.

pub mod clock;
pub mod download;
pub mod prompt;
pub mod storage;
