//! Core domain + application logic for the Net Gains scheduling app.
//!
//! This crate is intentionally backend-agnostic. Supabase / device storage
//! live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod deeplink;
pub mod domain;
pub mod errors;
pub mod invite;
pub mod logging;
pub mod ports;
pub mod storage;
pub mod widgets;

pub use errors::{Error, Result};
