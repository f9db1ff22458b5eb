//! License server - accounts, device-bound license keys and payment webhooks
//!
//! This library provides the core functionality for the license server,
//! including database operations, session tokens, license key generation and API handlers.

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod models;
pub mod util;
