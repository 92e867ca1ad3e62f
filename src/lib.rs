/// HTTP application wiring
pub mod app;
/// Session authentication
pub mod auth;
/// API client and local session storage
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Token signing
pub mod crypto;
/// Validated domain values
pub mod domain;
/// Error enums
pub mod error;
/// Stored records
pub mod model;
/// Snapshot store and repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
/// View-model helpers: form validation and reminder links
pub mod views;
