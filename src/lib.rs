//! # Myracloud API Client
//!
//! A client for the Myracloud cloud-security REST API ("rapi") with:
//! - MYRA HMAC request signing (MD5 body digest, chained HMAC-SHA256 key
//!   derivation, HMAC-SHA512 signature)
//! - Validated, normalized request options (fqdn trimming, date parsing,
//!   closed operation enumerations)
//! - Synchronous dispatch with language-prefixed endpoints and 1-based
//!   list pagination
//! - Response classification into success / validation failure /
//!   permission denied / unknown failure
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use myracloud_api::{ApiSettings, MyraClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ApiSettings::new("my-api-key", "my-secret");
//!     let client = MyraClient::new(settings)?;
//!
//!     // Clear the cache for a protected domain
//!     client.cache_clear().clear("www.example.com", Some("*.css"), true)?;
//!
//!     // List maintenance pages
//!     let page = client.maintenance().list("www.example.com", 1)?;
//!     for entry in &page.list {
//!         println!("{} .. {}", entry.start.as_deref().unwrap_or("-"),
//!                  entry.end.as_deref().unwrap_or("-"));
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod outcome;

// Request signing
pub mod signing;

// HTTP client and dispatch
pub mod client;

// Pagination handling
pub mod pagination;

// API services
pub mod services;

// Re-exports for convenience
pub use client::{MyraClient, RawResponse};
pub use config::{ApiMethod, ApiSettings, RequestOptions, RequestOptionsBuilder};
pub use errors::{MyraError, MyraResult};
pub use outcome::{classify, ApiOutcome, Violation};
pub use pagination::ListEnvelope;
