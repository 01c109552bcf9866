//! Typed operations per API resource.
//!
//! Each service borrows the client and builds the exact request body its
//! resource expects; dispatch, signing, and classification are shared
//! through [`crate::MyraClient`].

mod cache_clear;
mod error_pages;
mod maintenance;
mod statistic;
mod subdomain_setting;

pub use cache_clear::CacheClearService;
pub use error_pages::{
    normalize_error_codes, ErrorPagesOperation, ErrorPagesService, AVAILABLE_ERROR_CODES,
};
pub use maintenance::{MaintenanceRecord, MaintenanceService, Operation};
pub use statistic::StatisticService;
pub use subdomain_setting::SubdomainSettingService;
