//! API constants
//!
//! Centralized location for the wire-level constants shared by the request
//! pipeline and the donation link builder.

// Remote service
pub const BASE_URL: &str = "https://partners.every.org/";
pub const API_VERSION: &str = "v0.2";

// Donation link templates, `{}` is replaced by `<org-slug>?<query>`
pub const DONATION_PRODUCTION_URL: &str = "https://www.every.org/{}#donate";
pub const DONATION_SANDBOX_URL: &str = "https://staging.every.org/{}#donate";

// Headers
pub const HEADER_IDEMPOTENCY_KEY: &str = "X-Idempotency-Key";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Client defaults
pub const DEFAULT_AGENT_NAME: &str = "EveryOrgApiClient";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Pagination bounds
pub const MIN_PAGE: u32 = 1;
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Public documentation of the cause tokens accepted by the remote service.
pub const CAUSES_DOCS_URL: &str = "https://docs.every.org/docs/types#causes";
