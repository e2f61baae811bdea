//! Constants used throughout the HMS core crate.

/// Collection holding patient documents.
pub const PATIENTS: &str = "patient";

/// Collection holding doctor documents.
pub const DOCTORS: &str = "doctor";

/// Collection holding appointment documents.
pub const APPOINTMENTS: &str = "appointment";

/// Collection holding prescription documents.
pub const PRESCRIPTIONS: &str = "prescription";

/// Collection holding invoice documents.
pub const INVOICES: &str = "invoice";

/// Document field holding the primary identifier.
pub const ID_FIELD: &str = "_id";

pub const CREATED_AT_FIELD: &str = "created_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8001;

/// Per-request deadline used when `REQUEST_TIMEOUT_SECS` is unset.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 100;

/// Listing page size used when `recordPerPage` is absent or invalid.
pub const DEFAULT_RECORDS_PER_PAGE: usize = 10;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

/// Lifetime of a refresh token.
pub const REFRESH_TOKEN_TTL_HOURS: i64 = 168;

/// Name and surname length bounds for patients.
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

/// Minimum accepted password length at signup.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Upper bound for free-text fields without a tighter rule.
pub const TEXT_MAX_LEN: usize = 500;
