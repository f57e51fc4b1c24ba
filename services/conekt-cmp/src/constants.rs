use std::time::Duration;

// Headers used in cmp services.
pub const SIGN_METHOD: &str = "sign-method";
pub const TIMESTAMP: &str = "timestamp";
pub const VERSION: &str = "version";
pub const SIGNATURE: &str = "signature";
pub const REQUEST_ID: &str = "request-id";
pub const ACCESS_KEY: &str = "access-key";

pub const SIGN_METHOD_HMAC_SHA256: &str = "HMAC-SHA256";
pub const API_VERSION: &str = "1.0";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Env values used in cmp services.
pub const CMP_ENDPOINT: &str = "CMP_ENDPOINT";
pub const CMP_ACCESS_KEY: &str = "CMP_ACCESS_KEY";
pub const CMP_SECRET: &str = "CMP_SECRET";

// API paths.
pub const TOKEN_PATH: &str = "/api/v1/external/oauth/token";
pub const SIM_DETAILS_PATH: &str = "/api/v1/external/device/sim/details";

/// Endpoint used when neither config nor env sets one.
pub const DEFAULT_ENDPOINT: &str = "https://cmp.conekt.ai";

/// Timeout applied to each CMP call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
