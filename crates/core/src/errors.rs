use thiserror::Error;

/// Unified error type for the entire coinfolio-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Corrupt or unreadable price-cache data. Callers treat this as a
    /// cache miss, never as a fatal condition.
    #[error("Cache read failed: {0}")]
    CacheRead(String),

    /// A durable commit to the local store did not complete. The
    /// in-memory state still matches the last committed record.
    #[error("Store write failed: {0}")]
    StoreWrite(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited by price API (HTTP 429)")]
    RateLimited,

    #[error("Price API returned HTTP {status}")]
    BadResponse { status: u16 },

    #[error("Failed to decode price API response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    // ── Notifications ───────────────────────────────────────────────
    #[error("Notification permission not granted")]
    PermissionDenied,

    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so the
        // requested coin-id list never leaks into surfaced errors.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        if e.is_timeout() {
            CoreError::Timeout(sanitized)
        } else if e.is_decode() {
            CoreError::Decode(sanitized)
        } else {
            CoreError::Network(sanitized)
        }
    }
}
