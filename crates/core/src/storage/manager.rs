use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::price::PriceCache;

use super::format::{self, PayloadKind};

/// Default file name for the portfolio store inside a store directory.
pub const PORTFOLIO_FILE: &str = "portfolio.cfol";

/// Default file name for the price-cache sidecar.
pub const PRICE_CACHE_FILE: &str = "prices.cfol";

/// High-level storage operations: portfolio and price-cache payloads
/// to/from bytes or files.
///
/// Two deliberately separate files. The portfolio store is the source
/// of truth and a corrupt one is a boot failure; the cache sidecar is
/// disposable and a corrupt one is just a miss.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to store-file bytes.
    ///
    /// Flow: Portfolio → bincode → CFOL format bytes
    pub fn portfolio_to_bytes(portfolio: &Portfolio) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))?;
        Ok(format::write_file(
            format::CURRENT_VERSION,
            PayloadKind::Portfolio,
            &payload,
        ))
    }

    /// Deserialize a portfolio from store-file bytes.
    pub fn portfolio_from_bytes(data: &[u8]) -> Result<Portfolio, CoreError> {
        let (_, payload) = format::read_file(data, PayloadKind::Portfolio)?;
        bincode::deserialize(payload).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize portfolio: {e}"))
        })
    }

    /// Serialize the price cache to sidecar-file bytes.
    pub fn cache_to_bytes(cache: &PriceCache) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(cache).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize price cache: {e}"))
        })?;
        Ok(format::write_file(
            format::CURRENT_VERSION,
            PayloadKind::PriceCache,
            &payload,
        ))
    }

    /// Deserialize the price cache from sidecar-file bytes. Any failure
    /// comes back as [`CoreError::CacheRead`] so callers can uniformly
    /// treat it as a miss.
    pub fn cache_from_bytes(data: &[u8]) -> Result<PriceCache, CoreError> {
        let (_, payload) =
            format::read_file(data, PayloadKind::PriceCache).map_err(|e| match e {
                CoreError::CacheRead(_) => e,
                other => CoreError::CacheRead(other.to_string()),
            })?;
        bincode::deserialize(payload)
            .map_err(|e| CoreError::CacheRead(format!("Failed to deserialize price cache: {e}")))
    }

    /// Durably commit a portfolio to a file (native only).
    ///
    /// Writes a temp file, syncs it, then renames over the target, so a
    /// crash mid-write can never corrupt the committed store. Failures
    /// surface as [`CoreError::StoreWrite`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_portfolio(portfolio: &Portfolio, path: &std::path::Path) -> Result<(), CoreError> {
        let bytes = Self::portfolio_to_bytes(portfolio)?;
        Self::commit_file(path, &bytes)
    }

    /// Load a portfolio from a file (native only). A missing file is
    /// `Ok(None)`; anything else unreadable is an error for the caller
    /// to treat as a boot failure.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_portfolio(path: &std::path::Path) -> Result<Option<Portfolio>, CoreError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::FileIO(e.to_string())),
        };
        Self::portfolio_from_bytes(&bytes).map(Some)
    }

    /// Durably commit the price cache sidecar (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_cache(cache: &PriceCache, path: &std::path::Path) -> Result<(), CoreError> {
        let bytes = Self::cache_to_bytes(cache)?;
        Self::commit_file(path, &bytes)
    }

    /// Load the price cache sidecar (native only). Missing, unreadable,
    /// or corrupt all come back as [`CoreError::CacheRead`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_cache(path: &std::path::Path) -> Result<PriceCache, CoreError> {
        let bytes =
            std::fs::read(path).map_err(|e| CoreError::CacheRead(e.to_string()))?;
        Self::cache_from_bytes(&bytes)
    }

    /// Whole-value atomic replacement: temp file in the same directory,
    /// sync, rename over the target.
    #[cfg(not(target_arch = "wasm32"))]
    fn commit_file(path: &std::path::Path, bytes: &[u8]) -> Result<(), CoreError> {
        use std::io::Write;

        let tmp_path = path.with_extension("tmp");
        let result = (|| {
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            std::fs::rename(&tmp_path, path)
        })();

        result.map_err(|e| {
            // Best-effort cleanup of the temp file; the target is intact.
            let _ = std::fs::remove_file(&tmp_path);
            CoreError::StoreWrite(format!("{}: {e}", path.display()))
        })
    }
}
