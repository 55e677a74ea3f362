use crate::domain::model::Schema;
use crate::utils::error::{FetchError, Result};

/// Decodes `bytes` as `T`, surfacing why it failed.
pub fn try_decode<T: Schema>(bytes: &[u8]) -> Result<T> {
    let value: T = serde_json::from_slice(bytes).map_err(|source| FetchError::Decode {
        schema: T::NAME,
        source,
    })?;

    value
        .check()
        .map_err(|reason| FetchError::SchemaViolation {
            schema: T::NAME,
            reason,
        })?;

    Ok(value)
}

/// Decodes `bytes` as `T`, treating any failure as absent data.
pub fn decode<T: Schema>(bytes: &[u8]) -> Option<T> {
    match try_decode(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Discarding undecodable payload ({} bytes): {}", bytes.len(), e);
            None
        }
    }
}
