//! Loading JSON documents and schemas from files, strings, and HTTP URLs.

use std::path::Path;

use crate::error::LoadError;
use crate::schema::Schema;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<serde_json::Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), "loading JSON file");
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<serde_json::Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the response
/// isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_json_url(url: &str) -> Result<serde_json::Value, LoadError> {
    let network_error = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    tracing::debug!(url, "fetching JSON document");
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a JSON document from a file path or URL.
///
/// # Errors
///
/// Returns `LoadError` if the source cannot be read or parsed. URLs fail
/// with `LoadError::InvalidJson` when the `remote` feature is disabled.
pub fn load_json_auto(source: &str) -> Result<serde_json::Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            return load_json_url(source);
        }
        #[cfg(not(feature = "remote"))]
        {
            use serde::de::Error;
            return Err(LoadError::InvalidJson {
                source: serde_json::Error::custom(format!(
                    "remote loading disabled, cannot fetch {}",
                    source
                )),
            });
        }
    }
    load_json(Path::new(source))
}

/// Load and parse a schema descriptor from a file path or URL.
///
/// # Errors
///
/// Returns `LoadError::InvalidSchema` if the document is not a valid
/// descriptor, or any error from [`load_json_auto`].
pub fn load_schema_auto(source: &str) -> Result<Schema, LoadError> {
    let descriptor = load_json_auto(source)?;
    Ok(Schema::from_descriptor(&descriptor)?)
}
