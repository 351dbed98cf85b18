//! Base URL normalization

use reqwest::Url;

use crate::error::{ClientError, Result};

/// Path prefix of the GitLab REST API
pub const API_PATH: &str = "/api/v4";

/// Turns whatever the user configured into the API root URL
///
/// - surrounding whitespace and trailing slashes are dropped
/// - an existing `/api/v4` suffix is dropped (it is re-added at the end)
/// - `http://` is upgraded to `https://` unless `allow_insecure` is set
/// - a missing scheme defaults to `https://`
pub fn normalize_base_url(raw: &str, allow_insecure: bool) -> Result<String> {
    let mut url = raw.trim().trim_end_matches('/');
    if let Some(stripped) = url.strip_suffix(API_PATH) {
        url = stripped.trim_end_matches('/');
    }

    if url.is_empty() {
        return Err(ClientError::InvalidUrl("base URL is empty".to_string()));
    }

    let url = if let Some(rest) = url.strip_prefix("http://") {
        if allow_insecure {
            url.to_string()
        } else {
            format!("https://{}", rest)
        }
    } else if url.starts_with("https://") {
        url.to_string()
    } else if url.contains("://") {
        return Err(ClientError::InvalidUrl(format!(
            "unsupported scheme in {}",
            url
        )));
    } else {
        format!("https://{}", url)
    };

    let api_url = format!("{}{}", url, API_PATH);
    Url::parse(&api_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", api_url, e)))?;

    Ok(api_url)
}
