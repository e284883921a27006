//! HTTP fetch collaborator for the Wombat browser.
//!
//! The engine core consumes only three things from a response: the status
//! code, the `Content-Type` header (to pick a text decoder), and the body
//! bytes. Redirect chains and TLS are entirely reqwest's concern.

use std::time::Duration;

use base64::Engine as _;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Default redirect limit.
const MAX_REDIRECTS: usize = 10;

/// Options for a single fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// User-Agent header value.
    pub user_agent: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: TIMEOUT,
            max_redirects: MAX_REDIRECTS,
        }
    }
}

/// The portion of an HTTP response the engine consumes.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value, if present.
    pub content_type: Option<String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Decode the body as text.
    ///
    /// Documents are decoded as UTF-8 with lossy replacement; charset
    /// parameters other than utf-8 are reported through the warning sink.
    #[must_use]
    pub fn text(&self) -> String {
        if let Some(ct) = &self.content_type {
            if let Some(charset) = ct.split(';').find_map(|p| {
                p.trim()
                    .strip_prefix("charset=")
                    .map(|c| c.trim_matches('"').to_ascii_lowercase())
            }) {
                if charset != "utf-8" && charset != "utf8" && charset != "us-ascii" {
                    crate::warning::warn_once(
                        "net",
                        &format!("decoding charset '{charset}' as UTF-8 (lossy)"),
                    );
                }
            }
        }
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Fetch a URL and return the status, content type, and body.
///
/// Supports `http(s)` URLs via reqwest and `data:` URLs inline.
///
/// # Errors
///
/// Returns an error string if the HTTP client cannot be created, the request
/// fails, or a data URL is malformed. A non-success HTTP status is NOT an
/// error here; callers inspect `status` (error pages still render).
pub fn fetch(url: &str, opts: &FetchOptions) -> Result<FetchResponse, String> {
    if url.starts_with("data:") {
        return fetch_data_url(url);
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(opts.timeout)
        .redirect(reqwest::redirect::Policy::limited(opts.max_redirects))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))?;

    let response = client
        .get(url)
        .header("User-Agent", opts.user_agent.as_str())
        .send()
        .map_err(|e| format!("Request failed: {e}"))?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let body = response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| format!("Failed to read response body: {e}"))?;

    Ok(FetchResponse {
        status,
        content_type,
        body,
    })
}

/// Decode a `data:` URL into a synthetic response.
///
/// Handles the `data:[<mediatype>][;base64],<data>` form; non-base64 data is
/// percent-decoded.
///
/// # Errors
///
/// Returns an error string if the URL has no comma separator or the base64
/// payload does not decode.
pub fn fetch_data_url(url: &str) -> Result<FetchResponse, String> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URL".to_string())?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URL missing ',' separator".to_string())?;

    let is_base64 = meta.ends_with(";base64");
    let media_type = meta.trim_end_matches(";base64");
    let content_type = if media_type.is_empty() {
        Some("text/plain;charset=US-ASCII".to_string())
    } else {
        Some(media_type.to_string())
    };

    let body = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| format!("invalid base64 in data URL: {e}"))?
    } else {
        percent_decode(payload)
    };

    Ok(FetchResponse {
        status: 200,
        content_type,
        body,
    })
}

/// Percent-decode a string into bytes. Malformed escapes pass through
/// literally.
#[must_use]
pub fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = &input[i + 1..i + 3];
            if let Ok(b) = u8::from_str_radix(hex, 16) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}
