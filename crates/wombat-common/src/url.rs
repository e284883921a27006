//! URL parsing and relative-reference resolution.
//!
//! [URL Standard](https://url.spec.whatwg.org/)
//!
//! A pragmatic parser covering the shapes the browser actually meets:
//! absolute `scheme://host:port/path?query#fragment` URLs, protocol-relative
//! `//host/...` references, absolute paths, and relative paths with `.` and
//! `..` segment normalization.

/// A parsed URL.
///
/// [URL Standard § 4.1](https://url.spec.whatwg.org/#url-representation)
/// "A URL is a struct that represents a universal identifier."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// URL scheme, lowercased (`http`, `https`, `file`, `data`, ...).
    pub scheme: String,
    /// Host, if the scheme has an authority component.
    pub host: Option<String>,
    /// Explicit port, if present.
    pub port: Option<u16>,
    /// Path component, always beginning with `/` for authority-bearing URLs.
    pub path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
    /// Fragment without the leading `#`.
    pub fragment: Option<String>,
}

impl Url {
    /// Parse an absolute URL string.
    ///
    /// Returns `None` if the string has no scheme.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let colon = input.find(':')?;
        let scheme = &input[..colon];
        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
            || !scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        let scheme = scheme.to_ascii_lowercase();
        let rest = &input[colon + 1..];

        // Opaque schemes (data:, mailto:) keep everything in the path.
        if !rest.starts_with("//") {
            let (rest, fragment) = split_off(rest, '#');
            let (path, query) = split_off(rest, '?');
            return Some(Self {
                scheme,
                host: None,
                port: None,
                path: path.to_string(),
                query: query.map(String::from),
                fragment: fragment.map(String::from),
            });
        }

        let rest = &rest[2..];
        let (rest, fragment) = split_off(rest, '#');
        let (rest, query) = split_off(rest, '?');
        let (authority, path) = rest
            .find('/')
            .map_or((rest, ""), |i| (&rest[..i], &rest[i..]));

        let (host, port) = match authority.rsplit_once(':') {
            Some((h, p)) if p.chars().all(|c| c.is_ascii_digit()) && !p.is_empty() => {
                (h, p.parse::<u16>().ok())
            }
            _ => (authority, None),
        };

        Some(Self {
            scheme,
            host: Some(host.to_ascii_lowercase()),
            port,
            path: if path.is_empty() {
                "/".to_string()
            } else {
                path.to_string()
            },
            query: query.map(String::from),
            fragment: fragment.map(String::from),
        })
    }

    /// Serialize the URL back to a string.
    #[must_use]
    pub fn to_url_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.scheme);
        out.push(':');
        if let Some(host) = &self.host {
            out.push_str("//");
            out.push_str(host);
            if let Some(port) = self.port {
                out.push(':');
                out.push_str(&port.to_string());
            }
        }
        out.push_str(&self.path);
        if let Some(q) = &self.query {
            out.push('?');
            out.push_str(q);
        }
        if let Some(f) = &self.fragment {
            out.push('#');
            out.push_str(f);
        }
        out
    }

    /// The origin part (`scheme://host[:port]`) of an authority-bearing URL.
    #[must_use]
    pub fn origin(&self) -> String {
        match &self.host {
            Some(host) => {
                let mut out = format!("{}://{host}", self.scheme);
                if let Some(port) = self.port {
                    out.push(':');
                    out.push_str(&port.to_string());
                }
                out
            }
            None => format!("{}:", self.scheme),
        }
    }
}

fn split_off(input: &str, sep: char) -> (&str, Option<&str>) {
    input
        .split_once(sep)
        .map_or((input, None), |(a, b)| (a, Some(b)))
}

/// [URL Standard § 4.2](https://url.spec.whatwg.org/#concept-basic-url-parser)
///
/// Resolve a potentially relative URL reference against a base URL string.
///
/// Handles, in order: absolute URLs (returned as-is), protocol-relative
/// `//host/...` references, fragment-only references, absolute paths,
/// and relative paths (joined against the base's directory and normalized).
#[must_use]
pub fn resolve(href: &str, base: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return base.to_string();
    }
    if Url::parse(href).is_some() {
        return href.to_string();
    }

    let Some(base_url) = Url::parse(base) else {
        return href.to_string();
    };

    // Protocol-relative: adopt the base's scheme.
    if let Some(rest) = href.strip_prefix("//") {
        return format!("{}://{rest}", base_url.scheme);
    }

    // Fragment-only: replace the base's fragment.
    if let Some(frag) = href.strip_prefix('#') {
        let mut u = base_url;
        u.fragment = Some(frag.to_string());
        return u.to_url_string();
    }

    let (path_and_query, fragment) = split_off(href, '#');
    let (raw_path, query) = split_off(path_and_query, '?');

    let merged = if raw_path.starts_with('/') {
        raw_path.to_string()
    } else if raw_path.is_empty() {
        base_url.path.clone()
    } else {
        // Merge with the base path's directory.
        let dir = base_url
            .path
            .rsplit_once('/')
            .map_or("", |(d, _)| d);
        format!("{dir}/{raw_path}")
    };

    let mut resolved = Url {
        path: normalize_path(&merged),
        query: query.map(String::from).or_else(|| {
            if raw_path.is_empty() {
                base_url.query.clone()
            } else {
                None
            }
        }),
        fragment: fragment.map(String::from),
        ..base_url
    };
    if resolved.path.is_empty() {
        resolved.path = "/".to_string();
    }
    resolved.to_url_string()
}

/// [URL Standard § 4.4](https://url.spec.whatwg.org/#path-state)
///
/// Remove `.` segments and fold `..` segments into their parent.
/// A trailing `.` or `..` keeps the trailing slash.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let trailing_slash = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");
    for seg in path.split('/') {
        match seg {
            "." | "" => {}
            ".." => {
                let _ = segments.pop();
            }
            s => segments.push(s),
        }
    }
    let mut out = String::from("/");
    out.push_str(&segments.join("/"));
    if trailing_slash && out.len() > 1 {
        out.push('/');
    }
    out
}

/// Percent-encode a query component (application/x-www-form-urlencoded:
/// spaces become `+`, non-unreserved bytes become `%XX`).
#[must_use]
pub fn percent_encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
