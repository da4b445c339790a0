//! Hostname normalization
//!
//! Every hostname is normalized the same way when a domain is stored and when
//! a Host header is looked up, so the two are always directly comparable.

lazy_static::lazy_static! {
    /// Any trailing run of dots, whitespace and `:<port>` suffixes.
    static ref TRAILING_NOISE: regex::Regex = regex::Regex::new(r"(?:[.\s]|:[0-9]+)+$").unwrap();
}

const WWW_PREFIX: &str = "www.";
const LOCALHOST: &str = "localhost";

/// Normalize a raw hostname (typically a Host header value).
///
/// Lowercases, strips trailing `:<port>` and trailing dots. Returns `None` when
/// nothing is left. No further validation is done: malformed names simply
/// match nothing downstream. The result is a fixed point of this function.
pub fn normalize_hostname(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let stripped = TRAILING_NOISE.replace(&lowered, "");

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.into_owned())
    }
}

/// `www.example.com` -> `example.com`; `None` when there is no `www.` prefix.
pub fn strip_www(hostname: &str) -> Option<&str> {
    hostname
        .strip_prefix(WWW_PREFIX)
        .filter(|rest| !rest.is_empty())
}

/// `example.com` -> `www.example.com`
pub fn with_www(hostname: &str) -> String {
    format!("{}{}", WWW_PREFIX, hostname)
}

/// Drop exactly the leftmost label of a hostname with three or more labels.
///
/// `news.curated.cx` -> `curated.cx`, while `curated.cx` -> `None`.
pub fn parent_domain(hostname: &str) -> Option<&str> {
    if hostname.split('.').count() < 3 {
        return None;
    }
    hostname
        .split_once('.')
        .map(|(_, rest)| rest)
        .filter(|rest| !rest.is_empty())
}

/// True for a normalized bare `localhost`.
pub fn is_localhost(hostname: &str) -> bool {
    hostname == LOCALHOST
}

/// `acme.localhost` -> `acme`. Only a single label in front of `localhost` is
/// accepted.
pub fn localhost_subdomain(hostname: &str) -> Option<&str> {
    let slug = hostname.strip_suffix(LOCALHOST)?.strip_suffix('.')?;
    if slug.is_empty() || slug.contains('.') {
        None
    } else {
        Some(slug)
    }
}
