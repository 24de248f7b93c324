use crate::errors::ValidationError;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;
use url::{Host, Url};

const LOCALHOST_MESSAGE: &str = "Localhost URLs are not allowed";
const PRIVATE_IP_MESSAGE: &str = "Private IP addresses are not allowed";

/// Only used for a debug hint, paths without one are still accepted.
const SITEMAP_EXTENSIONS: &[&str] = &[".xml", ".xml.gz", ".txt"];

/// Check that `url` is an absolute http(s) URL that does not point at a
/// loopback, link-local or private network host.
pub fn validate_sitemap_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::new(
            "Sitemap URL must be a non-empty string",
        ));
    }

    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("Sitemap URL cannot be empty"));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|_| ValidationError::new(format!("Invalid URL format: {trimmed}")))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ValidationError::new(format!(
            "URL must use HTTP or HTTPS protocol, got: {scheme}:"
        )));
    }

    let host = match parsed.host() {
        Some(Host::Domain("")) | None => {
            return Err(ValidationError::new("URL must have a valid hostname"))
        }
        Some(host) => host,
    };

    if let Some(reason) = blocked_host_reason(&host) {
        return Err(ValidationError::new(reason));
    }

    check_extension(&parsed);

    Ok(())
}

/// Strip surrounding whitespace. Encoding happens when the URL is embedded
/// in the ping query.
pub fn normalize_sitemap_url(url: &str) -> String {
    url.trim().to_owned()
}

fn blocked_host_reason(host: &Host<&str>) -> Option<&'static str> {
    match host {
        Host::Ipv4(ip) => blocked_ipv4_reason(*ip),
        Host::Ipv6(ip) => blocked_ipv6_reason(*ip),
        Host::Domain(domain) => {
            // `localhost.` and `localhost` name the same host
            let domain = domain.strip_suffix('.').unwrap_or(domain);
            blocked_domain_reason(&domain.to_ascii_lowercase())
        }
    }
}

fn blocked_ipv4_reason(ip: Ipv4Addr) -> Option<&'static str> {
    if ip.is_loopback() {
        Some(LOCALHOST_MESSAGE)
    } else if ip.is_private() || ip.is_link_local() {
        Some(PRIVATE_IP_MESSAGE)
    } else {
        None
    }
}

fn blocked_ipv6_reason(ip: Ipv6Addr) -> Option<&'static str> {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return blocked_ipv4_reason(v4);
    }
    if ip.is_loopback() {
        Some(LOCALHOST_MESSAGE)
    } else if is_unique_local(ip) {
        Some(PRIVATE_IP_MESSAGE)
    } else {
        None
    }
}

// fc00::/7, which includes fd00::/8
fn is_unique_local(ip: Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

/// Domains get the same textual checks as IP literals, so names such as
/// `10.internal.example` are rejected as well.
fn blocked_domain_reason(domain: &str) -> Option<&'static str> {
    if domain == "localhost" || domain.starts_with("127.") || domain.ends_with(".local") {
        return Some(LOCALHOST_MESSAGE);
    }

    let private = domain.starts_with("10.")
        || domain.starts_with("192.168.")
        || domain.starts_with("169.254.")
        || is_private_172(domain);
    private.then_some(PRIVATE_IP_MESSAGE)
}

fn is_private_172(domain: &str) -> bool {
    domain
        .strip_prefix("172.")
        .and_then(|rest| rest.split_once('.'))
        .and_then(|(octet, _)| octet.parse::<u8>().ok())
        .is_some_and(|octet| (16..=31).contains(&octet))
}

fn check_extension(url: &Url) {
    let path = url.path().to_ascii_lowercase();
    if path != "/" && !SITEMAP_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        debug!(path, "sitemap path has no recognised extension");
    }
}
