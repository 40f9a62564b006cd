// src/core/domain.rs

use url::Url;

use crate::core::error::ReconError;

const MAX_DOMAIN_LEN: usize = 253;

/// Turns user input into the apex domain a scan targets.
///
/// Accepts bare names as well as URLs (`https://example.com/path`), in which case
/// the host is extracted. The result is lowercase with no trailing dot.
pub fn normalize_domain(input: &str) -> Result<String, ReconError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(ReconError::InvalidDomain("domain is required".to_string()));
    }

    let with_scheme = if raw.contains("://") { raw.to_string() } else { format!("https://{raw}") };
    let host = Url::parse(&with_scheme)
        .ok()
        .and_then(|url| url.host_str().map(String::from))
        .ok_or_else(|| ReconError::InvalidDomain(raw.to_string()))?;

    let domain = host.trim_end_matches('.').to_ascii_lowercase();
    if !is_valid_domain(&domain) {
        return Err(ReconError::InvalidDomain(raw.to_string()));
    }
    Ok(domain)
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.len() > MAX_DOMAIN_LEN || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domains_are_lowercased() {
        assert_eq!(normalize_domain(" Example.COM ").unwrap(), "example.com");
        assert_eq!(normalize_domain("example.com.").unwrap(), "example.com");
    }

    #[test]
    fn urls_are_reduced_to_their_host() {
        assert_eq!(normalize_domain("https://www.example.com/login?x=1").unwrap(), "www.example.com");
        assert_eq!(normalize_domain("http://example.org:8080").unwrap(), "example.org");
    }

    #[test]
    fn junk_is_rejected() {
        for input in ["", "   ", "localhost", "exa mple.com", "-bad.example.com", "a..b", "*.example.com"] {
            assert!(normalize_domain(input).is_err(), "accepted {input:?}");
        }
    }
}
