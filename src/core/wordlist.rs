// src/core/wordlist.rs

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

/// Prefixes used when no wordlist file is available.
pub const FALLBACK_PREFIXES: &[&str] = &[
    "www", "mail", "ftp", "localhost", "webmail", "smtp", "pop", "imap", "secure", "news",
    "ns", "ns1", "ns2", "ns3", "ns4", "mx", "mx1", "test", "docs", "api",
    "admin", "blog", "cloud", "dev", "development", "forum", "help", "image", "img", "login",
    "m", "mobile", "my", "new", "old", "owa", "portal", "proxy", "shop", "ssl",
    "support", "web", "webdisk", "webadmin", "autodiscover", "autoconfig", "email", "dashboard", "vpn", "remote",
    "wiki", "download", "downloads", "uploads", "cdn", "static", "assets", "media", "files", "images",
    "js", "css", "cache", "storage", "app", "apps", "application", "demo", "stage", "staging",
    "prod", "production", "testing", "beta", "alpha", "live", "status", "monitor", "monitoring", "stats",
    "statistics", "analytics", "metrics", "db", "database", "sql", "mysql", "postgres", "redis", "mongodb",
    "elastic", "search", "query", "rest", "graphql", "soap", "xml", "json", "rpc", "auth",
    "authentication", "signin", "signup", "register", "account", "accounts", "user", "users", "profile", "profiles",
    "administrator", "root", "system", "sys", "server", "servers", "service", "services", "backend", "frontend",
    "client", "clients", "customer", "customers", "partner", "partners", "intranet", "extranet", "internal", "git",
    "gitlab", "jenkins", "ci", "jira", "confluence", "grafana", "kibana", "sso", "id", "crm",
    "erp", "hr", "billing", "pay", "payments", "store", "chat", "video", "sandbox", "uat",
];

/// Loads brute-force prefixes from a newline-delimited file.
///
/// Lines are trimmed; blank lines and `#` comments are skipped and duplicates
/// dropped while keeping file order. A missing, unreadable or empty file is
/// never fatal: the built-in list is returned instead.
pub async fn load(path: &Path) -> Vec<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            let prefixes = parse(&contents);
            if prefixes.is_empty() {
                warn!(path = %path.display(), "Wordlist is empty, using built-in prefixes.");
                return fallback();
            }
            info!(path = %path.display(), prefixes = prefixes.len(), "Wordlist loaded.");
            prefixes
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Wordlist unavailable, using built-in prefixes.");
            fallback()
        }
    }
}

pub fn fallback() -> Vec<String> {
    FALLBACK_PREFIXES.iter().map(|p| p.to_string()).collect()
}

fn parse(contents: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(line.to_string()))
        .map(String::from)
        .collect()
}
