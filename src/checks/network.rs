use super::NETWORK;
use crate::model::{CheckResult, Severity};
use std::collections::BTreeSet;

const TITLE: &str = "Network Egress";

const KNOWN_API_DOMAINS: &[&str] = &["api.openai.com", "api.anthropic.com", "api.github.com"];

/// Hosts commonly used to pull code or push data out.
const RISKY_DOMAINS: &[&str] = &["raw.githubusercontent.com", "pastebin.com", "ngrok.io", "ngrok-free.app"];

/// More distinct unknown hosts than this counts as broad egress.
const UNKNOWN_DOMAIN_LIMIT: usize = 5;

/// Scheme and host part of an endpoint, schemeless values read as https.
///
/// The host keeps any port or userinfo; a value with an empty authority
/// falls back to its path.
fn split_endpoint(value: &str) -> (String, String) {
    let url = if value.contains("://") {
        value.to_string()
    } else {
        format!("https://{value}")
    };
    let (scheme, rest) = url.split_once("://").unwrap_or(("https", url.as_str()));

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let domain = if authority.is_empty() {
        tail.split(['?', '#']).next().unwrap_or_default()
    } else {
        authority
    };
    (scheme.to_lowercase(), domain.to_string())
}

fn is_wildcard(value: &str) -> bool {
    value.contains('*') || value.contains("0.0.0.0") || value.eq_ignore_ascii_case("any")
}

pub fn evaluate_network(endpoints: &[String]) -> CheckResult {
    if endpoints.is_empty() {
        return CheckResult::new(
            NETWORK,
            TITLE,
            0.0,
            Severity::Low,
            "No configured external endpoints found.",
            Vec::new(),
        );
    }

    let mut details = Vec::new();
    let mut has_http = false;
    let mut wildcard = false;
    let mut unknown = BTreeSet::new();
    let mut risky = BTreeSet::new();

    for endpoint in endpoints {
        let value = endpoint.trim();
        wildcard |= is_wildcard(value);

        let (scheme, domain) = split_endpoint(value);
        if scheme == "http" {
            has_http = true;
            details.push(format!("Non-TLS endpoint: {endpoint}"));
        }
        if RISKY_DOMAINS.contains(&domain.as_str()) {
            details.push(format!("Code-fetch/exfil domain configured: {domain}"));
            risky.insert(domain);
        } else if !domain.is_empty() && !KNOWN_API_DOMAINS.contains(&domain.as_str()) {
            unknown.insert(domain);
        }
    }

    let (score, severity, summary) = if has_http || wildcard {
        (10.0, Severity::Critical, "Arbitrary or insecure network egress appears allowed.")
    } else if !risky.is_empty() || unknown.len() > UNKNOWN_DOMAIN_LIMIT {
        (7.0, Severity::High, "Broad outbound network access detected.")
    } else if !unknown.is_empty() {
        (4.0, Severity::Medium, "Custom network endpoints detected; validate trust boundaries.")
    } else {
        (2.0, Severity::Low, "Network access is limited to known API domains.")
    };

    details.push(format!("Configured endpoints: {}", endpoints.len()));
    CheckResult::new(NETWORK, TITLE, score, severity, summary, details)
}
