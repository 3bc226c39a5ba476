//! Log Redaction Layer
//!
//! Scrubs API keys and access tokens from strings prior to logging. Upstream
//! error bodies can echo request headers or URLs, so they pass through here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Google API keys (`AIza` + 35 chars) and `key=` query parameters.
static GOOGLE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"AIza[0-9A-Za-z\-_]{35}|([?&]key=)[^&\s]+").unwrap());

/// Notion integration secrets (`secret_...` legacy, `ntn_...` current).
static NOTION_SECRET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:secret|ntn)_[0-9A-Za-z]{20,}").unwrap());

static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = GOOGLE_KEY_RE.replace_all(input, |caps: &regex::Captures| {
        match caps.get(1) {
            Some(prefix) => format!("{}[REDACTED_KEY]", prefix.as_str()),
            None => "[REDACTED_KEY]".to_string(),
        }
    });
    let redacted = NOTION_SECRET_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_and_notion_secret() {
        let raw = "auth failed for Bearer ntn_4Rb8uS2kq9mZ0aXc7YpLw3Ev1 (secret_AbCdEfGhIjKlMnOpQrStUvWx)";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("ntn_4Rb8uS2kq9mZ0aXc7YpLw3Ev1"));
        assert!(!clean.contains("secret_AbCdEfGhIjKlMnOpQrStUvWx"));
        assert!(clean.contains("auth failed for"));
    }

    #[test]
    fn redacts_google_key_in_url() {
        let raw = "POST https://generativelanguage.googleapis.com/v1beta/models/x:generateContent?key=abc123&alt=json";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("abc123"));
        assert!(clean.contains("?key=[REDACTED_KEY]&alt=json"));
    }

    #[test]
    fn leaves_plain_text_alone() {
        let raw = "Could not find property with name or id: Cook Time";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
