//! Shared helpers for generator backends.

use lq_domain::error::Error;

/// Convert a [`reqwest::Error`] for `backend`. Timeouts keep their own
/// variant; everything else is a generation failure.
pub(crate) fn from_reqwest(backend: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        return Error::Timeout(format!("{backend}: {e}"));
    }
    Error::Generation {
        backend: backend.to_owned(),
        message: e.to_string(),
    }
}

/// Hide the `key=` query parameter of a URL before it is logged.
pub(crate) fn redact_url_key(url: &str) -> String {
    match url.find("key=") {
        Some(idx) => {
            let end = url[idx..].find('&').map(|e| idx + e).unwrap_or(url.len());
            format!("{}key=***{}", &url[..idx], &url[end..])
        }
        None => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_trailing_key() {
        assert_eq!(
            redact_url_key("https://x/v1beta/models/m:generateContent?key=secret"),
            "https://x/v1beta/models/m:generateContent?key=***"
        );
    }

    #[test]
    fn redacts_key_before_other_params() {
        assert_eq!(redact_url_key("https://x?key=abc&alt=sse"), "https://x?key=***&alt=sse");
    }

    #[test]
    fn leaves_urls_without_key() {
        assert_eq!(redact_url_key("https://x/y"), "https://x/y");
    }
}
