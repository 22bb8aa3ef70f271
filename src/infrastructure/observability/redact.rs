use url::Url;

/// Signed URL with its query string removed, safe to log. The query carries the signature.
pub fn redact_signed_url(url: &Url) -> String {
    match url.query() {
        Some(_) => {
            let mut redacted = url.clone();
            redacted.set_query(None);
            format!("{}?[REDACTED]", redacted)
        }
        None => url.to_string(),
    }
}
