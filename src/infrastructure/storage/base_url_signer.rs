use std::time::Duration;

use chrono::Utc;
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use reqwest::Method;
use url::Url;

/// Signer for backends that have no native URL signing: the object URL is
/// `{base}/{path}?expires={unix_seconds}`.
#[derive(Debug, Clone)]
pub struct BaseUrlSigner {
    base: Url,
}

impl BaseUrlSigner {
    pub fn new(base: Url) -> Self {
        Self {
            base: with_trailing_slash(base),
        }
    }
}

/// Makes `url` usable as a base for `Url::join` without losing its last path segment.
pub(super) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait::async_trait]
impl Signer for BaseUrlSigner {
    async fn signed_url(
        &self,
        _method: Method,
        path: &StorePath,
        expires_in: Duration,
    ) -> object_store::Result<Url> {
        let mut url = self
            .base
            .join(path.as_ref())
            .map_err(|e| object_store::Error::Generic {
                store: "BaseUrlSigner",
                source: Box::new(e),
            })?;
        let expires_at = Utc::now().timestamp() + expires_in.as_secs() as i64;
        url.query_pairs_mut()
            .append_pair("expires", &expires_at.to_string());
        Ok(url)
    }
}
