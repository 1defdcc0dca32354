//! Download URL encoding for a bucket.

use url::Url;

use crate::{BlobError, BlobPath};

/// Maps blob paths to public download URLs and back.
///
/// URLs have the form `{endpoint}/v0/b/{bucket}/o?name={path}&alt=media`.
#[derive(Clone, Debug)]
pub struct BlobLocator {
    endpoint: Url,
    bucket: String,
}

impl BlobLocator {
    pub fn new(endpoint: &str, bucket: &str) -> Result<Self, BlobError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| BlobError::InvalidReference(e.to_string()))?;
        if bucket.is_empty() || bucket.contains('/') {
            return Err(BlobError::InvalidReference(format!(
                "invalid bucket name: {}",
                bucket
            )));
        }
        Ok(Self {
            endpoint,
            bucket: bucket.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_base(&self) -> String {
        format!(
            "{}/v0/b/{}/o",
            self.endpoint.as_str().trim_end_matches('/'),
            self.bucket
        )
    }

    /// Public download URL for `path`.
    pub fn url_for(&self, path: &BlobPath) -> String {
        let mut url = match Url::parse(&self.object_base()) {
            Ok(url) => url,
            // The endpoint parsed in `new`, so appending plain segments cannot fail.
            Err(_) => return self.object_base(),
        };
        url.query_pairs_mut()
            .append_pair("name", path.as_str())
            .append_pair("alt", "media");
        url.to_string()
    }

    /// Resolve a download URL issued by this locator, or a bare blob path.
    pub fn resolve(&self, reference: &str) -> Result<BlobPath, BlobError> {
        let url = match Url::parse(reference) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => return BlobPath::new(reference),
            Err(e) => return Err(BlobError::InvalidReference(e.to_string())),
        };

        let base = Url::parse(&self.object_base())
            .map_err(|e| BlobError::InvalidReference(e.to_string()))?;
        if url.origin() != base.origin() || url.path() != base.path() {
            return Err(BlobError::InvalidReference(format!(
                "not a {} download URL: {}",
                self.bucket, reference
            )));
        }

        let name = url
            .query_pairs()
            .find(|(k, _)| k == "name")
            .map(|(_, v)| v.into_owned())
            .ok_or_else(|| BlobError::InvalidReference(reference.to_string()))?;
        BlobPath::new(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> BlobLocator {
        BlobLocator::new("https://storage.rpa.local", "rpa-console").unwrap()
    }

    #[test]
    fn url_round_trips_through_resolve() {
        let loc = locator();
        let path = BlobPath::new("activities/a1_1700000000000_my photo&1.jpg").unwrap();
        let url = loc.url_for(&path);
        assert!(url.starts_with("https://storage.rpa.local/v0/b/rpa-console/o?name="));
        assert!(url.ends_with("&alt=media"));
        assert_eq!(loc.resolve(&url).unwrap(), path);
    }

    #[test]
    fn bare_paths_resolve_directly() {
        let loc = locator();
        assert_eq!(
            loc.resolve("article-images/cover.png").unwrap().as_str(),
            "article-images/cover.png"
        );
    }

    #[test]
    fn foreign_urls_are_rejected() {
        let loc = locator();
        let other = BlobLocator::new("https://storage.rpa.local", "other-bucket").unwrap();
        let url = other.url_for(&BlobPath::new("a/b.png").unwrap());
        assert!(matches!(
            loc.resolve(&url),
            Err(BlobError::InvalidReference(_))
        ));
        assert!(loc.resolve("https://example.com/a.png").is_err());
    }

    #[test]
    fn invalid_bucket_is_rejected() {
        assert!(BlobLocator::new("https://storage.rpa.local", "").is_err());
        assert!(BlobLocator::new("https://storage.rpa.local", "a/b").is_err());
        assert!(BlobLocator::new("not a url", "bucket").is_err());
    }
}
