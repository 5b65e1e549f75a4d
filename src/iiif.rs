//! IIIF manifest fetching contract and manifest-derived values.
//!
//! Digital objects point at IIIF presentation manifests through their
//! file-version list. Fetching a manifest is the one remote call that is
//! allowed to fail softly: a
//! [`IndexError::TransientFetch`](crate::IndexError::TransientFetch) skips
//! that digital object and the document keeps its remaining fields. The
//! values pulled out of a fetched manifest, by contrast, are required — a
//! manifest without an `@id`, `license`, or `label` aborts the document, as
//! does a thumbnail URL that cannot be resized.

use crate::error::{IndexError, Result};
use crate::json;
use crate::record::ArchivalRecord;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref THUMBNAIL_RESIZE: Regex = Regex::new(r"^(https://.*/full/)[^/]*(/.*)$").unwrap();
}

/// Thumbnail size segment substituted into IIIF image URLs.
pub const THUMBNAIL_SIZE: &str = "!115,125";

/// Thumbnail shown for records without a usable manifest.
pub const DEFAULT_THUMBNAIL_URL: &str =
    "http://iiif.lib.virginia.edu/iiif/static:6/full/!115,125/0/default.jpg";

/// Collaborator that fetches IIIF manifests over HTTP.
pub trait ManifestFetcher {
    /// Fetch and parse the manifest at a URL.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`IndexError::TransientFetch`](crate::IndexError::TransientFetch) on
    /// any non-success response or unparseable payload; callers treat this
    /// as a skip of the single digital object.
    fn fetch(&self, manifest_url: &str) -> Result<Value>;
}

impl ArchivalRecord<'_> {
    /// The digital object's image-service manifest URL, if any.
    ///
    /// Scans the ordered file-version list for the first published version
    /// whose use statement starts with `image-service` and unwraps viewer
    /// URLs down to the manifest itself.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Resolution`](crate::IndexError::Resolution)
    /// when the digital object cannot be resolved.
    pub fn manifest_url(&self) -> Result<Option<String>> {
        let Some(versions) = json::array_field(self.raw()?, "file_versions") else {
            return Ok(None);
        };
        for version in versions {
            if !json::bool_field(version, "publish") {
                continue;
            }
            let is_image_service = json::str_field(version, "use_statement")
                .is_some_and(|s| s.starts_with("image-service"));
            if !is_image_service {
                continue;
            }
            if let Some(uri) = json::str_field(version, "file_uri") {
                return Ok(Some(unwrap_viewer_url(uri).to_string()));
            }
        }
        Ok(None)
    }
}

/// Strip a mirador-viewer wrapper from a manifest location, if present.
///
/// Viewer links embed the manifest URL as their final query value; plain
/// manifest URLs pass through unchanged.
#[must_use]
pub fn unwrap_viewer_url(location: &str) -> &str {
    if location.starts_with("http://mirador.lib") {
        match location.find('=') {
            Some(idx) => &location[idx + 1..],
            None => location,
        }
    } else {
        location
    }
}

/// The short manifest id: everything after the last `/` of the `@id`.
#[must_use]
pub fn short_manifest_id(manifest_id: &str) -> &str {
    match manifest_id.rfind('/') {
        Some(idx) => &manifest_id[idx + 1..],
        None => manifest_id,
    }
}

/// Rewrite a IIIF image URL's `/full/<size>/` segment to the index
/// thumbnail size.
///
/// # Errors
///
/// Returns [`IndexError::MalformedThumbnail`] when the URL does not carry a
/// resizable `/full/` segment. Fatal: a manifest with an unexpected
/// thumbnail shape indicates an upstream change that must be looked at.
pub fn resize_thumbnail(url: &str) -> Result<String> {
    let caps = THUMBNAIL_RESIZE
        .captures(url)
        .ok_or_else(|| IndexError::MalformedThumbnail(url.to_string()))?;
    Ok(format!("{}{THUMBNAIL_SIZE}{}", &caps[1], &caps[2]))
}

/// The thumbnail URL of a manifest's first canvas.
///
/// # Errors
///
/// Returns [`IndexError::Resolution`](crate::IndexError::Resolution) when
/// the manifest carries no canvas thumbnail.
pub fn first_canvas_thumbnail<'a>(manifest: &'a Value, manifest_url: &str) -> Result<&'a str> {
    manifest
        .get("sequences")
        .and_then(|s| s.get(0))
        .and_then(|s| s.get("canvases"))
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("thumbnail"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            IndexError::Resolution(format!("manifest at {manifest_url} has no canvas thumbnail"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_viewer_url() {
        assert_eq!(
            unwrap_viewer_url("http://mirador.lib.virginia.edu/viewer?manifest=https://iiif.lib.virginia.edu/iiif/tsb:1234/manifest.json"),
            "https://iiif.lib.virginia.edu/iiif/tsb:1234/manifest.json"
        );
        assert_eq!(
            unwrap_viewer_url("https://iiif.lib.virginia.edu/iiif/tsb:1234/manifest.json"),
            "https://iiif.lib.virginia.edu/iiif/tsb:1234/manifest.json"
        );
    }

    #[test]
    fn test_short_manifest_id() {
        assert_eq!(
            short_manifest_id("https://iiif.lib.virginia.edu/iiif/tsb:1234"),
            "tsb:1234"
        );
        assert_eq!(short_manifest_id("bare"), "bare");
    }

    #[test]
    fn test_resize_thumbnail() {
        let resized =
            resize_thumbnail("https://iiif.lib.virginia.edu/iiif/tsb:1/full/!200,200/0/default.jpg")
                .unwrap();
        assert_eq!(
            resized,
            "https://iiif.lib.virginia.edu/iiif/tsb:1/full/!115,125/0/default.jpg"
        );
    }

    #[test]
    fn test_resize_rejects_unexpected_shape() {
        let err = resize_thumbnail("https://example.com/thumb.jpg").unwrap_err();
        assert!(matches!(err, IndexError::MalformedThumbnail(_)));
    }

    #[test]
    fn test_first_canvas_thumbnail() {
        let manifest = json!({
            "sequences": [{"canvases": [{"thumbnail": "https://x/full/!90,90/0/default.jpg"}]}]
        });
        assert_eq!(
            first_canvas_thumbnail(&manifest, "https://x/manifest.json").unwrap(),
            "https://x/full/!90,90/0/default.jpg"
        );
        assert!(first_canvas_thumbnail(&json!({}), "https://x/manifest.json").is_err());
    }
}
