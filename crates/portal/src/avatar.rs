//! Avatar and logo URLs.

use url::Url;

/// Which upload folder an image lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Profile,
    Logo,
}

impl ImageKind {
    const fn folder(self) -> &'static str {
        match self {
            Self::Profile => "profiles",
            Self::Logo => "logos",
        }
    }
}

/// Resolve a stored image reference to a URL.
///
/// Empty and `"null"` references mean no image. Absolute `http` URLs are
/// used as they are; bare filenames are served from
/// `{asset_base}/public/{profiles|logos}/`.
#[must_use]
pub fn image_url(asset_base: &Url, kind: ImageKind, src: Option<&str>) -> Option<String> {
    let src = src.map(str::trim).filter(|s| !s.is_empty() && *s != "null")?;
    if src.starts_with("http") {
        return Some(src.to_string());
    }
    Some(format!(
        "{}/public/{}/{}",
        asset_base.as_str().trim_end_matches('/'),
        kind.folder(),
        src.trim_start_matches('/')
    ))
}

/// Letter shown when there is no photo.
#[must_use]
pub fn initial(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('?')
}
