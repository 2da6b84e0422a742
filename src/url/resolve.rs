use crate::url::RootHost;
use crate::UrlError;
use url::{ParseError, Url};

/// Resolves a raw markup reference into an absolute URL
///
/// # Resolution Rules
///
/// 1. No host (`/path` or `path`): `http://<root>/<path>`. Page-relative
///    references are resolved against the root host, not against the
///    directory of the page they were found on. Query and fragment are
///    dropped.
/// 2. Scheme-relative (`//host/path`): `http://host/path`.
/// 3. Already absolute with a host: returned unchanged.
///
/// References with a scheme but no host (`mailto:`, `javascript:`, `tel:`,
/// `data:`) cannot be fetched and are rejected.
///
/// # Examples
///
/// ```
/// use site_mirror::url::{resolve, RootHost};
///
/// let root = RootHost::new("example.com");
/// assert_eq!(resolve("/a.css", &root).unwrap().as_str(), "http://example.com/a.css");
/// assert_eq!(
///     resolve("//cdn.example.net/x.js", &root).unwrap().as_str(),
///     "http://cdn.example.net/x.js"
/// );
/// ```
pub fn resolve(reference: &str, root: &RootHost) -> Result<Url, UrlError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(UrlError::Empty);
    }

    if let Some(rest) = reference.strip_prefix("//") {
        return parse_with_host(&format!("http://{}", rest), reference);
    }

    match Url::parse(reference) {
        Ok(url) if url.host_str().is_some() => Ok(url),
        Ok(url) => Err(UrlError::UnsupportedScheme(url.scheme().to_string())),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let path = reference
                .split(&['?', '#'][..])
                .next()
                .unwrap_or_default()
                .trim_start_matches('/');
            // Always http; CrawlState keys same-host URLs under the root's scheme
            parse_with_host(&format!("http://{}/{}", root, path), reference)
        }
        Err(e) => Err(UrlError::Parse(format!("{}: {}", reference, e))),
    }
}

fn parse_with_host(candidate: &str, reference: &str) -> Result<Url, UrlError> {
    let url =
        Url::parse(candidate).map_err(|e| UrlError::Parse(format!("{}: {}", reference, e)))?;
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(reference.to_string()));
    }
    Ok(url)
}

/// Returns the URL without its fragment
///
/// `/page#intro` and `/page` name the same document, so crawl bookkeeping
/// keys on the fragment-free form.
pub fn strip_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> RootHost {
        RootHost::new("example.com")
    }

    #[test]
    fn test_host_relative() {
        let url = resolve("/a.css", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/a.css");
    }

    #[test]
    fn test_page_relative_resolves_against_root() {
        let url = resolve("css/site.css", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/css/site.css");
    }

    #[test]
    fn test_relative_drops_query_and_fragment() {
        let url = resolve("/app.js?v=3#main", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/app.js");
    }

    #[test]
    fn test_relative_keeps_trailing_slash() {
        let url = resolve("/docs/", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/docs/");
    }

    #[test]
    fn test_dot_segments_cannot_escape_root() {
        let url = resolve("../../etc/passwd", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/etc/passwd");
    }

    #[test]
    fn test_scheme_relative() {
        let url = resolve("//cdn.example.net/x.js", &root()).unwrap();
        assert_eq!(url.as_str(), "http://cdn.example.net/x.js");

        let url = resolve("//cdn.example.net/x.js", &RootHost::new("other.org")).unwrap();
        assert_eq!(url.as_str(), "http://cdn.example.net/x.js");
    }

    #[test]
    fn test_absolute_unchanged() {
        let reference = "https://static.example.org/img/logo.png?size=2";
        let url = resolve(reference, &root()).unwrap();
        assert_eq!(url.as_str(), reference);
    }

    #[test]
    fn test_root_with_port() {
        let url = resolve("/page", &RootHost::new("127.0.0.1:8080")).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/page");
    }

    #[test]
    fn test_fragment_only_resolves_to_root() {
        let url = resolve("#top", &root()).unwrap();
        assert_eq!(url.as_str(), "http://example.com/");
    }

    #[test]
    fn test_rejects_hostless_schemes() {
        for reference in [
            "mailto:someone@example.com",
            "javascript:void(0)",
            "tel:+123456",
            "data:image/png;base64,AAAA",
        ] {
            assert!(
                matches!(
                    resolve(reference, &root()),
                    Err(UrlError::UnsupportedScheme(_))
                ),
                "expected {} to be rejected",
                reference
            );
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(resolve("   ", &root()), Err(UrlError::Empty)));
    }

    #[test]
    fn test_rejects_unparseable() {
        assert!(matches!(
            resolve("http://exa mple.com/", &root()),
            Err(UrlError::Parse(_))
        ));
    }

    #[test]
    fn test_strip_fragment() {
        let url = Url::parse("http://example.com/page#intro").unwrap();
        assert_eq!(strip_fragment(&url).as_str(), "http://example.com/page");
    }
}
