use crate::url::RootHost;
use std::path::{Path, PathBuf};
use url::Url;

/// Subdirectory of the output root holding assets served by other hosts
pub const EXTERNAL_ASSETS_DIR: &str = "cached_external_assets";

/// File name a directory-style page is saved under
pub const PAGE_INDEX_FILE: &str = "index.html";

/// Maps an absolute URL onto its local destination
///
/// Same-host URLs land directly under `output_dir`; URLs from any other host
/// land under `output_dir/cached_external_assets/`. The URL path is trimmed
/// of leading and trailing `/` before joining, so the result never contains
/// a doubled separator. Query, fragment, and the external host name itself
/// play no part in the mapping.
///
/// This is a pure function: no filesystem access happens here.
///
/// # Examples
///
/// ```
/// use site_mirror::url::{map_to_local_path, RootHost};
/// use std::path::{Path, PathBuf};
/// use url::Url;
///
/// let root = RootHost::new("example.com");
/// let url = Url::parse("http://example.com/img/a.png").unwrap();
/// assert_eq!(map_to_local_path(&url, Path::new("site/"), &root), PathBuf::from("site/img/a.png"));
///
/// let url = Url::parse("http://other.com/a.png").unwrap();
/// assert_eq!(
///     map_to_local_path(&url, Path::new("site/"), &root),
///     PathBuf::from("site/cached_external_assets/a.png")
/// );
/// ```
pub fn map_to_local_path(url: &Url, output_dir: &Path, root: &RootHost) -> PathBuf {
    let relative = url.path().trim_matches('/');

    let base = if root.matches(url) {
        output_dir.to_path_buf()
    } else {
        output_dir.join(EXTERNAL_ASSETS_DIR)
    };

    if relative.is_empty() {
        base
    } else {
        base.join(relative)
    }
}

/// Returns where a directory-style page (no `.html` suffix) is saved
///
/// The page's mapped path is treated as a directory holding `index.html`,
/// so `http://example.com/` becomes `site/index.html` and
/// `http://example.com/about/` becomes `site/about/index.html`.
pub fn page_index_path(url: &Url, output_dir: &Path, root: &RootHost) -> PathBuf {
    map_to_local_path(url, output_dir, root).join(PAGE_INDEX_FILE)
}
