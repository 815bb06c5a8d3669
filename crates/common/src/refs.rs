//! Resource reference detection: telling remote URLs from local file
//! references inside free-form query content.

use std::sync::LazyLock;

use regex::Regex;

/// Extensions recognized as local file references inside query content.
pub const LOCAL_EXTENSIONS: &[&str] = &["txt", "json", "csv", "md"];

/// URL schemes modules are expected to handle remotely.
pub const REMOTE_SCHEMES: &[&str] = &["http", "https"];

/// First token that looks like a URL or a local file name with a
/// recognized extension.
#[allow(clippy::expect_used)]
static FILE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\bhttps?://\S+|[\w~./-]*[\w~-]\.(?:{})\b",
        LOCAL_EXTENSIONS.join("|")
    );
    Regex::new(&pattern).expect("file reference pattern is valid")
});

/// True iff `token` parses as an absolute URL with an authority.
///
/// Plain file names (`data.txt`) and relative paths are not URLs; neither
/// are scheme-only tokens without a host (`mailto:x`).
pub fn is_url(token: &str) -> bool {
    url::Url::parse(token).map(|u| u.has_host()).unwrap_or(false)
}

/// Scan `content` for the first file or URL reference.
///
/// Returns the matched token without mutating the input; callers that want
/// the residual query text strip the token themselves. Running the scan
/// again on content with the reference already stripped yields `None`.
pub fn extract_file_reference(content: &str) -> Option<String> {
    FILE_REFERENCE
        .find(content)
        .map(|m| m.as_str().to_string())
}
