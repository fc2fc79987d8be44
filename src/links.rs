//! Share-URL derivation and the link policy filter.

use crate::config::LinkPolicy;
use crate::models::LinkSet;

/// Derive the direct-download URL from a preview permalink.
///
/// The mapping swaps the trailing preview path segment for the download
/// one, keeping host and resource id intact. A permalink that is not in
/// preview form yields no direct URL; the field stays absent rather than
/// pointing at something untested.
pub fn derive_direct_url(preview_url: &str) -> Option<String> {
    let trimmed = preview_url.trim_end_matches('/');
    trimmed
        .strip_suffix("/preview")
        .map(|base| format!("{}/download", base))
}

/// HTML snippet embedding the direct URL as an image tag.
pub fn html_snippet(direct_url: &str) -> String {
    format!(r#"<img src="{}" alt="img" />"#, direct_url)
}

/// Build the link set for one uploaded file.
///
/// `shared` is true when a public permission grant succeeded; without it
/// the permalink is only reachable by authenticated org members and a
/// direct URL is never produced. The policy then filters which forms are
/// reported; `Both` keeps whatever succeeded, with direct falling back to
/// absent rather than to preview.
pub fn resolve_links(permalink: Option<&str>, shared: bool, policy: LinkPolicy) -> LinkSet {
    let preview = permalink.map(str::to_string);
    let direct = if shared {
        permalink.and_then(derive_direct_url)
    } else {
        None
    };

    let (direct, preview) = match policy {
        LinkPolicy::Direct => (direct, None),
        LinkPolicy::Preview => (None, preview),
        LinkPolicy::Both => (direct, preview),
    };

    let html = direct.as_deref().map(html_snippet);

    LinkSet {
        direct_url: direct,
        preview_url: preview,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERMALINK: &str = "https://workdrive.zoho.com/file/res123/preview";

    #[test]
    fn direct_url_swaps_only_the_trailing_segment() {
        let direct = derive_direct_url(PERMALINK).unwrap();
        assert_eq!(direct, "https://workdrive.zoho.com/file/res123/download");

        // Same host and resource id as the preview URL.
        assert!(direct.starts_with("https://workdrive.zoho.com/file/res123/"));
    }

    #[test]
    fn direct_url_tolerates_trailing_slash() {
        let direct = derive_direct_url("https://workdrive.zoho.com/file/res123/preview/");
        assert_eq!(
            direct.as_deref(),
            Some("https://workdrive.zoho.com/file/res123/download")
        );
    }

    #[test]
    fn non_preview_permalink_yields_no_direct_url() {
        assert!(derive_direct_url("https://workdrive.zoho.com/file/res123").is_none());
    }

    #[test]
    fn public_both_includes_every_form() {
        let links = resolve_links(Some(PERMALINK), true, LinkPolicy::Both);
        assert_eq!(
            links.direct_url.as_deref(),
            Some("https://workdrive.zoho.com/file/res123/download")
        );
        assert_eq!(links.preview_url.as_deref(), Some(PERMALINK));
        assert!(links.html.unwrap().contains("/download"));
    }

    #[test]
    fn skip_mode_never_produces_direct_url() {
        let links = resolve_links(Some(PERMALINK), false, LinkPolicy::Both);
        assert!(links.direct_url.is_none());
        assert!(links.html.is_none());
        assert_eq!(links.preview_url.as_deref(), Some(PERMALINK));
    }

    #[test]
    fn preview_policy_drops_direct_url() {
        let links = resolve_links(Some(PERMALINK), true, LinkPolicy::Preview);
        assert!(links.direct_url.is_none());
        assert!(links.html.is_none());
        assert_eq!(links.preview_url.as_deref(), Some(PERMALINK));
    }

    #[test]
    fn direct_policy_drops_preview_url() {
        let links = resolve_links(Some(PERMALINK), true, LinkPolicy::Direct);
        assert!(links.preview_url.is_none());
        assert!(links.direct_url.is_some());
    }

    #[test]
    fn missing_permalink_yields_empty_set() {
        let links = resolve_links(None, true, LinkPolicy::Both);
        assert_eq!(links, LinkSet::default());
    }

    #[test]
    fn html_snippet_wraps_direct_url() {
        let html = html_snippet("https://example.com/file/download");
        assert_eq!(
            html,
            r#"<img src="https://example.com/file/download" alt="img" />"#
        );
    }
}
