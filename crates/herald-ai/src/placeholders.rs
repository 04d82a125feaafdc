//! Placeholder images for generated changelog sections
//!
//! Every `## ` heading in generated prose gets a `<Frame>` image reference
//! right below it, pointing at `/changelog/images/<YYYY>/<MM>/<slug>.jpg`.
//! Editors replace the placeholder with a real screenshot before publishing.

use chrono::NaiveDate;

const SLUG_MAX_LEN: usize = 60;
const HEADING_PREFIX: &str = "## ";

/// Turn heading text into a file-name slug
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-`, trims separators from both ends and caps the result at 60
/// characters. Text without any alphanumerics yields an empty slug.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }

    // slug is pure ASCII here, so byte truncation is safe
    slug.truncate(SLUG_MAX_LEN);
    slug
}

/// Placeholder image path for a heading on `day`
#[must_use]
pub fn image_path(title: &str, day: NaiveDate) -> String {
    format!(
        "/changelog/images/{}/{}.jpg",
        day.format("%Y/%m"),
        slugify(title)
    )
}

/// Insert a blank line and a `<Frame>` placeholder after every `## ` heading
#[must_use]
pub fn add_image_placeholders(content: &str, day: NaiveDate) -> String {
    let mut lines: Vec<String> = Vec::new();

    for line in content.split('\n') {
        lines.push(line.to_string());

        if let Some(rest) = line.strip_prefix(HEADING_PREFIX) {
            let title = rest.trim();
            lines.push(String::new());
            lines.push(format!(
                "<Frame>![{title}]({})</Frame>",
                image_path(title, day)
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(
            slugify("Updated AI Image Editor API to include models param"),
            "updated-ai-image-editor-api-to-include-models-param"
        );
    }

    #[test]
    fn test_slugify_collapses_and_trims_separators() {
        assert_eq!(slugify("  --New   Usage Page!!  "), "new-usage-page");
        assert_eq!(slugify("LTX-2 (480p) / Image-to-Video"), "ltx-2-480p-image-to-video");
    }

    #[test]
    fn test_slugify_non_ascii_are_separators() {
        assert_eq!(slugify("Caf\u{e9} r\u{e9}sum\u{e9}"), "caf-r-sum");
    }

    #[test]
    fn test_slugify_without_alphanumerics_is_empty() {
        assert_eq!(slugify("!!! --- ???"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_caps_length() {
        let slug = slugify(&"word ".repeat(30));
        assert_eq!(slug.len(), SLUG_MAX_LEN);
        assert!(slug.starts_with("word-word"));
    }

    #[test]
    fn test_image_path_uses_year_and_month() {
        assert_eq!(
            image_path("New Usage Page", day()),
            "/changelog/images/2026/02/new-usage-page.jpg"
        );
    }

    #[test]
    fn test_add_image_placeholders_after_each_heading() {
        let content = "## New Usage Page\n\nTrack usage.\n\n## Faster Uploads\n\nUploads are faster.";
        let expected = "## New Usage Page\n\n\
<Frame>![New Usage Page](/changelog/images/2026/02/new-usage-page.jpg)</Frame>\n\
\n\
Track usage.\n\
\n\
## Faster Uploads\n\
\n\
<Frame>![Faster Uploads](/changelog/images/2026/02/faster-uploads.jpg)</Frame>\n\
\n\
Uploads are faster.";
        assert_eq!(add_image_placeholders(content, day()), expected);
    }

    #[test]
    fn test_add_image_placeholders_ignores_other_headings() {
        let content = "# Title\n### Detail\n##NoSpace\nbody";
        assert_eq!(add_image_placeholders(content, day()), content);
    }

    #[test]
    fn test_add_image_placeholders_is_deterministic() {
        let content = "## Same Heading\n\ntext";
        assert_eq!(
            add_image_placeholders(content, day()),
            add_image_placeholders(content, day())
        );
    }

    #[test]
    fn test_heading_without_alphanumerics_gets_empty_slug() {
        let out = add_image_placeholders("## ???", day());
        assert!(out.ends_with("<Frame>![???](/changelog/images/2026/02/.jpg)</Frame>"));
    }
}
