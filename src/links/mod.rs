//! Hyperlinks inside a rendered note.
//!
//! Notes are plain text, so links are recognised inline: web and file URLs,
//! and `asset:<path>` references to other assets in the project.

use std::sync::LazyLock;

use regex::Regex;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:https?://|file://|mailto:|asset:)[^\s<>"`]+"#).expect("link pattern is valid")
});

/// Characters that end a sentence rather than a link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

/// Where a link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Opened with the platform's URL handler.
    Url(String),
    /// Project-relative asset path, selected in the browser.
    Asset(String),
}

impl LinkTarget {
    pub fn label(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Asset(path) => format!("asset:{path}"),
        }
    }
}

/// A link found in a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Zero-based line the link sits on.
    pub line: usize,
    /// Start column (chars).
    pub start_col: usize,
    /// End column, exclusive (chars).
    pub end_col: usize,
    /// The link text as written.
    pub text: String,
    pub target: LinkTarget,
}

impl LinkRef {
    pub const fn contains(&self, line: usize, col: usize) -> bool {
        self.line == line && col >= self.start_col && col < self.end_col
    }
}

/// Find all links in reading order.
pub fn extract_links(text: &str) -> Vec<LinkRef> {
    let mut links = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        for found in LINK_PATTERN.find_iter(line) {
            let raw = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            let target = if let Some(path) = raw.strip_prefix("asset:") {
                if path.is_empty() {
                    continue;
                }
                LinkTarget::Asset(path.to_string())
            } else if raw.ends_with("://") || raw.ends_with(':') {
                continue;
            } else {
                LinkTarget::Url(raw.to_string())
            };
            let start_col = line[..found.start()].chars().count();
            let end_col = start_col + raw.chars().count();
            links.push(LinkRef {
                line: line_idx,
                start_col,
                end_col,
                text: raw.to_string(),
                target,
            });
        }
    }
    links
}

/// The link under a line/column position, if any.
pub fn link_at(links: &[LinkRef], line: usize, col: usize) -> Option<&LinkRef> {
    links.iter().find(|link| link.contains(line, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_links() {
        assert!(extract_links("just a note about normals").is_empty());
    }

    #[test]
    fn test_url_columns_are_char_offsets() {
        let links = extract_links("é see https://example.com/docs");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].start_col, 6);
        assert_eq!(links[0].end_col, 6 + "https://example.com/docs".len());
        assert_eq!(
            links[0].target,
            LinkTarget::Url("https://example.com/docs".to_string())
        );
    }

    #[test]
    fn test_trailing_punctuation_is_excluded() {
        let links = extract_links("(see https://example.com/a).");
        assert_eq!(links[0].text, "https://example.com/a");
    }

    #[test]
    fn test_asset_links_and_line_numbers() {
        let text = "first\nuses asset:Assets/Materials/skin.mat, and\nmailto:art@studio.test";
        let links = extract_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].line, 1);
        assert_eq!(
            links[0].target,
            LinkTarget::Asset("Assets/Materials/skin.mat".to_string())
        );
        assert_eq!(links[1].line, 2);
        assert_eq!(links[1].start_col, 0);
        assert!(matches!(links[1].target, LinkTarget::Url(_)));
    }

    #[test]
    fn test_bare_scheme_is_not_a_link() {
        assert!(extract_links("asset: nothing here").is_empty());
        assert!(extract_links("https:// broken").is_empty());
    }

    #[test]
    fn test_scheme_inside_a_word_is_not_a_link() {
        assert!(extract_links("notasset:Foo").is_empty());
        assert!(extract_links("xhttps://a.test").is_empty());
        let links = extract_links("(asset:Foo) 'https://a.test'");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].start_col, 1);
        assert_eq!(links[0].target, LinkTarget::Asset("Foo".to_string()));
    }

    #[test]
    fn test_link_at_finds_by_column() {
        let links = extract_links("go https://a.test now");
        assert!(link_at(&links, 0, 2).is_none());
        assert!(link_at(&links, 0, 3).is_some());
        assert!(link_at(&links, 0, 16).is_some());
        assert!(link_at(&links, 0, 17).is_none());
        assert!(link_at(&links, 1, 5).is_none());
    }

    #[test]
    fn test_label_prefixes_asset_targets() {
        assert_eq!(
            LinkTarget::Asset("a/b.png".to_string()).label(),
            "asset:a/b.png"
        );
    }
}
