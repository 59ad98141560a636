//! Text rendering for tool results
//!
//! Everything returned to the agent is free text; these helpers keep the
//! layouts in one place.

use pagelens_core::PageChunk;
use std::borrow::Cow;
use std::fmt::Write;

/// Marker appended to truncated content
pub const ELLIPSIS: &str = "...";

/// Truncation threshold for `semantic_search`
pub const SEMANTIC_PREVIEW_CHARS: usize = 300;

/// Truncation threshold for `search_with_page_filter`
pub const RANGE_PREVIEW_CHARS: usize = 250;

/// Shorten `content` to `limit` characters plus [`ELLIPSIS`].
///
/// Counts Unicode scalar values, so the cut never lands inside a character.
pub fn truncate(content: &str, limit: usize) -> Cow<'_, str> {
    match content.char_indices().nth(limit) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &content[..byte_idx])),
        None => Cow::Borrowed(content),
    }
}

/// Page label, `unknown` when the chunk carries no page
pub fn page_label(page: Option<u32>) -> Cow<'static, str> {
    match page {
        Some(page) => Cow::Owned(page.to_string()),
        None => Cow::Borrowed("unknown"),
    }
}

/// Render a numbered passage list: `"{i}. [Page {page}]\n{content}\n\n"`
pub fn render_passages(header: &str, chunks: &[PageChunk], limit: usize) -> String {
    let mut output = String::with_capacity(header.len() + chunks.len() * (limit + 32));
    output.push_str(header);
    output.push_str("\n\n");

    for (i, chunk) in chunks.iter().enumerate() {
        let _ = write!(
            output,
            "{}. [Page {}]\n{}\n\n",
            i + 1,
            page_label(chunk.page()),
            truncate(&chunk.content, limit)
        );
    }

    output
}

/// Render full page blocks: `"=== Page {n} ===\n{content}\n\n"`
pub fn render_pages(chunks: &[PageChunk]) -> String {
    let mut output = String::new();
    for chunk in chunks {
        let _ = write!(
            output,
            "=== Page {} ===\n{}\n\n",
            page_label(chunk.page()),
            chunk.content
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncate_short_content_untouched() {
        assert_eq!(truncate("short", 300), "short");
        assert!(matches!(truncate("short", 300), Cow::Borrowed(_)));

        let exact = "a".repeat(250);
        assert_eq!(truncate(&exact, 250), exact.as_str());
    }

    #[test]
    fn test_truncate_long_content() {
        let long = "b".repeat(301);
        let out = truncate(&long, 300);
        assert_eq!(out.chars().count(), 303);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "é".repeat(260);
        let out = truncate(&text, 250);
        assert_eq!(out.chars().count(), 253);
        assert!(out.starts_with("éé"));
    }

    #[test]
    fn test_page_label() {
        assert_eq!(page_label(Some(4)), "4");
        assert_eq!(page_label(None), "unknown");
    }

    #[test]
    fn test_render_passages() {
        let chunks = vec![
            PageChunk::new("GHG inventory").with_page(4),
            PageChunk::new("Unpaged preface"),
        ];
        let out = render_passages("Found 2 relevant passages:", &chunks, 300);
        assert_eq!(
            out,
            "Found 2 relevant passages:\n\n\
             1. [Page 4]\nGHG inventory\n\n\
             2. [Page unknown]\nUnpaged preface\n\n"
        );
    }

    #[test]
    fn test_render_pages_keeps_full_content() {
        let long = "c".repeat(1000);
        let chunks = vec![PageChunk::new(long.clone()).with_page(9)];
        let out = render_pages(&chunks);
        assert_eq!(out, format!("=== Page 9 ===\n{long}\n\n"));
    }

    proptest! {
        #[test]
        fn prop_truncation_length(content in "\\PC{0,600}", limit in 1usize..400) {
            let original_len = content.chars().count();
            let out = truncate(&content, limit);
            if original_len > limit {
                prop_assert_eq!(out.chars().count(), limit + ELLIPSIS.len());
                prop_assert!(out.ends_with(ELLIPSIS));
                let kept: String = content.chars().take(limit).collect();
                prop_assert!(out.starts_with(&kept));
            } else {
                prop_assert_eq!(out.as_ref(), content.as_str());
            }
        }
    }
}
