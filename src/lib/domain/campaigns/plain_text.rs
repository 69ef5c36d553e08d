//! Plain-text alternative for HTML bodies

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Removes every `<...>` tag from `html`, leaving all other text untouched.
///
/// Entities are not decoded and whitespace is not collapsed: mail clients that
/// fall back to the text part get exactly the characters between the tags.
pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        assert_eq!(strip_tags("<b>Hi</b> there"), "Hi there");
        assert_eq!(strip_tags("<p>Body</p>"), "Body");
    }

    #[test]
    fn test_text_without_tags_is_unchanged() {
        assert_eq!(strip_tags("no tags here"), "no tags here");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_attributes_and_self_closing_tags() {
        let html = r#"<a href="https://example.com/reset" class="btn">Reset</a><br/>now"#;

        assert_eq!(strip_tags(html), "Resetnow");
    }

    #[test]
    fn test_entities_and_whitespace_are_preserved() {
        assert_eq!(
            strip_tags("<p>Tom &amp; Jerry</p>\n  <p>Hi</p>"),
            "Tom &amp; Jerry\n  Hi"
        );
    }

    #[test]
    fn test_empty_brackets_and_stray_angles_are_kept() {
        assert_eq!(strip_tags("a <> b"), "a <> b");
        assert_eq!(strip_tags("1 < 2"), "1 < 2");
        assert_eq!(strip_tags("2 > 1"), "2 > 1");
    }

    #[test]
    fn test_is_idempotent() {
        let samples = [
            "<b>Hi</b> there",
            "no tags here",
            "<<b>>nested<</b>>",
            "<a<b>c>",
            "<><i>x</i>>",
            "unterminated <tag",
            "<p>Click <a href='#'>here</a></p>",
        ];

        for sample in samples {
            let once = strip_tags(sample);

            assert_eq!(strip_tags(&once), once, "not idempotent for {sample:?}");
        }
    }
}
