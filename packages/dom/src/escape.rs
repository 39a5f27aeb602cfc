//! Escaping for values embedded in emitted markup.

use std::borrow::Cow;

/// Escape a value for use inside a quoted attribute.
///
/// Escapes `&`, `<`, `>`, `"` and `'`, so the result is safe in both
/// single- and double-quoted positions.
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(value)
}

/// Escape text content
pub fn escape_text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Decode entity references (`&amp;`, `&#39;`, `&#x3C;` ...)
pub fn unescape(value: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attribute_covers_markup_characters() {
        let escaped = escape_attribute(r#"http://x/"><script>alert('x')&"#);
        for c in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(c), "unescaped {c} in {escaped}");
        }
        assert!(escaped.contains("&amp;"));
    }

    #[test]
    fn test_escape_is_reversible() {
        let raw = r#"a < b && "c" > 'd'"#;
        assert_eq!(unescape(&escape_attribute(raw)), raw);
    }

    #[test]
    fn test_plain_values_are_borrowed() {
        assert!(matches!(escape_attribute("plain"), Cow::Borrowed(_)));
    }
}
