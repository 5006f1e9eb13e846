//! Input sanitization - strips dangerous markup from user-submitted text.
//!
//! Advisory cleanup for display purposes. Not an HTML parser and not a
//! substitute for output encoding at the rendering layer.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum accepted length of any single text field, in characters.
const MAX_TEXT_LEN: usize = 10_000;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());
static DANGEROUS_OPEN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(iframe|object|embed|link|style|meta|form)[^>]*>").unwrap());
static DANGEROUS_CLOSE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(iframe|object|embed|link|style|meta|form)>").unwrap());
static SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(javascript|data):").unwrap());
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s*on\w+\s*=").unwrap());
static CSS_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)expression\s*\([^)]*\)").unwrap());

/// Strip script blocks, dangerous tags, scriptable URL schemes, inline
/// event handlers and CSS expressions, then cap the length.
pub fn sanitize_text(input: &str) -> String {
    let mut text = input.trim().to_string();
    for pattern in [
        &SCRIPT_BLOCK,
        &DANGEROUS_OPEN_TAG,
        &DANGEROUS_CLOSE_TAG,
        &SCHEME,
        &EVENT_HANDLER,
        &CSS_EXPRESSION,
    ] {
        text = pattern.replace_all(&text, "").into_owned();
    }
    if text.chars().count() > MAX_TEXT_LEN {
        text = text.chars().take(MAX_TEXT_LEN).collect();
    }
    text
}

/// Minimal email shape check: one `@`, a dot in the domain, bounded length.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
    email.len() <= 255 && EMAIL.is_match(email)
}

/// Phone numbers: digits and dashes only, bounded length.
pub fn is_valid_phone(phone: &str) -> bool {
    static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9-]+$").unwrap());
    phone.len() <= 20 && PHONE.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_blocks() {
        assert_eq!(sanitize_text("a<script>alert('x')</script>b"), "ab");
        assert_eq!(sanitize_text("a<SCRIPT src=x>\nevil()\n</SCRIPT>b"), "ab");
    }

    #[test]
    fn strips_dangerous_tags_and_handlers() {
        assert_eq!(sanitize_text("<iframe src=x></iframe>hi"), "hi");
        assert_eq!(sanitize_text("<img onerror=alert(1)>"), "<img alert(1)>");
        assert_eq!(sanitize_text("click javascript:run()"), "click run()");
    }

    #[test]
    fn trims_and_caps_length() {
        assert_eq!(sanitize_text("  spaced out  "), "spaced out");
        let long = "x".repeat(20_000);
        assert_eq!(sanitize_text(&long).chars().count(), 10_000);
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("driver@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn phone_validation() {
        assert!(is_valid_phone("03-1234-5678"));
        assert!(!is_valid_phone("call me"));
        assert!(!is_valid_phone("123456789012345678901"));
    }
}
