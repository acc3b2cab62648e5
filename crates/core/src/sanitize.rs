//! Free-text sanitisation for anything rendered in the activity feed.
//!
//! The feed renders text as markup, so angle brackets are stripped before a
//! value is stored.

/// Maximum length of a comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 100;

/// Remove every `<` and `>` and trim surrounding whitespace.
pub fn strip_markup(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitise an optional field, falling back to `default` when it is missing
/// or empty after sanitising.
pub fn sanitize_or(input: Option<&str>, default: &str) -> String {
    match input.map(strip_markup) {
        Some(clean) if !clean.is_empty() => clean,
        _ => default.to_string(),
    }
}

/// Validate and normalise a comment body.
///
/// Returns the sanitised text, or a message describing why it was rejected.
pub fn normalize_comment(text: &str) -> Result<String, String> {
    let clean = strip_markup(text);
    if clean.is_empty() {
        return Err("Comment text is required".to_string());
    }
    if clean.chars().count() > MAX_COMMENT_CHARS {
        return Err(format!(
            "Comment must be at most {MAX_COMMENT_CHARS} characters"
        ));
    }
    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_angle_brackets_and_trims() {
        assert_eq!(strip_markup("  <b>calc</b> "), "bcalc/b");
        assert_eq!(strip_markup("<script>alert(1)</script>"), "scriptalert(1)/script");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(strip_markup("Linear algebra, ch. 4"), "Linear algebra, ch. 4");
    }

    #[test]
    fn sanitize_or_uses_default_for_missing_or_blank() {
        assert_eq!(sanitize_or(None, "General"), "General");
        assert_eq!(sanitize_or(Some("  "), "General"), "General");
        assert_eq!(sanitize_or(Some("<>"), "General"), "General");
        assert_eq!(sanitize_or(Some(" Physics "), "General"), "Physics");
    }

    #[test]
    fn comment_rules() {
        assert!(normalize_comment("   ").is_err());
        assert!(normalize_comment(" <> ").is_err());
        assert!(normalize_comment(&"x".repeat(MAX_COMMENT_CHARS + 1)).is_err());
        assert_eq!(
            normalize_comment(&"x".repeat(MAX_COMMENT_CHARS)).unwrap().len(),
            MAX_COMMENT_CHARS
        );
        assert_eq!(normalize_comment(" nice <3 ").unwrap(), "nice 3");
    }
}
