/// Field validation and derived values for content records.
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Number of content characters copied into a derived excerpt.
pub const EXCERPT_LENGTH: usize = 150;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("content is required")]
    MissingContent,
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("email is malformed")]
    MalformedEmail,
    #[error("password must be at least {0} characters")]
    WeakPassword(usize),
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate the required fields of a new article.
pub fn validate_article_fields(title: &str, content: &str) -> Result<(), ValidationError> {
    if is_blank(title) {
        return Err(ValidationError::MissingTitle);
    }
    if is_blank(content) {
        return Err(ValidationError::MissingContent);
    }
    Ok(())
}

/// Validate the required fields of a new comment.
pub fn validate_comment_fields(name: &str, content: &str) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::MissingName);
    }
    if is_blank(content) {
        return Err(ValidationError::MissingContent);
    }
    Ok(())
}

/// First [`EXCERPT_LENGTH`] characters of `content` followed by [`ELLIPSIS`].
/// Counts chars, not bytes, so multi-byte text is never split.
pub fn derive_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_LENGTH).collect();
    excerpt.push_str(ELLIPSIS);
    excerpt
}

/// Use the supplied excerpt unless it is missing or blank.
pub fn excerpt_or_derived(excerpt: Option<String>, content: &str) -> String {
    match excerpt {
        Some(e) if !is_blank(&e) => e,
        _ => derive_excerpt(content),
    }
}

/// Blank media URLs are stored as absent.
pub fn normalize_url(url: Option<String>) -> Option<String> {
    url.filter(|u| !is_blank(u))
}

/// A timestamp strictly after `previous`, normally the current time.
pub fn advance_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
