//! Failure taxonomy for deep-link resolution
//!
//! Every variant is terminal for a single resolution call. Nothing in this
//! crate retries; the caller decides what to show the user.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No registered delegate recognizes the link
    #[error("No delegate can open this link")]
    UnsupportedLink,

    /// The delegate recognized the site but found no chapter reference in the link
    #[error("Link does not point at a chapter")]
    UnrecognizedPath,

    /// A remote fetch answered with anything other than 200
    #[error("Remote source unavailable (HTTP {0})")]
    RemoteUnavailable(u16),

    #[error("Title id marker not found in payload")]
    TitleIdNotFound,

    #[error("Title marker not found in payload")]
    TitleNotFound,

    /// The payload pointed at a chapter that the fetched chapter list does not contain
    #[error("Chapter not found in chapter list")]
    ChapterNotFoundInList,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResolveError {
    /// Short text suitable for showing to a reader
    pub fn user_message(&self) -> &'static str {
        match self {
            ResolveError::UnsupportedLink => "This link can't be opened by any installed source",
            ResolveError::UnrecognizedPath => "This link doesn't point at a chapter",
            ResolveError::RemoteUnavailable(_) | ResolveError::Transport(_) => {
                "The source could not be reached, try again later"
            }
            ResolveError::TitleIdNotFound | ResolveError::TitleNotFound => {
                "Title not found, the source may have changed its format"
            }
            ResolveError::ChapterNotFoundInList => "Chapter not found",
            ResolveError::Parse(_) => "The source returned data that could not be read",
            ResolveError::Config(_) => "Source configuration is invalid",
        }
    }

    /// Stable short name used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::UnsupportedLink => "unsupported_link",
            ResolveError::UnrecognizedPath => "unrecognized_path",
            ResolveError::RemoteUnavailable(_) => "remote_unavailable",
            ResolveError::TitleIdNotFound => "title_id_not_found",
            ResolveError::TitleNotFound => "title_not_found",
            ResolveError::ChapterNotFoundInList => "chapter_not_found_in_list",
            ResolveError::Transport(_) => "transport",
            ResolveError::Parse(_) => "parse",
            ResolveError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(err: serde_json::Error) -> Self {
        ResolveError::Parse(err.to_string())
    }
}

impl From<regex::Error> for ResolveError {
    fn from(err: regex::Error) -> Self {
        ResolveError::Config(format!("invalid pattern: {}", err))
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_not_found_message() {
        assert_eq!(ResolveError::ChapterNotFoundInList.user_message(), "Chapter not found");
    }

    #[test]
    fn test_extraction_failures_are_distinct() {
        assert_ne!(ResolveError::TitleIdNotFound, ResolveError::TitleNotFound);
        assert_ne!(
            ResolveError::TitleIdNotFound.kind(),
            ResolveError::TitleNotFound.kind()
        );
    }

    #[test]
    fn test_remote_status_in_display() {
        let err = ResolveError::RemoteUnavailable(404);
        assert!(err.to_string().contains("404"));
    }
}
