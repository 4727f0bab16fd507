//! Failure taxonomy for the search, analysis and translation workflows.
//!
//! Every error here is local to one workflow: none of them tears down the
//! session or touches sibling articles.

use std::fmt;

use thiserror::Error;

use crate::{backend::BackendError, search::CardId};

/// Message shown for any failed search, whatever the cause.
pub const SEARCH_FAILURE_MESSAGE: &str = "Failed to fetch news";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("search query is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", SEARCH_FAILURE_MESSAGE)]
pub struct SearchError {
    cause: String,
}

impl SearchError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    pub fn message(&self) -> &'static str {
        SEARCH_FAILURE_MESSAGE
    }

    /// Underlying failure, for logs only.
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

impl From<BackendError> for SearchError {
    fn from(err: BackendError) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Content,
    Url,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequiredField::Title => "title",
            RequiredField::Content => "content",
            RequiredField::Url => "url",
        })
    }
}

/// Analysis was refused before any request left the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("article is missing required field `{0}`")]
    MissingField(RequiredField),
    #[error("article {0} is not part of the current results")]
    UnknownArticle(CardId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("analysis reported an error: {0}")]
    Semantic(String),
    #[error("analysis request failed: {0}")]
    Transport(String),
}

impl AnalysisError {
    /// Semantic and transport failures both end the article in `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AnalysisError::Precondition(_))
    }
}

impl From<BackendError> for AnalysisError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Reported(message) => AnalysisError::Semantic(message),
            other => AnalysisError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("article {0} has no completed analysis to translate")]
    NotAnalyzed(CardId),
    #[error("translation response did not include translated_text")]
    MissingText,
    #[error("translation request failed: {0}")]
    Transport(String),
}

impl From<BackendError> for TranslationError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::MissingField(_) => TranslationError::MissingText,
            other => TranslationError::Transport(other.to_string()),
        }
    }
}
