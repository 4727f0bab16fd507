//! Summary translation with latest-intent-wins ordering.
//!
//! Requests are never cancelled. Each selection bumps a token, and a
//! completion is applied only if it carries the latest token; anything older
//! is dropped on arrival. Every request translates the canonical summary, so
//! translations are never chained.

use shared::domain::{Language, TranslationResult};
use tracing::{debug, warn};

use crate::error::TranslationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationStatus {
    Idle,
    Translating,
}

/// What a completion did to the displayed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationOutcome {
    Applied,
    Reverted,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTicket {
    token: u64,
    language: Language,
    text: String,
}

impl TranslationTicket {
    pub fn language(&self) -> Language {
        self.language
    }

    /// Always the canonical summary.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
pub struct TranslationController {
    canonical: String,
    selected: Language,
    displayed: String,
    applied: Option<TranslationResult>,
    latest_token: u64,
    status: TranslationStatus,
}

impl TranslationController {
    pub fn new(canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        Self {
            displayed: canonical.clone(),
            canonical,
            selected: Language::default(),
            applied: None,
            latest_token: 0,
            status: TranslationStatus::Idle,
        }
    }

    pub fn canonical_summary(&self) -> &str {
        &self.canonical
    }

    /// The user's most recent choice, whether or not it has completed.
    pub fn selected_language(&self) -> Language {
        self.selected
    }

    pub fn displayed_text(&self) -> &str {
        &self.displayed
    }

    /// The translation currently on display, if any.
    pub fn applied(&self) -> Option<&TranslationResult> {
        self.applied.as_ref()
    }

    pub fn status(&self) -> TranslationStatus {
        self.status
    }

    pub fn is_translating(&self) -> bool {
        self.status == TranslationStatus::Translating
    }

    /// Records the selection and returns the request to issue. The displayed
    /// text is left alone until a completion arrives.
    pub fn select(&mut self, language: Language) -> TranslationTicket {
        self.latest_token += 1;
        self.selected = language;
        self.status = TranslationStatus::Translating;
        TranslationTicket {
            token: self.latest_token,
            language,
            text: self.canonical.clone(),
        }
    }

    pub fn complete(
        &mut self,
        ticket: &TranslationTicket,
        outcome: Result<String, TranslationError>,
    ) -> TranslationOutcome {
        if ticket.token != self.latest_token {
            debug!(
                language = %ticket.language,
                selected = %self.selected,
                "translate: discarding superseded response"
            );
            return TranslationOutcome::Discarded;
        }

        self.status = TranslationStatus::Idle;
        match outcome {
            Ok(text) => {
                self.displayed = text.clone();
                self.applied = Some(TranslationResult {
                    language: ticket.language,
                    text,
                });
                TranslationOutcome::Applied
            }
            Err(err) => {
                warn!(
                    language = %ticket.language,
                    error = %err,
                    "translate: reverting to original summary"
                );
                self.displayed = self.canonical.clone();
                self.applied = None;
                TranslationOutcome::Reverted
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/translation_tests.rs"]
mod tests;
