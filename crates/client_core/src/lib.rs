use std::sync::Arc;

use shared::domain::{AnalysisResult, Article, Language};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod analysis;
pub mod backend;
pub mod badge;
pub mod config;
pub mod error;
pub mod search;
pub mod translation;

pub use analysis::{AnalysisController, AnalysisRequest, AnalysisState, AnalyzedArticle};
pub use backend::{BackendError, HttpBackend, NewsBackend};
pub use badge::{BadgeCategory, Trend};
pub use config::{load_settings, ClientSettings, SearchRoute};
pub use error::{
    AnalysisError, PreconditionError, QueryError, RequiredField, SearchError, TranslationError,
};
pub use search::{ArticleCard, CardId, SearchController, SearchState};
pub use translation::{TranslationController, TranslationOutcome, TranslationStatus};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SearchStarted { generation: u64, query: String },
    SearchFinished { generation: u64, count: usize },
    SearchFailed { generation: u64, message: String },
    AnalysisStarted(CardId),
    AnalysisFinished { card: CardId, result: AnalysisResult },
    AnalysisFailed { card: CardId, error: AnalysisError },
    /// The card left the results while its analysis was in flight.
    AnalysisDiscarded(CardId),
    TranslationApplied { card: CardId, language: Language },
    TranslationReverted { card: CardId, language: Language },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent.
    Ignored,
    Results(Vec<Article>),
    /// A newer search started before this one returned.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Analyzed(AnalysisResult),
    /// Already in flight or already analyzed; no request was sent.
    AlreadyRequested,
    /// The results were replaced while the request was in flight.
    Stale,
}

/// One browsing session: the current search and every card's sub-state.
///
/// The state lock is held only around transitions, never across a backend
/// call, so work on different cards proceeds independently.
pub struct NewsSession {
    backend: Arc<dyn NewsBackend>,
    inner: Mutex<SearchController>,
    events: broadcast::Sender<SessionEvent>,
}

impl NewsSession {
    pub fn new(backend: Arc<dyn NewsBackend>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            backend,
            inner: Mutex::new(SearchController::new()),
            events,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Arc<Self>, BackendError> {
        let backend = HttpBackend::from_settings(settings)?;
        Ok(Self::new(Arc::new(backend)))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SearchState {
        self.inner.lock().await.state().clone()
    }

    pub async fn card(&self, id: CardId) -> Option<ArticleCard> {
        self.inner.lock().await.card(id).cloned()
    }

    pub async fn health(&self) -> Result<(), BackendError> {
        self.backend.health().await
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let ticket = {
            let mut guard = self.inner.lock().await;
            match guard.begin(query) {
                Ok(ticket) => ticket,
                Err(QueryError::Empty) => {
                    debug!("search: ignoring blank query");
                    return Ok(SearchOutcome::Ignored);
                }
            }
        };
        let generation = ticket.generation();
        info!(generation, query, "search: started");
        let _ = self.events.send(SessionEvent::SearchStarted {
            generation,
            query: query.to_string(),
        });

        let outcome = self.backend.search(ticket.query()).await.map_err(|err| {
            warn!(generation, error = %err, "search: request failed");
            SearchError::from(err)
        });

        let applied = self.inner.lock().await.complete(&ticket, outcome.clone());
        if !applied {
            return Ok(SearchOutcome::Superseded);
        }

        match outcome {
            Ok(articles) => {
                info!(generation, count = articles.len(), "search: results applied");
                let _ = self.events.send(SessionEvent::SearchFinished {
                    generation,
                    count: articles.len(),
                });
                Ok(SearchOutcome::Results(articles))
            }
            Err(err) => {
                let _ = self.events.send(SessionEvent::SearchFailed {
                    generation,
                    message: err.message().to_string(),
                });
                Err(err)
            }
        }
    }

    pub async fn analyze(&self, card: CardId) -> Result<AnalysisOutcome, AnalysisError> {
        let request = {
            let mut guard = self.inner.lock().await;
            let entry = guard
                .card_mut(card)
                .ok_or(PreconditionError::UnknownArticle(card))?;
            let (article, analysis) = entry.article_and_analysis_mut();
            match analysis.begin(article) {
                Ok(Some(request)) => request,
                Ok(None) => {
                    debug!(%card, "analysis: already requested");
                    return Ok(AnalysisOutcome::AlreadyRequested);
                }
                Err(err) => {
                    warn!(
                        %card,
                        error = %err,
                        "analysis: precondition failed; returning to search"
                    );
                    return Err(err.into());
                }
            }
        };
        info!(%card, url = request.url(), "analysis: started");
        let _ = self.events.send(SessionEvent::AnalysisStarted(card));

        let outcome = self
            .backend
            .analyze(&request)
            .await
            .map_err(AnalysisError::from);

        {
            let mut guard = self.inner.lock().await;
            let Some(entry) = guard.card_mut(card) else {
                debug!(
                    %card,
                    "analysis: results replaced while pending; dropping response"
                );
                let _ = self.events.send(SessionEvent::AnalysisDiscarded(card));
                return Ok(AnalysisOutcome::Stale);
            };
            entry.analysis_mut().complete(outcome.clone());
        }

        match outcome {
            Ok(result) => {
                info!(
                    %card,
                    sentiment = %result.sentiment,
                    bias = %result.bias,
                    "analysis: finished"
                );
                let _ = self.events.send(SessionEvent::AnalysisFinished {
                    card,
                    result: result.clone(),
                });
                Ok(AnalysisOutcome::Analyzed(result))
            }
            Err(err) => {
                warn!(%card, error = %err, "analysis: failed");
                let _ = self.events.send(SessionEvent::AnalysisFailed {
                    card,
                    error: err.clone(),
                });
                Err(err)
            }
        }
    }

    /// Translation failures are recovered here and reported as `Reverted`;
    /// the only error is asking for a card that has no analysis.
    pub async fn translate(
        &self,
        card: CardId,
        language: Language,
    ) -> Result<TranslationOutcome, TranslationError> {
        let ticket = {
            let mut guard = self.inner.lock().await;
            let analyzed = guard
                .card_mut(card)
                .and_then(|entry| entry.analysis_mut().analyzed_mut())
                .ok_or(TranslationError::NotAnalyzed(card))?;
            analyzed.translation_mut().select(language)
        };
        debug!(%card, %language, "translate: requested");

        let outcome = self
            .backend
            .translate(ticket.text(), ticket.language())
            .await
            .map_err(TranslationError::from);

        let applied = {
            let mut guard = self.inner.lock().await;
            match guard
                .card_mut(card)
                .and_then(|entry| entry.analysis_mut().analyzed_mut())
            {
                Some(analyzed) => analyzed.translation_mut().complete(&ticket, outcome),
                None => TranslationOutcome::Discarded,
            }
        };

        match applied {
            TranslationOutcome::Applied => {
                let _ = self
                    .events
                    .send(SessionEvent::TranslationApplied { card, language });
            }
            TranslationOutcome::Reverted => {
                let _ = self
                    .events
                    .send(SessionEvent::TranslationReverted { card, language });
            }
            TranslationOutcome::Discarded => {}
        }
        Ok(applied)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
