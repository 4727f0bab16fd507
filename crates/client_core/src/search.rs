use std::fmt;

use shared::domain::Article;
use tracing::debug;

use crate::{
    analysis::AnalysisController,
    badge::{classify_bias, classify_sentiment, sentiment_trend, BadgeCategory, Trend},
    error::{QueryError, SearchError},
};

/// Position of a card within the result set of one search generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId {
    pub generation: u64,
    pub index: usize,
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} of search {}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
pub struct ArticleCard {
    id: CardId,
    article: Article,
    sentiment_badge: BadgeCategory,
    bias_badge: BadgeCategory,
    trend: Trend,
    analysis: AnalysisController,
}

impl ArticleCard {
    fn new(id: CardId, article: Article) -> Self {
        Self {
            id,
            sentiment_badge: classify_sentiment(&article.sentiment),
            bias_badge: classify_bias(&article.bias),
            trend: sentiment_trend(&article.sentiment),
            article,
            analysis: AnalysisController::new(),
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    pub fn sentiment_badge(&self) -> BadgeCategory {
        self.sentiment_badge
    }

    pub fn bias_badge(&self) -> BadgeCategory {
        self.bias_badge
    }

    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn analysis(&self) -> &AnalysisController {
        &self.analysis
    }

    pub fn analysis_mut(&mut self) -> &mut AnalysisController {
        &mut self.analysis
    }

    /// Splits the borrow so the article can feed its own analysis.
    pub(crate) fn article_and_analysis_mut(&mut self) -> (&Article, &mut AnalysisController) {
        (&self.article, &mut self.analysis)
    }
}

/// `Idle` (nothing searched yet) and `Results` with no cards are distinct.
#[derive(Debug, Clone, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching {
        query: String,
    },
    Results {
        query: String,
        cards: Vec<ArticleCard>,
    },
    Error {
        query: String,
        error: SearchError,
    },
}

impl SearchState {
    pub fn cards(&self) -> &[ArticleCard] {
        match self {
            SearchState::Results { cards, .. } => cards,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&SearchError> {
        match self {
            SearchState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self, SearchState::Searching { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Owns the current result set and every card's analysis state.
#[derive(Debug, Clone, Default)]
pub struct SearchController {
    state: SearchState,
    generation: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Blank queries are refused without touching state.
    pub fn begin(&mut self, query: &str) -> Result<SearchTicket, QueryError> {
        if query.trim().is_empty() {
            return Err(QueryError::Empty);
        }

        self.generation += 1;
        self.state = SearchState::Searching {
            query: query.to_string(),
        };
        Ok(SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    /// Applies a search outcome. Responses for anything but the latest search
    /// are dropped and `false` is returned.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Article>, SearchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "search: discarding superseded response"
            );
            return false;
        }

        let query = ticket.query.clone();
        self.state = match outcome {
            Ok(articles) => SearchState::Results {
                query,
                cards: articles
                    .into_iter()
                    .enumerate()
                    .map(|(index, article)| {
                        ArticleCard::new(
                            CardId {
                                generation: ticket.generation,
                                index,
                            },
                            article,
                        )
                    })
                    .collect(),
            },
            Err(error) => SearchState::Error { query, error },
        };
        true
    }

    pub fn cards(&self) -> &[ArticleCard] {
        self.state.cards()
    }

    pub fn card(&self, id: CardId) -> Option<&ArticleCard> {
        if id.generation != self.generation {
            return None;
        }
        self.state.cards().get(id.index)
    }

    /// `None` for cards from an older search, so late completions cannot land
    /// on a card that happens to share their index.
    pub fn card_mut(&mut self, id: CardId) -> Option<&mut ArticleCard> {
        if id.generation != self.generation {
            return None;
        }
        match &mut self.state {
            SearchState::Results { cards, .. } => cards.get_mut(id.index),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
