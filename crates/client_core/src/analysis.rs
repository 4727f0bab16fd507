use shared::{
    domain::{AnalysisResult, Article},
    protocol::AnalyzeRequest,
};

use crate::{
    error::{AnalysisError, PreconditionError, RequiredField},
    translation::TranslationController,
};

/// Validated handoff from a search card to the analysis workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    title: String,
    content: String,
    url: String,
}

impl AnalysisRequest {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, PreconditionError> {
        let request = Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
        };
        for (field, value) in [
            (RequiredField::Title, &request.title),
            (RequiredField::Content, &request.content),
            (RequiredField::Url, &request.url),
        ] {
            if value.is_empty() {
                return Err(PreconditionError::MissingField(field));
            }
        }
        Ok(request)
    }

    pub fn from_article(article: &Article) -> Result<Self, PreconditionError> {
        Self::new(
            article.title.clone(),
            article.original.clone(),
            article.url.clone(),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl From<&AnalysisRequest> for AnalyzeRequest {
    fn from(request: &AnalysisRequest) -> Self {
        Self {
            title: request.title.clone(),
            content: request.content.clone(),
            url: request.url.clone(),
        }
    }
}

/// A finished analysis together with the translation state of its summary.
#[derive(Debug, Clone)]
pub struct AnalyzedArticle {
    result: AnalysisResult,
    translation: TranslationController,
}

impl AnalyzedArticle {
    fn new(result: AnalysisResult) -> Self {
        let translation = TranslationController::new(result.summary.clone());
        Self {
            result,
            translation,
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn translation(&self) -> &TranslationController {
        &self.translation
    }

    pub fn translation_mut(&mut self) -> &mut TranslationController {
        &mut self.translation
    }
}

#[derive(Debug, Clone, Default)]
pub enum AnalysisState {
    #[default]
    NotRequested,
    Analyzing,
    Analyzed(Box<AnalyzedArticle>),
    Failed(AnalysisError),
}

/// Drives one article through a single deep-analysis request.
#[derive(Debug, Clone, Default)]
pub struct AnalysisController {
    state: AnalysisState,
}

impl AnalysisController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AnalysisState::Analyzing)
    }

    pub fn analyzed(&self) -> Option<&AnalyzedArticle> {
        match &self.state {
            AnalysisState::Analyzed(analyzed) => Some(&**analyzed),
            _ => None,
        }
    }

    pub fn analyzed_mut(&mut self) -> Option<&mut AnalyzedArticle> {
        match &mut self.state {
            AnalysisState::Analyzed(analyzed) => Some(&mut **analyzed),
            _ => None,
        }
    }

    /// Returns the request to send, or `None` when an analysis is already in
    /// flight or already finished. Validation failures leave the state untouched.
    pub fn begin(
        &mut self,
        article: &Article,
    ) -> Result<Option<AnalysisRequest>, PreconditionError> {
        match self.state {
            AnalysisState::Analyzing | AnalysisState::Analyzed(_) => return Ok(None),
            AnalysisState::NotRequested | AnalysisState::Failed(_) => {}
        }

        let request = AnalysisRequest::from_article(article)?;
        self.state = AnalysisState::Analyzing;
        Ok(Some(request))
    }

    /// Applies the outcome of the pending request; ignored unless one is pending.
    pub fn complete(&mut self, outcome: Result<AnalysisResult, AnalysisError>) -> bool {
        if !self.is_pending() {
            return false;
        }

        self.state = match outcome {
            Ok(result) => AnalysisState::Analyzed(Box::new(AnalyzedArticle::new(result))),
            Err(err) => AnalysisState::Failed(err),
        };
        true
    }
}

#[cfg(test)]
#[path = "tests/analysis_tests.rs"]
mod tests;
