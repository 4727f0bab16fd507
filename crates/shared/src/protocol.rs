use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisResult, Article, BiasLabel, Language, SentimentLabel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// Both the success and the reported-failure shape of `/analyze/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bias: Option<BiasLabel>,
}

impl AnalyzeResponse {
    /// The reported error, if the backend sent a non-empty one.
    pub fn reported_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }

    /// Returns the name of the first missing field when the body is incomplete.
    pub fn into_result(self) -> Result<AnalysisResult, &'static str> {
        let summary = self.summary.ok_or("summary")?;
        let sentiment = self.sentiment.ok_or("sentiment")?;
        let bias = self.bias.ok_or("bias")?;
        Ok(AnalysisResult {
            summary,
            sentiment,
            bias,
        })
    }
}

impl From<AnalysisResult> for AnalyzeResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            error: None,
            summary: Some(result.summary),
            sentiment: Some(result.sentiment),
            bias: Some(result.bias),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_lang: Language,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
