//! Maps sentiment and bias labels to presentation categories.
//!
//! Classification is total: anything outside the known label sets lands in
//! [`BadgeCategory::Muted`].

use shared::domain::{BiasLabel, SentimentLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeCategory {
    SentimentPositive,
    SentimentNegative,
    SentimentNeutral,
    BiasLeft,
    BiasCenter,
    BiasRight,
    BiasUnknown,
    Muted,
}

impl BadgeCategory {
    pub fn style_token(self) -> &'static str {
        match self {
            BadgeCategory::SentimentPositive => "bg-sentiment-positive",
            BadgeCategory::SentimentNegative => "bg-sentiment-negative",
            BadgeCategory::SentimentNeutral => "bg-sentiment-neutral",
            BadgeCategory::BiasLeft => "bg-bias-left",
            BadgeCategory::BiasCenter => "bg-bias-center",
            BadgeCategory::BiasRight => "bg-bias-right",
            BadgeCategory::BiasUnknown => "bg-bias-unknown",
            BadgeCategory::Muted => "bg-muted",
        }
    }
}

/// Direction glyph shown beside a sentiment badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Flat,
}

pub fn classify_sentiment(label: &SentimentLabel) -> BadgeCategory {
    match label {
        SentimentLabel::Positive => BadgeCategory::SentimentPositive,
        SentimentLabel::Negative => BadgeCategory::SentimentNegative,
        SentimentLabel::Neutral => BadgeCategory::SentimentNeutral,
        SentimentLabel::Other(_) => BadgeCategory::Muted,
    }
}

pub fn classify_bias(label: &BiasLabel) -> BadgeCategory {
    match label {
        BiasLabel::Left => BadgeCategory::BiasLeft,
        BiasLabel::Center => BadgeCategory::BiasCenter,
        BiasLabel::Right => BadgeCategory::BiasRight,
        BiasLabel::Unknown => BadgeCategory::BiasUnknown,
        BiasLabel::Other(_) => BadgeCategory::Muted,
    }
}

pub fn classify_sentiment_str(raw: &str) -> BadgeCategory {
    classify_sentiment(&SentimentLabel::from(raw))
}

pub fn classify_bias_str(raw: &str) -> BadgeCategory {
    classify_bias(&BiasLabel::from(raw))
}

pub fn sentiment_trend(label: &SentimentLabel) -> Trend {
    match label {
        SentimentLabel::Positive => Trend::Rising,
        SentimentLabel::Negative => Trend::Falling,
        _ => Trend::Flat,
    }
}

#[cfg(test)]
#[path = "tests/badge_tests.rs"]
mod tests;
