//! Observations: Sentiment Readings from the Data Source
//!
//! An observation is one item (post, review, comment) with a sentiment
//! score and/or a categorical label. The simulator only needs the
//! aggregated counts per category, computed with fixed thresholds:
//!
//!   score ≤ -3  → negative
//!   score ≥ +3  → positive
//!   otherwise   → neutral
//!
//! A label, when present, takes precedence over the score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores at or below this value count as negative
pub const NEGATIVE_THRESHOLD: f64 = -3.0;

/// Scores at or above this value count as positive
pub const POSITIVE_THRESHOLD: f64 = 3.0;

/// Sentiment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Classify a raw score with the fixed thresholds
    pub fn from_score(score: f64) -> Self {
        if score <= NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else if score >= POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }
}

/// A single sentiment observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Numeric sentiment score
    #[serde(default)]
    pub score: f64,
    /// Categorical label (overrides the score when present)
    #[serde(default)]
    pub label: Option<Sentiment>,
    /// When the item was created
    pub timestamp: DateTime<Utc>,
    /// Origin of the item (forum, review site, ...)
    #[serde(default)]
    pub source: Option<String>,
}

impl Observation {
    /// Observation carrying only a score
    pub fn scored(score: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            score,
            label: None,
            timestamp,
            source: None,
        }
    }

    /// Observation carrying only a label
    pub fn labeled(label: Sentiment, timestamp: DateTime<Utc>) -> Self {
        Self {
            score: 0.0,
            label: Some(label),
            timestamp,
            source: None,
        }
    }

    /// Tag the observation with its origin
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Effective category of this observation
    pub fn category(&self) -> Sentiment {
        self.label.unwrap_or_else(|| Sentiment::from_score(self.score))
    }
}

/// Aggregated counts per sentiment category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

impl SentimentCounts {
    pub fn new(negative: usize, neutral: usize, positive: usize) -> Self {
        Self {
            negative,
            neutral,
            positive,
        }
    }

    /// Count raw scores using the fixed thresholds
    pub fn from_scores(scores: &[f64]) -> Self {
        scores
            .iter()
            .map(|&s| Sentiment::from_score(s))
            .collect()
    }

    /// Count observations by their effective category
    pub fn from_observations(observations: &[Observation]) -> Self {
        observations.iter().map(Observation::category).collect()
    }

    /// Record one item
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Positive => self.positive += 1,
        }
    }

    /// Total number of items
    pub fn total(&self) -> usize {
        self.negative + self.neutral + self.positive
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Signed balance (positive - negative) over the total, in [-1, 1]
    ///
    /// Zero for an empty set.
    pub fn balance(&self) -> f64 {
        let total = self.total().max(1) as f64;
        (self.positive as f64 - self.negative as f64) / total
    }
}

impl FromIterator<Sentiment> for SentimentCounts {
    fn from_iter<T: IntoIterator<Item = Sentiment>>(iter: T) -> Self {
        let mut counts = SentimentCounts::default();
        for sentiment in iter {
            counts.record(sentiment);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(Sentiment::from_score(-3.0), Sentiment::Negative);
        assert_eq!(Sentiment::from_score(-2.99), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(2.99), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(3.0), Sentiment::Positive);
    }

    #[test]
    fn test_counts_from_scores() {
        let counts = SentimentCounts::from_scores(&[-5.0, -4.0, 0.0, 4.0, 5.0]);
        assert_eq!(counts, SentimentCounts::new(2, 1, 2));
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.balance(), 0.0);
    }

    #[test]
    fn test_label_overrides_score() {
        let mut obs = Observation::scored(-8.0, at(1));
        obs.label = Some(Sentiment::Positive);
        assert_eq!(obs.category(), Sentiment::Positive);

        let counts = SentimentCounts::from_observations(&[
            obs,
            Observation::labeled(Sentiment::Neutral, at(2)),
            Observation::scored(-3.5, at(3)),
        ]);
        assert_eq!(counts, SentimentCounts::new(1, 1, 1));
    }

    #[test]
    fn test_empty_counts() {
        let counts = SentimentCounts::from_scores(&[]);
        assert!(counts.is_empty());
        assert_eq!(counts.balance(), 0.0, "balance of empty set must not divide by zero");
    }

    #[test]
    fn test_observation_json_shape() {
        let json = r#"{"score": 4.5, "timestamp": "2025-03-01T12:00:00Z", "source": "tieba"}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.category(), Sentiment::Positive);
        assert_eq!(obs.source.as_deref(), Some("tieba"));
        assert_eq!(obs.timestamp, at(1));
    }
}
