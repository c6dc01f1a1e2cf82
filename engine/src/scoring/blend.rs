// Sentiment + fundamentals blend into a buy score and recommendation tier
use super::fundamental::{fundamental_score, MAX_SCORE, MIN_SCORE};
use serde::Deserialize;
use shared::models::{FundamentalMetrics, Recommendation, ScoreResult, Sentiment};

/// Weighted average of sentiment points and the fundamental score.
///
/// Weights need not sum to one; they are normalised by their total. When both
/// weights are zero the fundamental score is used as is.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlendPolicy {
    pub sentiment_weight: f64,
    pub fundamental_weight: f64,
    pub positive_points: f64,
    pub neutral_points: f64,
    pub negative_points: f64,
}

impl Default for BlendPolicy {
    fn default() -> Self {
        BlendPolicy {
            sentiment_weight: 0.4,
            fundamental_weight: 0.6,
            positive_points: 85.0,
            neutral_points: 50.0,
            negative_points: 15.0,
        }
    }
}

impl BlendPolicy {
    pub fn sentiment_points(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive_points,
            Sentiment::Neutral => self.neutral_points,
            Sentiment::Negative => self.negative_points,
        }
    }

    pub fn buy_score(&self, sentiment: Sentiment, fundamental_score: f64) -> f64 {
        let total_weight = self.sentiment_weight + self.fundamental_weight;
        let blended = if total_weight > 0.0 {
            (self.sentiment_weight * self.sentiment_points(sentiment) + self.fundamental_weight * fundamental_score)
                / total_weight
        } else {
            fundamental_score
        };
        if blended.is_finite() {
            blended.clamp(MIN_SCORE, MAX_SCORE)
        } else {
            fundamental_score
        }
    }

    pub fn evaluate(&self, metrics: &FundamentalMetrics, sentiment: Sentiment) -> ScoreResult {
        let fundamental = fundamental_score(metrics);
        let buy = self.buy_score(sentiment, fundamental);
        ScoreResult {
            fundamental_score: fundamental,
            buy_score: buy,
            recommendation: Recommendation::from_buy_score(buy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_metrics() -> FundamentalMetrics {
        FundamentalMetrics {
            pe_ratio: 20.0,
            forward_pe: 18.0,
            peg_ratio: 1.0,
            debt_to_equity: 0.5,
            return_on_equity: 15.0,
            profit_margin: 20.0,
            revenue_growth: 25.0,
        }
    }

    #[test]
    fn test_default_blend() {
        let policy = BlendPolicy::default();
        // 0.4 * 85 + 0.6 * 100 = 94
        assert!((policy.buy_score(Sentiment::Positive, 100.0) - 94.0).abs() < 1e-9);
        // 0.4 * 15 + 0.6 * 44 = 32.4
        assert!((policy.buy_score(Sentiment::Negative, 44.0) - 32.4).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_positive_strong_fundamentals() {
        let result = BlendPolicy::default().evaluate(&strong_metrics(), Sentiment::Positive);
        assert_eq!(result.fundamental_score, 100.0);
        assert_eq!(result.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn test_evaluate_negative_weak_fundamentals() {
        let weak = FundamentalMetrics { pe_ratio: 80.0, peg_ratio: 4.0, debt_to_equity: 3.0, ..Default::default() };
        let result = BlendPolicy::default().evaluate(&weak, Sentiment::Negative);
        // fundamental 50 - 5 - 5 - 5 - 3 - 3 = 29; buy 0.4 * 15 + 0.6 * 29 = 23.4
        assert_eq!(result.fundamental_score, 29.0);
        assert_eq!(result.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_sentiment_only_policy() {
        let policy = BlendPolicy { fundamental_weight: 0.0, sentiment_weight: 1.0, ..Default::default() };
        assert_eq!(policy.buy_score(Sentiment::Neutral, 100.0), 50.0);
    }

    #[test]
    fn test_zero_weights_fall_back_to_fundamentals() {
        let policy = BlendPolicy { fundamental_weight: 0.0, sentiment_weight: 0.0, ..Default::default() };
        assert_eq!(policy.buy_score(Sentiment::Positive, 61.0), 61.0);
    }

    #[test]
    fn test_out_of_range_points_are_clamped() {
        let policy = BlendPolicy { positive_points: 500.0, ..Default::default() };
        assert_eq!(policy.buy_score(Sentiment::Positive, 100.0), 100.0);
    }
}
