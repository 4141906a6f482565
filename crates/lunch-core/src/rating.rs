//! Rating aggregation
//!
//! A meal stores only the running average and the number of scores behind
//! it. Adding a score folds it into the average without re-reading history:
//!
//! ```text
//! new_average = (average * count + score) / (count + 1)
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{LunchError, Result};

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// A validated score in `1.0..=5.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Score(f64);

impl Score {
    pub fn new(score: f64) -> Result<Self> {
        if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
            Ok(Self(score))
        } else {
            Err(LunchError::InvalidRating { score })
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = LunchError;

    fn try_from(value: f64) -> Result<Self> {
        Score::new(value)
    }
}

/// Aggregated rating state of one meal
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    pub fn unrated() -> Self {
        Self::default()
    }

    pub fn is_rated(&self) -> bool {
        self.count > 0
    }

    /// Fold one more score into the summary.
    ///
    /// A non-positive count is treated as unrated, so whatever average was
    /// stored alongside it is discarded.
    pub fn apply(self, score: Score) -> Self {
        if self.count <= 0 {
            return Self {
                average: score.value(),
                count: 1,
            };
        }
        let total = self.average * self.count as f64 + score.value();
        let count = self.count + 1;
        Self {
            average: total / count as f64,
            count,
        }
    }

    /// Average rounded to one decimal, the way menus display it
    pub fn display_average(&self) -> f64 {
        (self.average * 10.0).round() / 10.0
    }
}

/// Free-function form of [`RatingSummary::apply`]
pub fn apply_rating(current: RatingSummary, score: Score) -> RatingSummary {
    current.apply(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn score(v: f64) -> Score {
        Score::new(v).unwrap()
    }

    #[test]
    fn test_first_rating_becomes_average() {
        let summary = RatingSummary::unrated().apply(score(4.0));
        assert_eq!(summary, RatingSummary { average: 4.0, count: 1 });
    }

    #[test]
    fn test_running_average() {
        let summary = RatingSummary { average: 4.0, count: 3 }.apply(score(2.0));
        assert_eq!(summary.count, 4);
        assert!((summary.average - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_summary_is_weighted() {
        // 4.6 over 30 scores, one more 1.0
        let summary = RatingSummary { average: 4.6, count: 30 }.apply(score(1.0));
        assert_eq!(summary.count, 31);
        assert!((summary.average - (4.6 * 30.0 + 1.0) / 31.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_count_ignores_stale_average() {
        let summary = RatingSummary { average: 3.3, count: 0 }.apply(score(5.0));
        assert_eq!(summary, RatingSummary { average: 5.0, count: 1 });
    }

    #[test]
    fn test_score_bounds() {
        assert!(Score::new(1.0).is_ok());
        assert!(Score::new(5.0).is_ok());
        assert!(Score::new(0.99).is_err());
        assert!(Score::new(5.01).is_err());
        assert!(Score::new(f64::NAN).is_err());
        assert!(Score::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_display_average_rounds_to_one_decimal() {
        let summary = RatingSummary { average: 4.26, count: 5 };
        assert!((summary.display_average() - 4.3).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_running_average_matches_mean(scores in prop::collection::vec(1.0f64..=5.0, 1..50)) {
            let summary = scores
                .iter()
                .fold(RatingSummary::unrated(), |acc, s| acc.apply(score(*s)));
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            prop_assert_eq!(summary.count, scores.len() as i64);
            prop_assert!((summary.average - mean).abs() < 1e-9);
            prop_assert!(summary.average >= MIN_SCORE - 1e-9 && summary.average <= MAX_SCORE + 1e-9);
        }
    }
}
