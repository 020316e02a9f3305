//! Ratings left after a completed swap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FeedbackId, SwapId, UserId, UserName};

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;
/// Maximum length of a feedback comment.
pub const FEEDBACK_COMMENT_MAX: usize = 1000;

/// Validation failures for feedback input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackValidationError {
    #[error("Please provide a rating between 1 and 5")]
    RatingOutOfRange,
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
}

/// Star rating between [`RATING_MIN`] and [`RATING_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating.
    pub fn new(raw: i64) -> Result<Self, FeedbackValidationError> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (RATING_MIN..=RATING_MAX).contains(value))
            .map(Self)
            .ok_or(FeedbackValidationError::RatingOutOfRange)
    }

    /// Numeric value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = FeedbackValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Optional free-text review, stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackComment(String);

impl FeedbackComment {
    /// Validate a comment. Blank input yields `None`.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, FeedbackValidationError> {
        let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        if text.chars().count() > FEEDBACK_COMMENT_MAX {
            return Err(FeedbackValidationError::CommentTooLong {
                max: FEEDBACK_COMMENT_MAX,
            });
        }
        Ok(Some(Self(text.to_owned())))
    }
}

impl AsRef<str> for FeedbackComment {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stored feedback entry. At most one exists per swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub id: FeedbackId,
    pub swap: SwapId,
    pub rater: UserId,
    pub rated_user: UserId,
    pub rating: Rating,
    pub comment: Option<FeedbackComment>,
    pub created_at: DateTime<Utc>,
}

/// Rater details shown next to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaterSummary {
    pub id: UserId,
    pub name: UserName,
}

/// Feedback with the rater resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackView {
    pub id: FeedbackId,
    pub swap: SwapId,
    pub rater: RaterSummary,
    pub rated_user: UserId,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<FeedbackComment>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackView {
    /// Attach rater details to a stored entry.
    pub fn new(feedback: Feedback, rater_name: UserName) -> Self {
        Self {
            id: feedback.id,
            swap: feedback.swap,
            rater: RaterSummary {
                id: feedback.rater,
                name: rater_name,
            },
            rated_user: feedback.rated_user,
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: feedback.created_at,
        }
    }
}

/// Mean rating rounded to one decimal place, `0.0` without feedback.
///
/// # Examples
/// ```
/// use skillswap::domain::{average_rating, Rating};
///
/// let ratings = [5, 4, 4].map(|value| Rating::new(value).expect("valid"));
/// assert_eq!(average_rating(&ratings), 4.3);
/// assert_eq!(average_rating(&[]), 0.0);
/// ```
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let total: u32 = ratings.iter().map(|rating| u32::from(rating.value())).sum();
    let count = u32::try_from(ratings.len()).unwrap_or(u32::MAX);
    let mean = f64::from(total) / f64::from(count);
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    #[case(300)]
    fn rating_outside_range_is_rejected(#[case] raw: i64) {
        assert_eq!(
            Rating::new(raw).expect_err("out of range"),
            FeedbackValidationError::RatingOutOfRange
        );
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    fn rating_bounds_are_inclusive(#[case] raw: i64) {
        assert_eq!(i64::from(Rating::new(raw).expect("in range").value()), raw);
    }

    #[rstest]
    fn comment_is_optional_and_bounded() {
        assert_eq!(FeedbackComment::parse(Some("   ")).expect("blank"), None);
        let long = "c".repeat(FEEDBACK_COMMENT_MAX + 1);
        assert_eq!(
            FeedbackComment::parse(Some(&long)).expect_err("too long"),
            FeedbackValidationError::CommentTooLong {
                max: FEEDBACK_COMMENT_MAX
            }
        );
    }

    #[rstest]
    #[case(&[5, 4], 4.5)]
    #[case(&[1, 2, 2], 1.7)]
    #[case(&[3], 3.0)]
    fn average_is_rounded_to_one_decimal(#[case] raw: &[i64], #[case] expected: f64) {
        let ratings: Vec<Rating> = raw
            .iter()
            .map(|value| Rating::new(*value).expect("valid"))
            .collect();
        assert!((average_rating(&ratings) - expected).abs() < f64::EPSILON);
    }
}
