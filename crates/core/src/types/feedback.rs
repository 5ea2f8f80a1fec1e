//! Post-order customer feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{FeedbackId, OrderId, UserId};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating must be between {min} and {max} (got {got})")]
    OutOfRange { min: u8, max: u8, got: u8 },
}

/// A 1–5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns [`RatingError::OutOfRange`] outside `1..=5`.
    pub const fn new(stars: u8) -> Result<Self, RatingError> {
        if stars < Self::MIN || stars > Self::MAX {
            return Err(RatingError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                got: stars,
            });
        }
        Ok(Self(stars))
    }

    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A customer's rating of a completed order, optionally answered by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub order_id: OrderId,
    pub customer_id: UserId,
    pub rating: Rating,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub staff_response: Option<String>,
    #[serde(default)]
    pub responded_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Attach (or replace) the staff response.
    pub fn respond(&mut self, staff_id: UserId, response: impl Into<String>) {
        self.staff_response = Some(response.into());
        self.responded_by = Some(staff_id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(1).unwrap().stars(), 1);
        assert_eq!(Rating::new(5).unwrap().stars(), 5);
        assert_eq!(
            Rating::new(6).unwrap_err().to_string(),
            "rating must be between 1 and 5 (got 6)"
        );
    }

    #[test]
    fn test_rating_deserialize_validates() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn test_respond() {
        let mut feedback = Feedback {
            id: FeedbackId::new(1),
            order_id: OrderId::new(1),
            customer_id: UserId::new(3),
            rating: Rating::new(4).unwrap(),
            comment: Some("Fast turnaround".to_string()),
            staff_response: None,
            responded_by: None,
            created_at: Utc::now(),
        };
        feedback.respond(UserId::new(8), "Thank you!");
        assert_eq!(feedback.responded_by, Some(UserId::new(8)));
        assert_eq!(feedback.staff_response.as_deref(), Some("Thank you!"));
    }
}
