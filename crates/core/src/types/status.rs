//! Status lifecycles for assessment requests, certificates, orders and payments.
//!
//! Every status enumeration implements [`Lifecycle`], which names the legal
//! transitions. Entities route status writes through
//! [`Lifecycle::transition`] so an illegal jump (say, a revoked certificate
//! being re-issued) is rejected at the point of writing.
//!
//! ```text
//! Assessment:  submitted -> received -> in_progress -> quality_check -> completed -> returned
//!                   \___________\____________\______________\______________\--> cancelled
//! Certificate: draft -> issued -> revoked
//! Order:       pending -> confirmed -> in_progress -> completed
//!                 \__________\____________\--> cancelled
//! Payment:     pending -> paid -> refunded
//!                 \-> failed -> pending
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::role::UnknownVariant;

/// Rejected status write.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal {kind} transition: {from} -> {to}")]
pub struct StatusTransitionError {
    /// Which lifecycle rejected the write.
    pub kind: &'static str,
    /// Current status.
    pub from: String,
    /// Requested status.
    pub to: String,
}

/// A closed status enumeration with an explicit transition table.
pub trait Lifecycle: Copy + Eq + fmt::Display + Sized {
    /// Lifecycle name used in error messages.
    const KIND: &'static str;

    /// Whether moving from `self` to `next` is allowed. Self-transitions are not.
    fn can_transition_to(self, next: Self) -> bool;

    /// Whether no transition leaves this status.
    fn is_terminal(self) -> bool;

    /// Validate a transition, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] if the transition is not allowed.
    fn transition(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                kind: Self::KIND,
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

/// Implements `ALL`, `as_str`, `Display` and `FromStr` from one name table.
macro_rules! status_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every status, in lifecycle order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of this status.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(UnknownVariant::new($kind, s)),
                }
            }
        }
    };
}

// =============================================================================
// Assessment
// =============================================================================

/// Workflow position of an assessment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    #[default]
    Submitted,
    Received,
    InProgress,
    QualityCheck,
    Completed,
    Returned,
    Cancelled,
}

status_names!(AssessmentStatus, "assessment status", {
    Submitted => "submitted",
    Received => "received",
    InProgress => "in_progress",
    QualityCheck => "quality_check",
    Completed => "completed",
    Returned => "returned",
    Cancelled => "cancelled",
});

impl AssessmentStatus {
    /// The next step of the happy path, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Submitted => Some(Self::Received),
            Self::Received => Some(Self::InProgress),
            Self::InProgress => Some(Self::QualityCheck),
            Self::QualityCheck => Some(Self::Completed),
            Self::Completed => Some(Self::Returned),
            Self::Returned | Self::Cancelled => None,
        }
    }
}

impl Lifecycle for AssessmentStatus {
    const KIND: &'static str = "assessment status";

    fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == Self::Cancelled || self.next() == Some(next)
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Returned | Self::Cancelled)
    }
}

// =============================================================================
// Certificate
// =============================================================================

/// Certificate issuance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    #[default]
    Draft,
    Issued,
    Revoked,
}

status_names!(CertificateStatus, "certificate status", {
    Draft => "draft",
    Issued => "issued",
    Revoked => "revoked",
});

impl Lifecycle for CertificateStatus {
    const KIND: &'static str = "certificate status";

    fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Issued) | (Self::Issued, Self::Revoked)
        )
    }

    fn is_terminal(self) -> bool {
        self == Self::Revoked
    }
}

// =============================================================================
// Order
// =============================================================================

/// Fulfilment state of a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

status_names!(OrderStatus, "order status", {
    Pending => "pending",
    Confirmed => "confirmed",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl Lifecycle for OrderStatus {
    const KIND: &'static str = "order status";

    fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (
                    Self::Pending | Self::Confirmed | Self::InProgress,
                    Self::Cancelled
                )
        )
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// Settlement state, shared by `Order::payment_status` and `Payment::status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

status_names!(PaymentStatus, "payment status", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

impl Lifecycle for PaymentStatus {
    const KIND: &'static str = "payment status";

    fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Failed)
                | (Self::Failed, Self::Pending)
                | (Self::Paid, Self::Refunded)
        )
    }

    fn is_terminal(self) -> bool {
        self == Self::Refunded
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_terminal_states_are_closed<S: Lifecycle>(all: &[S]) {
        for &from in all.iter().filter(|s| s.is_terminal()) {
            for &to in all {
                assert!(!from.can_transition_to(to), "{from} -> {to} should be closed");
            }
        }
    }

    #[test]
    fn test_assessment_happy_path() {
        let mut status = AssessmentStatus::Submitted;
        while let Some(next) = status.next() {
            status = status.transition(next).unwrap();
        }
        assert_eq!(status, AssessmentStatus::Returned);
    }

    #[test]
    fn test_assessment_cannot_skip_steps() {
        let err = AssessmentStatus::Submitted
            .transition(AssessmentStatus::Completed)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "illegal assessment status transition: submitted -> completed"
        );
        assert!(!AssessmentStatus::QualityCheck.can_transition_to(AssessmentStatus::InProgress));
    }

    #[test]
    fn test_assessment_cancel_from_any_open_state() {
        for &status in AssessmentStatus::ALL {
            let expected = !status.is_terminal();
            assert_eq!(
                status.can_transition_to(AssessmentStatus::Cancelled),
                expected,
                "{status}"
            );
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        assert!(!AssessmentStatus::Received.can_transition_to(AssessmentStatus::Received));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_certificate_lifecycle() {
        let issued = CertificateStatus::Draft
            .transition(CertificateStatus::Issued)
            .unwrap();
        let revoked = issued.transition(CertificateStatus::Revoked).unwrap();
        assert!(revoked.transition(CertificateStatus::Issued).is_err());
        assert!(CertificateStatus::Draft
            .transition(CertificateStatus::Revoked)
            .is_err());
    }

    #[test]
    fn test_order_lifecycle() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_payment_retry_after_failure() {
        let failed = PaymentStatus::Pending
            .transition(PaymentStatus::Failed)
            .unwrap();
        let retried = failed.transition(PaymentStatus::Pending).unwrap();
        let paid = retried.transition(PaymentStatus::Paid).unwrap();
        assert!(paid.can_transition_to(PaymentStatus::Refunded));
        assert!(!failed.can_transition_to(PaymentStatus::Refunded));
    }

    #[test]
    fn test_terminal_states_are_closed() {
        assert_terminal_states_are_closed(AssessmentStatus::ALL);
        assert_terminal_states_are_closed(CertificateStatus::ALL);
        assert_terminal_states_are_closed(OrderStatus::ALL);
        assert_terminal_states_are_closed(PaymentStatus::ALL);
    }

    #[test]
    fn test_wire_names_parse_back() {
        for &status in AssessmentStatus::ALL {
            assert_eq!(status.as_str().parse::<AssessmentStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&AssessmentStatus::QualityCheck).unwrap(),
            "\"quality_check\""
        );
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
