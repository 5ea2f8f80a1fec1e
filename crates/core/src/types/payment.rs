//! Order payments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{OrderId, PaymentId};
use crate::price::Price;
use crate::status::{Lifecycle, PaymentStatus, StatusTransitionError};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// VNPay online gateway.
    Vnpay,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vnpay => "VNPay",
            Self::BankTransfer => "Bank transfer",
            Self::Cash => "Cash",
        }
    }
}

/// A payment against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: Price,
    pub method: PaymentMethod,
    status: PaymentStatus,
    /// Gateway or bank reference, once known.
    #[serde(default)]
    pub transaction_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// A pending payment.
    #[must_use]
    pub fn new(id: PaymentId, order_id: OrderId, amount: Price, method: PaymentMethod) -> Self {
        Self {
            id,
            order_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            transaction_ref: None,
            created_at: Utc::now(),
            paid_at: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> PaymentStatus {
        self.status
    }

    /// Record settlement.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] unless the payment is pending.
    pub fn mark_paid(
        &mut self,
        transaction_ref: Option<String>,
    ) -> Result<(), StatusTransitionError> {
        self.status = self.status.transition(PaymentStatus::Paid)?;
        self.transaction_ref = transaction_ref.or_else(|| self.transaction_ref.take());
        self.paid_at = Some(Utc::now());
        Ok(())
    }

    /// Move to any status allowed by the payment lifecycle.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] for an illegal transition.
    pub fn set_status(&mut self, next: PaymentStatus) -> Result<(), StatusTransitionError> {
        self.status = self.status.transition(next)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_paid_records_reference() {
        let mut payment = Payment::new(
            PaymentId::new(1),
            OrderId::new(1),
            Price::vnd(800_000),
            PaymentMethod::Vnpay,
        );
        payment.mark_paid(Some("VNP-123".to_string())).unwrap();
        assert_eq!(payment.status(), PaymentStatus::Paid);
        assert_eq!(payment.transaction_ref.as_deref(), Some("VNP-123"));
        assert!(payment.paid_at.is_some());
        assert!(payment.mark_paid(None).is_err());
    }

    #[test]
    fn test_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
        assert_eq!(PaymentMethod::Vnpay.label(), "VNPay");
    }
}
