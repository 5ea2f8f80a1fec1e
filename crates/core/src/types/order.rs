//! Service orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{OrderId, ServiceId, UserId};
use crate::price::Price;
use crate::status::{Lifecycle, OrderStatus, PaymentStatus, StatusTransitionError};

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderService {
    pub service_id: ServiceId,
    pub service_name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderService {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A customer's order for one or more assessment services.
///
/// Fulfilment (`status`) and settlement (`payment_status`) are independent
/// lifecycles; each is written only through its own setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub services: Vec<OrderService>,
    pub total_amount: Price,
    status: OrderStatus,
    payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A new pending order. Returns `None` if the lines mix currencies or are empty.
    #[must_use]
    pub fn place(id: OrderId, customer_id: UserId, services: Vec<OrderService>) -> Option<Self> {
        let first = services.first()?;
        let total_amount = services
            .iter()
            .map(OrderService::line_total)
            .try_fold(Price::zero(first.unit_price.currency_code), Price::checked_add)?;
        let now = Utc::now();

        Some(Self {
            id,
            customer_id,
            services,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Advance fulfilment.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] for an illegal transition.
    pub fn set_status(&mut self, next: OrderStatus) -> Result<(), StatusTransitionError> {
        self.status = self.status.transition(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Advance settlement.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] for an illegal transition.
    pub fn set_payment_status(&mut self, next: PaymentStatus) -> Result<(), StatusTransitionError> {
        self.payment_status = self.payment_status.transition(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}
