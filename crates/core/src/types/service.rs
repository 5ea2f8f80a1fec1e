//! Assessment service catalog entries.

use serde::{Deserialize, Serialize};

use crate::id::ServiceId;
use crate::price::Price;

/// A bookable assessment service, as listed on the Services and Pricing pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Working days from receipt of the sample to the result.
    pub turnaround_days: u16,
    pub is_active: bool,
}
