//! Domain types for Diamond Assess.
//!
//! Entities mirror the records exchanged with the assessment back office.
//! Status fields are closed enumerations with explicit transition tables; see
//! [`status`] for the lifecycle rules.

pub mod assessment;
pub mod certificate;
pub mod chat;
pub mod email;
pub mod feedback;
pub mod id;
pub mod order;
pub mod payment;
pub mod price;
pub mod role;
pub mod service;
pub mod status;
pub mod user;

pub use assessment::{
    AssessmentRequest, AssessmentResult, ClarityGrade, ColorGrade, DiamondShape, Fluorescence,
    FinishGrade, Measurements,
};
pub use certificate::Certificate;
pub use chat::{ChatConversation, ChatMessage};
pub use email::{Email, EmailError};
pub use feedback::{Feedback, Rating, RatingError};
pub use id::*;
pub use order::{Order, OrderService};
pub use payment::{Payment, PaymentMethod};
pub use price::{CurrencyCode, Price};
pub use role::{Department, UnknownVariant, UserRole};
pub use service::Service;
pub use status::*;
pub use user::{Customer, Employee, User};
