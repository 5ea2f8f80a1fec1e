//! Assessment requests and their graded results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id::{AssessmentRequestId, AssessmentResultId, ServiceId, UserId};
use crate::price::Price;
use crate::status::{AssessmentStatus, Lifecycle, StatusTransitionError};

/// A customer's request to have a stone assessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub id: AssessmentRequestId,
    pub customer_id: UserId,
    pub service_id: ServiceId,
    /// Free-text description of the sample as handed in.
    pub sample_description: String,
    status: AssessmentStatus,
    #[serde(default)]
    pub assigned_employee_id: Option<UserId>,
    #[serde(default)]
    pub result: Option<AssessmentResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentRequest {
    /// A freshly submitted request.
    #[must_use]
    pub fn submit(
        id: AssessmentRequestId,
        customer_id: UserId,
        service_id: ServiceId,
        sample_description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_id,
            service_id,
            sample_description: sample_description.into(),
            status: AssessmentStatus::Submitted,
            assigned_employee_id: None,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current workflow status.
    #[must_use]
    pub const fn status(&self) -> AssessmentStatus {
        self.status
    }

    /// Move the request along its workflow.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] if `next` is not reachable from the
    /// current status; the request is left unchanged.
    pub fn set_status(&mut self, next: AssessmentStatus) -> Result<(), StatusTransitionError> {
        self.status = self.status.transition(next)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Hand the request to a member of the assessment staff.
    pub fn assign(&mut self, employee_id: UserId) {
        self.assigned_employee_id = Some(employee_id);
        self.updated_at = Utc::now();
    }

    /// Record the graded result.
    pub fn attach_result(&mut self, result: AssessmentResult) {
        self.result = Some(result);
        self.updated_at = Utc::now();
    }
}

/// Measured and graded parameters of a diamond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub id: AssessmentResultId,
    pub carat_weight: Decimal,
    pub shape: DiamondShape,
    pub cut: FinishGrade,
    pub color: ColorGrade,
    pub clarity: ClarityGrade,
    pub polish: FinishGrade,
    pub symmetry: FinishGrade,
    pub fluorescence: Fluorescence,
    pub measurements: Measurements,
    /// Overall grade as computed by the grading desk.
    #[serde(default)]
    pub overall_grade: Option<String>,
    #[serde(default)]
    pub estimated_value: Option<Price>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Length × width × depth in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurements {
    pub length: Decimal,
    pub width: Decimal,
    pub depth: Decimal,
}

impl std::fmt::Display for Measurements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} x {} mm", self.length, self.width, self.depth)
    }
}

/// Outline of the stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiamondShape {
    Round,
    Princess,
    Cushion,
    Emerald,
    Oval,
    Radiant,
    Asscher,
    Marquise,
    Heart,
    Pear,
}

/// Grade used for cut, polish and symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishGrade {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

/// GIA colour scale, D (colourless) through N.
///
/// Ordering follows the scale: `D < E < ... < N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColorGrade {
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
}

impl ColorGrade {
    /// D, E and F.
    #[must_use]
    pub const fn is_colorless(self) -> bool {
        matches!(self, Self::D | Self::E | Self::F)
    }
}

/// GIA clarity scale, flawless through included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum ClarityGrade {
    FL,
    IF,
    VVS1,
    VVS2,
    VS1,
    VS2,
    SI1,
    SI2,
    I1,
    I2,
    I3,
}

/// Strength of fluorescence under UV light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fluorescence {
    None,
    Faint,
    Medium,
    Strong,
    VeryStrong,
}
