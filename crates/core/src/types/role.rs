//! User roles and employee departments.

use serde::{Deserialize, Serialize};

/// Returned when parsing an enumeration from an unrecognised string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    /// Name of the enumeration being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Role of an account, from anonymous visitor up to administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Guest,
    Customer,
    AssessmentStaff,
    Consultant,
    Manager,
    Admin,
}

impl UserRole {
    /// All roles, lowest privilege first.
    pub const ALL: [Self; 6] = [
        Self::Guest,
        Self::Customer,
        Self::AssessmentStaff,
        Self::Consultant,
        Self::Manager,
        Self::Admin,
    ];

    /// Wire name, e.g. `assessment_staff`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Customer => "customer",
            Self::AssessmentStaff => "assessment_staff",
            Self::Consultant => "consultant",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    /// Human-readable name, e.g. `Assessment Staff`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::Customer => "Customer",
            Self::AssessmentStaff => "Assessment Staff",
            Self::Consultant => "Consultant",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }

    /// Whether this role belongs to an employee rather than a customer.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(
            self,
            Self::AssessmentStaff | Self::Consultant | Self::Manager | Self::Admin
        )
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("user role", s))
    }
}

/// Department an employee works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Assessment,
    Consultation,
    Management,
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assessment => write!(f, "assessment"),
            Self::Consultation => write!(f, "consultation"),
            Self::Management => write!(f, "management"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assessment" => Ok(Self::Assessment),
            "consultation" => Ok(Self::Consultation),
            "management" => Ok(Self::Management),
            _ => Err(UnknownVariant::new("department", s)),
        }
    }
}
