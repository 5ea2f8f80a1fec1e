//! Demo personas.
//!
//! Fixed credential sets for showing the product without a real back office.
//! These are fixtures: deployments inject them only when demo mode is on.

use crate::types::UserRole;

/// A named demo account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoPersona {
    pub role: UserRole,
    pub email: &'static str,
    pub password: &'static str,
    /// Shown on the persona card and in the welcome toast.
    pub display_name: &'static str,
    pub description: &'static str,
}

/// The five demo accounts, one per staff or customer role.
pub const DEMO_PERSONAS: [DemoPersona; 5] = [
    DemoPersona {
        role: UserRole::Admin,
        email: "admin@diamond.com",
        password: "password123",
        display_name: "Admin",
        description: "Full system access",
    },
    DemoPersona {
        role: UserRole::Manager,
        email: "manager@diamond.com",
        password: "password123",
        display_name: "Manager",
        description: "Oversees orders, staff and reports",
    },
    DemoPersona {
        role: UserRole::Consultant,
        email: "consultant@diamond.com",
        password: "password123",
        display_name: "Consultant",
        description: "Answers customers and prepares quotes",
    },
    DemoPersona {
        role: UserRole::AssessmentStaff,
        email: "staff@diamond.com",
        password: "password123",
        display_name: "Assessment Staff",
        description: "Grades stones and records results",
    },
    DemoPersona {
        role: UserRole::Customer,
        email: "customer@diamond.com",
        password: "password123",
        display_name: "Customer",
        description: "Submits stones and tracks certificates",
    },
];

/// Find the persona for a role.
#[must_use]
pub fn by_role(personas: &[DemoPersona], role: UserRole) -> Option<&DemoPersona> {
    personas.iter().find(|p| p.role == role)
}

/// Find the persona whose email matches, ignoring case and surrounding spaces.
#[must_use]
pub fn by_email<'a>(personas: &'a [DemoPersona], email: &str) -> Option<&'a DemoPersona> {
    let email = email.trim();
    personas.iter().find(|p| p.email.eq_ignore_ascii_case(email))
}
