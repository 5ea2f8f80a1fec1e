//! Account entities.
//!
//! `Customer` and `Employee` embed a [`User`] rather than extending it; code
//! that only needs identity and role takes `&User`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::email::Email;
use crate::id::UserId;
use crate::role::{Department, UserRole};

/// Identity shared by every account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A new active account created now.
    #[must_use]
    pub fn new(id: UserId, email: Email, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Disable sign-in for this account.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

/// A customer who submits stones for assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(flatten)]
    pub user: User,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl Customer {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(flatten)]
    pub user: User,
    pub first_name: String,
    pub last_name: String,
    pub department: Department,
    pub position: String,
    pub hire_date: NaiveDate,
}

impl Employee {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> User {
        User::new(UserId::new(1), Email::parse("a@b.co").unwrap(), role)
    }

    #[test]
    fn test_new_user_is_active() {
        let u = user(UserRole::Customer);
        assert!(u.is_active);
        assert_eq!(u.created_at, u.updated_at);
    }

    #[test]
    fn test_deactivate() {
        let mut u = user(UserRole::Customer);
        u.deactivate();
        assert!(!u.is_active);
    }

    #[test]
    fn test_customer_flattens_user_fields() {
        let customer = Customer {
            user: user(UserRole::Customer),
            first_name: "Lan".to_string(),
            last_name: "Nguyen".to_string(),
            phone: "0901234567".to_string(),
            address: None,
            date_of_birth: None,
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["email"], "a@b.co");
        assert_eq!(json["role"], "customer");
        assert_eq!(json["firstName"], "Lan");
        assert_eq!(customer.full_name(), "Lan Nguyen");
    }
}
