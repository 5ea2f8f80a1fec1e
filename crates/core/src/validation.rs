//! Field validators for the login and registration forms.
//!
//! Validators are pure: they take the current field values and return a
//! [`FieldErrors`] map holding one [`FieldError`] per failing field. An absent
//! key means the field is valid. Maps iterate in field declaration order, so
//! [`FieldErrors::first`] is the error a single-message UI should show.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::email::Email;

/// Minimum password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Why a single field failed validation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("required")]
    Required,
    #[error("invalid format")]
    InvalidFormat,
    #[error("shorter than {min} characters")]
    TooShort { min: usize },
    #[error("does not match")]
    Mismatch,
}

/// A named input of a form.
///
/// `Ord` must follow declaration order; it decides which error is "first".
pub trait FormField: Copy + Ord + fmt::Debug {
    /// Wire name as submitted by the browser, e.g. `confirmPassword`.
    fn name(self) -> &'static str;

    /// Human-readable label, e.g. `Confirm password`.
    fn label(self) -> &'static str;

    /// User-facing message for an error on this field.
    fn message(self, error: FieldError) -> String {
        match error {
            FieldError::Required => format!("{} is required", self.label()),
            FieldError::InvalidFormat => {
                format!("Please enter a valid {}", self.label().to_lowercase())
            }
            FieldError::TooShort { min } => {
                format!("{} must be at least {min} characters", self.label())
            }
            FieldError::Mismatch => "Passwords do not match".to_string(),
        }
    }
}

/// Field → error map, ordered by field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: FormField> {
    errors: BTreeMap<F, FieldError>,
}

impl<F: FormField> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, replacing any previous one for the field.
    pub fn insert(&mut self, field: F, error: FieldError) {
        self.errors.insert(field, error);
    }

    /// Forget the error for a field. Returns it if there was one.
    pub fn clear(&mut self, field: F) -> Option<FieldError> {
        self.errors.remove(&field)
    }

    #[must_use]
    pub fn get(&self, field: F) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The error on the earliest declared field.
    #[must_use]
    pub fn first(&self) -> Option<(F, FieldError)> {
        self.errors.iter().next().map(|(f, e)| (*f, *e))
    }

    /// User-facing message for a field, if it has an error.
    #[must_use]
    pub fn message(&self, field: F) -> Option<String> {
        self.get(field).map(|error| field.message(error))
    }

    /// Errors in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (F, FieldError)> + '_ {
        self.errors.iter().map(|(f, e)| (*f, *e))
    }
}

// =============================================================================
// Login
// =============================================================================

/// Inputs of the login form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }
}

/// Raw login form values.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Validate the login form.
#[must_use]
pub fn validate_login(form: &LoginForm) -> FieldErrors<LoginField> {
    let mut errors = FieldErrors::new();

    if let Some(error) = check_email(&form.email) {
        errors.insert(LoginField::Email, error);
    }
    if form.password.is_empty() {
        errors.insert(LoginField::Password, FieldError::Required);
    }

    errors
}

// =============================================================================
// Registration
// =============================================================================

/// Inputs of the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    DateOfBirth,
    Address,
}

impl RegisterField {
    pub const ALL: [Self; 8] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Password,
        Self::ConfirmPassword,
        Self::DateOfBirth,
        Self::Address,
    ];
}

impl FormField for RegisterField {
    fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::DateOfBirth => "dateOfBirth",
            Self::Address => "address",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone number",
            Self::Password => "Password",
            Self::ConfirmPassword => "Confirm password",
            Self::DateOfBirth => "Date of birth",
            Self::Address => "Address",
        }
    }
}

/// Raw registration form values.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub address: String,
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .field("date_of_birth", &self.date_of_birth)
            .field("address", &self.address)
            .finish()
    }
}

/// Validate the registration form.
///
/// `confirmPassword` is compared last and independently of whether the
/// password itself passed.
#[must_use]
pub fn validate_registration(form: &RegisterForm) -> FieldErrors<RegisterField> {
    let mut errors = FieldErrors::new();

    for (field, value) in [
        (RegisterField::FirstName, &form.first_name),
        (RegisterField::LastName, &form.last_name),
        (RegisterField::Phone, &form.phone),
    ] {
        if value.trim().is_empty() {
            errors.insert(field, FieldError::Required);
        }
    }

    if let Some(error) = check_email(&form.email) {
        errors.insert(RegisterField::Email, error);
    }

    if form.password.is_empty() {
        errors.insert(RegisterField::Password, FieldError::Required);
    } else if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(
            RegisterField::Password,
            FieldError::TooShort {
                min: MIN_PASSWORD_LENGTH,
            },
        );
    }

    if form.confirm_password != form.password {
        errors.insert(RegisterField::ConfirmPassword, FieldError::Mismatch);
    }

    errors
}

/// Shared email rule: required after trimming, then `local@domain.tld` of at
/// most [`Email::MAX_LENGTH`] bytes.
fn check_email(raw: &str) -> Option<FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(FieldError::Required);
    }
    Email::parse(trimmed).err().map(|_| FieldError::InvalidFormat)
}
