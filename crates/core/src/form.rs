//! Editable form state.
//!
//! A [`FormState`] owns a form's values and the errors from its last
//! validation. Edits arrive as [`FieldChange`]s, independent of any UI event
//! type; applying one clears that field's error so the user is not nagged
//! while correcting it. Errors come back only when [`FormState::validate`]
//! runs again at submit time.

use crate::validation::{
    FieldError, FieldErrors, FormField, LoginField, LoginForm, RegisterField, RegisterForm,
    validate_login, validate_registration,
};

/// A form whose fields can be read, written and validated by name.
pub trait Form: Clone + Default {
    type Field: FormField;

    /// Current value of a field.
    fn value(&self, field: Self::Field) -> &str;

    /// Replace the value of a field.
    fn set_value(&mut self, field: Self::Field, value: String);

    /// Run the pure validator over the current values.
    fn validate(&self) -> FieldErrors<Self::Field>;
}

/// "Field `field` now holds `value`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange<F> {
    pub field: F,
    pub value: String,
}

impl<F> FieldChange<F> {
    pub fn new(field: F, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Values plus last-known errors for one form instance.
#[derive(Debug, Clone)]
pub struct FormState<T: Form> {
    values: T,
    errors: FieldErrors<T::Field>,
}

impl<T: Form + Default> Default for FormState<T> {
    fn default() -> Self {
        Self {
            values: T::default(),
            errors: FieldErrors::default(),
        }
    }
}

impl<T: Form> FormState<T> {
    /// Start from the given values with no errors shown.
    #[must_use]
    pub fn new(values: T) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    #[must_use]
    pub const fn values(&self) -> &T {
        &self.values
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors<T::Field> {
        &self.errors
    }

    /// Apply an edit and clear that field's error.
    pub fn apply(&mut self, change: FieldChange<T::Field>) {
        self.errors.clear(change.field);
        self.values.set_value(change.field, change.value);
    }

    /// Re-validate, replacing the stored errors. Returns `true` when valid.
    pub fn validate(&mut self) -> bool {
        self.errors = self.values.validate();
        self.errors.is_empty()
    }

    /// Record an error found after validation passed, so it shows under the
    /// field like any other.
    pub fn reject(&mut self, field: T::Field, error: FieldError) {
        self.errors.insert(field, error);
    }
}

impl Form for LoginForm {
    type Field = LoginField;

    fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        }
    }

    fn set_value(&mut self, field: LoginField, value: String) {
        match field {
            LoginField::Email => self.email = value,
            LoginField::Password => self.password = value,
        }
    }

    fn validate(&self) -> FieldErrors<LoginField> {
        validate_login(self)
    }
}

impl Form for RegisterForm {
    type Field = RegisterField;

    fn value(&self, field: RegisterField) -> &str {
        match field {
            RegisterField::FirstName => &self.first_name,
            RegisterField::LastName => &self.last_name,
            RegisterField::Email => &self.email,
            RegisterField::Phone => &self.phone,
            RegisterField::Password => &self.password,
            RegisterField::ConfirmPassword => &self.confirm_password,
            RegisterField::DateOfBirth => &self.date_of_birth,
            RegisterField::Address => &self.address,
        }
    }

    fn set_value(&mut self, field: RegisterField, value: String) {
        let slot = match field {
            RegisterField::FirstName => &mut self.first_name,
            RegisterField::LastName => &mut self.last_name,
            RegisterField::Email => &mut self.email,
            RegisterField::Phone => &mut self.phone,
            RegisterField::Password => &mut self.password,
            RegisterField::ConfirmPassword => &mut self.confirm_password,
            RegisterField::DateOfBirth => &mut self.date_of_birth,
            RegisterField::Address => &mut self.address,
        };
        *slot = value;
    }

    fn validate(&self) -> FieldErrors<RegisterField> {
        validate_registration(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_clears_only_that_fields_error() {
        let mut state = FormState::new(LoginForm::default());
        assert!(!state.validate());
        assert_eq!(state.errors().len(), 2);

        state.apply(FieldChange::new(LoginField::Email, "bad"));
        assert_eq!(state.errors().get(LoginField::Email), None);
        assert_eq!(
            state.errors().get(LoginField::Password),
            Some(FieldError::Required)
        );
    }

    #[test]
    fn test_errors_return_on_next_validate() {
        let mut state = FormState::new(LoginForm::default());
        state.validate();
        state.apply(FieldChange::new(LoginField::Email, "bad"));
        state.validate();
        assert_eq!(
            state.errors().get(LoginField::Email),
            Some(FieldError::InvalidFormat)
        );
    }

    #[test]
    fn test_register_set_and_get_every_field() {
        let mut form = RegisterForm::default();
        for field in RegisterField::ALL {
            form.set_value(field, field.name().to_string());
        }
        for field in RegisterField::ALL {
            assert_eq!(form.value(field), field.name());
        }
    }

    #[test]
    fn test_validate_on_partial_input() {
        let mut state = FormState::new(RegisterForm::default());
        state.apply(FieldChange::new(RegisterField::FirstName, "An"));
        state.validate();
        assert_eq!(state.errors().get(RegisterField::FirstName), None);
        assert_eq!(
            state.errors().get(RegisterField::LastName),
            Some(FieldError::Required)
        );
    }

    #[test]
    fn test_reject_shows_until_edited() {
        let mut state = FormState::new(RegisterForm::default());
        state.reject(RegisterField::Email, FieldError::InvalidFormat);
        assert_eq!(
            state.errors().first(),
            Some((RegisterField::Email, FieldError::InvalidFormat))
        );

        state.apply(FieldChange::new(RegisterField::Email, "an@example.com"));
        assert!(state.errors().is_empty());
    }
}
