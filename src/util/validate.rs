use thiserror::Error;

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordRuleError {
    #[error("All password fields are required")]
    MissingFields,
    #[error("New password must be at least 8 characters")]
    TooShort,
    #[error("New password is the same as the current one")]
    SameAsCurrent,
    #[error("New password and confirmation do not match")]
    Mismatch,
}

/// Rules for a user changing their own password.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), PasswordRuleError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(PasswordRuleError::MissingFields);
    }
    if new.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PasswordRuleError::TooShort);
    }
    if new == current {
        return Err(PasswordRuleError::SameAsCurrent);
    }
    if new != confirm {
        return Err(PasswordRuleError::Mismatch);
    }
    Ok(())
}

/// Rules for an admin setting someone's password; no current password.
pub fn validate_password_set_admin(new: &str, confirm: &str) -> Result<(), PasswordRuleError> {
    if new.is_empty() || confirm.is_empty() {
        return Err(PasswordRuleError::MissingFields);
    }
    if new.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PasswordRuleError::TooShort);
    }
    if new != confirm {
        return Err(PasswordRuleError::Mismatch);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupRuleError {
    #[error("Username, email and password are required")]
    MissingFields,
    #[error("Username may only use letters, digits and underscores")]
    InvalidUsername,
    #[error("Password must be at least 8 characters")]
    TooShort,
    #[error("Password and confirmation do not match")]
    Mismatch,
    #[error("Choose a company and a department")]
    NoDepartment,
}

/// Fields of the signup form as entered.
#[derive(Debug, Clone, Copy)]
pub struct SignupInput<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm: &'a str,
    pub company: Option<u64>,
    pub department: Option<u64>,
}

pub fn validate_signup(input: &SignupInput<'_>) -> Result<(), SignupRuleError> {
    if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
        return Err(SignupRuleError::MissingFields);
    }
    if !input
        .username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(SignupRuleError::InvalidUsername);
    }
    if input.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(SignupRuleError::TooShort);
    }
    if input.password != input.confirm {
        return Err(SignupRuleError::Mismatch);
    }
    if input.company.is_none() || input.department.is_none() {
        return Err(SignupRuleError::NoDepartment);
    }
    Ok(())
}
