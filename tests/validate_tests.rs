use veraclaim::util::validate::{
    PasswordRuleError, SignupInput, SignupRuleError, validate_password_change,
    validate_password_set_admin, validate_signup,
};

#[test]
fn test_change_requires_all_fields() {
    assert_eq!(
        validate_password_change("", "newpassword", "newpassword"),
        Err(PasswordRuleError::MissingFields)
    );
    assert_eq!(
        validate_password_change("oldpassword", "", "newpassword"),
        Err(PasswordRuleError::MissingFields)
    );
    assert_eq!(
        validate_password_change("oldpassword", "newpassword", ""),
        Err(PasswordRuleError::MissingFields)
    );
}

#[test]
fn test_change_rejects_short_password() {
    assert_eq!(
        validate_password_change("oldpassword", "short", "short"),
        Err(PasswordRuleError::TooShort)
    );
}

#[test]
fn test_change_rejects_same_password() {
    assert_eq!(
        validate_password_change("samepassword", "samepassword", "samepassword"),
        Err(PasswordRuleError::SameAsCurrent)
    );
}

#[test]
fn test_change_rejects_mismatch() {
    assert_eq!(
        validate_password_change("oldpassword", "newpassword", "newpasswork"),
        Err(PasswordRuleError::Mismatch)
    );
}

#[test]
fn test_change_accepts_valid_input() {
    assert_eq!(
        validate_password_change("oldpassword", "newpassword", "newpassword"),
        Ok(())
    );
}

#[test]
fn test_length_counts_characters_not_bytes() {
    // 7 characters, 21 bytes
    let seven = "비밀번호입니다";
    assert_eq!(
        validate_password_set_admin(seven, seven),
        Err(PasswordRuleError::TooShort)
    );
    let eight = "비밀번호입니다!";
    assert_eq!(validate_password_set_admin(eight, eight), Ok(()));
}

#[test]
fn test_set_admin_rules() {
    assert_eq!(
        validate_password_set_admin("", "temporary1"),
        Err(PasswordRuleError::MissingFields)
    );
    assert_eq!(
        validate_password_set_admin("temp", "temp"),
        Err(PasswordRuleError::TooShort)
    );
    assert_eq!(
        validate_password_set_admin("temporary1", "temporary2"),
        Err(PasswordRuleError::Mismatch)
    );
    assert_eq!(validate_password_set_admin("temporary1", "temporary1"), Ok(()));
}

#[test]
fn test_error_messages_are_readable() {
    assert_eq!(
        PasswordRuleError::TooShort.to_string(),
        "New password must be at least 8 characters"
    );
}

// --- Signup ---

fn signup<'a>(username: &'a str, password: &'a str, confirm: &'a str) -> SignupInput<'a> {
    SignupInput {
        username,
        email: "new@example.com",
        password,
        confirm,
        company: Some(1),
        department: Some(4),
    }
}

#[test]
fn test_signup_rules_in_order() {
    assert_eq!(
        validate_signup(&signup("", "longenough1", "longenough1")),
        Err(SignupRuleError::MissingFields)
    );
    assert_eq!(
        validate_signup(&signup("new user", "longenough1", "longenough1")),
        Err(SignupRuleError::InvalidUsername)
    );
    assert_eq!(
        validate_signup(&signup("new_user", "short", "short")),
        Err(SignupRuleError::TooShort)
    );
    assert_eq!(
        validate_signup(&signup("new_user", "longenough1", "longenough2")),
        Err(SignupRuleError::Mismatch)
    );
    assert_eq!(validate_signup(&signup("New_User9", "longenough1", "longenough1")), Ok(()));
}

#[test]
fn test_signup_needs_department() {
    let input = SignupInput {
        department: None,
        ..signup("new_user", "longenough1", "longenough1")
    };
    assert_eq!(validate_signup(&input), Err(SignupRuleError::NoDepartment));
}
