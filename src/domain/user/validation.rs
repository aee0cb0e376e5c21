//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("GitHub username is not valid")]
    InvalidGithubUsername,
}

const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_GITHUB_USERNAME_LENGTH: usize = 39;

/// Validate a display name
pub fn validate_user_name(name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address (shape only, no deliverability checks)
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::InvalidEmail);
    }

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(UserValidationError::InvalidEmail),
    }
}

/// Validate a GitHub login
///
/// GitHub logins are alphanumeric with single hyphens, up to 39 characters,
/// and cannot start or end with a hyphen.
pub fn validate_github_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() || username.len() > MAX_GITHUB_USERNAME_LENGTH {
        return Err(UserValidationError::InvalidGithubUsername);
    }

    if username.starts_with('-') || username.ends_with('-') || username.contains("--") {
        return Err(UserValidationError::InvalidGithubUsername);
    }

    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(UserValidationError::InvalidGithubUsername);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_user_name("Budi Santoso").is_ok());
        assert_eq!(validate_user_name("  "), Err(UserValidationError::EmptyName));
        assert_eq!(
            validate_user_name(&"a".repeat(101)),
            Err(UserValidationError::NameTooLong(100))
        );
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("budi@students.example.ac.id").is_ok());
        assert!(validate_email("budi@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("budi @example.com").is_err());
        assert!(validate_email("budi.example.com").is_err());
    }

    #[test]
    fn test_github_usernames() {
        assert!(validate_github_username("octocat").is_ok());
        assert!(validate_github_username("sari-dev-2").is_ok());
        assert!(validate_github_username("").is_err());
        assert!(validate_github_username("-sari").is_err());
        assert!(validate_github_username("sari--dev").is_err());
        assert!(validate_github_username("sari_dev").is_err());
        assert!(validate_github_username(&"a".repeat(40)).is_err());
    }
}
