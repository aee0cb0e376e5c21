//! Project validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during project validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectValidationError {
    #[error("Project title cannot be empty")]
    EmptyTitle,

    #[error("Project title cannot exceed {0} characters")]
    TitleTooLong(usize),

    #[error("Project description cannot exceed {0} characters")]
    DescriptionTooLong(usize),

    #[error("Academic year must look like '2024/2025' with consecutive years")]
    InvalidAcademicYear,
}

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 5000;

static ACADEMIC_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})/(\d{4})$").expect("academic year pattern is valid"));

/// Validate a project title
pub fn validate_project_title(title: &str) -> Result<(), ProjectValidationError> {
    if title.trim().is_empty() {
        return Err(ProjectValidationError::EmptyTitle);
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ProjectValidationError::TitleTooLong(MAX_TITLE_LENGTH));
    }

    Ok(())
}

/// Validate a project description
pub fn validate_project_description(description: &str) -> Result<(), ProjectValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ProjectValidationError::DescriptionTooLong(
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}

/// Validate an academic year such as `2024/2025`
pub fn validate_academic_year(year: &str) -> Result<(), ProjectValidationError> {
    let captures = ACADEMIC_YEAR
        .captures(year)
        .ok_or(ProjectValidationError::InvalidAcademicYear)?;

    let start: u32 = captures[1]
        .parse()
        .map_err(|_| ProjectValidationError::InvalidAcademicYear)?;
    let end: u32 = captures[2]
        .parse()
        .map_err(|_| ProjectValidationError::InvalidAcademicYear)?;

    if end != start + 1 {
        return Err(ProjectValidationError::InvalidAcademicYear);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert!(validate_project_title("Smart Campus Parking").is_ok());
        assert_eq!(
            validate_project_title(""),
            Err(ProjectValidationError::EmptyTitle)
        );
        assert_eq!(
            validate_project_title(&"x".repeat(201)),
            Err(ProjectValidationError::TitleTooLong(200))
        );
    }

    #[test]
    fn test_academic_years() {
        assert!(validate_academic_year("2024/2025").is_ok());
        assert!(validate_academic_year("2024/2026").is_err());
        assert!(validate_academic_year("2024-2025").is_err());
        assert!(validate_academic_year("24/25").is_err());
        assert!(validate_academic_year("2024/2025 ").is_err());
    }

    #[test]
    fn test_description_length() {
        assert!(validate_project_description("short").is_ok());
        assert!(validate_project_description(&"d".repeat(5001)).is_err());
    }
}
