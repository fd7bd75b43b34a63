//! Request validation for the teacher endpoints.
//!
//! Two stages run before the service is called: shape checks on the DTO
//! fields ([`FieldRules`]) and the business validators. Both record into a
//! shared [`ValidationErrors`] instead of failing fast.

use std::fmt;

use crate::api::rest::dto::{TeacherInsertDto, TeacherUpdateDto};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field_error(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// Field-level constraints on names.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub max_name_length: usize,
}

impl FieldRules {
    pub fn new(max_name_length: usize) -> Self {
        Self { max_name_length }
    }

    fn check_name(&self, field: &'static str, value: &str, errors: &mut ValidationErrors) {
        let value = value.trim();
        if value.is_empty() {
            errors.reject(field, "must not be blank");
            return;
        }
        let len = value.chars().count();
        if len > self.max_name_length {
            errors.reject(
                field,
                format!("too long: {} characters (max: {})", len, self.max_name_length),
            );
        }
    }

    pub fn check_insert(&self, dto: &TeacherInsertDto, errors: &mut ValidationErrors) {
        self.check_name("firstname", &dto.firstname, errors);
        self.check_name("lastname", &dto.lastname, errors);
    }

    pub fn check_update(&self, dto: &TeacherUpdateDto, errors: &mut ValidationErrors) {
        if dto.id <= 0 {
            errors.reject("id", "must be positive");
        }
        self.check_name("firstname", &dto.firstname, errors);
        self.check_name("lastname", &dto.lastname, errors);
    }
}

/// Business validator for a request DTO. Records problems into `errors`.
pub trait Validator<T>: Send + Sync {
    fn validate(&self, target: &T, errors: &mut ValidationErrors);
}

/// Letters plus inner spaces, hyphens and apostrophes; must start with a letter.
fn check_name_charset(field: &'static str, value: &str, errors: &mut ValidationErrors) {
    let value = value.trim();
    let Some(first) = value.chars().next() else {
        // blank is reported by the field rules
        return;
    };
    if !first.is_alphabetic() {
        errors.reject(field, "must start with a letter");
        return;
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_alphabetic() || matches!(c, ' ' | '-' | '\'')))
    {
        errors.reject(field, format!("contains invalid character '{bad}'"));
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherInsertValidator;

impl Validator<TeacherInsertDto> for TeacherInsertValidator {
    fn validate(&self, target: &TeacherInsertDto, errors: &mut ValidationErrors) {
        check_name_charset("firstname", &target.firstname, errors);
        check_name_charset("lastname", &target.lastname, errors);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherUpdateValidator;

impl Validator<TeacherUpdateDto> for TeacherUpdateValidator {
    fn validate(&self, target: &TeacherUpdateDto, errors: &mut ValidationErrors) {
        check_name_charset("firstname", &target.firstname, errors);
        check_name_charset("lastname", &target.lastname, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(firstname: &str, lastname: &str) -> TeacherInsertDto {
        TeacherInsertDto {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
        }
    }

    fn run_insert(dto: &TeacherInsertDto) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        FieldRules::new(10).check_insert(dto, &mut errors);
        TeacherInsertValidator.validate(dto, &mut errors);
        errors
    }

    #[test]
    fn accepts_plain_names() {
        assert!(!run_insert(&insert("A", "B")).has_errors());
        assert!(!run_insert(&insert("Jean-Luc", "O'Neil")).has_errors());
        assert!(!run_insert(&insert("  Ana ", "Ruiz")).has_errors());
        assert!(!run_insert(&insert("Zoë", "Ødegård")).has_errors());
    }

    #[test]
    fn blank_names_are_reported_once() {
        let errors = run_insert(&insert("   ", ""));
        assert_eq!(errors.errors().len(), 2);
        assert!(errors.has_field_error("firstname"));
        assert!(errors.has_field_error("lastname"));
        assert!(errors.errors().iter().all(|e| e.message == "must not be blank"));
    }

    #[test]
    fn length_counts_characters_after_trim() {
        assert!(!run_insert(&insert("  Abcdefghij  ", "B")).has_errors());

        let errors = run_insert(&insert("Abcdefghijk", "B"));
        assert_eq!(
            errors.errors(),
            &[FieldError {
                field: "firstname",
                message: "too long: 11 characters (max: 10)".to_string(),
            }]
        );
    }

    #[test]
    fn business_rules_reject_digits_and_symbols() {
        let errors = run_insert(&insert("R2D2", "-Smith"));
        assert!(errors.has_field_error("firstname"));
        assert!(errors.has_field_error("lastname"));
        assert_eq!(
            errors.to_string(),
            "firstname: contains invalid character '2'; lastname: must start with a letter"
        );
    }

    #[test]
    fn update_requires_positive_id() {
        let dto = TeacherUpdateDto {
            id: 0,
            firstname: "Ann".into(),
            lastname: "Lee".into(),
        };
        let mut errors = ValidationErrors::new();
        FieldRules::new(50).check_update(&dto, &mut errors);
        TeacherUpdateValidator.validate(&dto, &mut errors);
        assert_eq!(errors.errors().len(), 1);
        assert!(errors.has_field_error("id"));
    }
}
