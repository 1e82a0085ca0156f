//! Field-level rules shared by the entity validators.

use crate::errors::ModelError;

/// Length in characters (not bytes) must fall in `min..=max`.
pub fn length_between(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), ModelError> {
    let n = value.chars().count();
    if n < min || n > max {
        return Err(ModelError::invalid(field, format!("must be between {min} and {max} characters")));
    }
    Ok(())
}

pub fn min_length(field: &'static str, value: &str, min: usize) -> Result<(), ModelError> {
    if value.chars().count() < min {
        return Err(ModelError::invalid(field, format!("must be at least {min} characters")));
    }
    Ok(())
}

/// National ids are exactly eight ASCII digits.
pub fn national_id(field: &'static str, value: &str) -> Result<(), ModelError> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ModelError::invalid(field, "must contain exactly 8 digits"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_id_requires_eight_digits() {
        assert!(national_id("national_id", "12345678").is_ok());
        assert!(national_id("national_id", "1234567").is_err());
        assert!(national_id("national_id", "123456789").is_err());
        assert!(national_id("national_id", "1234567a").is_err());
        assert!(national_id("national_id", "").is_err());
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // "Ñú" is two chars, four bytes
        assert!(length_between("area", "Ñú", 2, 2).is_ok());
        assert!(length_between("area", "Ñ", 2, 100).is_err());
    }

    #[test]
    fn min_length_reports_field() {
        match min_length("justification", "short", 10) {
            Err(ModelError::Validation { field, .. }) => assert_eq!(field, "justification"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
