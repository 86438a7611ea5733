use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }

    Ok(())
}

/// Checks every `(field, value)` pair in order and reports the first missing one.
pub fn validate_all_required(fields: &[(&'static str, &str)]) -> ValidationResult {
    fields
        .iter()
        .try_for_each(|&(field, value)| validate_required(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_rejects_blank() {
        let err = validate_required("amount", "   ").unwrap_err();
        assert_eq!(err.field, "amount");
        assert_eq!(err.to_string(), "amount: is required");
    }

    #[test]
    fn test_validate_required_accepts_value() {
        assert!(validate_required("amount", "1.00").is_ok());
    }

    #[test]
    fn test_validate_all_required_reports_first_missing_field() {
        let err = validate_all_required(&[
            ("merchant_id", "M1"),
            ("order_number", ""),
            ("amount", ""),
        ])
        .unwrap_err();
        assert_eq!(err.field, "order_number");
    }
}
