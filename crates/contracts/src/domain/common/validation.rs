use thiserror::Error;

/// Form validation error. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("El campo «{0}» es obligatorio")]
    Required(&'static str),

    #[error("El campo «{0}» no puede ser negativo")]
    Negative(&'static str),

    #[error("El campo «{0}» debe ser mayor que cero")]
    NotPositive(&'static str),

    #[error("El campo «{field}» no es válido: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

pub fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_rejected() {
        assert_eq!(
            require_non_blank("nombre", "   "),
            Err(ValidationError::Required("nombre"))
        );
        assert!(require_non_blank("nombre", "Urea").is_ok());
    }

    #[test]
    fn test_numeric_rules() {
        assert!(require_non_negative("precio", 0.0).is_ok());
        assert!(require_non_negative("precio", -0.5).is_err());
        assert!(require_non_negative("precio", f64::NAN).is_err());
        assert!(require_positive("cantidad", 0.0).is_err());
        assert!(require_positive("cantidad", 2.5).is_ok());
    }

    #[test]
    fn test_messages_are_user_facing() {
        assert_eq!(
            ValidationError::Required("factura").to_string(),
            "El campo «factura» es obligatorio"
        );
    }
}
