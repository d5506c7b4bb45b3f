// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Validador compartilhado para campos monetários: preço unitário e total
// do pedido devem ser estritamente positivos.
pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative_values() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::from(-10)).is_err());
    }

    #[test]
    fn accepts_positive_values() {
        assert!(validate_positive(&Decimal::new(1, 2)).is_ok()); // 0.01
        assert!(validate_positive(&Decimal::from(500)).is_ok());
    }
}
