// Record services over the base tables
pub mod catalog;
pub mod customers;
pub mod orders;

// Procedural routines
pub mod payments;
pub mod pricing;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

pub use catalog::CatalogService;
pub use customers::CustomerService;
pub use orders::OrderService;
pub use payments::{PaymentOutcome, PaymentService};
pub use pricing::PricingService;

lazy_static! {
    /// Phone numbers are stored as exactly ten digits
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles");
}

fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("Amount must be greater than 0".into());
        Err(err)
    }
}

fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("Percentage must be between 0 and 100".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn phone_pattern_requires_ten_digits() {
        assert!(PHONE_REGEX.is_match("5551234567"));
        assert!(!PHONE_REGEX.is_match("555-123-4567"));
        assert!(!PHONE_REGEX.is_match("555123456"));
        assert!(!PHONE_REGEX.is_match("55512345678"));
    }

    #[test]
    fn decimal_validators() {
        assert!(validate_positive_decimal(&dec!(0.01)).is_ok());
        assert!(validate_positive_decimal(&dec!(0)).is_err());
        assert!(validate_percentage(&dec!(0)).is_ok());
        assert!(validate_percentage(&dec!(100)).is_ok());
        assert!(validate_percentage(&dec!(100.01)).is_err());
        assert!(validate_percentage(&dec!(-1)).is_err());
    }
}
