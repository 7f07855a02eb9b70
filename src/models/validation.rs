use rust_decimal::Decimal;
use std::str::FromStr;

use super::{ValidationError, ValidationResult};

/// Validation constants
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;
pub const MAX_PRODUCT_ID_LENGTH: usize = 64;
pub const MAX_PRICE: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2); // 9999999.99

/// Messages shown next to a form field
pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NOT_A_NUMBER_MESSAGE: &str = "Enter a number.";
pub const NON_POSITIVE_PRICE_MESSAGE: &str = "Price must be greater than 0.";

/// Validate product display name
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "name".to_string(),
        });
    }

    let length = trimmed.chars().count();
    if length > MAX_PRODUCT_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max_length: MAX_PRODUCT_NAME_LENGTH,
            actual_length: length,
        });
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: name.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate a product price: strictly positive and below the ceiling
pub fn validate_product_price(price: &Decimal) -> ValidationResult<()> {
    if *price <= Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field: "price".to_string(),
            value: price.to_string(),
            reason: NON_POSITIVE_PRICE_MESSAGE.to_string(),
        });
    }

    if *price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: "0".to_string(),
            max: MAX_PRICE.to_string(),
            value: price.to_string(),
        });
    }

    Ok(())
}

/// Parse a submitted price field and validate it
pub fn parse_product_price(raw: &str) -> ValidationResult<Decimal> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "price".to_string(),
        });
    }

    let price = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::InvalidFormat {
            field: "price".to_string(),
            expected: "a decimal number".to_string(),
        })?;

    validate_product_price(&price)?;
    Ok(price)
}

/// Validate product identifier format
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    if product_id.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "product_id".to_string(),
        });
    }

    if product_id.len() > MAX_PRODUCT_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "product_id".to_string(),
            max_length: MAX_PRODUCT_ID_LENGTH,
            actual_length: product_id.len(),
        });
    }

    if !product_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product_id".to_string(),
            expected: "Product ID must contain only ASCII letters, digits, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Human-readable message for a form field error
pub fn form_message(error: &ValidationError) -> String {
    match error {
        ValidationError::RequiredField { .. } => REQUIRED_MESSAGE.to_string(),
        ValidationError::InvalidFormat { field, .. } if field == "price" => {
            NOT_A_NUMBER_MESSAGE.to_string()
        }
        ValidationError::InvalidFormat { expected, .. } => expected.clone(),
        ValidationError::InvalidValue { reason, .. } => reason.clone(),
        ValidationError::TooLong { max_length, .. } => format!(
            "Ensure this value has at most {} characters.",
            max_length
        ),
        ValidationError::OutOfRange { max, .. } => {
            format!("Ensure this value is less than or equal to {}.", max)
        }
    }
}
