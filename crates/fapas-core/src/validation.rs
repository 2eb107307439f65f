//! # Validation Module
//!
//! Input validation for cart operations.
//!
//! ## Where Input Comes From
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Product detail screen                                        │
//! │  └── Quantity text box accepts digits only                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── parse_quantity_input("3")  → 3                                    │
//! │  ├── validate_quantity(3)       → 1..=max                              │
//! │  └── validate_product(&product) → title present                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart transitions (limits, uniqueness by id)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fapas_core::validation::{parse_quantity_input, validate_quantity};
//!
//! assert_eq!(parse_quantity_input("5", 999).unwrap(), 5);
//! assert!(parse_quantity_input("five", 999).is_err());
//! assert!(validate_quantity(0, 999).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::ProductDescriptor;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product title accepted into the cart.
pub const MAX_TITLE_LEN: usize = 200;

// =============================================================================
// Quantity
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `max`
///
/// Returns the quantity as `u32` so callers never handle a signed value again.
pub fn validate_quantity(qty: i64, max: u32) -> ValidationResult<u32> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > i64::from(max) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::from(max),
        });
    }

    // In range 1..=max, so it fits
    Ok(qty as u32)
}

/// Parses the quantity typed by the shopper.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Must be digits only (`^\d+$`): no sign, no decimal point
/// - Then the same rules as [`validate_quantity`]
///
/// ## User Workflow
/// ```text
/// Quantity box: "2"  ──► parse_quantity_input ──► Ok(2)  ──► add to cart
/// Quantity box: ""   ──► Err(Required)         ──► nothing happens
/// Quantity box: "2a" ──► Err(InvalidFormat)    ──► nothing happens
/// ```
pub fn parse_quantity_input(raw: &str, max: u32) -> ValidationResult<u32> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    // Digits only, so the only parse failure left is overflow
    let qty: i64 = raw.parse().map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: i64::from(max),
    })?;

    validate_quantity(qty, max)
}

// =============================================================================
// Product
// =============================================================================

/// Validates a product descriptor before it becomes a cart line.
///
/// ## Rules
/// - Title must not be blank
/// - Title must be at most [`MAX_TITLE_LEN`] characters
///
/// Price is NOT checked here: a product with an unusable price may sit in
/// the cart, it just cannot be checked out.
pub fn validate_product(product: &ProductDescriptor) -> ValidationResult<()> {
    let title = product.title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    if let crate::types::ProductId::Text(id) = &product.id {
        if id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1, 999), Ok(1));
        assert_eq!(validate_quantity(999, 999), Ok(999));
        assert!(matches!(
            validate_quantity(0, 999),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity(-3, 999).is_err());
        assert!(matches!(
            validate_quantity(1000, 999),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_parse_quantity_input() {
        assert_eq!(parse_quantity_input("3", 999), Ok(3));
        assert_eq!(parse_quantity_input(" 12 ", 999), Ok(12));
        assert!(matches!(
            parse_quantity_input("", 999),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_quantity_input("abc", 999),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_quantity_input("-1", 999).is_err());
        assert!(parse_quantity_input("1.5", 999).is_err());
        assert!(parse_quantity_input("0", 999).is_err());
        assert!(parse_quantity_input("99999999999999999999999", 999).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&ProductDescriptor::new(1, "Mens Casual Shirt", 22.3, "x")).is_ok());
        assert!(validate_product(&ProductDescriptor::new(1, "   ", 22.3, "x")).is_err());
        assert!(validate_product(&ProductDescriptor::new("", "Shirt", 22.3, "x")).is_err());
        assert!(validate_product(&ProductDescriptor::new(1, "A".repeat(201), 1.0, "x")).is_err());
    }

    #[test]
    fn test_unpriced_product_is_still_valid() {
        let mut product = ProductDescriptor::new(1, "Mystery box", 0.0, "x");
        product.price = crate::types::Price::Raw(serde_json::Value::String("TBD".into()));
        assert!(validate_product(&product).is_ok());
    }
}
