//! # Error Types
//!
//! Domain-specific error types for fapas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fapas-core errors (this file)                                         │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fapas-db errors (separate crate)                                      │
//! │  └── DbError          - Store failures                                 │
//! │                                                                         │
//! │  fapas-cart errors                                                     │
//! │  └── CartError        - What the caller sees                           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CartError ← DbError               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Which Errors Reach the User
//! `InvalidInput` and `NotFound` on quantity operations are logged and
//! swallowed by the controller. `NotPriceable` (and `NotFound` during a
//! checkout) are always returned to the caller.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected before touching the cart (bad quantity, malformed product).
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Operation referenced a product id that is not in the cart.
    #[error("Product {id} not in cart")]
    NotFound { id: ProductId },

    /// Checkout attempted on a line whose price is not a usable number.
    ///
    /// ## When This Occurs
    /// - Stored price is a string, null, or missing
    /// - Stored price is negative or not finite
    ///
    /// Checking out such a line would charge 0, so it is refused instead.
    #[error("Cannot determine the price of {title} ({id})")]
    NotPriceable { id: ProductId, title: String },

    /// Line quantity would exceed the configured maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u64, max: u32 },

    /// Cart already holds the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },
}

impl CoreError {
    /// Returns true for errors that count as invalid input.
    ///
    /// Limit violations are input problems too: the requested quantity
    /// was simply not acceptable.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidInput(_)
                | CoreError::QuantityTooLarge { .. }
                | CoreError::CartTooLarge { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., letters typed into the quantity box).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
