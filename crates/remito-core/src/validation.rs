//! # Validation Module
//!
//! Operator input parsing and validation for Remito.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Operator surface                                             │
//! │  └── Collects raw text: "2", "Hammer", "500"                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Text → number parsing (no floats)                                 │
//! │  └── Business rules (positive quantity, non-negative price)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use remito_core::validation::{parse_price, parse_quantity};
//! use remito_core::Money;
//!
//! assert_eq!(parse_quantity("5").unwrap(), 5);
//! assert_eq!(parse_price("12.5", '.').unwrap(), Money::from_cents(1250));
//! assert!(parse_price("abc", '.').is_err());
//! ```

use crate::error::ValidationError;
use crate::money::{Money, CENTS_PER_UNIT};
use crate::MAX_PRODUCT_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Most fraction digits a price may carry.
const MAX_PRICE_DECIMALS: usize = 2;

// =============================================================================
// Text Parsers
// =============================================================================

/// Parses the quantity field.
///
/// ## Rules
/// - Must be an integer
/// - Must be positive (> 0)
pub fn parse_quantity(text: &str) -> ValidationResult<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required("quantity"));
    }

    let qty = trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::not_a_number("quantity", trimmed))?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Parses the unit price field into cents.
///
/// ## Accepted Forms
/// ```text
/// "500"     → 50000 cents
/// "500.5"   → 50050 cents
/// "1500.25" → 150025 cents
/// ".75"     → 75 cents
/// ```
///
/// Rejected: blank text, signs other than a leading `-` (reported as
/// negative), more than two decimals, a trailing separator, thousands
/// separators, anything non-numeric.
pub fn parse_price(text: &str, decimal_separator: char) -> ValidationResult<Money> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required("price"));
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (int_part, frac_part) = match unsigned.split_once(decimal_separator) {
        Some((int_part, frac_part)) if !frac_part.is_empty() => (int_part, frac_part),
        Some(_) => return Err(ValidationError::not_a_number("price", trimmed)),
        None => (unsigned, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part)
        || !all_digits(frac_part)
        || frac_part.len() > MAX_PRICE_DECIMALS
        || (int_part.is_empty() && frac_part.is_empty())
    {
        return Err(ValidationError::not_a_number("price", trimmed));
    }

    if negative {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    let overflow = || ValidationError::Overflow {
        field: "price".to_string(),
    };

    let major = if int_part.is_empty() {
        0
    } else {
        int_part.parse::<i64>().map_err(|_| overflow())?
    };

    // "5" means 50 cents, "05" means 5 cents
    let minor = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().map_err(|_| overflow())? * 10,
        _ => frac_part.parse::<i64>().map_err(|_| overflow())?,
    };

    let cents = major
        .checked_mul(CENTS_PER_UNIT)
        .and_then(|c| c.checked_add(minor))
        .ok_or_else(overflow)?;

    Ok(Money::from_cents(cents))
}

// =============================================================================
// Value Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a product description and returns it trimmed.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_PRODUCT_LEN`] characters
pub fn validate_product(product: &str) -> ValidationResult<String> {
    let product = product.trim();

    if product.is_empty() {
        return Err(ValidationError::required("product"));
    }

    if product.chars().count() > MAX_PRODUCT_LEN {
        return Err(ValidationError::TooLong {
            field: "product".to_string(),
            max: MAX_PRODUCT_LEN,
        });
    }

    Ok(product.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity(" 12 ").unwrap(), 12);

        assert!(matches!(
            parse_quantity(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_quantity("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_quantity("-3"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_quantity("2.5"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_quantity("two"),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("500", '.').unwrap(), Money::from_cents(50_000));
        assert_eq!(parse_price("500.5", '.').unwrap(), Money::from_cents(50_050));
        assert_eq!(parse_price("500.05", '.').unwrap(), Money::from_cents(50_005));
        assert_eq!(parse_price(".75", '.').unwrap(), Money::from_cents(75));
        assert_eq!(parse_price("0", '.').unwrap(), Money::zero());
        assert_eq!(parse_price("12,5", ',').unwrap(), Money::from_cents(1250));
    }

    #[test]
    fn test_parse_price_rejects() {
        for text in ["abc", "12.345", "1,500", "500.", ".", "1.2.3", "+5", "5 00"] {
            assert!(
                matches!(
                    parse_price(text, '.'),
                    Err(ValidationError::NotANumber { .. })
                ),
                "expected {:?} to be rejected",
                text
            );
        }

        assert!(matches!(
            parse_price("", '.'),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_price("-5", '.'),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            parse_price("99999999999999999999", '.'),
            Err(ValidationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_validate_product() {
        assert_eq!(validate_product(" Hammer ").unwrap(), "Hammer");
        assert!(validate_product("").is_err());
        assert!(validate_product("   ").is_err());
        assert!(validate_product(&"A".repeat(MAX_PRODUCT_LEN)).is_ok());
        assert!(matches!(
            validate_product(&"A".repeat(MAX_PRODUCT_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price(Money::from_cents(1099)).is_ok());
        assert!(validate_unit_price(Money::from_cents(-100)).is_err());
    }
}
