// Validation for rating writes. Runs before anything touches the store.

use crate::db::models::{MAX_RATING, MIN_RATING};

use super::error::ValidationError;

/// Check a rating update. Out-of-range ratings are rejected, never clamped.
///
/// NaN and infinities count as non-numeric.
pub fn validate_rating(item_id: &str, rating: f64) -> Result<(), ValidationError> {
    if item_id.is_empty() {
        return Err(ValidationError::MissingItemId);
    }
    if !rating.is_finite() {
        return Err(ValidationError::NonNumericRating);
    }
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    Ok(())
}

/// Validate loosely-typed input (a JSON body, a seed file) into an update.
///
/// `rating` must be a JSON number; strings, booleans, and null are rejected.
pub fn parse_rating_input(
    item_id: Option<&str>,
    rating: Option<&serde_json::Value>,
) -> Result<(String, f64), ValidationError> {
    let item_id = item_id
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingItemId)?;
    let rating = rating
        .and_then(serde_json::Value::as_f64)
        .ok_or(ValidationError::NonNumericRating)?;
    validate_rating(item_id, rating)?;
    Ok((item_id.to_string(), rating))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(validate_rating("b1", 0.0).is_ok());
        assert!(validate_rating("b1", 5.0).is_ok());
        assert!(validate_rating("b1", 4.5).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            validate_rating("b1", 6.0),
            Err(ValidationError::RatingOutOfRange(6.0))
        );
        assert_eq!(
            validate_rating("b1", -0.5),
            Err(ValidationError::RatingOutOfRange(-0.5))
        );
    }

    #[test]
    fn test_empty_item_id() {
        assert_eq!(validate_rating("", 3.0), Err(ValidationError::MissingItemId));
        assert_eq!(
            parse_rating_input(Some(""), Some(&json!(3))),
            Err(ValidationError::MissingItemId)
        );
    }

    #[test]
    fn test_whitespace_item_id_is_accepted() {
        assert!(validate_rating("  ", 3.0).is_ok());
        assert_eq!(
            parse_rating_input(Some(" "), Some(&json!(3))),
            Ok((" ".to_string(), 3.0))
        );
    }

    #[test]
    fn test_nan_is_non_numeric() {
        assert_eq!(
            validate_rating("b1", f64::NAN),
            Err(ValidationError::NonNumericRating)
        );
    }

    #[test]
    fn test_parse_rejects_non_number_json() {
        assert_eq!(
            parse_rating_input(Some("b1"), Some(&json!("4"))),
            Err(ValidationError::NonNumericRating)
        );
        assert_eq!(
            parse_rating_input(Some("b1"), Some(&json!(true))),
            Err(ValidationError::NonNumericRating)
        );
        assert_eq!(
            parse_rating_input(Some("b1"), None),
            Err(ValidationError::NonNumericRating)
        );
        assert_eq!(
            parse_rating_input(None, Some(&json!(3))),
            Err(ValidationError::MissingItemId)
        );
    }

    #[test]
    fn test_parse_accepts_integer_and_float() {
        assert_eq!(
            parse_rating_input(Some("b1"), Some(&json!(4))),
            Ok(("b1".to_string(), 4.0))
        );
        assert_eq!(
            parse_rating_input(Some("b1"), Some(&json!(4.5))),
            Ok(("b1".to_string(), 4.5))
        );
    }
}
