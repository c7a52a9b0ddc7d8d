//! Result type alias for deid

use super::errors::DeidError;

/// Result type alias for deid operations
///
/// # Examples
///
/// ```
/// use deid::domain::result::Result;
/// use deid::domain::errors::DeidError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DeidError::Configuration("min_word_length must be at least 1".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DeidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(DeidError::Cancelled);
        assert!(result.is_err());
    }
}
