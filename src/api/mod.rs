//! REST API module.
//!
//! Contains all API routes and handlers following the website's JSON contract.

mod init;
mod members;
mod news;

pub use init::*;
pub use members::*;
pub use news::*;

use crate::errors::AppError;

/// Apply the read-path resilience policy.
///
/// With `fail_open` set, a failed read is logged and replaced by `T::default()`
/// so the page still renders; otherwise the error reaches the caller.
pub fn read_or_fallback<T: Default>(
    result: Result<T, AppError>,
    fail_open: bool,
    what: &str,
) -> Result<T, AppError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if fail_open => {
            tracing::warn!("Read of {} failed, serving empty fallback: {}", what, e);
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_or_fallback_fail_open() {
        let result: Result<Vec<i32>, _> = Err(AppError::Persistence("down".to_string()));
        assert_eq!(read_or_fallback(result, true, "members").unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_read_or_fallback_fail_closed() {
        let result: Result<i64, _> = Err(AppError::Persistence("down".to_string()));
        assert!(read_or_fallback(result, false, "count").is_err());
        assert_eq!(read_or_fallback(Ok(3i64), false, "count").unwrap(), 3);
    }
}
