pub mod config;
pub mod domain;
pub mod error;
pub mod lookups;

#[cfg(test)]
mod tests {
    use super::error::AppError;

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("BACKEND_TEST", "backend failed")
            .with_details("status=500")
            .with_retryable(true);
        assert_eq!(err.code, "BACKEND_TEST");
        assert_eq!(err.message, "backend failed");
        assert_eq!(err.details.as_deref(), Some("status=500"));
        assert!(err.retryable);
        assert_eq!(err.to_string(), "[BACKEND_TEST] backend failed: status=500");
    }
}
