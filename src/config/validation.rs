//! Configuration validation rules

use crate::error::AppError;

/// Validates the loaded configuration values.
pub fn validate_config(
    api_token: &str,
    requests_per_minute: u64,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    if api_token.trim().is_empty() {
        return Err(AppError::config_error(
            "API token is empty; set UPSET_API_TOKEN or add api_token to the config file",
        ));
    }

    if requests_per_minute == 0 {
        return Err(AppError::config_error(
            "requests_per_minute must be at least 1",
        ));
    }

    if let Some(path) = log_file_path {
        if path.trim().is_empty() {
            return Err(AppError::config_error("log_file_path is empty"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config("token", 75, &None).is_ok());
        assert!(validate_config("token", 1, &Some("/tmp/scan.log".to_string())).is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(validate_config("", 75, &None).is_err());
        assert!(validate_config("   ", 75, &None).is_err());
    }

    #[test]
    fn test_zero_rate_budget_rejected() {
        assert!(validate_config("token", 0, &None).is_err());
    }

    #[test]
    fn test_empty_log_path_rejected() {
        assert!(validate_config("token", 75, &Some(String::new())).is_err());
    }
}
