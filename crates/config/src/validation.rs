use crate::ConfigResult;

/// Trait for configuration validation
pub trait ConfigValidator {
    fn validate(&self) -> ConfigResult<()>;
}

/// General validation utilities
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field_name: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} cannot be empty"
            )));
        }
        Ok(())
    }

    /// Validate that a timeout is reasonable
    pub fn validate_timeout_seconds(timeout_seconds: u64) -> ConfigResult<()> {
        if timeout_seconds == 0 {
            return Err(crate::ConfigError::Validation(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if timeout_seconds > 3600 {
            return Err(crate::ConfigError::Validation(
                "timeout_seconds must be less than or equal to 3600".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate that a count is reasonable
    pub fn validate_count(count: usize, field_name: &str) -> ConfigResult<()> {
        if count == 0 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be greater than 0"
            )));
        }
        if count > 10000 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be less than or equal to 10000"
            )));
        }
        Ok(())
    }

    /// Validate that a database identifier points at a real row
    pub fn validate_row_id(id: i64, field_name: &str) -> ConfigResult<()> {
        if id <= 0 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be a positive row id"
            )));
        }
        Ok(())
    }

    /// Validate that a URL uses one of the accepted schemes
    pub fn validate_url_scheme(url: &str, schemes: &[&str], field_name: &str) -> ConfigResult<()> {
        Self::validate_not_empty(url, field_name)?;

        if !schemes
            .iter()
            .any(|scheme| url.starts_with(&format!("{scheme}://")))
        {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must start with one of: {}",
                schemes
                    .iter()
                    .map(|s| format!("{s}://"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(ValidationUtils::validate_not_empty("test", "field").is_ok());
        assert!(ValidationUtils::validate_not_empty("  test  ", "field").is_ok());
        assert!(ValidationUtils::validate_not_empty("", "field").is_err());
        assert!(ValidationUtils::validate_not_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_timeout_seconds() {
        assert!(ValidationUtils::validate_timeout_seconds(30).is_ok());
        assert!(ValidationUtils::validate_timeout_seconds(3600).is_ok());
        assert!(ValidationUtils::validate_timeout_seconds(0).is_err());
        assert!(ValidationUtils::validate_timeout_seconds(3601).is_err());
    }

    #[test]
    fn test_validate_count() {
        assert!(ValidationUtils::validate_count(1, "test").is_ok());
        assert!(ValidationUtils::validate_count(0, "test").is_err());
        assert!(ValidationUtils::validate_count(10001, "test").is_err());
    }

    #[test]
    fn test_validate_row_id() {
        assert!(ValidationUtils::validate_row_id(1, "id").is_ok());
        assert!(ValidationUtils::validate_row_id(0, "id").is_err());
        assert!(ValidationUtils::validate_row_id(-4, "id").is_err());
    }

    #[test]
    fn test_validate_url_scheme() {
        let schemes = ["mysql", "mariadb"];
        assert!(ValidationUtils::validate_url_scheme("mysql://u:p@host/glpi", &schemes, "url").is_ok());
        assert!(ValidationUtils::validate_url_scheme("mariadb://host/glpi", &schemes, "url").is_ok());
        assert!(ValidationUtils::validate_url_scheme("postgres://host/glpi", &schemes, "url").is_err());
        assert!(ValidationUtils::validate_url_scheme("", &schemes, "url").is_err());
    }
}
