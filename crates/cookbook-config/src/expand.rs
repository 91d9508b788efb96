//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_with_default_uses_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("COOKBOOK_TEST_DEFAULT", "kitchen");
        }
        let result = expand_env("${COOKBOOK_TEST_DEFAULT:-pantry}", "test.field").unwrap();
        assert_eq!(result, "kitchen");
        unsafe {
            std::env::remove_var("COOKBOOK_TEST_DEFAULT");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("COOKBOOK_UNSET_VAR");
        }
        let result = expand_env("${COOKBOOK_UNSET_VAR:-pantry}", "test.field").unwrap();
        assert_eq!(result, "pantry");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("COOKBOOK_MISSING_VAR");
        }
        let err = expand_env("${COOKBOOK_MISSING_VAR}", "recipes.source_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("COOKBOOK_MISSING_VAR"));
        assert!(err.to_string().contains("recipes.source_dir"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("/srv/recipes", "test.field").unwrap();
        assert_eq!(result, "/srv/recipes");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("COOKBOOK_HOME_TEST", "/home/chef");
        }
        let result = expand_env("${COOKBOOK_HOME_TEST}/recipes", "test.field").unwrap();
        assert_eq!(result, "/home/chef/recipes");
        unsafe {
            std::env::remove_var("COOKBOOK_HOME_TEST");
        }
    }
}
