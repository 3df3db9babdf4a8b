//! `${VAR}` and `${VAR:-default}` expansion for string settings.

use crate::ConfigError;

/// Expand environment references in `value`.
///
/// Values without `${` are returned unchanged. A reference to an unset
/// variable without a default is an error.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut unset = Vec::new();
    let expanded = shellexpand::env_with_context_no_errors(value, |var| {
        std::env::var(var).map_or_else(
            |_| {
                unset.push(var.to_owned());
                None
            },
            Some,
        )
    });

    if let Some(var) = unset
        .iter()
        .find(|var| expanded.contains(&format!("${{{var}}}")))
    {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{var}}} not set"),
        });
    }
    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_literal_passes_through() {
        assert_eq!(expand_env("thinkcspy", "video.basecourse").unwrap(), "thinkcspy");
        assert_eq!(expand_env("$HOME/x", "video.store_dir").unwrap(), "$HOME/x");
    }

    #[test]
    fn test_expands_set_variable() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("RW_VIDEO_TEST_COURSE", "pythonds");
        }
        let result = expand_env("${RW_VIDEO_TEST_COURSE}-2", "video.basecourse").unwrap();
        assert_eq!(result, "pythonds-2");
        unsafe {
            std::env::remove_var("RW_VIDEO_TEST_COURSE");
        }
    }

    #[test]
    fn test_default_used_when_unset() {
        let result =
            expand_env("${RW_VIDEO_TEST_NEVER_SET:-fallback}", "video.basecourse").unwrap();
        assert_eq!(result, "fallback");
    }

    #[test]
    fn test_unset_without_default_errors() {
        let err = expand_env("${RW_VIDEO_TEST_MISSING}", "video.store_dir").unwrap_err();
        match err {
            ConfigError::EnvVar { field, message } => {
                assert_eq!(field, "video.store_dir");
                assert_eq!(message, "${RW_VIDEO_TEST_MISSING} not set");
            }
            other => panic!("expected EnvVar, got {other:?}"),
        }
    }
}
