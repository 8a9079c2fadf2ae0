mod error;
mod run_config;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use run_config::{
    PacingConfig, ProgressConfig, RangeConfig, RetryConfig, RunConfig, TimeoutsConfig,
};
pub use validation::{collection_links, to_retry_policy, to_settings, validate_config};

/// Resolve environment variables in a string.
/// Supports ${VAR_NAME} syntax; unset variables expand to nothing.
/// Substituted values are not expanded again.
pub fn expand_env(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env() {
        std::env::set_var("ICONBATCH_TEST_DIR", "/srv/icons");

        assert_eq!(
            expand_env("${ICONBATCH_TEST_DIR}/progress.json"),
            "/srv/icons/progress.json"
        );
        assert_eq!(expand_env("plain.json"), "plain.json");
        assert_eq!(expand_env("${ICONBATCH_TEST_UNSET_VAR}x"), "x");
        assert_eq!(expand_env("broken${"), "broken${");
    }

    #[test]
    fn test_expand_env_does_not_reexpand_values() {
        std::env::set_var("ICONBATCH_TEST_SELF", "${ICONBATCH_TEST_SELF}");
        std::env::set_var("ICONBATCH_TEST_NAME", "runs");

        assert_eq!(
            expand_env("${ICONBATCH_TEST_SELF}/${ICONBATCH_TEST_NAME}.json"),
            "${ICONBATCH_TEST_SELF}/runs.json"
        );
    }
}
