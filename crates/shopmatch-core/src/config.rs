use crate::app_config::AppConfig;
use crate::similarity::Threshold;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
/// A `threshold` override (e.g. from a command-line flag) wins over
/// `SHOPMATCH_SIMILARITY_THRESHOLD`, which is then not read at all.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config(threshold: Option<Threshold>) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env(threshold)
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env(threshold: Option<Threshold>) -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), threshold)
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config for file-based matching.
fn build_app_config<F>(lookup: F, threshold: Option<Threshold>) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("SHOPMATCH_LOG_LEVEL", "info");

    let similarity_threshold = match threshold {
        Some(t) => t,
        None => {
            let var = "SHOPMATCH_SIMILARITY_THRESHOLD";
            or_default(var, "0.7")
                .parse::<Threshold>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                })?
        }
    };

    let source_url = non_empty("SHOPMATCH_SOURCE_URL");
    let source_token = non_empty("SHOPMATCH_SOURCE_TOKEN");

    let request_timeout_secs = parse_u64("SHOPMATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHOPMATCH_USER_AGENT", "shopmatch/0.1 (shop-dedup)");
    let max_retries = parse_u32("SHOPMATCH_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("SHOPMATCH_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        log_level,
        similarity_threshold,
        source_url,
        source_token,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
