//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones: value ranges and
//! endpoint well-formedness. All violations are reported together, not
//! just the first.

use url::Url;

use crate::config::schema::ClientConfig;
use crate::fetch::FetchOptions;

/// A single semantic violation, as `field: problem`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub problem: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.wallet.expiry_secs == 0 {
        push(&mut errors, "wallet.expiry_secs", "must be positive");
    }
    if config.wallet.storage_key.is_empty() {
        push(&mut errors, "wallet.storage_key", "must not be empty");
    }
    if config.wallet.storage_path.is_empty() {
        push(&mut errors, "wallet.storage_path", "must not be empty");
    }

    check_url(&mut errors, "market_data.endpoint", &config.market_data.endpoint);
    check_url(&mut errors, "metadata.ipfs_gateway", &config.metadata.ipfs_gateway);

    if config.market_data.request_timeout_secs == 0 {
        push(&mut errors, "market_data.request_timeout_secs", "must be positive");
    }
    if config.metadata.request_timeout_secs == 0 {
        push(&mut errors, "metadata.request_timeout_secs", "must be positive");
    }
    if config.market_data.trending_limit == 0 {
        push(&mut errors, "market_data.trending_limit", "must be positive");
    }

    check_fetch(&mut errors, "market_data.fetch", &config.market_data.fetch);
    check_fetch(&mut errors, "metadata.fetch", &config.metadata.fetch);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_fetch(errors: &mut Vec<ValidationError>, prefix: &str, fetch: &FetchOptions) {
    if fetch.max_attempts == 0 {
        push(errors, &format!("{prefix}.max_attempts"), "must be at least 1");
    }
    if fetch.max_requests_per_window == 0 {
        push(
            errors,
            &format!("{prefix}.max_requests_per_window"),
            "must be at least 1",
        );
    }
    if fetch.window_ms == 0 {
        push(errors, &format!("{prefix}.window_ms"), "must be positive");
    }
    if fetch.max_delay_ms < fetch.base_delay_ms {
        push(
            errors,
            &format!("{prefix}.max_delay_ms"),
            "must be at least base_delay_ms",
        );
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => push(
            errors,
            field,
            &format!("unsupported scheme '{}'", url.scheme()),
        ),
        Err(e) => push(errors, field, &format!("not a valid URL: {e}")),
    }
}

fn push(errors: &mut Vec<ValidationError>, field: &str, problem: &str) {
    errors.push(ValidationError {
        field: field.to_string(),
        problem: problem.to_string(),
    });
}
