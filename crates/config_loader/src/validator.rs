//! Config validation
//!
//! Rules:
//! - every target URL parses and uses http/https
//! - manual.workers > 0, load.workers > 0
//! - load.chunk_size > 0 when set
//! - transport.timeout_ms > 0

use contracts::{ContractError, LoadGenConfig};
use url::Url;

/// Validate a LoadGenConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &LoadGenConfig) -> Result<(), ContractError> {
    validate_urls(config)?;
    validate_workers(config)?;
    validate_chunk_size(config)?;
    validate_transport(config)?;
    Ok(())
}

fn validate_urls(config: &LoadGenConfig) -> Result<(), ContractError> {
    validate_url("manual.url", &config.manual.url)?;
    validate_url(
        "targets.credit_application",
        &config.targets.credit_application,
    )?;
    validate_url("targets.transaction", &config.targets.transaction)?;
    Ok(())
}

/// Check that `value` is an absolute http(s) URL
pub fn validate_url(field: &str, value: &str) -> Result<(), ContractError> {
    let url = Url::parse(value).map_err(|e| {
        ContractError::config_validation(field, format!("invalid url '{value}': {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ContractError::config_validation(
            field,
            format!("unsupported url scheme '{scheme}', expected http or https"),
        )),
    }
}

fn validate_workers(config: &LoadGenConfig) -> Result<(), ContractError> {
    if config.manual.workers == 0 {
        return Err(ContractError::config_validation(
            "manual.workers",
            "workers must be > 0",
        ));
    }
    if config.load.workers == 0 {
        return Err(ContractError::config_validation(
            "load.workers",
            "workers must be > 0",
        ));
    }
    Ok(())
}

fn validate_chunk_size(config: &LoadGenConfig) -> Result<(), ContractError> {
    if config.load.chunk_size == Some(0) {
        return Err(ContractError::config_validation(
            "load.chunk_size",
            "chunk_size must be > 0",
        ));
    }
    Ok(())
}

fn validate_transport(config: &LoadGenConfig) -> Result<(), ContractError> {
    if config.transport.timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "transport.timeout_ms",
            "timeout_ms must be > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = LoadGenConfig::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = LoadGenConfig::default();
        config.manual.url = "not a url".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("manual.url"), "got: {err}");
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut config = LoadGenConfig::default();
        config.targets.transaction = "ftp://example.com/txn".into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("unsupported url scheme"), "got: {err}");
    }

    #[test]
    fn test_zero_workers() {
        let mut config = LoadGenConfig::default();
        config.load.workers = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("load.workers"), "got: {err}");
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut config = LoadGenConfig::default();
        config.load.chunk_size = Some(0);
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("chunk_size must be > 0"), "got: {err}");
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = LoadGenConfig::default();
        config.transport.timeout_ms = 0;
        assert!(validate(&config).is_err());
    }
}
