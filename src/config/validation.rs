use crate::config::types::{Config, CrawlerConfig, EligibilityConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_eligibility_config(&config.eligibility)?;
    validate_seeds(&config.seeds, config.crawler.allow_insecure_http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.max_links_per_page < 1 {
        return Err(ConfigError::Validation(
            "max_links_per_page must be >= 1".to_string(),
        ));
    }

    if config.shingle_size < 1 {
        return Err(ConfigError::Validation(
            "shingle_size must be >= 1".to_string(),
        ));
    }

    if config.fingerprint_capacity < 1 {
        return Err(ConfigError::Validation(
            "fingerprint_capacity must be >= 1".to_string(),
        ));
    }

    // Similarity never exceeds 1.0, so a threshold of 1.0 would match nothing
    if !(config.similarity_threshold > 0.0 && config.similarity_threshold < 1.0) {
        return Err(ConfigError::Validation(format!(
            "similarity_threshold must be in (0, 1), got {}",
            config.similarity_threshold
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.page_dir.is_empty() {
        return Err(ConfigError::Validation(
            "page_dir cannot be empty".to_string(),
        ));
    }

    if config.frontier_path.is_empty() {
        return Err(ConfigError::Validation(
            "frontier_path cannot be empty".to_string(),
        ));
    }

    if config.log_path.is_empty() {
        return Err(ConfigError::Validation(
            "log_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_eligibility_config(config: &EligibilityConfig) -> Result<(), ConfigError> {
    if config.cache_size < 1 {
        return Err(ConfigError::Validation(
            "eligibility cache_size must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates seed URLs
fn validate_seeds(seeds: &[String], allow_insecure_http: bool) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        let scheme_ok = url.scheme() == "https" || (allow_insecure_http && url.scheme() == "http");
        if !scheme_ok {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTPS scheme",
                seed
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
