use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Values that are validated only after command-line overrides (the seed URL)
/// are not checked here; call [`validate`](crate::config::validate) once the
/// final configuration is assembled.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use seoran::config::load_config;
///
/// let config = load_config(Path::new("seoran.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that saved pages can be traced back to the exact
/// settings that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    Ok(hash_bytes(&content))
}

/// Loads a configuration file and returns it with its content hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_bytes(content.as_bytes())))
}

/// Loads and validates a configuration file in one step
///
/// Convenience for callers that have no command-line overrides to apply.
pub fn load_validated_config(path: &Path) -> Result<Config, ConfigError> {
    let config = load_config(path)?;
    validate(&config)?;
    Ok(config)
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
