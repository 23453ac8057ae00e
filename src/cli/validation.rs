//! Value parsers for CLI arguments that clap cannot check on its own.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

/// Upper bound for `check-db --attempts`.
const MAX_ATTEMPTS: u32 = 100;

const MAX_HOSTNAME_LEN: usize = 253;

/// Port in 1..=65535.
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535, got: '{}'", port_str))?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// An existing, readable regular file.
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }
    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// Connection attempts in 1..=100.
pub fn validate_attempts(attempts_str: &str) -> Result<u32, String> {
    let attempts: u32 = attempts_str
        .parse()
        .map_err(|_| format!("Attempts must be a positive number, got: '{}'", attempts_str))?;

    match attempts {
        0 => Err("Attempts must be greater than 0".to_string()),
        n if n > MAX_ATTEMPTS => Err(format!("Attempts cannot exceed {}", MAX_ATTEMPTS)),
        n => Ok(n),
    }
}

/// An IP literal or a plausible hostname.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // Dotted digits that failed to parse as an IP are a typo, not a hostname.
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address format: '{}'", host_str));
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "Host address is too long (maximum {} characters)",
            MAX_HOSTNAME_LEN
        ));
    }
    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return Err(format!("Host address contains invalid characters: '{}'", host_str));
    }

    Ok(host.to_string())
}
