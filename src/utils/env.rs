//! Environment variable helpers used by configuration overrides

/// Environment variable read as `Some(value)` when set and non-empty
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a boolean flag value.
///
/// Accepts `true/1/yes/on` and `false/0/no/off`, case-insensitive.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Environment variable read as a boolean flag; `None` if unset or unparseable
pub fn env_bool_opt(key: &str) -> Option<bool> {
    env_opt(key).as_deref().and_then(parse_bool)
}
