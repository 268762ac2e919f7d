//! Configuration validation.
//!
//! Checks strategy and emit settings before any rule is translated.

use crate::domain::error::TranslateError;
use crate::domain::platform::EmitOptions;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TranslateError> {
    for key in ["name", "symbol", "entry_long", "exit_long"] {
        require_non_empty(config, "strategy", key)?;
    }
    if let Some(symbol) = config.get_string("strategy", "symbol") {
        // The symbol becomes part of output file names.
        if symbol.contains(['/', '\\']) {
            return Err(TranslateError::ConfigInvalid {
                section: "strategy".to_string(),
                key: "symbol".to_string(),
                reason: format!("'{}' must not contain a path separator", symbol),
            });
        }
    }
    Ok(())
}

pub fn validate_emit_config(config: &dyn ConfigPort) -> Result<(), TranslateError> {
    for key in ["symbol", "period", "series"] {
        if let Some(value) = config.get_string("emit", key) {
            require_identifier(key, value.trim())?;
        }
    }
    Ok(())
}

/// Check emit options assembled outside a config file, e.g. from CLI flags.
pub fn validate_emit_options(opts: &EmitOptions) -> Result<(), TranslateError> {
    require_identifier("symbol", &opts.symbol)?;
    require_identifier("period", &opts.period)?;
    require_identifier("series", &opts.series)
}

fn require_identifier(key: &str, value: &str) -> Result<(), TranslateError> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(TranslateError::ConfigInvalid {
            section: "emit".to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not a valid identifier", value),
        })
    }
}

fn require_non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), TranslateError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(TranslateError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must not be empty", key),
        }),
        None => Err(TranslateError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
