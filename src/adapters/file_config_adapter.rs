//! INI file configuration adapter.
//!
//! Strategy files look like:
//!
//! ```ini
//! [strategy]
//! name = Breakout
//! symbol = EURUSD
//! entry_long = OPEN[1] < CLOSE[6], HIGH[0] > HIGH[1]
//! exit_long = CLOSE[0] < LOW[1]
//!
//! [emit]
//! period = PERIOD_H1
//! ```

use crate::domain::error::TranslateError;
use crate::domain::platform::EmitOptions;
use crate::domain::strategy::Strategy;
use crate::domain::translate::RuleSet;
use crate::ports::config_port::ConfigPort;
use configparser::ini::{Ini, IniDefault};
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

/// Whole-line `;`/`#` comments are still skipped, but values are taken
/// verbatim so a stray symbol in a rule list reaches the lexer.
fn new_ini() -> Ini {
    let mut defaults = IniDefault::default();
    defaults.enable_inline_comments = false;
    Ini::new_from_defaults(defaults)
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = new_ini();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = new_ini();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

fn required(config: &dyn ConfigPort, key: &str) -> Result<String, TranslateError> {
    config
        .get_non_empty("strategy", key)
        .ok_or_else(|| TranslateError::ConfigMissing {
            section: "strategy".to_string(),
            key: key.to_string(),
        })
}

/// Build a `Strategy` from the `[strategy]` section.
pub fn build_strategy(config: &dyn ConfigPort) -> Result<Strategy, TranslateError> {
    let optional_set = |key: &str| {
        config
            .get_non_empty("strategy", key)
            .map(|list| RuleSet::from_list(&list))
    };

    Ok(Strategy {
        name: required(config, "name")?,
        symbol: required(config, "symbol")?,
        entry_long: RuleSet::from_list(&required(config, "entry_long")?),
        exit_long: RuleSet::from_list(&required(config, "exit_long")?),
        entry_short: optional_set("entry_short"),
        exit_short: optional_set("exit_short"),
    })
}

/// Build `EmitOptions` from the optional `[emit]` section.
pub fn build_emit_options(config: &dyn ConfigPort) -> EmitOptions {
    let defaults = EmitOptions::default();
    EmitOptions {
        symbol: config
            .get_non_empty("emit", "symbol")
            .unwrap_or(defaults.symbol),
        period: config
            .get_non_empty("emit", "period")
            .unwrap_or(defaults.period),
        series: config
            .get_non_empty("emit", "series")
            .unwrap_or(defaults.series),
    }
}
