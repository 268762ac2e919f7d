//! ruleconv: translates OHLC trading rules into platform condition strings.
//!
//! Hexagonal architecture: the translation core lives in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
