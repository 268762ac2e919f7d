//! Core translation types and logic.

pub mod expr;
pub mod lexer;
pub mod rule_parser;
pub mod platform;
pub mod emitter;
pub mod combiner;
pub mod translate;
pub mod strategy;
pub mod config_validation;
pub mod error;
