//! Port traits: the boundary between the translation core and its inputs.

pub mod config_port;
