//! Parley core library — transcript assembly, token estimation, context files, and UI strings
//! for the gateway dashboard and the CLI.

pub mod chat;
pub mod config;
pub mod context;
pub mod format;
pub mod i18n;
pub mod tokens;
