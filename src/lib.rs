//! promptmine
//!
//! Recovers the system prompt and built-in tool definitions from released
//! versions of a command line coding agent. Each version is downloaded,
//! its minimum-version guard is neutralized, and it is run once under an
//! HTTP tracing wrapper. The richest captured request is then documented
//! as Markdown.
//!
//! The text processing core (`patcher`, `selection`, `extract`, `report`)
//! is pure; `pipeline` owns the external processes and the filesystem.

pub mod config;
pub mod extract;
pub mod logging;
pub mod model;
pub mod parser;
pub mod patcher;
pub mod pipeline;
pub mod report;
pub mod selection;
pub mod source;
