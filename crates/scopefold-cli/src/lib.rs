//! scopefold CLI - Command-line interface library
//!
//! This library provides the CLI functionality for scopefold, including:
//! - Check: Compile a rule file and report every section
//! - Match: Evaluate a selector against a scope list
//! - Level: Level a document with a rule file and a pattern lexer
//!
//! # Library Usage
//!
//! ```ignore
//! use scopefold_cli::{level_command, OutputFormat};
//!
//! // Write leveled tokens as JSON into a buffer
//! let mut out = Vec::new();
//! level_command(&input, &rules, &lexer, OutputFormat::Json, false, &mut out)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Validate a rule file
//! scopefold check matlab.rules.toml
//!
//! # Does a selector match a scope list?
//! scopefold match "meta.function entity.name" source.m meta.function.m entity.name.function.m
//!
//! # Level a document
//! scopefold level script.m --rules matlab.rules.toml --lexer matlab.lexer.toml --format json
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{check_command, level_command, match_command};
pub use app::{run_cli, OutputFormat};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
